//! Drag gesture tracking for job cards and column headers.
//!
//! A gesture moves `Idle -> Dragging -> {Dropped | Cancelled}`. Job drags
//! commit a single `MoveJob` on drop. Column drags commit a `ReorderColumns`
//! every time the pointer crosses another column's midpoint, so the board
//! reorders live; cancelling such a drag keeps whatever was already
//! committed.

use std::collections::BTreeSet;

use shared::domain::{Column, ColumnId, JobId};
use tracing::{debug, info};

use crate::store::{Action, Dispatcher};

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragItem {
    Job(JobId),
    /// `index` is where the dragged column currently sits on the board.
    Column { column_id: ColumnId, index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging(DragItem),
    Dropped,
    Cancelled,
}

/// Horizontal extent of a rendered column, in the same units as pointer
/// positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSpan {
    pub left: f32,
    pub width: f32,
}

impl ColumnSpan {
    pub fn new(left: f32, width: f32) -> Self {
        Self { left, width }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn midpoint(&self) -> f32 {
        self.left + self.width / 2.0
    }

    pub fn contains(&self, x: f32) -> bool {
        x >= self.left && x < self.right()
    }
}

#[derive(Debug, Default)]
pub struct DragCoordinator {
    phase: DragPhase,
    hovered: BTreeSet<ColumnId>,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    pub fn dragged_job(&self) -> Option<&JobId> {
        match &self.phase {
            DragPhase::Dragging(DragItem::Job(job_id)) => Some(job_id),
            _ => None,
        }
    }

    pub fn dragged_column_index(&self) -> Option<usize> {
        match &self.phase {
            DragPhase::Dragging(DragItem::Column { index, .. }) => Some(*index),
            _ => None,
        }
    }

    /// Whether `column_id` should render its drop highlight.
    pub fn is_hovered(&self, column_id: &ColumnId) -> bool {
        self.hovered.contains(column_id)
    }

    pub fn begin_job_drag(&mut self, job_id: JobId) {
        self.abandon_active("job drag started");
        debug!(job_id = %job_id, "drag: job drag started");
        self.phase = DragPhase::Dragging(DragItem::Job(job_id));
    }

    /// Pointer entered a column body while a job card is dragged.
    pub fn enter_column(&mut self, column_id: &ColumnId) {
        if self.dragged_job().is_some() {
            self.hovered.insert(column_id.clone());
        }
    }

    pub fn leave_column(&mut self, column_id: &ColumnId) {
        self.hovered.remove(column_id);
    }

    /// A job card was released over `column_id`. Fires exactly one `MoveJob`;
    /// returns whether the board changed.
    pub fn drop_job_on<D: Dispatcher + ?Sized>(
        &mut self,
        dispatcher: &mut D,
        column_id: &ColumnId,
    ) -> bool {
        let Some(job_id) = self.dragged_job().cloned() else {
            debug!(column_id = %column_id, "drag: drop ignored, no job drag active");
            return false;
        };
        self.hovered.clear();
        self.phase = DragPhase::Dropped;
        let changed = dispatcher.dispatch(Action::MoveJob {
            job_id: job_id.clone(),
            target_column_id: column_id.clone(),
        });
        info!(job_id = %job_id, column_id = %column_id, changed, "drag: job dropped");
        changed
    }

    /// Starts dragging the header of `column_id`. Returns `false` if the
    /// column is not on the board.
    pub fn begin_column_drag<D: Dispatcher + ?Sized>(
        &mut self,
        dispatcher: &D,
        column_id: &ColumnId,
    ) -> bool {
        let Some(index) = dispatcher.board().column_index(column_id) else {
            return false;
        };
        self.abandon_active("column drag started");
        debug!(column_id = %column_id, index, "drag: column drag started");
        self.phase = DragPhase::Dragging(DragItem::Column {
            column_id: column_id.clone(),
            index,
        });
        true
    }

    /// The dragged column's pointer is at `pointer_x` over the column
    /// currently at `hover_index`, whose extent is `span`. Commits a reorder
    /// once the pointer is past the hovered column's midpoint in the
    /// direction of travel; returns whether a reorder was committed.
    pub fn hover_column<D: Dispatcher + ?Sized>(
        &mut self,
        dispatcher: &mut D,
        hover_index: usize,
        pointer_x: f32,
        span: ColumnSpan,
    ) -> bool {
        let DragPhase::Dragging(DragItem::Column { column_id, index }) = &self.phase else {
            return false;
        };
        let (column_id, tracked) = (column_id.clone(), *index);

        let columns = dispatcher.board().columns();
        // The board may have changed under the gesture; follow the column by id.
        let Some(current) = columns.iter().position(|col| col.id == column_id) else {
            debug!(column_id = %column_id, "drag: dragged column vanished, cancelling");
            self.phase = DragPhase::Cancelled;
            return false;
        };
        if current != tracked {
            self.set_tracked_index(current);
        }

        if hover_index == current || hover_index >= columns.len() {
            return false;
        }
        let midpoint = span.midpoint();
        if current < hover_index && pointer_x < midpoint {
            return false;
        }
        if current > hover_index && pointer_x > midpoint {
            return false;
        }

        let order = moved(columns, current, hover_index);
        if !dispatcher.dispatch(Action::ReorderColumns(order)) {
            return false;
        }
        debug!(
            column_id = %column_id,
            from = current,
            to = hover_index,
            "drag: column reordered"
        );
        self.set_tracked_index(hover_index);
        true
    }

    /// Column header released. Reorders were already committed while
    /// hovering.
    pub fn drop_column(&mut self) {
        if let DragPhase::Dragging(DragItem::Column { column_id, index }) = &self.phase {
            info!(column_id = %column_id, index, "drag: column dropped");
            self.phase = DragPhase::Dropped;
        }
    }

    /// Released outside any valid target, or aborted. Nothing is rolled back.
    pub fn cancel(&mut self) {
        if self.is_dragging() {
            debug!("drag: gesture cancelled");
            self.phase = DragPhase::Cancelled;
        }
        self.hovered.clear();
    }

    /// Returns to `Idle` once a finished gesture has been observed.
    pub fn reset(&mut self) {
        if !self.is_dragging() {
            self.phase = DragPhase::Idle;
        }
    }

    fn abandon_active(&mut self, reason: &str) {
        if self.is_dragging() {
            debug!(reason, "drag: previous gesture cancelled");
            self.phase = DragPhase::Cancelled;
        }
        self.hovered.clear();
    }

    fn set_tracked_index(&mut self, new_index: usize) {
        if let DragPhase::Dragging(DragItem::Column { index, .. }) = &mut self.phase {
            *index = new_index;
        }
    }
}

/// `columns` with the entry at `from` removed and reinserted at `to`.
/// Both indices must be in range.
fn moved(columns: &[Column], from: usize, to: usize) -> Vec<Column> {
    let mut order = columns.to_vec();
    let column = order.remove(from);
    order.insert(to, column);
    order
}

#[cfg(test)]
#[path = "tests/drag_tests.rs"]
mod tests;
