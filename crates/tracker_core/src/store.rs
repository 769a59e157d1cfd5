//! Authoritative board state and the closed set of transitions that mutate it.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use shared::domain::{Column, ColumnId, Job, JobId};
use tracing::{debug, warn};

use crate::invariants::{self, InvariantViolation};

/// Every legal state transition. Ids and timestamps are supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Action {
    ReplaceColumns(Vec<Column>),
    ReplaceJobs(Vec<Job>),
    AddColumn(Column),
    AddJob(Job),
    MoveJob {
        job_id: JobId,
        target_column_id: ColumnId,
    },
    UpdateJob(Job),
    DeleteJob(JobId),
    DeleteColumn(ColumnId),
    RenameColumn {
        column_id: ColumnId,
        title: String,
    },
    ReorderColumns(Vec<Column>),
    ToggleAddJobDialog,
    ToggleAddColumnDialog,
    SetSelectedColumn(ColumnId),
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::ReplaceColumns(_) => "replace_columns",
            Action::ReplaceJobs(_) => "replace_jobs",
            Action::AddColumn(_) => "add_column",
            Action::AddJob(_) => "add_job",
            Action::MoveJob { .. } => "move_job",
            Action::UpdateJob(_) => "update_job",
            Action::DeleteJob(_) => "delete_job",
            Action::DeleteColumn(_) => "delete_column",
            Action::RenameColumn { .. } => "rename_column",
            Action::ReorderColumns(_) => "reorder_columns",
            Action::ToggleAddJobDialog => "toggle_add_job_dialog",
            Action::ToggleAddColumnDialog => "toggle_add_column_dialog",
            Action::SetSelectedColumn(_) => "set_selected_column",
        }
    }
}

/// Columns, jobs and the transient dialog/selection flags.
///
/// Fields are private: the only way to obtain a different state is to
/// dispatch an [`Action`] through a [`Store`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardState {
    columns: Vec<Column>,
    jobs: Vec<Job>,
    show_add_job_dialog: bool,
    show_add_column_dialog: bool,
    selected_column: Option<ColumnId>,
}

impl BoardState {
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn column(&self, column_id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|col| &col.id == column_id)
    }

    pub fn column_index(&self, column_id: &ColumnId) -> Option<usize> {
        self.columns.iter().position(|col| &col.id == column_id)
    }

    pub fn job(&self, job_id: &JobId) -> Option<&Job> {
        self.jobs.iter().find(|job| &job.id == job_id)
    }

    /// Jobs assigned to `column_id`, in board order.
    pub fn jobs_in_column<'a>(&'a self, column_id: &'a ColumnId) -> impl Iterator<Item = &'a Job> {
        self.jobs.iter().filter(move |job| &job.column_id == column_id)
    }

    /// Membership count computed by scanning the job list, independent of the
    /// cached `Column::count`.
    pub fn column_count(&self, column_id: &ColumnId) -> usize {
        self.jobs_in_column(column_id).count()
    }

    pub fn show_add_job_dialog(&self) -> bool {
        self.show_add_job_dialog
    }

    pub fn show_add_column_dialog(&self) -> bool {
        self.show_add_column_dialog
    }

    pub fn selected_column(&self) -> Option<&ColumnId> {
        self.selected_column.as_ref()
    }

    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        invariants::check(&self.columns, &self.jobs)
    }

    fn column_mut(&mut self, column_id: &ColumnId) -> Option<&mut Column> {
        self.columns.iter_mut().find(|col| &col.id == column_id)
    }

    fn has_column(&self, column_id: &ColumnId) -> bool {
        self.columns.iter().any(|col| &col.id == column_id)
    }

    fn adjust_count(&mut self, column_id: &ColumnId, delta: isize) {
        if let Some(column) = self.column_mut(column_id) {
            column.count = column.count.saturating_add_signed(delta);
        }
    }

    fn recount(&mut self) {
        let mut counts: HashMap<&ColumnId, usize> = HashMap::new();
        for job in &self.jobs {
            *counts.entry(&job.column_id).or_default() += 1;
        }
        for column in &mut self.columns {
            column.count = counts.get(&column.id).copied().unwrap_or(0);
        }
    }

    fn drop_orphaned_jobs(&mut self) {
        let known: HashSet<ColumnId> = self.columns.iter().map(|col| col.id.clone()).collect();
        let before = self.jobs.len();
        self.jobs.retain(|job| {
            let keep = known.contains(&job.column_id);
            if !keep {
                warn!(
                    job_id = %job.id,
                    column_id = %job.column_id,
                    "store: dropping job that references a missing column"
                );
            }
            keep
        });
        if before != self.jobs.len() {
            debug!(dropped = before - self.jobs.len(), "store: orphaned jobs removed");
        }
        if let Some(selected) = &self.selected_column {
            if !known.contains(selected) {
                self.selected_column = None;
            }
        }
    }
}

/// Applies `action` to `state` in place. Returns `false`, leaving `state`
/// untouched, when the action refers to something that no longer exists or
/// would not change anything.
pub fn reduce(state: &mut BoardState, action: Action) -> bool {
    match action {
        Action::ReplaceColumns(columns) => {
            state.columns = dedup_by_id(columns, |col| col.id.clone(), "column");
            state.drop_orphaned_jobs();
            state.recount();
            true
        }
        Action::ReplaceJobs(jobs) => {
            state.jobs = dedup_by_id(jobs, |job| job.id.clone(), "job");
            state.drop_orphaned_jobs();
            state.recount();
            true
        }
        Action::AddColumn(mut column) => {
            if state.has_column(&column.id) {
                return false;
            }
            column.count = 0;
            state.columns.push(column);
            true
        }
        Action::AddJob(job) => {
            if state.job(&job.id).is_some() || !state.has_column(&job.column_id) {
                return false;
            }
            state.adjust_count(&job.column_id, 1);
            state.jobs.push(job);
            true
        }
        Action::MoveJob {
            job_id,
            target_column_id,
        } => {
            let Some(index) = state.jobs.iter().position(|job| job.id == job_id) else {
                return false;
            };
            let source = state.jobs[index].column_id.clone();
            if source == target_column_id || !state.has_column(&target_column_id) {
                return false;
            }
            state.adjust_count(&source, -1);
            state.adjust_count(&target_column_id, 1);
            state.jobs[index].column_id = target_column_id;
            true
        }
        Action::UpdateJob(mut job) => {
            let Some(index) = state.jobs.iter().position(|stored| stored.id == job.id) else {
                return false;
            };
            let previous = &state.jobs[index];
            // Creation time is fixed at creation.
            job.created_at = previous.created_at;
            if *previous == job {
                return false;
            }
            let source = previous.column_id.clone();
            if source != job.column_id {
                if !state.has_column(&job.column_id) {
                    return false;
                }
                state.adjust_count(&source, -1);
                state.adjust_count(&job.column_id, 1);
            }
            state.jobs[index] = job;
            true
        }
        Action::DeleteJob(job_id) => {
            let Some(index) = state.jobs.iter().position(|job| job.id == job_id) else {
                return false;
            };
            let job = state.jobs.remove(index);
            state.adjust_count(&job.column_id, -1);
            true
        }
        Action::DeleteColumn(column_id) => {
            let Some(index) = state.column_index(&column_id) else {
                return false;
            };
            state.columns.remove(index);
            state.jobs.retain(|job| job.column_id != column_id);
            if state.selected_column.as_ref() == Some(&column_id) {
                state.selected_column = None;
            }
            true
        }
        Action::RenameColumn { column_id, title } => match state.column_mut(&column_id) {
            Some(column) if column.title != title => {
                column.title = title;
                true
            }
            _ => false,
        },
        Action::ReorderColumns(order) => {
            let Some(reordered) = permute_columns(&state.columns, &order) else {
                return false;
            };
            if reordered == state.columns {
                return false;
            }
            state.columns = reordered;
            true
        }
        Action::ToggleAddJobDialog => {
            state.show_add_job_dialog = !state.show_add_job_dialog;
            true
        }
        Action::ToggleAddColumnDialog => {
            state.show_add_column_dialog = !state.show_add_column_dialog;
            true
        }
        Action::SetSelectedColumn(column_id) => {
            if !state.has_column(&column_id) || state.selected_column.as_ref() == Some(&column_id) {
                return false;
            }
            state.selected_column = Some(column_id);
            true
        }
    }
}

fn dedup_by_id<T, K, F>(items: Vec<T>, key: F, kind: &'static str) -> Vec<T>
where
    K: std::hash::Hash + Eq + std::fmt::Display,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| {
            let id = key(item);
            if seen.contains(&id) {
                warn!(kind, id = %id, "store: duplicate id in replacement, keeping first");
                false
            } else {
                seen.insert(id);
                true
            }
        })
        .collect()
}

/// Rearranges the stored columns into the order given by `order`. Returns
/// `None` unless `order` names exactly the stored column ids.
fn permute_columns(current: &[Column], order: &[Column]) -> Option<Vec<Column>> {
    if current.len() != order.len() {
        return None;
    }
    let mut by_id: HashMap<&ColumnId, &Column> =
        current.iter().map(|col| (&col.id, col)).collect();
    order
        .iter()
        .map(|col| by_id.remove(&col.id).cloned())
        .collect()
}

/// Something actions can be dispatched to. Implemented by [`Store`] and by
/// wrappers that add side effects around it.
pub trait Dispatcher {
    fn board(&self) -> &BoardState;

    /// Applies `action`; returns whether the state changed.
    fn dispatch(&mut self, action: Action) -> bool;
}

/// Holds the current board snapshot. Each applied action swaps in a new
/// snapshot, so a reader holding an older `Arc` keeps a consistent view.
#[derive(Debug, Default)]
pub struct Store {
    state: Arc<BoardState>,
    revision: u64,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store preloaded with `columns` and `jobs`, counts recomputed.
    pub fn with_board(columns: Vec<Column>, jobs: Vec<Job>) -> Self {
        let mut store = Self::new();
        store.dispatch(Action::ReplaceColumns(columns));
        store.dispatch(Action::ReplaceJobs(jobs));
        store
    }

    pub fn snapshot(&self) -> Arc<BoardState> {
        Arc::clone(&self.state)
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// Number of actions that changed the state so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn dispatch(&mut self, action: Action) -> bool {
        let name = action.name();
        let mut next = BoardState::clone(&self.state);
        if reduce(&mut next, action) {
            self.state = Arc::new(next);
            self.revision += 1;
            debug!(action = name, revision = self.revision, "store: action applied");
            true
        } else {
            debug!(action = name, "store: action ignored");
            false
        }
    }
}

impl Dispatcher for Store {
    fn board(&self) -> &BoardState {
        self.state()
    }

    fn dispatch(&mut self, action: Action) -> bool {
        Store::dispatch(self, action)
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
