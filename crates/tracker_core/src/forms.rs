//! Column-level form handling: the add-column dialog and inline title edits.

use shared::{
    domain::{Column, ColumnId},
    error::{Field, FieldError, ValidationError},
};
use tracing::debug;

use crate::store::{Action, Dispatcher};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnForm {
    pub title: String,
}

impl ColumnForm {
    pub fn validate(&self) -> Result<String, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FieldError::required(Field::ColumnTitle).into());
        }
        Ok(title.to_string())
    }

    /// Adds a new, empty column with a fresh id, resets the form and closes
    /// the add-column dialog if it is open. Invalid input never reaches the
    /// store.
    pub fn submit<D: Dispatcher + ?Sized>(
        &mut self,
        dispatcher: &mut D,
    ) -> Result<ColumnId, ValidationError> {
        let title = self.validate()?;
        let column = Column::new(ColumnId::generate(), title);
        let column_id = column.id.clone();
        dispatcher.dispatch(Action::AddColumn(column));
        if dispatcher.board().show_add_column_dialog() {
            dispatcher.dispatch(Action::ToggleAddColumnDialog);
        }
        self.title.clear();
        Ok(column_id)
    }
}

/// Commits an inline edit of a column title. Input is trimmed; empty input or
/// input equal to the current title is discarded. Returns whether a rename
/// was dispatched and applied.
pub fn commit_title_edit<D: Dispatcher + ?Sized>(
    dispatcher: &mut D,
    column_id: &ColumnId,
    input: &str,
) -> bool {
    let Some(current) = dispatcher.board().column(column_id).map(|col| col.title.clone()) else {
        return false;
    };
    let trimmed = input.trim();
    if trimmed.is_empty() || input == current {
        debug!(column_id = %column_id, "forms: title edit discarded");
        return false;
    }
    dispatcher.dispatch(Action::RenameColumn {
        column_id: column_id.clone(),
        title: trimmed.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    #[test]
    fn blank_title_is_rejected_before_dispatch() {
        let mut store = Store::new();
        let mut form = ColumnForm {
            title: "   ".into(),
        };
        let err = form.submit(&mut store).expect_err("blank title");
        assert_eq!(
            err.message_for(Field::ColumnTitle),
            Some("Column title is required")
        );
        assert_eq!(store.revision(), 0);
        assert_eq!(form.title, "   ");
    }

    #[test]
    fn submit_adds_trimmed_column_and_closes_dialog() {
        let mut store = Store::new();
        store.dispatch(Action::ToggleAddColumnDialog);
        let mut form = ColumnForm {
            title: "  Phone screen ".into(),
        };

        let column_id = form.submit(&mut store).expect("valid");

        let column = store.state().column(&column_id).expect("column");
        assert_eq!(column.title, "Phone screen");
        assert_eq!(column.count, 0);
        assert!(!store.state().show_add_column_dialog());
        assert!(form.title.is_empty());
    }

    #[test]
    fn title_edits_are_trimmed_and_ignored_when_blank_or_unchanged() {
        let mut store = Store::with_board(vec![Column::new("a", "Applied")], Vec::new());
        let id = ColumnId::from("a");

        assert!(!commit_title_edit(&mut store, &id, "   "));
        assert!(!commit_title_edit(&mut store, &id, "Applied"));
        assert!(commit_title_edit(&mut store, &id, "  Applied (2026) "));
        assert_eq!(store.state().columns()[0].title, "Applied (2026)");
        assert!(!commit_title_edit(&mut store, &ColumnId::from("gone"), "X"));
    }
}
