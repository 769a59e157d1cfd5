use super::*;

use chrono::{TimeZone, Utc};

fn job(id: &str, column_id: &str) -> Job {
    let created_at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    Job::new(id, column_id, "Acme Inc", "Frontend Developer", created_at)
}

fn board_ab() -> Store {
    Store::with_board(vec![Column::new("a", "A"), Column::new("b", "B")], Vec::new())
}

fn count(store: &Store, column_id: &str) -> usize {
    store
        .state()
        .column(&ColumnId::from(column_id))
        .expect("column")
        .count
}

#[test]
fn add_job_increments_target_count() {
    let mut store = board_ab();
    assert!(store.dispatch(Action::AddJob(job("j1", "a"))));

    assert_eq!(count(&store, "a"), 1);
    assert_eq!(count(&store, "b"), 0);
    assert!(store.state().job(&JobId::from("j1")).is_some());
}

#[test]
fn add_job_to_missing_column_is_ignored() {
    let mut store = board_ab();
    let before = store.snapshot();
    let revision = store.revision();

    assert!(!store.dispatch(Action::AddJob(job("j1", "nope"))));
    assert_eq!(*store.snapshot(), *before);
    assert_eq!(store.revision(), revision);
}

#[test]
fn add_job_with_duplicate_id_is_ignored() {
    let mut store = board_ab();
    assert!(store.dispatch(Action::AddJob(job("j1", "a"))));
    assert!(!store.dispatch(Action::AddJob(job("j1", "b"))));
    assert_eq!(count(&store, "a"), 1);
    assert_eq!(count(&store, "b"), 0);
}

#[test]
fn add_column_forces_zero_count_and_rejects_duplicates() {
    let mut store = board_ab();
    let mut column = Column::new("c", "C");
    column.count = 7;
    assert!(store.dispatch(Action::AddColumn(column)));
    assert_eq!(count(&store, "c"), 0);

    assert!(!store.dispatch(Action::AddColumn(Column::new("c", "Other"))));
    assert_eq!(store.state().columns().len(), 3);
    assert_eq!(
        store.state().column(&ColumnId::from("c")).expect("c").title,
        "C"
    );
}

#[test]
fn move_job_adjusts_both_counts() {
    let mut store = board_ab();
    store.dispatch(Action::AddJob(job("j1", "a")));

    assert!(store.dispatch(Action::MoveJob {
        job_id: JobId::from("j1"),
        target_column_id: ColumnId::from("b"),
    }));
    assert_eq!(count(&store, "a"), 0);
    assert_eq!(count(&store, "b"), 1);
    assert_eq!(
        store.state().job(&JobId::from("j1")).expect("job").column_id,
        ColumnId::from("b")
    );
}

#[test]
fn move_job_to_same_column_is_noop() {
    let mut store = board_ab();
    store.dispatch(Action::AddJob(job("j1", "a")));
    let revision = store.revision();

    assert!(!store.dispatch(Action::MoveJob {
        job_id: JobId::from("j1"),
        target_column_id: ColumnId::from("a"),
    }));
    assert_eq!(store.revision(), revision);
    assert_eq!(count(&store, "a"), 1);
}

#[test]
fn move_of_missing_job_or_to_missing_column_is_noop() {
    let mut store = board_ab();
    store.dispatch(Action::AddJob(job("j1", "a")));
    let before = store.snapshot();

    assert!(!store.dispatch(Action::MoveJob {
        job_id: JobId::from("ghost"),
        target_column_id: ColumnId::from("b"),
    }));
    assert!(!store.dispatch(Action::MoveJob {
        job_id: JobId::from("j1"),
        target_column_id: ColumnId::from("deleted"),
    }));
    assert_eq!(*store.snapshot(), *before);
}

#[test]
fn update_job_without_column_change_keeps_counts() {
    let mut store = board_ab();
    store.dispatch(Action::AddJob(job("j1", "a")));

    let mut edited = job("j1", "a");
    edited.notes = Some("Referral from Sam".into());
    assert!(store.dispatch(Action::UpdateJob(edited)));

    assert_eq!(count(&store, "a"), 1);
    assert_eq!(count(&store, "b"), 0);
    assert_eq!(
        store
            .state()
            .job(&JobId::from("j1"))
            .and_then(|job| job.notes.as_deref()),
        Some("Referral from Sam")
    );
}

#[test]
fn update_job_with_column_change_moves_counts() {
    let mut store = board_ab();
    store.dispatch(Action::AddJob(job("j1", "a")));

    let mut edited = job("j1", "b");
    edited.salary = Some("$120,000".into());
    assert!(store.dispatch(Action::UpdateJob(edited)));
    assert_eq!(count(&store, "a"), 0);
    assert_eq!(count(&store, "b"), 1);
}

#[test]
fn update_job_keeps_original_creation_time() {
    let mut store = board_ab();
    store.dispatch(Action::AddJob(job("j1", "a")));

    let mut edited = job("j1", "a");
    edited.created_at = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    edited.location = Some("Remote".into());
    assert!(store.dispatch(Action::UpdateJob(edited)));

    let stored = store.state().job(&JobId::from("j1")).expect("job");
    assert_eq!(stored.created_at, job("j1", "a").created_at);
    assert_eq!(stored.location.as_deref(), Some("Remote"));
}

#[test]
fn update_of_unknown_job_or_into_missing_column_is_noop() {
    let mut store = board_ab();
    store.dispatch(Action::AddJob(job("j1", "a")));
    let before = store.snapshot();

    assert!(!store.dispatch(Action::UpdateJob(job("ghost", "a"))));
    assert!(!store.dispatch(Action::UpdateJob(job("j1", "deleted"))));
    assert!(!store.dispatch(Action::UpdateJob(job("j1", "a"))));
    assert_eq!(*store.snapshot(), *before);
}

#[test]
fn delete_job_decrements_its_column() {
    let mut store = board_ab();
    store.dispatch(Action::AddJob(job("j1", "a")));
    store.dispatch(Action::AddJob(job("j2", "a")));

    assert!(store.dispatch(Action::DeleteJob(JobId::from("j1"))));
    assert_eq!(count(&store, "a"), 1);
    assert!(!store.dispatch(Action::DeleteJob(JobId::from("j1"))));
    assert_eq!(count(&store, "a"), 1);
}

#[test]
fn delete_column_cascades_only_its_jobs() {
    let mut store = board_ab();
    store.dispatch(Action::AddJob(job("j1", "a")));
    store.dispatch(Action::AddJob(job("j2", "b")));
    store.dispatch(Action::AddJob(job("j3", "a")));
    store.dispatch(Action::SetSelectedColumn(ColumnId::from("a")));

    assert!(store.dispatch(Action::DeleteColumn(ColumnId::from("a"))));

    let state = store.state();
    assert_eq!(state.columns().len(), 1);
    let remaining: Vec<&str> = state.jobs().iter().map(|job| job.id.as_str()).collect();
    assert_eq!(remaining, vec!["j2"]);
    assert_eq!(state.jobs()[0].column_id, ColumnId::from("b"));
    assert_eq!(state.selected_column(), None);
    assert!(state.check_invariants().is_empty());
}

#[test]
fn delete_of_missing_column_is_noop() {
    let mut store = board_ab();
    assert!(!store.dispatch(Action::DeleteColumn(ColumnId::from("zzz"))));
    assert_eq!(store.state().columns().len(), 2);
}

#[test]
fn rename_changes_title_only() {
    let mut store = board_ab();
    store.dispatch(Action::AddJob(job("j1", "a")));

    assert!(store.dispatch(Action::RenameColumn {
        column_id: ColumnId::from("a"),
        title: "Phone screen".into(),
    }));
    let column = store.state().column(&ColumnId::from("a")).expect("a");
    assert_eq!(column.title, "Phone screen");
    assert_eq!(column.count, 1);

    assert!(!store.dispatch(Action::RenameColumn {
        column_id: ColumnId::from("missing"),
        title: "X".into(),
    }));
}

#[test]
fn reorder_applies_new_order_and_keeps_fields() {
    let mut store = Store::with_board(
        vec![
            Column::new("a", "A"),
            Column::new("b", "B"),
            Column::new("c", "C"),
        ],
        vec![job("j1", "c")],
    );

    // Payload carries stale fields; only the order is taken from it.
    let order = vec![
        Column::new("c", "stale title"),
        Column::new("a", "A"),
        Column::new("b", "B"),
    ];
    assert!(store.dispatch(Action::ReorderColumns(order)));

    let columns = store.state().columns();
    let ids: Vec<&str> = columns.iter().map(|col| col.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
    assert_eq!(columns[0].title, "C");
    assert_eq!(columns[0].count, 1);
}

#[test]
fn reorder_with_different_membership_is_noop() {
    let mut store = board_ab();
    let before = store.snapshot();

    assert!(!store.dispatch(Action::ReorderColumns(vec![Column::new("b", "B")])));
    assert!(!store.dispatch(Action::ReorderColumns(vec![
        Column::new("b", "B"),
        Column::new("b", "B"),
    ])));
    assert!(!store.dispatch(Action::ReorderColumns(vec![
        Column::new("b", "B"),
        Column::new("x", "X"),
    ])));
    assert_eq!(*store.snapshot(), *before);
}

#[test]
fn replace_jobs_recomputes_counts_and_drops_orphans() {
    let mut columns = vec![Column::new("a", "A"), Column::new("b", "B")];
    columns[0].count = 5;
    let mut store = Store::new();
    store.dispatch(Action::ReplaceColumns(columns));
    store.dispatch(Action::ReplaceJobs(vec![
        job("j1", "a"),
        job("j2", "b"),
        job("j3", "missing"),
        job("j1", "b"),
    ]));

    let state = store.state();
    assert_eq!(state.jobs().len(), 2);
    assert_eq!(count(&store, "a"), 1);
    assert_eq!(count(&store, "b"), 1);
    assert!(state.check_invariants().is_empty());
}

#[test]
fn replace_columns_drops_jobs_of_removed_columns() {
    let mut store = Store::with_board(
        vec![Column::new("a", "A"), Column::new("b", "B")],
        vec![job("j1", "a"), job("j2", "b")],
    );
    store.dispatch(Action::SetSelectedColumn(ColumnId::from("b")));

    store.dispatch(Action::ReplaceColumns(vec![Column::new("a", "Renamed")]));

    let state = store.state();
    assert_eq!(state.jobs().len(), 1);
    assert_eq!(state.columns()[0].count, 1);
    assert_eq!(state.selected_column(), None);
}

#[test]
fn dialog_flags_toggle() {
    let mut store = Store::new();
    assert!(!store.state().show_add_job_dialog());

    store.dispatch(Action::ToggleAddJobDialog);
    assert!(store.state().show_add_job_dialog());
    assert!(!store.state().show_add_column_dialog());

    store.dispatch(Action::ToggleAddJobDialog);
    store.dispatch(Action::ToggleAddColumnDialog);
    assert!(!store.state().show_add_job_dialog());
    assert!(store.state().show_add_column_dialog());
}

#[test]
fn selected_column_must_exist() {
    let mut store = board_ab();
    assert!(store.dispatch(Action::SetSelectedColumn(ColumnId::from("b"))));
    assert_eq!(store.state().selected_column(), Some(&ColumnId::from("b")));

    assert!(!store.dispatch(Action::SetSelectedColumn(ColumnId::from("zzz"))));
    assert_eq!(store.state().selected_column(), Some(&ColumnId::from("b")));
}

#[test]
fn snapshots_are_isolated_from_later_transitions() {
    let mut store = board_ab();
    let before = store.snapshot();

    store.dispatch(Action::AddJob(job("j1", "a")));

    assert!(before.jobs().is_empty());
    assert_eq!(before.column(&ColumnId::from("a")).expect("a").count, 0);
    assert_eq!(store.state().jobs().len(), 1);
}

#[test]
fn jobs_in_column_preserves_insertion_order() {
    let mut store = board_ab();
    for (id, column) in [("j1", "a"), ("j2", "b"), ("j3", "a")] {
        store.dispatch(Action::AddJob(job(id, column)));
    }

    let column_a = ColumnId::from("a");
    let ids: Vec<&str> = store
        .state()
        .jobs_in_column(&column_a)
        .map(|job| job.id.as_str())
        .collect();
    assert_eq!(ids, vec!["j1", "j3"]);
    assert_eq!(store.state().column_count(&column_a), 2);
}

#[test]
fn actions_serialize_with_type_tag() {
    let action = Action::MoveJob {
        job_id: JobId::from("j1"),
        target_column_id: ColumnId::from("b"),
    };
    let json = serde_json::to_value(&action).expect("serialize");
    assert_eq!(json["type"], "move_job");
    assert_eq!(json["payload"]["target_column_id"], "b");

    let parsed: Action =
        serde_json::from_str(r#"{"type":"toggle_add_job_dialog"}"#).expect("parse");
    assert_eq!(parsed, Action::ToggleAddJobDialog);
}
