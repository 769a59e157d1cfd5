use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use shared::domain::Job;
use tracker_core::{
    display::{format_file_size, relative_age},
    BoardState,
};

/// Plain-text board: one block per column in board order, cards in job order.
pub fn render_board(board: &BoardState, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    if board.columns().is_empty() {
        out.push_str("(no columns)\n");
        return out;
    }
    for column in board.columns() {
        let marker = if board.selected_column() == Some(&column.id) {
            "*"
        } else {
            " "
        };
        let _ = writeln!(out, "{marker} {} ({}) [{}]", column.title, column.count, column.id);
        let mut empty = true;
        for job in board.jobs_in_column(&column.id) {
            empty = false;
            render_card(&mut out, job, now);
        }
        if empty {
            out.push_str("    (empty)\n");
        }
    }
    out
}

fn render_card(out: &mut String, job: &Job, now: DateTime<Utc>) {
    let _ = write!(out, "    - {} | {}", job.company, job.position);
    for detail in [&job.location, &job.salary].into_iter().flatten() {
        let _ = write!(out, " | {detail}");
    }
    let _ = writeln!(out, " | {} [{}]", relative_age(job.created_at, now), job.id);
    if !job.todos.is_empty() {
        let _ = writeln!(out, "      todos {}/{}", job.completed_todos(), job.todos.len());
    }
    for file in &job.files {
        let _ = writeln!(out, "      file {} ({})", file.name, format_file_size(file.size));
    }
}
