//! The demo board shown when no snapshot is loaded.

use chrono::{DateTime, Duration, Utc};
use shared::domain::{Column, Job, TodoItem};

use crate::store::{Action, Store};

const SEED_AGE_DAYS: i64 = 24;

pub fn demo_columns() -> Vec<Column> {
    [
        ("wishlist", "Wishlist"),
        ("applied", "Applied"),
        ("interview", "Interview"),
        ("offer", "Offer"),
        ("rejected", "Rejected"),
    ]
    .into_iter()
    .map(|(id, title)| Column::new(id, title))
    .collect()
}

fn todo(id: &str, text: &str, completed: bool) -> TodoItem {
    TodoItem {
        id: id.into(),
        text: text.to_string(),
        completed,
    }
}

/// Three sample jobs, all created [`SEED_AGE_DAYS`] before `now`.
pub fn demo_jobs(now: DateTime<Utc>) -> Vec<Job> {
    let created_at = now - Duration::days(SEED_AGE_DAYS);

    let mut acme = Job::new("job1", "wishlist", "Acme Inc", "Frontend Developer", created_at);
    acme.location = Some("Remote".into());
    acme.salary = Some("$90,000".into());
    acme.link = Some("https://example.com/job1".into());
    acme.notes = Some("Interesting position with good benefits".into());
    acme.todos = vec![
        todo("todo1", "Update resume", true),
        todo("todo2", "Prepare for interview", false),
    ];

    let mut tech = Job::new("job2", "wishlist", "Tech Solutions", "UX Designer", created_at);
    tech.location = Some("New York, NY".into());
    tech.salary = Some("$85,000".into());
    tech.notes = Some("Need to update portfolio before applying".into());

    let mut global = Job::new(
        "job3",
        "applied",
        "Global Systems",
        "Full Stack Developer",
        created_at,
    );
    global.location = Some("San Francisco, CA".into());
    global.salary = Some("$120,000".into());
    global.link = Some("https://example.com/job3".into());
    global.notes = Some("Applied through company website".into());
    global.todos = vec![todo("todo3", "Follow up after 1 week", false)];

    vec![acme, tech, global]
}

/// The two bulk loads that install the demo board.
pub fn seed_actions(now: DateTime<Utc>) -> [Action; 2] {
    [
        Action::ReplaceColumns(demo_columns()),
        Action::ReplaceJobs(demo_jobs(now)),
    ]
}

pub fn demo_store(now: DateTime<Utc>) -> Store {
    Store::with_board(demo_columns(), demo_jobs(now))
}
