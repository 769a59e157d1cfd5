use std::collections::{HashMap, HashSet};

use shared::domain::{Column, ColumnId, Job, JobId};
use thiserror::Error;

/// A broken board invariant. The store never produces these; they are used to
/// audit externally supplied data and in tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("column {column_id} caches count {cached} but holds {actual} jobs")]
    CountMismatch {
        column_id: ColumnId,
        cached: usize,
        actual: usize,
    },
    #[error("job {job_id} references missing column {column_id}")]
    OrphanedJob { job_id: JobId, column_id: ColumnId },
    #[error("column id {0} is used more than once")]
    DuplicateColumnId(ColumnId),
    #[error("job id {0} is used more than once")]
    DuplicateJobId(JobId),
}

pub fn check(columns: &[Column], jobs: &[Job]) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    let mut column_ids = HashSet::new();
    for column in columns {
        if !column_ids.insert(&column.id) {
            violations.push(InvariantViolation::DuplicateColumnId(column.id.clone()));
        }
    }

    let mut job_ids = HashSet::new();
    let mut membership: HashMap<&ColumnId, usize> = HashMap::new();
    for job in jobs {
        if !job_ids.insert(&job.id) {
            violations.push(InvariantViolation::DuplicateJobId(job.id.clone()));
        }
        if column_ids.contains(&job.column_id) {
            *membership.entry(&job.column_id).or_default() += 1;
        } else {
            violations.push(InvariantViolation::OrphanedJob {
                job_id: job.id.clone(),
                column_id: job.column_id.clone(),
            });
        }
    }

    for column in columns {
        let actual = membership.get(&column.id).copied().unwrap_or(0);
        if column.count != actual {
            violations.push(InvariantViolation::CountMismatch {
                column_id: column.id.clone(),
                cached: column.count,
                actual,
            });
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn consistent_board_has_no_violations() {
        let mut applied = Column::new("applied", "Applied");
        applied.count = 1;
        let jobs = vec![Job::new("j1", "applied", "Acme", "Dev", Utc::now())];
        assert!(check(&[applied], &jobs).is_empty());
    }

    #[test]
    fn reports_stale_counts_and_orphans() {
        let mut wishlist = Column::new("wishlist", "Wishlist");
        wishlist.count = 2;
        let jobs = vec![
            Job::new("j1", "wishlist", "Acme", "Dev", Utc::now()),
            Job::new("j2", "gone", "Initech", "QA", Utc::now()),
        ];

        let violations = check(&[wishlist], &jobs);
        assert_eq!(violations.len(), 2);
        assert!(violations.contains(&InvariantViolation::OrphanedJob {
            job_id: JobId::from("j2"),
            column_id: ColumnId::from("gone"),
        }));
        assert!(violations.contains(&InvariantViolation::CountMismatch {
            column_id: ColumnId::from("wishlist"),
            cached: 2,
            actual: 1,
        }));
    }

    #[test]
    fn reports_duplicate_ids() {
        let columns = vec![Column::new("a", "A"), Column::new("a", "Again")];
        let jobs = vec![
            Job::new("j", "a", "Acme", "Dev", Utc::now()),
            Job::new("j", "a", "Acme", "Dev", Utc::now()),
        ];
        let violations = check(&columns, &jobs);
        assert!(violations.contains(&InvariantViolation::DuplicateColumnId(ColumnId::from("a"))));
        assert!(violations.contains(&InvariantViolation::DuplicateJobId(JobId::from("j"))));
    }
}
