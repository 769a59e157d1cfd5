//! The store paired with the registry that owns attachment handles.
//!
//! Every action goes through [`TrackerSession::dispatch`], which releases the
//! handle of any file the board stopped referencing: files of deleted jobs
//! (directly, by column cascade or by replacement) and files an update drops.

use std::{collections::HashSet, sync::Arc};

use shared::domain::{ColumnId, JobId};
use tracing::{debug, info};
use url::Url;

use crate::{
    attachments::{FileBlob, ObjectUrlRegistry, ResourceError, ResourceRegistry},
    draft::{DraftMode, JobDraft},
    forms::ColumnForm,
    store::{Action, BoardState, Dispatcher, Store},
};

#[derive(Debug, Default)]
pub struct TrackerSession<R: ResourceRegistry = ObjectUrlRegistry> {
    store: Store,
    registry: R,
}

impl TrackerSession<ObjectUrlRegistry> {
    pub fn in_memory(store: Store) -> Self {
        Self::new(store, ObjectUrlRegistry::default())
    }
}

impl<R: ResourceRegistry> TrackerSession<R> {
    pub fn new(store: Store, registry: R) -> Self {
        Self { store, registry }
    }

    pub fn board(&self) -> &BoardState {
        self.store.state()
    }

    pub fn snapshot(&self) -> Arc<BoardState> {
        self.store.snapshot()
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn into_parts(self) -> (Store, R) {
        (self.store, self.registry)
    }

    /// The "add card" affordance on a column: selects the column and opens
    /// the add-job dialog unless it is already open. Returns a draft whose
    /// status is that column, or `None` if the column no longer exists.
    pub fn open_add_job(&mut self, column_id: &ColumnId) -> Option<JobDraft> {
        self.board().column(column_id)?;
        self.dispatch(Action::SetSelectedColumn(column_id.clone()));
        if !self.board().show_add_job_dialog() {
            self.dispatch(Action::ToggleAddJobDialog);
        }
        Some(JobDraft::for_new(self.board()))
    }

    /// Opens the add-column dialog unless it is already open.
    pub fn open_add_column(&mut self) -> ColumnForm {
        if !self.board().show_add_column_dialog() {
            self.dispatch(Action::ToggleAddColumnDialog);
        }
        ColumnForm::default()
    }

    pub fn new_job_draft(&self) -> JobDraft {
        JobDraft::for_new(self.board())
    }

    pub fn edit_job_draft(&self, job_id: &JobId, mode: DraftMode) -> Option<JobDraft> {
        self.board().job(job_id).map(|job| JobDraft::for_job(job, mode))
    }

    fn referenced_urls(&self) -> HashSet<String> {
        self.board()
            .jobs()
            .iter()
            .flat_map(|job| job.files.iter().map(|file| file.url.clone()))
            .collect()
    }
}

impl<R: ResourceRegistry> Dispatcher for TrackerSession<R> {
    fn board(&self) -> &BoardState {
        self.store.state()
    }

    fn dispatch(&mut self, action: Action) -> bool {
        let touches_files = matches!(
            action,
            Action::ReplaceColumns(_)
                | Action::ReplaceJobs(_)
                | Action::UpdateJob(_)
                | Action::DeleteJob(_)
                | Action::DeleteColumn(_)
        );
        if !touches_files {
            return self.store.dispatch(action);
        }

        let before = self.referenced_urls();
        if !self.store.dispatch(action) {
            return false;
        }
        let after = self.referenced_urls();
        let released = before
            .difference(&after)
            .filter(|url| self.registry.release(url))
            .count();
        if released > 0 {
            info!(released, "session: released handles of detached files");
        } else {
            debug!("session: no handles to release");
        }
        true
    }
}

impl<R: ResourceRegistry> ResourceRegistry for TrackerSession<R> {
    fn allocate(&mut self, blob: &FileBlob) -> Result<Url, ResourceError> {
        self.registry.allocate(blob)
    }

    fn release(&mut self, url: &str) -> bool {
        self.registry.release(url)
    }

    fn is_live(&self, url: &str) -> bool {
        self.registry.is_live(url)
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
