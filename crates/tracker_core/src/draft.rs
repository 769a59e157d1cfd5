//! Editing session for a single job: the add/edit/view drawer.
//!
//! A draft owns the handles of files attached during the session. Saving
//! transfers them to the stored job; cancelling releases them. Files that
//! already belonged to the saved job stay owned by the job: if the draft drops
//! one and is saved, the session releases it when the store no longer
//! references it.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use shared::{
    domain::{ColumnId, FileId, Job, JobFile, JobId, TodoId, TodoItem},
    error::{Field, FieldError, ValidationError},
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    attachments::{self, FileBlob, ResourceError, ResourceRegistry},
    store::{Action, BoardState, Dispatcher},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftMode {
    Add,
    Edit,
    View,
}

#[derive(Debug, Error)]
pub enum DraftError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("job draft is read-only")]
    ReadOnly,
    #[error("job draft was already closed")]
    Closed,
}

/// Outcome of a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Saved {
    Added(JobId),
    Updated(JobId),
    /// The store ignored the job because what it referred to is gone; the
    /// draft's own attachments were released.
    Discarded,
}

/// Text fields bound to the drawer inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFields {
    pub company: String,
    pub position: String,
    pub location: String,
    pub salary: String,
    pub link: String,
    pub notes: String,
    pub column_id: Option<ColumnId>,
}

impl JobFields {
    fn from_job(job: &Job) -> Self {
        Self {
            company: job.company.clone(),
            position: job.position.clone(),
            location: job.location.clone().unwrap_or_default(),
            salary: job.salary.clone().unwrap_or_default(),
            link: job.link.clone().unwrap_or_default(),
            notes: job.notes.clone().unwrap_or_default(),
            column_id: Some(job.column_id.clone()),
        }
    }
}

struct Validated {
    company: String,
    position: String,
    column_id: ColumnId,
}

/// Owns the handles of files attached during the session. Finish every draft
/// with [`JobDraft::submit`], [`JobDraft::cancel`] or [`JobDraft::delete_job`]:
/// dropping an open draft cannot reach a registry, so its new handles leak and
/// only a warning is logged.
#[derive(Debug)]
pub struct JobDraft {
    mode: DraftMode,
    original: Option<Job>,
    pub fields: JobFields,
    todos: Vec<TodoItem>,
    files: Vec<JobFile>,
    /// Handles owned by the saved job when the draft was opened.
    committed_urls: HashSet<String>,
    closed: bool,
}

impl JobDraft {
    /// A blank draft for a new job. The status defaults to the selected
    /// column, falling back to the first column on the board.
    pub fn for_new(board: &BoardState) -> Self {
        let column_id = board
            .selected_column()
            .or_else(|| board.columns().first().map(|col| &col.id))
            .cloned();
        Self {
            mode: DraftMode::Add,
            original: None,
            fields: JobFields {
                column_id,
                ..JobFields::default()
            },
            todos: Vec::new(),
            files: Vec::new(),
            committed_urls: HashSet::new(),
            closed: false,
        }
    }

    /// A draft over an existing job, in `Edit` or `View` mode. `Add` is
    /// treated as `Edit`.
    pub fn for_job(job: &Job, mode: DraftMode) -> Self {
        let mode = match mode {
            DraftMode::View => DraftMode::View,
            DraftMode::Add | DraftMode::Edit => DraftMode::Edit,
        };
        Self {
            mode,
            original: Some(job.clone()),
            fields: JobFields::from_job(job),
            todos: job.todos.clone(),
            files: job.files.clone(),
            committed_urls: job.files.iter().map(|file| file.url.clone()).collect(),
            closed: false,
        }
    }

    pub fn mode(&self) -> DraftMode {
        self.mode
    }

    pub fn job_id(&self) -> Option<&JobId> {
        self.original.as_ref().map(|job| &job.id)
    }

    pub fn todos(&self) -> &[TodoItem] {
        &self.todos
    }

    pub fn files(&self) -> &[JobFile] {
        &self.files
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn editable(&self) -> bool {
        self.mode != DraftMode::View && !self.closed
    }

    /// Appends a todo with trimmed `text`. Blank text is ignored.
    pub fn add_todo(&mut self, text: &str) -> Option<TodoId> {
        let text = text.trim();
        if !self.editable() || text.is_empty() {
            return None;
        }
        let id = TodoId::generate();
        self.todos.push(TodoItem {
            id: id.clone(),
            text: text.to_string(),
            completed: false,
        });
        Some(id)
    }

    pub fn toggle_todo(&mut self, todo_id: &TodoId) -> bool {
        if !self.editable() {
            return false;
        }
        match self.todos.iter_mut().find(|todo| &todo.id == todo_id) {
            Some(todo) => {
                todo.completed = !todo.completed;
                true
            }
            None => false,
        }
    }

    pub fn delete_todo(&mut self, todo_id: &TodoId) -> bool {
        if !self.editable() {
            return false;
        }
        let before = self.todos.len();
        self.todos.retain(|todo| &todo.id != todo_id);
        self.todos.len() != before
    }

    /// Ingests `blobs` and appends the resulting files. Returns how many were
    /// attached; nothing is allocated for a read-only draft.
    pub fn attach_files<R, I>(
        &mut self,
        registry: &mut R,
        blobs: I,
        now: DateTime<Utc>,
    ) -> Result<usize, ResourceError>
    where
        R: ResourceRegistry + ?Sized,
        I: IntoIterator<Item = FileBlob>,
    {
        if !self.editable() {
            return Ok(0);
        }
        let files = attachments::ingest_files(registry, blobs, now)?;
        let attached = files.len();
        self.files.extend(files);
        debug!(attached, "draft: files attached");
        Ok(attached)
    }

    /// Removes a file from the draft. A file attached during this session is
    /// released at once; one the saved job already owns stays live until the
    /// draft is saved.
    pub fn remove_file<R: ResourceRegistry + ?Sized>(
        &mut self,
        registry: &mut R,
        file_id: &FileId,
    ) -> bool {
        if !self.editable() {
            return false;
        }
        let Some(index) = self.files.iter().position(|file| &file.id == file_id) else {
            return false;
        };
        let file = self.files.remove(index);
        if !self.committed_urls.contains(&file.url) {
            registry.release(&file.url);
        }
        true
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validated().map(|_| ())
    }

    fn validated(&self) -> Result<Validated, ValidationError> {
        let mut errors = Vec::new();
        let company = self.fields.company.trim();
        if company.is_empty() {
            errors.push(FieldError::required(Field::Company));
        }
        let position = self.fields.position.trim();
        if position.is_empty() {
            errors.push(FieldError::required(Field::Position));
        }
        let column_id = self
            .fields
            .column_id
            .as_ref()
            .filter(|id| !id.as_str().is_empty());
        if column_id.is_none() {
            errors.push(FieldError::required(Field::Status));
        }
        match column_id {
            Some(column_id) if errors.is_empty() => Ok(Validated {
                company: company.to_string(),
                position: position.to_string(),
                column_id: column_id.clone(),
            }),
            _ => Err(ValidationError::new(errors)),
        }
    }

    fn build_job(&self, valid: Validated, id: JobId, created_at: DateTime<Utc>) -> Job {
        Job {
            id,
            column_id: valid.column_id,
            company: valid.company,
            position: valid.position,
            location: non_empty(&self.fields.location),
            salary: non_empty(&self.fields.salary),
            link: non_empty(&self.fields.link),
            notes: non_empty(&self.fields.notes),
            created_at,
            todos: self.todos.clone(),
            files: self.files.clone(),
        }
    }

    /// Validates and dispatches `AddJob` or `UpdateJob`. On validation failure
    /// the draft stays open and the store is untouched. Adding also closes
    /// the add-job dialog if it is open.
    pub fn submit<S>(&mut self, session: &mut S, now: DateTime<Utc>) -> Result<Saved, DraftError>
    where
        S: Dispatcher + ResourceRegistry + ?Sized,
    {
        if self.closed {
            return Err(DraftError::Closed);
        }
        if self.mode == DraftMode::View {
            return Err(DraftError::ReadOnly);
        }
        let valid = self.validated()?;

        let saved = match &self.original {
            None => {
                let job = self.build_job(valid, JobId::generate(), now);
                let job_id = job.id.clone();
                if session.dispatch(Action::AddJob(job)) {
                    if session.board().show_add_job_dialog() {
                        session.dispatch(Action::ToggleAddJobDialog);
                    }
                    Saved::Added(job_id)
                } else {
                    Saved::Discarded
                }
            }
            Some(original) => {
                let job_id = original.id.clone();
                let job = self.build_job(valid, job_id.clone(), original.created_at);
                let applied = session.dispatch(Action::UpdateJob(job.clone()));
                // An ignored update still counts as saved when nothing changed.
                if applied || session.board().job(&job_id) == Some(&job) {
                    Saved::Updated(job_id)
                } else {
                    Saved::Discarded
                }
            }
        };

        if saved == Saved::Discarded {
            let released = self.release_uncommitted(session);
            warn!(released, "draft: store ignored the job, attachments released");
        } else {
            info!(?saved, files = self.files.len(), "draft: saved");
        }
        self.closed = true;
        Ok(saved)
    }

    /// Closes the draft without touching the store, releasing every handle
    /// allocated during this session.
    pub fn cancel<R: ResourceRegistry + ?Sized>(mut self, registry: &mut R) {
        if self.closed {
            return;
        }
        let released = self.release_uncommitted(registry);
        debug!(released, "draft: cancelled");
        self.closed = true;
    }

    /// Deletes the underlying job. Handles attached during this session are
    /// released here; the job's own files are released by the session when
    /// the job leaves the store. Returns whether the job was removed.
    pub fn delete_job<S>(mut self, session: &mut S) -> bool
    where
        S: Dispatcher + ResourceRegistry + ?Sized,
    {
        if self.closed || self.mode == DraftMode::Add {
            return false;
        }
        let Some(job_id) = self.original.as_ref().map(|job| job.id.clone()) else {
            return false;
        };
        self.release_uncommitted(session);
        self.closed = true;
        session.dispatch(Action::DeleteJob(job_id))
    }

    fn release_uncommitted<R: ResourceRegistry + ?Sized>(&mut self, registry: &mut R) -> usize {
        let uncommitted: Vec<JobFile> = self
            .files
            .iter()
            .filter(|file| !self.committed_urls.contains(&file.url))
            .cloned()
            .collect();
        self.files.retain(|file| self.committed_urls.contains(&file.url));
        attachments::release_files(registry, &uncommitted)
    }
}

impl Drop for JobDraft {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        let leaked: Vec<&str> = self
            .files
            .iter()
            .filter(|file| !self.committed_urls.contains(&file.url))
            .map(|file| file.url.as_str())
            .collect();
        if !leaked.is_empty() {
            warn!(?leaked, "draft: dropped without save or cancel, handles not released");
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/draft_tests.rs"]
mod tests;
