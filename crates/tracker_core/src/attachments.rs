//! File ingestion and the lifetime of the resource handles behind attached
//! files.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use shared::domain::{FileId, JobFile};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

const EPHEMERAL_SCHEME: &str = "blob:";

/// A file handed over by a picker or a drop, before it becomes a [`JobFile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlob {
    pub name: String,
    pub size: u64,
    /// Type reported by the source; often empty for unknown extensions.
    pub mime_type: Option<String>,
}

impl FileBlob {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    fn resolved_mime_type(&self) -> String {
        match self.mime_type.as_deref().map(str::trim) {
            Some(reported) if !reported.is_empty() => reported.to_string(),
            _ => mime_guess::from_path(&self.name)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to allocate a handle for {name}: {reason}")]
    Allocation { name: String, reason: String },
}

/// Allocates and releases the handles that back attached files.
pub trait ResourceRegistry {
    fn allocate(&mut self, blob: &FileBlob) -> Result<Url, ResourceError>;

    /// Releases `url`. Returns `false` if it was not a live handle of this
    /// registry (external URL, unknown, or already released).
    fn release(&mut self, url: &str) -> bool;

    fn is_live(&self, url: &str) -> bool;
}

/// In-memory registry minting `blob:` object URLs.
#[derive(Debug)]
pub struct ObjectUrlRegistry {
    origin: String,
    live: HashSet<String>,
    /// Every handle released so far, kept to report double releases. Grows
    /// for the lifetime of the registry.
    released: HashSet<String>,
}

impl Default for ObjectUrlRegistry {
    fn default() -> Self {
        Self::new("http://localhost")
    }
}

impl ObjectUrlRegistry {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            live: HashSet::new(),
            released: HashSet::new(),
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn released_count(&self) -> usize {
        self.released.len()
    }
}

impl ResourceRegistry for ObjectUrlRegistry {
    fn allocate(&mut self, blob: &FileBlob) -> Result<Url, ResourceError> {
        let raw = format!("{EPHEMERAL_SCHEME}{}/{}", self.origin, Uuid::new_v4());
        let url = Url::parse(&raw).map_err(|err| ResourceError::Allocation {
            name: blob.name.clone(),
            reason: err.to_string(),
        })?;
        self.live.insert(url.to_string());
        debug!(name = %blob.name, url = %url, "attachments: handle allocated");
        Ok(url)
    }

    fn release(&mut self, url: &str) -> bool {
        if !url.starts_with(EPHEMERAL_SCHEME) {
            return false;
        }
        if self.live.remove(url) {
            self.released.insert(url.to_string());
            debug!(url, "attachments: handle released");
            return true;
        }
        if self.released.contains(url) {
            warn!(url, "attachments: handle released twice");
        } else {
            warn!(url, "attachments: release of unknown handle");
        }
        false
    }

    fn is_live(&self, url: &str) -> bool {
        self.live.contains(url)
    }
}

/// Turns incoming blobs into file records, allocating one handle each. If any
/// allocation fails, handles already allocated for this batch are released
/// before the error is returned.
pub fn ingest_files<R, I>(
    registry: &mut R,
    blobs: I,
    uploaded_at: DateTime<Utc>,
) -> Result<Vec<JobFile>, ResourceError>
where
    R: ResourceRegistry + ?Sized,
    I: IntoIterator<Item = FileBlob>,
{
    let mut files = Vec::new();
    for blob in blobs {
        let url = match registry.allocate(&blob) {
            Ok(url) => url,
            Err(err) => {
                release_files(registry, &files);
                return Err(err);
            }
        };
        files.push(JobFile {
            id: FileId::generate(),
            mime_type: blob.resolved_mime_type(),
            name: blob.name,
            size: blob.size,
            url: url.into(),
            uploaded_at,
        });
    }
    Ok(files)
}

/// Releases the handle of every file; returns how many were live.
pub fn release_files<'a, R, I>(registry: &mut R, files: I) -> usize
where
    R: ResourceRegistry + ?Sized,
    I: IntoIterator<Item = &'a JobFile>,
{
    files
        .into_iter()
        .filter(|file| registry.release(&file.url))
        .count()
}
