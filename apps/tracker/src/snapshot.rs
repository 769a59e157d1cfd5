use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shared::domain::{Column, Job};
use tracker_core::{invariants, Action, BoardState, InvariantViolation, Store};

/// On-disk form of a board: the two collections, nothing transient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

impl BoardSnapshot {
    pub fn from_board(board: &BoardState) -> Self {
        Self {
            columns: board.columns().to_vec(),
            jobs: board.jobs().to_vec(),
        }
    }

    /// Problems in the file as written, before the store repairs them.
    pub fn violations(&self) -> Vec<InvariantViolation> {
        invariants::check(&self.columns, &self.jobs)
    }

    pub fn into_store(self) -> Store {
        Store::with_board(self.columns, self.jobs)
    }
}

pub fn load_snapshot(path: &Path) -> Result<BoardSnapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse snapshot '{}'", path.display()))
}

pub fn save_snapshot(path: &Path, board: &BoardState) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| {
            format!(
                "failed to create parent directory '{}' for snapshot",
                parent.display()
            )
        })?;
    }
    let json = serde_json::to_string_pretty(&BoardSnapshot::from_board(board))?;
    fs::write(path, json).with_context(|| format!("failed to write snapshot '{}'", path.display()))
}

/// An action script is a JSON array of tagged actions.
pub fn load_script(path: &Path) -> Result<Vec<Action>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read action script '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse action script '{}'", path.display()))
}
