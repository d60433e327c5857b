// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use sublist_app::ColumnVisibility;

/// Per-user column visibility as a flat `{ "<key>": bool }` JSON document.
/// Every failure degrades to "nothing persisted" and is only logged.
#[derive(Debug, Clone)]
pub struct ColumnVisibilityStore {
    path: PathBuf,
}

impl ColumnVisibilityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` means fall back to column defaults.
    pub fn load(&self) -> Option<ColumnVisibility> {
        match self.try_load() {
            Ok(visibility) => visibility,
            Err(error) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %format!("{error:#}"),
                    "ignoring unreadable column visibility"
                );
                None
            }
        }
    }

    pub fn save(&self, visibility: &ColumnVisibility) {
        if let Err(error) = self.try_save(visibility) {
            tracing::warn!(
                path = %self.path.display(),
                error = %format!("{error:#}"),
                "could not save column visibility"
            );
        }
    }

    pub fn reset(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "column visibility reset"),
            Err(error) if error.kind() == ErrorKind::NotFound => {}
            Err(error) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %error,
                    "could not remove column visibility"
                );
            }
        }
    }

    fn try_load(&self) -> Result<Option<ColumnVisibility>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(error).with_context(|| format!("read {}", self.path.display()));
            }
        };
        let visibility = serde_json::from_str(&text)
            .with_context(|| format!("parse {}", self.path.display()))?;
        Ok(Some(visibility))
    }

    fn try_save(&self, visibility: &ColumnVisibility) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(visibility).context("encode column visibility")?;
        fs::write(&self.path, text).with_context(|| format!("write {}", self.path.display()))
    }
}
