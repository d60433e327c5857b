// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

pub const LOG_ENV: &str = "SUBLIST_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

/// The terminal belongs to the TUI, so events go to an append-only file.
pub fn init(path: &Path) -> Result<()> {
    let file = open_log_file(path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| DEFAULT_DIRECTIVE.into());
    let subscriber = Registry::default().with(
        fmt::layer()
            .without_time()
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .with_filter(filter),
    );
    tracing::subscriber::set_global_default(subscriber).context("install log subscriber")?;
    tracing::debug!(path = %path.display(), "logging initialised");
    Ok(())
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))
}
