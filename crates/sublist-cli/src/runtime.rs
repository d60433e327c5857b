// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use sublist_app::{ColumnVisibility, ExportFormat, ExportTable};
use sublist_data::ColumnVisibilityStore;
use time::OffsetDateTime;
use url::Url;

pub type UrlOpener = fn(&str) -> Result<()>;

pub struct CliRuntime {
    columns: ColumnVisibilityStore,
    export_dir: PathBuf,
    opener: UrlOpener,
}

impl CliRuntime {
    pub fn new(columns: ColumnVisibilityStore, export_dir: PathBuf) -> Self {
        Self::with_opener(columns, export_dir, open_in_browser)
    }

    pub fn with_opener(
        columns: ColumnVisibilityStore,
        export_dir: PathBuf,
        opener: UrlOpener,
    ) -> Self {
        Self {
            columns,
            export_dir,
            opener,
        }
    }
}

impl sublist_tui::ListingRuntime for CliRuntime {
    fn load_column_visibility(&mut self) -> Result<Option<ColumnVisibility>> {
        Ok(self.columns.load())
    }

    fn save_column_visibility(&mut self, visibility: &ColumnVisibility) {
        self.columns.save(visibility);
    }

    fn reset_column_visibility(&mut self) {
        self.columns.reset();
    }

    fn export_table(&mut self, table: &ExportTable, format: ExportFormat) -> Result<PathBuf> {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        sublist_data::export_to_dir(table, format, &self.export_dir, now)
    }

    fn open_url(&mut self, url: &str) -> Result<()> {
        (self.opener)(url)
    }
}

/// Hands an http(s) URL to the platform opener and waits for it to exit.
pub fn open_in_browser(url: &str) -> Result<()> {
    let parsed = Url::parse(url).with_context(|| format!("invalid url {url:?}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("refusing to open {url:?}; only http and https links are supported");
    }

    #[cfg(target_os = "macos")]
    let mut command = {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    };
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", "", url]);
        cmd
    };
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut command = {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    };

    let status = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|err| anyhow!("failed to launch url opener: {err}"))?;
    if !status.success() {
        bail!("url opener exited with status {status}");
    }
    tracing::info!(url, "opened link");
    Ok(())
}
