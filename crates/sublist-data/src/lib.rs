// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod export;
pub mod source;
pub mod visibility;

use anyhow::{Result, anyhow};
use std::env;
use std::path::PathBuf;

pub use export::{default_export_file_name, export_to_dir, write_csv, write_table, write_xlsx};
pub use sublist_app::ExportFormat;
pub use source::{DATASET_FILE, SAMPLES_DIR, SUBGROUP_FILE, SubgroupFileSource};
pub use visibility::ColumnVisibilityStore;

pub const APP_NAME: &str = "sublist";
pub const COLUMNS_FILE: &str = "subgroup_listing_columns.json";
pub const LOG_FILE: &str = "sublist.log";

pub fn default_columns_path() -> Result<PathBuf> {
    let config_root = dirs::config_dir().ok_or_else(|| {
        anyhow!("cannot resolve config directory; set [listing].columns_path in the config file")
    })?;
    Ok(config_root.join(APP_NAME).join(COLUMNS_FILE))
}

pub fn default_log_path() -> Result<PathBuf> {
    let cache_root = dirs::cache_dir().ok_or_else(|| {
        anyhow!("cannot resolve cache directory; pass --log-file with a writable path")
    })?;
    Ok(cache_root.join(APP_NAME).join(LOG_FILE))
}

/// Downloads folder, then home, then the working directory.
pub fn default_export_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}
