// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use sublist_app::{
    DEFAULT_DATASET_LINK_BASE, DEFAULT_PAGE_SIZE, DEFAULT_SAMPLE_LINK_BASE,
    DEFAULT_SUBGROUP_LINK_BASE, LinkBases,
};
use sublist_view::MAX_LINE_CHARS;
use url::Url;

const CONFIG_VERSION: i64 = 1;
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_FILTER_DEBOUNCE: &str = "250ms";
const MIN_LINE_CHARS: usize = 2;

pub const CONFIG_PATH_ENV: &str = "SUBLIST_CONFIG_PATH";
pub const DATA_ROOT_ENV: &str = "SUBLIST_DATA_ROOT";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub listing: Listing,
    #[serde(default)]
    pub links: Links,
    #[serde(default)]
    pub export: Export,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            data: Data::default(),
            listing: Listing::default(),
            links: Links::default(),
            export: Export::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Data {
    pub root: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    pub page_size: Option<usize>,
    pub filter_debounce: Option<String>,
    pub max_line_chars: Option<usize>,
    pub columns_path: Option<String>,
}

impl Default for Listing {
    fn default() -> Self {
        Self {
            page_size: Some(DEFAULT_PAGE_SIZE),
            filter_debounce: Some(DEFAULT_FILTER_DEBOUNCE.to_owned()),
            max_line_chars: Some(MAX_LINE_CHARS),
            columns_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Links {
    pub subgroup_base: Option<String>,
    pub dataset_base: Option<String>,
    pub sample_base: Option<String>,
}

impl Default for Links {
    fn default() -> Self {
        Self {
            subgroup_base: Some(DEFAULT_SUBGROUP_LINK_BASE.to_owned()),
            dataset_base: Some(DEFAULT_DATASET_LINK_BASE.to_owned()),
            sample_base: Some(DEFAULT_SAMPLE_LINK_BASE.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Export {
    pub dir: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;
        Ok(config_root.join(sublist_data::APP_NAME).join(CONFIG_FILE))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version; add `version = 1` and keep values under [data], [listing], [links] and [export]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1. Run `sublist --print-example-config` for the current layout",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(root) = &self.data.root
            && root.trim().is_empty()
        {
            bail!("data.root in {} must not be empty", path.display());
        }

        if let Some(debounce) = &self.listing.filter_debounce {
            let parsed = parse_duration(debounce)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "listing.filter_debounce in {} must be positive, got {}",
                    path.display(),
                    debounce
                );
            }
        }

        if let Some(max_line_chars) = self.listing.max_line_chars
            && max_line_chars < MIN_LINE_CHARS
        {
            bail!(
                "listing.max_line_chars in {} must be at least {MIN_LINE_CHARS}, got {}",
                path.display(),
                max_line_chars
            );
        }

        for (key, value) in [
            ("links.subgroup_base", &self.links.subgroup_base),
            ("links.dataset_base", &self.links.dataset_base),
            ("links.sample_base", &self.links.sample_base),
        ] {
            if let Some(base) = value {
                validate_link_base(base)
                    .with_context(|| format!("invalid {key} in {}", path.display()))?;
            }
        }

        Ok(())
    }

    /// `SUBLIST_DATA_ROOT` wins over `[data] root`; the working directory is
    /// the fallback.
    pub fn data_root(&self) -> PathBuf {
        if let Some(root) = env::var_os(DATA_ROOT_ENV).filter(|root| !root.is_empty()) {
            return PathBuf::from(root);
        }
        match &self.data.root {
            Some(root) => PathBuf::from(root),
            None => PathBuf::from("."),
        }
    }

    /// Zero means every filtered row on one page.
    pub fn page_size(&self) -> usize {
        self.listing.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn filter_debounce(&self) -> Result<Duration> {
        parse_duration(
            self.listing
                .filter_debounce
                .as_deref()
                .unwrap_or(DEFAULT_FILTER_DEBOUNCE),
        )
    }

    pub fn max_line_chars(&self) -> usize {
        self.listing.max_line_chars.unwrap_or(MAX_LINE_CHARS)
    }

    pub fn columns_path(&self) -> Result<PathBuf> {
        match &self.listing.columns_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => sublist_data::default_columns_path(),
        }
    }

    pub fn link_bases(&self) -> LinkBases {
        let defaults = LinkBases::default();
        LinkBases {
            subgroup: self
                .links
                .subgroup_base
                .clone()
                .unwrap_or(defaults.subgroup),
            dataset: self.links.dataset_base.clone().unwrap_or(defaults.dataset),
            sample: self.links.sample_base.clone().unwrap_or(defaults.sample),
        }
    }

    pub fn export_dir(&self) -> PathBuf {
        match &self.export.dir {
            Some(dir) => PathBuf::from(dir),
            None => sublist_data::default_export_dir(),
        }
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# sublist config\n# Place this file at: {}\n\nversion = 1\n\n[data]\n# Directory holding output/rde/data/subGroup.json. Default is the working\n# directory; SUBLIST_DATA_ROOT overrides this value.\n# root = \"/absolute/path/to/workspace\"\n\n[listing]\n# 0 shows every filtered row on one page.\npage_size = {}\nfilter_debounce = \"{}\"\nmax_line_chars = {}\n# columns_path = \"/absolute/path/to/subgroup_listing_columns.json\"\n\n[links]\nsubgroup_base = \"{}\"\ndataset_base = \"{}\"\nsample_base = \"{}\"\n\n[export]\n# Default is the downloads directory, else home.\n# dir = \"/absolute/path/to/exports\"\n",
            path.display(),
            DEFAULT_PAGE_SIZE,
            DEFAULT_FILTER_DEBOUNCE,
            MAX_LINE_CHARS,
            DEFAULT_SUBGROUP_LINK_BASE,
            DEFAULT_DATASET_LINK_BASE,
            DEFAULT_SAMPLE_LINK_BASE,
        )
    }
}

fn validate_link_base(base: &str) -> Result<()> {
    let url = Url::parse(base).with_context(|| format!("{base:?} is not a URL"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("{base:?} must use http or https");
    }
    if !base.ends_with('/') {
        bail!("{base:?} must end with `/`");
    }
    Ok(())
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid debounce duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid debounce duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid debounce duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 250ms or 1s)")
}

#[cfg(test)]
mod tests {
    use super::{CONFIG_PATH_ENV, Config, DATA_ROOT_ENV, parse_duration};
    use anyhow::Result;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;
    use sublist_app::{DEFAULT_DATASET_LINK_BASE, LinkBases};

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.page_size(), 100);
        assert_eq!(config.filter_debounce()?, Duration::from_millis(250));
        assert_eq!(config.max_line_chars(), 60);
        assert_eq!(config.link_bases(), LinkBases::default());
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[listing]\npage_size = 50\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"), "{message}");
        assert!(message.contains("[listing]"), "{message}");
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 7\n")?;
        let error = Config::load(&path).expect_err("v7 config should fail");
        assert!(error.to_string().contains("unsupported config version 7"));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn full_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[data]\nroot = \"/srv/rde\"\n[listing]\npage_size = 0\nfilter_debounce = \"1s\"\nmax_line_chars = 12\ncolumns_path = \"/tmp/columns.json\"\n[links]\nsample_base = \"https://samples.example/s/\"\n[export]\ndir = \"/tmp/exports\"\n",
        )?;
        let config = Config::load(&path)?;
        assert_eq!(config.page_size(), 0);
        assert_eq!(config.filter_debounce()?, Duration::from_secs(1));
        assert_eq!(config.max_line_chars(), 12);
        assert_eq!(config.columns_path()?, PathBuf::from("/tmp/columns.json"));
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/exports"));

        let bases = config.link_bases();
        assert_eq!(bases.sample, "https://samples.example/s/");
        assert_eq!(bases.dataset, DEFAULT_DATASET_LINK_BASE);
        Ok(())
    }

    #[test]
    fn link_bases_must_be_http_urls_ending_in_slash() -> Result<()> {
        let (_temp, path) =
            write_config("version = 1\n[links]\nsubgroup_base = \"https://rde.example/groups\"\n")?;
        let message = format!(
            "{:#}",
            Config::load(&path).expect_err("missing slash should fail")
        );
        assert!(message.contains("links.subgroup_base"), "{message}");
        assert!(message.contains("must end with"), "{message}");

        let (_temp, path) = write_config("version = 1\n[links]\ndataset_base = \"not a url/\"\n")?;
        let message = format!(
            "{:#}",
            Config::load(&path).expect_err("bad url should fail")
        );
        assert!(message.contains("is not a URL"), "{message}");

        let (_temp, path) =
            write_config("version = 1\n[links]\nsample_base = \"ftp://files.example/\"\n")?;
        let message = format!(
            "{:#}",
            Config::load(&path).expect_err("ftp should fail")
        );
        assert!(message.contains("http or https"), "{message}");
        Ok(())
    }

    #[test]
    fn listing_limits_are_validated() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[listing]\nmax_line_chars = 1\n")?;
        let error = Config::load(&path).expect_err("tiny line width should fail");
        assert!(error.to_string().contains("at least 2"));

        let (_temp, path) = write_config("version = 1\n[listing]\nfilter_debounce = \"0ms\"\n")?;
        let error = Config::load(&path).expect_err("zero debounce should fail");
        assert!(error.to_string().contains("must be positive"));

        let (_temp, path) = write_config("version = 1\n[data]\nroot = \"  \"\n")?;
        let error = Config::load(&path).expect_err("blank root should fail");
        assert!(error.to_string().contains("data.root"));
        Ok(())
    }

    #[test]
    fn durations_parse_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("5s")?, Duration::from_secs(5));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));
        let error = parse_duration("soon").expect_err("invalid duration should fail");
        assert!(error.to_string().contains("invalid"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(CONFIG_PATH_ENV, &override_path);
        }
        let resolved = Config::default_path();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }
        assert_eq!(resolved?, override_path);
        Ok(())
    }

    #[test]
    fn default_path_ends_with_app_config_file() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }
        if let Ok(path) = Config::default_path() {
            assert!(path.ends_with("sublist/config.toml"), "{}", path.display());
        }
        Ok(())
    }

    #[test]
    fn data_root_env_overrides_config() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) = write_config("version = 1\n[data]\nroot = \"/from/config\"\n")?;
        let config = Config::load(&path)?;

        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(DATA_ROOT_ENV, "/from/env");
        }
        let overridden = config.data_root();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(DATA_ROOT_ENV);
        }
        assert_eq!(overridden, PathBuf::from("/from/env"));
        assert_eq!(config.data_root(), PathBuf::from("/from/config"));
        assert_eq!(Config::default().data_root(), PathBuf::from("."));
        Ok(())
    }

    #[test]
    fn example_config_loads_cleanly() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        for section in ["version = 1", "[data]", "[listing]", "[links]", "[export]"] {
            assert!(example.contains(section), "missing {section}");
        }
        std::fs::write(&path, example)?;
        let config = Config::load(&path)?;
        assert_eq!(config.page_size(), 100);
        Ok(())
    }
}
