// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const KEY_SUBGROUP_ID: &str = "subgroup_id";
pub const KEY_SUBGROUP_NAME: &str = "subgroup_name";
pub const KEY_DESCRIPTION: &str = "description";
pub const KEY_SUBJECTS: &str = "subjects";
pub const KEY_SUBJECT_COUNT: &str = "subject_count";
pub const KEY_FUNDS: &str = "funds";
pub const KEY_FUND_COUNT: &str = "fund_count";
pub const KEY_MEMBERS: &str = "members";
pub const KEY_MEMBER_COUNT: &str = "member_count";
pub const KEY_RELATED_DATASETS: &str = "related_datasets";
pub const KEY_RELATED_DATASETS_COUNT: &str = "related_datasets_count";
pub const KEY_RELATED_SAMPLES: &str = "related_samples";
pub const KEY_RELATED_SAMPLES_COUNT: &str = "related_samples_count";
pub const KEY_RELATED_DATASET_IDS: &str = "related_dataset_ids";
pub const KEY_RELATED_SAMPLE_IDS: &str = "related_sample_ids";

/// Count columns that accept a numeric range filter.
pub const RANGE_COLUMN_KEYS: [&str; 5] = [
    KEY_SUBJECT_COUNT,
    KEY_FUND_COUNT,
    KEY_MEMBER_COUNT,
    KEY_RELATED_DATASETS_COUNT,
    KEY_RELATED_SAMPLES_COUNT,
];

/// Columns whose text spans several lines, one entry per line.
pub const MULTILINE_COLUMN_KEYS: [&str; 4] = [
    KEY_SUBJECTS,
    KEY_MEMBERS,
    KEY_RELATED_DATASETS,
    KEY_RELATED_SAMPLES,
];

pub const DEFAULT_PAGE_SIZE: usize = 100;

pub const DEFAULT_SUBGROUP_LINK_BASE: &str = "https://rde.nims.go.jp/rde/datasets/groups/";
pub const DEFAULT_DATASET_LINK_BASE: &str = "https://rde.nims.go.jp/rde/datasets/";
pub const DEFAULT_SAMPLE_LINK_BASE: &str = "https://rde-material.nims.go.jp/samples/samples/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub key: String,
    pub label: String,
    pub default_visible: bool,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            default_visible: true,
        }
    }

    pub fn hidden_by_default(mut self) -> Self {
        self.default_visible = false;
        self
    }

    pub fn is_range_column(&self) -> bool {
        RANGE_COLUMN_KEYS.contains(&self.key.as_str())
    }
}

pub fn subgroup_columns() -> Vec<Column> {
    vec![
        Column::new(KEY_SUBGROUP_ID, "Group ID"),
        Column::new(KEY_SUBGROUP_NAME, "Group name"),
        Column::new(KEY_DESCRIPTION, "Description").hidden_by_default(),
        Column::new(KEY_SUBJECTS, "Subjects"),
        Column::new(KEY_SUBJECT_COUNT, "Subject count"),
        Column::new(KEY_FUNDS, "Funds"),
        Column::new(KEY_FUND_COUNT, "Fund count"),
        Column::new(KEY_MEMBERS, "Members"),
        Column::new(KEY_MEMBER_COUNT, "Member count"),
        Column::new(KEY_RELATED_DATASETS, "Related datasets"),
        Column::new(KEY_RELATED_DATASETS_COUNT, "Related dataset count"),
        Column::new(KEY_RELATED_SAMPLES, "Related samples"),
        Column::new(KEY_RELATED_SAMPLES_COUNT, "Related sample count"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    List(Vec<String>),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Lists render one entry per line.
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::Integer(value) => value.to_string(),
            Self::List(values) => values.join("\n"),
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Text(value) => value.trim().parse().ok(),
            Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<usize> for CellValue {
    fn from(value: usize) -> Self {
        Self::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<Vec<String>> for CellValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// One record keyed by column key. Derived keys with no column of their own
/// (for example the id lists behind per-line links) live here too.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    values: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.values.get(key)
    }

    /// Empty string when the key is absent.
    pub fn text(&self, key: &str) -> String {
        self.get(key).map(CellValue::to_text).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dataset {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for column in &self.columns {
            if column.key.trim().is_empty() {
                bail!("dataset column with label {:?} has an empty key", column.label);
            }
            if !seen.insert(column.key.as_str()) {
                bail!("dataset has duplicate column key {:?}", column.key);
            }
        }
        Ok(())
    }
}

/// Produces a full dataset. Called from a background worker, so
/// implementations must not touch UI-owned state.
pub trait RecordSource: Send + Sync {
    fn load(&self) -> Result<Dataset>;
}

impl<F> RecordSource for F
where
    F: Fn() -> Result<Dataset> + Send + Sync,
{
    fn load(&self) -> Result<Dataset> {
        self()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    /// Zero means unlimited.
    pub page_size: usize,
    /// One-based.
    pub page: usize,
}

impl PageSpec {
    pub const fn new(page_size: usize, page: usize) -> Self {
        Self { page_size, page }
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }
}

pub type ColumnVisibility = BTreeMap<String, bool>;

pub fn default_visibility(columns: &[Column]) -> ColumnVisibility {
    columns
        .iter()
        .map(|column| (column.key.clone(), column.default_visible))
        .collect()
}

/// Persisted values win; keys missing from `persisted` fall back to the
/// column default. Keys for columns that no longer exist are dropped.
pub fn resolve_visibility(columns: &[Column], persisted: Option<&ColumnVisibility>) -> ColumnVisibility {
    columns
        .iter()
        .map(|column| {
            let visible = persisted
                .and_then(|map| map.get(&column.key).copied())
                .unwrap_or(column.default_visible);
            (column.key.clone(), visible)
        })
        .collect()
}

/// Column indices in dataset order whose visibility resolves to true.
pub fn visible_column_indices(columns: &[Column], visibility: &ColumnVisibility) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .filter(|(_, column)| {
            visibility
                .get(&column.key)
                .copied()
                .unwrap_or(column.default_visible)
        })
        .map(|(index, _)| index)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBases {
    pub subgroup: String,
    pub dataset: String,
    pub sample: String,
}

impl Default for LinkBases {
    fn default() -> Self {
        Self {
            subgroup: DEFAULT_SUBGROUP_LINK_BASE.to_owned(),
            dataset: DEFAULT_DATASET_LINK_BASE.to_owned(),
            sample: DEFAULT_SAMPLE_LINK_BASE.to_owned(),
        }
    }
}

/// Header labels plus raw, untruncated cell text for an export.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Positions in `headers` whose cells all hold integers in the source.
    pub integer_columns: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Xlsx => "XLSX",
        }
    }
}
