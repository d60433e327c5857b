// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use std::collections::BTreeSet;
use sublist_app::{
    CellValue, Column, Dataset, KEY_RELATED_DATASET_IDS, KEY_RELATED_DATASETS,
    KEY_RELATED_SAMPLE_IDS, KEY_RELATED_SAMPLES, KEY_SUBGROUP_ID, KEY_SUBGROUP_NAME, LinkBases,
    MULTILINE_COLUMN_KEYS, Row,
};
use url::Url;

use crate::TableView;
use crate::notify::{Subscribers, SubscriptionId, ViewChange};

pub const MAX_LINE_CHARS: usize = 60;
const ELLIPSIS: char = '…';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkRule {
    /// The whole cell links to `base + row[id_key]`.
    Single {
        column: String,
        id_key: String,
        base: Url,
    },
    /// Line `i` of the cell links to `base + row[ids_key][i]`.
    PerLine {
        column: String,
        ids_key: String,
        base: Url,
    },
}

impl LinkRule {
    pub fn single(column: &str, id_key: &str, base: &str) -> Result<Self> {
        Ok(Self::Single {
            column: column.to_owned(),
            id_key: id_key.to_owned(),
            base: parse_base(base)?,
        })
    }

    pub fn per_line(column: &str, ids_key: &str, base: &str) -> Result<Self> {
        Ok(Self::PerLine {
            column: column.to_owned(),
            ids_key: ids_key.to_owned(),
            base: parse_base(base)?,
        })
    }

    pub fn column(&self) -> &str {
        match self {
            Self::Single { column, .. } | Self::PerLine { column, .. } => column,
        }
    }

    fn links_for(&self, row: &Row) -> Vec<String> {
        match self {
            Self::Single { id_key, base, .. } => {
                let id = row.text(id_key);
                match join_id(base, &id) {
                    Some(url) => vec![url],
                    None => Vec::new(),
                }
            }
            Self::PerLine { ids_key, base, .. } => row
                .get(ids_key)
                .and_then(CellValue::as_list)
                .map(|ids| {
                    ids.iter()
                        .map(|id| join_id(base, id).unwrap_or_default())
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

fn parse_base(base: &str) -> Result<Url> {
    let url = Url::parse(base).with_context(|| format!("invalid link base {base:?}"))?;
    if !url.path().ends_with('/') {
        bail!("link base {base:?} must end with `/` so ids append as a path segment");
    }
    Ok(url)
}

fn join_id(base: &Url, id: &str) -> Option<String> {
    let id = id.trim();
    if id.is_empty() {
        return None;
    }
    match base.join(id) {
        Ok(url) => Some(url.to_string()),
        Err(error) => {
            tracing::debug!(id, %error, "cannot build link");
            None
        }
    }
}

/// How raw row values become display text and links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellPolicy {
    multiline_keys: BTreeSet<String>,
    link_rules: Vec<LinkRule>,
    max_line_chars: usize,
}

impl Default for CellPolicy {
    fn default() -> Self {
        Self {
            multiline_keys: BTreeSet::new(),
            link_rules: Vec::new(),
            max_line_chars: MAX_LINE_CHARS,
        }
    }
}

impl CellPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subgroup_listing(bases: &LinkBases, max_line_chars: usize) -> Result<Self> {
        let mut policy = Self::new().with_max_line_chars(max_line_chars);
        for key in MULTILINE_COLUMN_KEYS {
            policy = policy.with_multiline(key);
        }
        Ok(policy
            .with_link(LinkRule::single(
                KEY_SUBGROUP_NAME,
                KEY_SUBGROUP_ID,
                &bases.subgroup,
            )?)
            .with_link(LinkRule::per_line(
                KEY_RELATED_DATASETS,
                KEY_RELATED_DATASET_IDS,
                &bases.dataset,
            )?)
            .with_link(LinkRule::per_line(
                KEY_RELATED_SAMPLES,
                KEY_RELATED_SAMPLE_IDS,
                &bases.sample,
            )?))
    }

    pub fn with_multiline(mut self, key: &str) -> Self {
        self.multiline_keys.insert(key.to_owned());
        self
    }

    pub fn with_link(mut self, rule: LinkRule) -> Self {
        self.link_rules.retain(|existing| existing.column() != rule.column());
        self.link_rules.push(rule);
        self
    }

    /// Zero disables truncation.
    pub fn with_max_line_chars(mut self, max_line_chars: usize) -> Self {
        self.max_line_chars = max_line_chars;
        self
    }

    pub fn max_line_chars(&self) -> usize {
        self.max_line_chars
    }

    fn is_multiline(&self, key: &str) -> bool {
        self.multiline_keys.contains(key)
    }

    fn link_rule(&self, key: &str) -> Option<&LinkRule> {
        self.link_rules.iter().find(|rule| rule.column() == key)
    }
}

/// Owner of the current rows. Every other layer addresses rows by index.
#[derive(Debug)]
pub struct RowStore {
    columns: Vec<Column>,
    rows: Vec<Row>,
    policy: CellPolicy,
    subscribers: Subscribers,
}

impl RowStore {
    pub fn new(policy: CellPolicy) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            policy,
            subscribers: Subscribers::new(),
        }
    }

    /// Replaces the dataset and announces a reset.
    pub fn load(&mut self, dataset: Dataset) {
        self.replace(dataset);
        self.subscribers.notify(ViewChange::Reset);
    }

    pub(crate) fn replace(&mut self, dataset: Dataset) {
        self.columns = dataset.columns;
        self.rows = dataset.rows;
    }

    pub(crate) fn notify(&mut self, change: ViewChange) {
        self.subscribers.notify(change);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, col: usize) -> &Column {
        self.check_column(col);
        &self.columns[col]
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.key == key)
    }

    pub fn policy(&self) -> &CellPolicy {
        &self.policy
    }

    pub fn cell_value(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.check_cell(row, col);
        self.rows[row].get(&self.columns[col].key)
    }

    /// Untruncated text; this is what filters and exports see.
    pub fn cell_raw_text(&self, row: usize, col: usize) -> String {
        self.cell_value(row, col)
            .map(CellValue::to_text)
            .unwrap_or_default()
    }

    /// Multi-line columns shorten each over-long line to the policy width.
    pub fn cell_display(&self, row: usize, col: usize) -> String {
        let raw = self.cell_raw_text(row, col);
        if self.policy.is_multiline(&self.columns[col].key) {
            truncate_lines(&raw, self.policy.max_line_chars).0
        } else {
            raw
        }
    }

    pub fn cell_is_truncated(&self, row: usize, col: usize) -> bool {
        let raw = self.cell_raw_text(row, col);
        self.policy.is_multiline(&self.columns[col].key)
            && truncate_lines(&raw, self.policy.max_line_chars).1
    }

    /// One entry per logical line; lines without a target hold `""`.
    pub fn cell_links(&self, row: usize, col: usize) -> Vec<String> {
        self.check_cell(row, col);
        self.policy
            .link_rule(&self.columns[col].key)
            .map(|rule| rule.links_for(&self.rows[row]))
            .unwrap_or_default()
    }

    pub fn has_links(&self, row: usize, col: usize) -> bool {
        self.cell_links(row, col).iter().any(|url| !url.is_empty())
    }

    fn check_column(&self, col: usize) {
        assert!(
            col < self.columns.len(),
            "column {col} out of range for {} columns",
            self.columns.len()
        );
    }

    fn check_cell(&self, row: usize, col: usize) {
        assert!(
            row < self.rows.len(),
            "row {row} out of range for {} rows",
            self.rows.len()
        );
        self.check_column(col);
    }
}

impl TableView for RowStore {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn map_to_upstream(&self, local: usize) -> usize {
        assert!(
            local < self.rows.len(),
            "row {local} out of range for {} rows",
            self.rows.len()
        );
        local
    }

    fn on_changed(&mut self, callback: Box<dyn FnMut(ViewChange)>) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }
}

/// Returns the shortened text and whether any line was cut.
fn truncate_lines(text: &str, max_chars: usize) -> (String, bool) {
    if text.is_empty() || max_chars == 0 {
        return (text.to_owned(), false);
    }

    let mut truncated = false;
    let lines: Vec<String> = text
        .split('\n')
        .map(|line| {
            if line.chars().count() > max_chars {
                truncated = true;
                let mut short: String = line.chars().take(max_chars.saturating_sub(1)).collect();
                short.push(ELLIPSIS);
                short
            } else {
                line.to_owned()
            }
        })
        .collect();
    (lines.join("\n"), truncated)
}
