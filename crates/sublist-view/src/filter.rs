// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;
use sublist_app::{CellValue, Column, FilterDraft, RangeBounds};

use crate::TableView;
use crate::notify::{Subscribers, SubscriptionId, ViewChange};
use crate::pattern::{Pattern, compile_terms};
use crate::row_store::RowStore;

/// Patterns OR within a column, columns AND together, and every active range
/// must hold. The empty spec accepts every row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSpec {
    column_predicates: BTreeMap<usize, Vec<Pattern>>,
    range_predicates: BTreeMap<String, RangeBounds>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles `text` for column `column`. A field whose terms all drop out
    /// places no constraint on the column.
    pub fn with_column_text(mut self, column: usize, text: &str) -> Self {
        self.set_column_patterns(column, compile_terms(text));
        self
    }

    pub fn with_range(mut self, name: &str, bounds: RangeBounds) -> Self {
        self.set_range(name, bounds);
        self
    }

    pub fn set_column_patterns(&mut self, column: usize, patterns: Vec<Pattern>) {
        if patterns.is_empty() {
            self.column_predicates.remove(&column);
        } else {
            self.column_predicates.insert(column, patterns);
        }
    }

    pub fn set_range(&mut self, name: &str, bounds: RangeBounds) {
        if bounds.is_active() {
            self.range_predicates.insert(name.to_owned(), bounds);
        } else {
            self.range_predicates.remove(name);
        }
    }

    /// Text keyed by column key maps onto column indices of `columns`; keys
    /// with no matching column are skipped.
    pub fn from_draft(columns: &[Column], draft: &FilterDraft) -> Self {
        let mut spec = Self::new();
        for (key, text) in draft.texts() {
            if let Some(index) = columns.iter().position(|column| column.key == key) {
                spec.set_column_patterns(index, compile_terms(text));
            }
        }
        for (name, bounds) in draft.ranges() {
            spec.set_range(name, bounds);
        }
        spec
    }

    pub fn column_predicates(&self) -> &BTreeMap<usize, Vec<Pattern>> {
        &self.column_predicates
    }

    pub fn range_predicates(&self) -> &BTreeMap<String, RangeBounds> {
        &self.range_predicates
    }

    pub fn is_empty(&self) -> bool {
        self.column_predicates.is_empty() && self.range_predicates.is_empty()
    }

    /// Evaluates one store row. Columns beyond the store's extent and ranges
    /// naming an absent column are ignored; a non-integer value fails an
    /// active range.
    pub fn accepts(&self, store: &RowStore, row: usize) -> bool {
        let column_count = store.column_count();
        for (column, patterns) in &self.column_predicates {
            if *column >= column_count {
                continue;
            }
            let haystack = store.cell_raw_text(row, *column);
            if !patterns.iter().any(|pattern| pattern.is_match(&haystack)) {
                return false;
            }
        }

        for (name, bounds) in &self.range_predicates {
            let Some(column) = store.column_index(name) else {
                continue;
            };
            let value = store
                .cell_value(row, column)
                .and_then(CellValue::as_integer);
            match value {
                Some(value) if bounds.contains(value) => {}
                _ => return false,
            }
        }

        true
    }
}

/// Rows of the store that pass the current spec, in store order.
#[derive(Debug, Default)]
pub struct FilterView {
    spec: FilterSpec,
    indices: Vec<usize>,
    subscribers: Subscribers,
}

impl FilterView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_filter_spec(&mut self, store: &RowStore, spec: FilterSpec) {
        self.spec = spec;
        self.recompute(store);
        self.subscribers.notify(ViewChange::FilterChanged);
    }

    pub(crate) fn recompute(&mut self, store: &RowStore) {
        self.indices = (0..store.row_count())
            .filter(|row| self.spec.accepts(store, *row))
            .collect();
    }

    pub(crate) fn notify(&mut self, change: ViewChange) {
        self.subscribers.notify(change);
    }

    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    pub fn row_count(&self) -> usize {
        self.indices.len()
    }

    pub fn source_indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn map_to_source(&self, local: usize) -> usize {
        assert!(
            local < self.indices.len(),
            "filtered row {local} out of range for {} rows",
            self.indices.len()
        );
        self.indices[local]
    }
}

impl TableView for FilterView {
    fn row_count(&self) -> usize {
        self.indices.len()
    }

    fn map_to_upstream(&self, local: usize) -> usize {
        self.map_to_source(local)
    }

    fn on_changed(&mut self, callback: Box<dyn FnMut(ViewChange)>) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }
}
