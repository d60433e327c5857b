// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use sublist_app::{CellValue, Column, Dataset, ExportTable, PageSpec};

use crate::filter::{FilterSpec, FilterView};
use crate::links::{LinkTarget, link_target};
use crate::TableView;
use crate::notify::{SubscriptionId, ViewChange};
use crate::page::PageView;
use crate::row_store::{CellPolicy, RowStore};

/// The store, filter and page layers wired together. Callers address rows
/// through page-local indices; every mapping goes through this type.
#[derive(Debug)]
pub struct ListingModel {
    store: RowStore,
    filter: FilterView,
    page: PageView,
}

impl ListingModel {
    pub fn new(policy: CellPolicy) -> Self {
        Self::with_page_spec(policy, PageSpec::default())
    }

    pub fn with_page_spec(policy: CellPolicy, spec: PageSpec) -> Self {
        Self {
            store: RowStore::new(policy),
            filter: FilterView::new(),
            page: PageView::new(spec),
        }
    }

    /// Replaces the rows and re-derives both views before anyone is told,
    /// so subscribers never see a half-updated chain.
    pub fn load(&mut self, dataset: Dataset) {
        self.store.replace(dataset);
        self.filter.recompute(&self.store);
        self.page.sync_upstream(self.filter.row_count());

        self.store.notify(ViewChange::Reset);
        self.filter.notify(ViewChange::Reset);
        self.page.notify(ViewChange::Reset);
        tracing::debug!(
            total = self.store.row_count(),
            filtered = self.filter.row_count(),
            page = self.page.page(),
            "listing reloaded"
        );
    }

    pub fn set_filter_spec(&mut self, spec: FilterSpec) {
        self.filter.set_filter_spec(&self.store, spec);
        self.page.sync_upstream(self.filter.row_count());
        self.page.notify(ViewChange::FilterChanged);
    }

    pub fn set_page_spec(&mut self, spec: PageSpec) {
        self.page.set_page_spec(spec);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page.set_page_size(page_size);
    }

    pub fn set_page(&mut self, page: usize) {
        self.page.set_page(page);
    }

    pub fn next_page(&mut self) -> bool {
        self.page.next_page()
    }

    pub fn prev_page(&mut self) -> bool {
        self.page.prev_page()
    }

    pub fn store(&self) -> &RowStore {
        &self.store
    }

    pub fn filter(&self) -> &FilterView {
        &self.filter
    }

    pub fn page(&self) -> &PageView {
        &self.page
    }

    /// Layers are only reachable mutably through the model, so rows and
    /// remappings always change together. Subscriptions go through these.
    pub fn on_store_changed(&mut self, callback: Box<dyn FnMut(ViewChange)>) -> SubscriptionId {
        self.store.on_changed(callback)
    }

    pub fn on_filter_changed(&mut self, callback: Box<dyn FnMut(ViewChange)>) -> SubscriptionId {
        self.filter.on_changed(callback)
    }

    pub fn on_page_changed(&mut self, callback: Box<dyn FnMut(ViewChange)>) -> SubscriptionId {
        self.page.on_changed(callback)
    }

    pub fn columns(&self) -> &[Column] {
        self.store.columns()
    }

    /// Rows on the current page.
    pub fn row_count(&self) -> usize {
        self.page.row_count()
    }

    pub fn total_rows(&self) -> usize {
        self.store.row_count()
    }

    pub fn filtered_rows(&self) -> usize {
        self.filter.row_count()
    }

    pub fn map_to_source(&self, local: usize) -> usize {
        self.page.map_to_source(&self.filter, local)
    }

    pub fn cell_display(&self, local: usize, col: usize) -> String {
        self.store.cell_display(self.map_to_source(local), col)
    }

    pub fn cell_is_truncated(&self, local: usize, col: usize) -> bool {
        self.store.cell_is_truncated(self.map_to_source(local), col)
    }

    pub fn has_links(&self, local: usize, col: usize) -> bool {
        self.store.has_links(self.map_to_source(local), col)
    }

    /// Link under a click or hover at `y` cells below the top of the cell.
    pub fn link_at(&self, local: usize, col: usize, line_height: u32, y: u32) -> Option<LinkTarget> {
        link_target(&self.store, self.map_to_source(local), col, line_height, y)
    }

    /// Every filtered row (not just the current page) restricted to
    /// `columns`, using untruncated text.
    pub fn export_table(&self, columns: &[usize]) -> ExportTable {
        let headers = columns
            .iter()
            .map(|col| self.store.column(*col).label.clone())
            .collect();
        let rows = self
            .filter
            .source_indices()
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|col| self.store.cell_raw_text(*row, *col))
                    .collect()
            })
            .collect();
        let integer_columns = columns
            .iter()
            .enumerate()
            .filter(|(_, col)| self.holds_only_integers(**col))
            .map(|(position, _)| position)
            .collect();
        ExportTable {
            headers,
            rows,
            integer_columns,
        }
    }

    fn holds_only_integers(&self, col: usize) -> bool {
        let rows = self.filter.source_indices();
        !rows.is_empty()
            && rows.iter().all(|row| {
                matches!(
                    self.store.cell_value(*row, col),
                    Some(CellValue::Integer(_)) | None
                )
            })
    }
}
