// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use sublist_app::PageSpec;

use crate::TableView;
use crate::filter::FilterView;
use crate::notify::{Subscribers, SubscriptionId, ViewChange};

/// A window of at most `page_size` rows over the filtered rows. Page size 0
/// shows every row on a single page. Pages are 1-based.
#[derive(Debug)]
pub struct PageView {
    page_size: usize,
    page: usize,
    upstream_rows: usize,
    subscribers: Subscribers,
}

impl Default for PageView {
    fn default() -> Self {
        Self::new(PageSpec::default())
    }
}

impl PageView {
    /// Starts with no upstream rows, so the page clamps to 1 until the first
    /// `sync_upstream`.
    pub fn new(spec: PageSpec) -> Self {
        let mut view = Self {
            page_size: spec.page_size,
            page: spec.page,
            upstream_rows: 0,
            subscribers: Subscribers::new(),
        };
        view.page = view.clamp(spec.page);
        view
    }

    /// A new page size jumps back to page 1; otherwise the requested page is
    /// clamped into range.
    pub fn set_page_spec(&mut self, spec: PageSpec) {
        if spec.page_size != self.page_size {
            self.page_size = spec.page_size;
            self.page = 1;
        } else {
            self.page = self.clamp(spec.page);
        }
        self.subscribers.notify(ViewChange::PageChanged);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.set_page_spec(PageSpec::new(page_size, self.page));
    }

    pub fn set_page(&mut self, page: usize) {
        self.set_page_spec(PageSpec::new(self.page_size, page));
    }

    pub fn next_page(&mut self) -> bool {
        if self.page >= self.total_pages() {
            return false;
        }
        self.set_page(self.page + 1);
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page <= 1 {
            return false;
        }
        self.set_page(self.page - 1);
        true
    }

    /// Upstream changed size; keep the page when it still exists.
    pub(crate) fn sync_upstream(&mut self, upstream_rows: usize) {
        self.upstream_rows = upstream_rows;
        self.page = self.clamp(self.page);
    }

    pub(crate) fn notify(&mut self, change: ViewChange) {
        self.subscribers.notify(change);
    }

    pub fn spec(&self) -> PageSpec {
        PageSpec::new(self.page_size, self.page)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            return 1;
        }
        self.upstream_rows.div_ceil(self.page_size).max(1)
    }

    pub fn offset(&self) -> usize {
        if self.page_size == 0 {
            0
        } else {
            (self.page - 1).saturating_mul(self.page_size)
        }
    }

    pub fn row_count(&self) -> usize {
        if self.page_size == 0 {
            return self.upstream_rows;
        }
        self.upstream_rows
            .saturating_sub(self.offset())
            .min(self.page_size)
    }

    pub fn map_to_filtered(&self, local: usize) -> usize {
        let rows = self.row_count();
        assert!(
            local < rows,
            "page row {local} out of range for {rows} rows"
        );
        self.offset() + local
    }

    pub fn map_to_source(&self, filter: &FilterView, local: usize) -> usize {
        filter.map_to_source(self.map_to_filtered(local))
    }

    fn clamp(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages())
    }
}

impl TableView for PageView {
    fn row_count(&self) -> usize {
        PageView::row_count(self)
    }

    fn map_to_upstream(&self, local: usize) -> usize {
        self.map_to_filtered(local)
    }

    fn on_changed(&mut self, callback: Box<dyn FnMut(ViewChange)>) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }
}
