// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Derived-view engine behind the subgroup listing screen.
//!
//! Data flows `RowStore -> FilterView -> PageView`. Each derived view owns only
//! an index remapping into its upstream; rows live in the store alone.
//! [`ListingModel`] owns the whole chain so a reload swaps rows and every
//! remapping in one `&mut` call.

pub mod chain;
pub mod debounce;
pub mod filter;
pub mod links;
pub mod notify;
pub mod page;
pub mod pattern;
pub mod reload;
pub mod row_store;

pub use chain::ListingModel;
pub use debounce::{DEFAULT_FILTER_DEBOUNCE, Debounce};
pub use filter::{FilterSpec, FilterView};
pub use links::{LinkTarget, link_target, resolve_line, resolve_url};
pub use notify::{Subscribers, SubscriptionId, ViewChange};
pub use page::PageView;
pub use pattern::{Pattern, compile_terms, split_terms};
pub use reload::{LivenessToken, ReloadEvent, ReloadPipeline};
pub use row_store::{CellPolicy, LinkRule, MAX_LINE_CHARS, RowStore};

/// Interface shared by every layer of the chain.
pub trait TableView {
    fn row_count(&self) -> usize;

    /// Translates a view-local row into a row of the immediate upstream.
    fn map_to_upstream(&self, local: usize) -> usize;

    fn on_changed(&mut self, callback: Box<dyn FnMut(ViewChange)>) -> SubscriptionId;
}
