// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::row_store::RowStore;

/// Maps a vertical offset inside a cell to the logical line it falls on.
/// Offsets past the last line clamp to it; empty text counts as one line.
pub fn resolve_line(cell_text: &str, line_height: u32, y: u32) -> usize {
    let line_height = line_height.max(1);
    let lines = cell_text.split('\n').count().max(1);
    let line = usize::try_from(y / line_height).unwrap_or(usize::MAX);
    line.min(lines - 1)
}

/// The URL for line `line` of a cell, or `None` when the cell has no link
/// there.
pub fn resolve_url(store: &RowStore, row: usize, col: usize, line: usize) -> Option<String> {
    store
        .cell_links(row, col)
        .into_iter()
        .nth(line)
        .filter(|url| !url.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    pub row: usize,
    pub col: usize,
    pub line: usize,
    pub url: String,
}

/// Shared by hover and click so both always agree on the target.
pub fn link_target(
    store: &RowStore,
    row: usize,
    col: usize,
    line_height: u32,
    y: u32,
) -> Option<LinkTarget> {
    let text = store.cell_display(row, col);
    let line = resolve_line(&text, line_height, y);
    resolve_url(store, row, col, line).map(|url| LinkTarget {
        row,
        col,
        line,
        url,
    })
}
