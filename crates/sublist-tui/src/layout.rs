// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use ratatui::layout::{Constraint, Direction, Layout, Rect};

const FILTER_PANEL_EXPANDED: u16 = 4;
const FILTER_PANEL_COLLAPSED: u16 = 3;
const STATUS_HEIGHT: u16 = 3;
pub(crate) const COLUMN_SPACING: u16 = 1;
pub(crate) const MIN_COLUMN_WIDTH: u16 = 6;
pub(crate) const MAX_COLUMN_WIDTH: u16 = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScreenAreas {
    pub filters: Rect,
    pub table: Rect,
    pub status: Rect,
}

pub(crate) fn screen_areas(area: Rect, filters_collapsed: bool) -> ScreenAreas {
    let filter_height = if filters_collapsed {
        FILTER_PANEL_COLLAPSED
    } else {
        FILTER_PANEL_EXPANDED
    };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(filter_height),
            Constraint::Min(1),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(area);
    ScreenAreas {
        filters: layout[0],
        table: layout[1],
        status: layout[2],
    }
}

/// Area inside the bordered table block.
pub(crate) fn table_inner(table: Rect) -> Rect {
    Rect {
        x: table.x.saturating_add(1),
        y: table.y.saturating_add(1),
        width: table.width.saturating_sub(2),
        height: table.height.saturating_sub(2),
    }
}

/// Rows available below the header line.
pub(crate) fn body_height(inner: Rect) -> u16 {
    inner.height.saturating_sub(1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ColumnSlot {
    pub col: usize,
    pub x: u16,
    pub width: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RowSlot {
    pub local: usize,
    pub y: u16,
    pub height: u16,
}

/// Screen positions of the cells actually drawn, shared by rendering and
/// mouse hit testing so both agree on what sits where.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TableGeometry {
    pub columns: Vec<ColumnSlot>,
    pub rows: Vec<RowSlot>,
}

impl TableGeometry {
    /// `columns` holds `(column index, desired width)` in display order and
    /// `row_heights` one entry per page row. Slots start at the offsets and
    /// stop once `inner` is full; the last slot on each axis may be clipped.
    pub fn layout(
        inner: Rect,
        columns: &[(usize, u16)],
        col_offset: usize,
        row_heights: &[u16],
        row_offset: usize,
    ) -> Self {
        let mut geometry = Self::default();

        let right = inner.x.saturating_add(inner.width);
        let mut x = inner.x;
        for (col, width) in columns.iter().skip(col_offset) {
            if x >= right {
                break;
            }
            let width = (*width).min(right - x);
            geometry.columns.push(ColumnSlot {
                col: *col,
                x,
                width,
            });
            x = x.saturating_add(width).saturating_add(COLUMN_SPACING);
        }

        let top = inner.y.saturating_add(1);
        let bottom = top.saturating_add(body_height(inner));
        let mut y = top;
        for (local, height) in row_heights.iter().enumerate().skip(row_offset) {
            if y >= bottom {
                break;
            }
            let height = (*height).max(1).min(bottom - y);
            geometry.rows.push(RowSlot { local, y, height });
            y = y.saturating_add(height);
        }

        geometry
    }

    /// Cell under a screen position as `(page row, column, offset from the
    /// top of the cell)`.
    pub fn hit(&self, x: u16, y: u16) -> Option<(usize, usize, u16)> {
        let column = self
            .columns
            .iter()
            .find(|slot| x >= slot.x && x < slot.x.saturating_add(slot.width))?;
        let row = self
            .rows
            .iter()
            .find(|slot| y >= slot.y && y < slot.y.saturating_add(slot.height))?;
        Some((row.local, column.col, y - row.y))
    }
}

/// Smallest offset at or below `current` that keeps `selected` on screen
/// given the per-item extents and the space available.
pub(crate) fn scroll_to_show(
    extents: &[u16],
    gap: u16,
    current: usize,
    selected: usize,
    available: u16,
) -> usize {
    if extents.is_empty() {
        return 0;
    }
    let selected = selected.min(extents.len() - 1);
    if selected < current {
        return selected;
    }

    let mut offset = current.min(selected);
    while offset < selected {
        let used: u32 = extents[offset..=selected]
            .iter()
            .map(|extent| u32::from(*extent) + u32::from(gap))
            .sum();
        if used.saturating_sub(u32::from(gap)) <= u32::from(available) {
            break;
        }
        offset += 1;
    }
    offset
}

pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
