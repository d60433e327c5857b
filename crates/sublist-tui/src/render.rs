// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table};
use sublist_app::ListingMode;

use crate::layout::{COLUMN_SPACING, centered_rect, screen_areas};
use crate::{ListingScreen, page_size_label};

pub(crate) fn render(frame: &mut ratatui::Frame<'_>, screen: &ListingScreen) {
    let areas = screen_areas(frame.area(), screen.state.filters_collapsed);

    let filters = Paragraph::new(filter_panel_lines(screen).join("\n")).block(
        Block::default()
            .borders(Borders::ALL)
            .title(filter_panel_title(screen)),
    );
    frame.render_widget(filters, areas.filters);

    render_table(frame, areas.table, screen);

    let status = Paragraph::new(status_text(screen))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, areas.status);

    match screen.state.mode {
        ListingMode::Help => {
            let area = centered_rect(60, 70, frame.area());
            frame.render_widget(Clear, area);
            let help = Paragraph::new(help_overlay_text()).block(
                Block::default()
                    .title("help")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Cyan)),
            );
            frame.render_widget(help, area);
        }
        ListingMode::ColumnSelector => {
            let area = centered_rect(50, 70, frame.area());
            frame.render_widget(Clear, area);
            let selector = Paragraph::new(column_selector_text(screen))
                .block(Block::default().title("columns").borders(Borders::ALL));
            frame.render_widget(selector, area);
        }
        _ => {}
    }
}

fn render_table(frame: &mut ratatui::Frame<'_>, area: Rect, screen: &ListingScreen) {
    let block = Block::default().borders(Borders::ALL).title("subgroups");
    let geometry = screen.table_geometry(frame.area());
    if geometry.columns.is_empty() || geometry.rows.is_empty() {
        let message = if screen.model.total_rows() == 0 {
            "no subgroups loaded"
        } else {
            "no subgroups match the filters"
        };
        frame.render_widget(Paragraph::new(message).block(block), area);
        return;
    }

    let store = screen.model.store();
    let widths: Vec<Constraint> = geometry
        .columns
        .iter()
        .map(|slot| Constraint::Length(slot.width))
        .collect();
    let header = Row::new(geometry.columns.iter().map(|slot| {
        Cell::from(store.column(slot.col).label.clone()).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let rows: Vec<Row<'_>> = geometry
        .rows
        .iter()
        .map(|slot| {
            let selected_row = slot.local == screen.selected_row;
            let cells: Vec<Cell<'_>> = geometry
                .columns
                .iter()
                .map(|column| {
                    let mut style = Style::default();
                    if selected_row {
                        style = style.bg(Color::DarkGray);
                    }
                    if selected_row && column.col == screen.selected_col {
                        style = Style::default()
                            .fg(Color::Black)
                            .bg(Color::Cyan)
                            .add_modifier(Modifier::BOLD);
                    }
                    Cell::from(cell_text(screen, slot.local, column.col)).style(style)
                })
                .collect();
            Row::new(cells).height(slot.height)
        })
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(COLUMN_SPACING)
        .block(block);
    frame.render_widget(table, area);
}

/// Display lines of one cell; linked lines are underlined and the hovered
/// one is reversed.
fn cell_text(screen: &ListingScreen, local: usize, col: usize) -> Text<'static> {
    let source = screen.model.map_to_source(local);
    let display = screen.model.cell_display(local, col);
    let links = screen.model.store().cell_links(source, col);

    let lines: Vec<Line<'static>> = display
        .split('\n')
        .enumerate()
        .map(|(line, text)| {
            let mut style = Style::default();
            if links.get(line).is_some_and(|url| !url.is_empty()) {
                style = style.fg(Color::Blue).add_modifier(Modifier::UNDERLINED);
            }
            let hovered = screen.hover.as_ref().is_some_and(|target| {
                target.row == source && target.col == col && target.line == line
            });
            if hovered {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Line::styled(text.to_owned(), style)
        })
        .collect();
    Text::from(lines)
}

pub(crate) fn status_text(screen: &ListingScreen) -> String {
    let model = &screen.model;
    let page = model.page();
    let mut parts = vec![
        format!(
            "total: {} / filtered: {} / page {} of {}",
            model.total_rows(),
            model.filtered_rows(),
            page.page(),
            page.total_pages()
        ),
        format!("size: {}", page_size_label(page.page_size())),
    ];

    let load = screen.state.load.label();
    if !load.is_empty() {
        parts.push(load);
    }
    if screen.selected_cell_truncated() {
        parts.push("cell truncated".to_owned());
    }
    if let Some(target) = &screen.hover {
        parts.push(target.url.clone());
    }
    match &screen.state.status_line {
        Some(status) => parts.push(status.clone()),
        None => parts.push("? help".to_owned()),
    }
    parts.join(" | ")
}

fn column_label(screen: &ListingScreen, column: usize) -> String {
    screen
        .model
        .columns()
        .get(column)
        .map(|column| column.label.clone())
        .unwrap_or_default()
}

pub(crate) fn filter_panel_title(screen: &ListingScreen) -> String {
    match screen.state.mode {
        ListingMode::FilterInput { column } => {
            format!("filter {}", column_label(screen, column))
        }
        ListingMode::RangeInput { column } => format!("range {}", column_label(screen, column)),
        _ if screen.state.filters_collapsed => "filters (collapsed)".to_owned(),
        _ => "filters".to_owned(),
    }
}

pub(crate) fn filter_panel_lines(screen: &ListingScreen) -> Vec<String> {
    match screen.state.mode {
        ListingMode::FilterInput { .. } => vec![
            format!("> {}_", screen.input),
            "spaces or commas separate terms; * matches anything; enter/esc done".to_owned(),
        ],
        ListingMode::RangeInput { .. } => vec![
            format!("> {}_", screen.input),
            screen
                .input_error
                .clone()
                .unwrap_or_else(|| "N, N-M, N- or -M; enter apply, esc done".to_owned()),
        ],
        _ => {
            let columns = screen.model.columns();
            if screen.draft.is_empty() {
                return vec!["none (/ text filter, # range filter, C clear)".to_owned()];
            }
            if screen.state.filters_collapsed {
                return vec![screen.draft.summary(columns)];
            }

            let texts: Vec<String> = columns
                .iter()
                .filter(|column| !screen.draft.text(&column.key).is_empty())
                .map(|column| {
                    format!("{}:{}", column.label, screen.draft.text(&column.key).trim())
                })
                .collect();
            let ranges: Vec<String> = columns
                .iter()
                .filter(|column| screen.draft.range(&column.key).is_active())
                .map(|column| format!("{}:{}", column.label, screen.draft.range(&column.key)))
                .collect();
            vec![
                format!("text: {}", joined_or_dash(&texts)),
                format!("ranges: {}", joined_or_dash(&ranges)),
            ]
        }
    }
}

fn joined_or_dash(parts: &[String]) -> String {
    if parts.is_empty() {
        "-".to_owned()
    } else {
        parts.join(" / ")
    }
}

fn column_selector_text(screen: &ListingScreen) -> Text<'static> {
    let mut lines: Vec<Line<'static>> = screen
        .model
        .columns()
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let checked = screen
                .selector
                .pending
                .get(&column.key)
                .copied()
                .unwrap_or(column.default_visible);
            let mark = if checked { "[x]" } else { "[ ]" };
            let line = format!("{mark} {}", column.label);
            if index == screen.selector.cursor {
                Line::styled(line, Style::default().fg(Color::Black).bg(Color::Cyan))
            } else {
                Line::from(line)
            }
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(
        "space toggle | a all | x none | d defaults | enter apply | esc cancel",
    ));
    Text::from(lines)
}

pub(crate) fn help_overlay_text() -> &'static str {
    "navigation\n\
     arrows/hjkl  move cell\n\
     g/G          first/last row\n\
     n/p          next/previous page\n\
     +/-          cycle page size (all, 50, 100, 200, 500)\n\
     \n\
     filters\n\
     /            text filter for current column\n\
     #            range filter for current count column\n\
     C            clear all filters\n\
     f            collapse/expand filter panel\n\
     \n\
     columns\n\
     c            choose visible columns\n\
     R            reset saved column visibility\n\
     \n\
     data\n\
     r/F5         reload\n\
     e/E          export CSV/XLSX\n\
     o/enter      open link in current cell\n\
     mouse        hover highlights a link, click opens it\n\
     \n\
     ?            toggle help\n\
     q            quit"
}
