// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use super::{
    InternalEvent, ListingRuntime, ListingScreen, PAGE_SIZE_STEPS, ScreenOptions,
    handle_key_event, handle_mouse_event, next_page_size, process_internal_events, render,
};
use anyhow::{Result, anyhow};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;
use sublist_app::{
    ColumnVisibility, DEFAULT_SAMPLE_LINK_BASE, DEFAULT_SUBGROUP_LINK_BASE, Dataset, ExportFormat,
    ExportTable, KEY_DESCRIPTION, KEY_MEMBER_COUNT, KEY_RELATED_SAMPLES, KEY_SUBGROUP_ID,
    KEY_SUBGROUP_NAME, LinkBases, ListingMode, LoadState, RangeBounds, RecordSource,
};
use sublist_testkit::{
    FailingSource, FakeSubgroup, GatedSource, StaticSource, SubgroupFaker, numbered_dataset,
    subgroup_dataset,
};
use sublist_view::CellPolicy;

#[derive(Debug, Default)]
struct TestRuntime {
    persisted: Option<ColumnVisibility>,
    saved: Vec<ColumnVisibility>,
    resets: usize,
    exports: Vec<(ExportTable, ExportFormat)>,
    opened: Vec<String>,
    fail_open: bool,
}

impl ListingRuntime for TestRuntime {
    fn load_column_visibility(&mut self) -> Result<Option<ColumnVisibility>> {
        Ok(self.persisted.clone())
    }

    fn save_column_visibility(&mut self, visibility: &ColumnVisibility) {
        self.saved.push(visibility.clone());
    }

    fn reset_column_visibility(&mut self) {
        self.resets += 1;
    }

    fn export_table(&mut self, table: &ExportTable, format: ExportFormat) -> Result<PathBuf> {
        self.exports.push((table.clone(), format));
        Ok(PathBuf::from(format!("/tmp/listing.{}", format.extension())))
    }

    fn open_url(&mut self, url: &str) -> Result<()> {
        if self.fail_open {
            return Err(anyhow!("no opener"));
        }
        self.opened.push(url.to_owned());
        Ok(())
    }
}

struct Harness {
    screen: ListingScreen,
    runtime: TestRuntime,
    tx: mpsc::Sender<InternalEvent>,
    rx: mpsc::Receiver<InternalEvent>,
}

impl Harness {
    fn with_source(source: Arc<dyn RecordSource>, runtime: TestRuntime) -> Self {
        let (tx, rx) = mpsc::channel();
        let options = ScreenOptions {
            policy: CellPolicy::subgroup_listing(&LinkBases::default(), 60).expect("policy"),
            page_size: 100,
            filter_debounce: Duration::from_secs(60),
        };
        let mut harness = Self {
            screen: ListingScreen::new(options, source),
            runtime,
            tx,
            rx,
        };
        harness
            .screen
            .load_persisted_visibility(&mut harness.runtime, &harness.tx);
        harness
    }

    fn loaded(dataset: Dataset) -> Self {
        Self::loaded_with(dataset, TestRuntime::default())
    }

    fn loaded_with(dataset: Dataset, runtime: TestRuntime) -> Self {
        let mut harness = Self::with_source(Arc::new(StaticSource::new(dataset)), runtime);
        harness.reload();
        harness
    }

    fn reload(&mut self) {
        self.screen.start_reload(&self.tx);
        self.finish_reload();
    }

    fn finish_reload(&mut self) {
        let event = self
            .screen
            .reload
            .wait(&mut self.screen.model, Duration::from_secs(5))
            .expect("reload completes");
        self.screen.apply_reload_event(&self.tx, event);
    }

    fn press(&mut self, code: KeyCode) -> bool {
        handle_key_event(
            &mut self.screen,
            &mut self.runtime,
            &self.tx,
            KeyEvent::new(code, KeyModifiers::NONE),
        )
    }

    fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press(KeyCode::Char(ch));
        }
    }

    fn mouse(&mut self, kind: MouseEventKind, column: u16, row: u16) {
        handle_mouse_event(
            &mut self.screen,
            &mut self.runtime,
            &self.tx,
            MouseEvent {
                kind,
                column,
                row,
                modifiers: KeyModifiers::NONE,
            },
        );
    }

    fn select_column(&mut self, key: &str) {
        self.screen.selected_col = self
            .screen
            .model
            .store()
            .column_index(key)
            .expect("column exists");
    }

    fn status(&self) -> Option<&str> {
        self.screen.state.status_line.as_deref()
    }

    fn drain(&mut self) {
        process_internal_events(&mut self.screen, &self.rx);
    }
}

fn groups(count: usize) -> Vec<FakeSubgroup> {
    SubgroupFaker::new(17).subgroups(count)
}

fn rendered_lines(screen: &ListingScreen, width: u16, height: u16) -> Vec<String> {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
    terminal
        .draw(|frame| render::render(frame, screen))
        .expect("draw");
    let buffer = terminal.backend().buffer();
    (0..height)
        .map(|y| {
            (0..width)
                .map(|x| buffer[(x, y)].symbol().to_owned())
                .collect::<String>()
        })
        .collect()
}

#[test]
fn first_reload_fills_the_listing() {
    let harness = Harness::loaded(subgroup_dataset(&groups(7)));

    assert_eq!(harness.screen.state.load, LoadState::Ready { rows: 7 });
    assert_eq!(harness.screen.model.total_rows(), 7);
    assert_eq!(
        harness.screen.visibility.get(KEY_DESCRIPTION),
        Some(&false)
    );
    assert!(!harness.screen.visible_columns().is_empty());
}

#[test]
fn persisted_visibility_applies_on_first_load() {
    let mut persisted = ColumnVisibility::new();
    persisted.insert(KEY_DESCRIPTION.to_owned(), true);
    persisted.insert(KEY_SUBGROUP_ID.to_owned(), false);
    let runtime = TestRuntime {
        persisted: Some(persisted),
        ..TestRuntime::default()
    };
    let harness = Harness::loaded_with(subgroup_dataset(&groups(3)), runtime);

    let store = harness.screen.model.store();
    let visible = harness.screen.visible_columns();
    assert!(visible.contains(&store.column_index(KEY_DESCRIPTION).expect("column")));
    assert!(!visible.contains(&store.column_index(KEY_SUBGROUP_ID).expect("column")));
    assert_ne!(harness.screen.selected_col, 0, "cursor moved off the hidden column");
}

#[test]
fn reload_while_loading_is_refused() {
    let (source, gate) = GatedSource::new();
    let mut harness = Harness::with_source(source.clone(), TestRuntime::default());

    harness.screen.start_reload(&harness.tx);
    assert_eq!(harness.screen.state.load, LoadState::Loading);
    harness.press(KeyCode::Char('r'));
    assert_eq!(harness.status(), Some("reload already running"));

    gate.release(subgroup_dataset(&groups(2))).expect("release");
    harness.finish_reload();
    assert_eq!(harness.screen.state.load, LoadState::Ready { rows: 2 });
    assert_eq!(source.calls(), 1);
}

#[test]
fn failed_reload_reports_the_error() {
    let mut harness = Harness::with_source(
        Arc::new(FailingSource::new("disk gone")),
        TestRuntime::default(),
    );
    harness.reload();

    match &harness.screen.state.load {
        LoadState::Failed(message) => assert!(message.contains("disk gone"), "{message}"),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(harness.status().is_some_and(|status| status.contains("disk gone")));
    assert_eq!(harness.screen.model.total_rows(), 0);
}

#[test]
fn filter_typing_waits_for_the_debounce() {
    let groups = groups(10);
    let target = groups[3].id.clone();
    let mut harness = Harness::loaded(subgroup_dataset(&groups));
    harness.select_column(KEY_SUBGROUP_ID);

    harness.press(KeyCode::Char('/'));
    assert!(matches!(
        harness.screen.state.mode,
        ListingMode::FilterInput { .. }
    ));
    harness.type_text(&target);
    assert_eq!(harness.screen.draft.text(KEY_SUBGROUP_ID), target);
    assert_eq!(harness.screen.model.filtered_rows(), 10, "not applied yet");

    harness
        .tx
        .send(InternalEvent::ApplyFilters { token: 1 })
        .expect("send");
    harness.drain();
    assert_eq!(harness.screen.model.filtered_rows(), 10, "stale token ignored");

    let latest = u64::try_from(target.chars().count()).expect("fits");
    harness
        .tx
        .send(InternalEvent::ApplyFilters { token: latest })
        .expect("send");
    harness.drain();
    assert_eq!(harness.screen.model.filtered_rows(), 1);
}

#[test]
fn leaving_filter_input_applies_immediately() {
    let groups = groups(10);
    let mut harness = Harness::loaded(subgroup_dataset(&groups));
    harness.select_column(KEY_SUBGROUP_ID);

    harness.press(KeyCode::Char('/'));
    harness.type_text(&groups[0].id);
    harness.press(KeyCode::Esc);

    assert_eq!(harness.screen.state.mode, ListingMode::Browse);
    assert_eq!(harness.screen.model.filtered_rows(), 1);
    assert!(harness.screen.input.is_empty());

    harness.press(KeyCode::Char('/'));
    assert_eq!(harness.screen.input, groups[0].id, "input reopens with the draft");
    for _ in 0..groups[0].id.len() {
        harness.press(KeyCode::Backspace);
    }
    harness.press(KeyCode::Enter);
    assert_eq!(harness.screen.model.filtered_rows(), 10);
    assert!(harness.screen.draft.is_empty());
}

#[test]
fn range_input_only_opens_on_count_columns() {
    let groups = groups(12);
    let mut harness = Harness::loaded(subgroup_dataset(&groups));

    harness.select_column(KEY_SUBGROUP_NAME);
    harness.press(KeyCode::Char('#'));
    assert_eq!(harness.screen.state.mode, ListingMode::Browse);
    assert_eq!(harness.status(), Some("range filters apply to count columns"));

    harness.select_column(KEY_MEMBER_COUNT);
    harness.press(KeyCode::Char('#'));
    assert!(matches!(
        harness.screen.state.mode,
        ListingMode::RangeInput { .. }
    ));
    harness.type_text("2-");
    assert_eq!(
        harness.screen.draft.range(KEY_MEMBER_COUNT),
        RangeBounds::new(Some(2), None)
    );
    harness.press(KeyCode::Enter);

    let expected = groups.iter().filter(|group| group.members.len() >= 2).count();
    assert_eq!(harness.screen.model.filtered_rows(), expected);
    assert_eq!(harness.screen.state.mode, ListingMode::Browse);
}

#[test]
fn inverted_range_is_rejected_and_input_stays_open() {
    let mut harness = Harness::loaded(subgroup_dataset(&groups(5)));
    harness.select_column(KEY_MEMBER_COUNT);

    harness.press(KeyCode::Char('#'));
    harness.type_text("5-2");
    assert!(
        harness
            .screen
            .input_error
            .as_deref()
            .is_some_and(|error| error.contains("above max"))
    );
    harness.press(KeyCode::Enter);
    assert!(matches!(
        harness.screen.state.mode,
        ListingMode::RangeInput { .. }
    ));
    assert!(harness.status().is_some_and(|status| status.contains("above max")));

    harness.press(KeyCode::Esc);
    assert_eq!(harness.screen.state.mode, ListingMode::Browse);
    assert_eq!(
        harness.screen.draft.range(KEY_MEMBER_COUNT),
        RangeBounds::new(Some(5), None),
        "last valid bounds stay in the draft"
    );
}

#[test]
fn clear_key_resets_every_filter() {
    let groups = groups(8);
    let mut harness = Harness::loaded(subgroup_dataset(&groups));
    harness.select_column(KEY_SUBGROUP_ID);
    harness.press(KeyCode::Char('/'));
    harness.type_text(&groups[1].id);
    harness.press(KeyCode::Enter);
    assert_eq!(harness.screen.model.filtered_rows(), 1);

    harness.press(KeyCode::Char('C'));
    assert!(harness.screen.draft.is_empty());
    assert_eq!(harness.screen.model.filtered_rows(), 8);
    assert_eq!(harness.status(), Some("filters cleared"));
}

#[test]
fn page_keys_walk_and_stop_at_the_ends() {
    let mut harness = Harness::loaded(numbered_dataset(25));
    harness.screen.model.set_page_size(10);

    harness.press(KeyCode::Char('j'));
    harness.press(KeyCode::Char('n'));
    assert_eq!(harness.screen.model.page().page(), 2);
    assert_eq!(harness.screen.selected_row, 0);

    harness.press(KeyCode::Char('n'));
    assert_eq!(harness.screen.model.page().page(), 3);
    assert_eq!(harness.screen.model.row_count(), 5);
    harness.press(KeyCode::Char('n'));
    assert_eq!(harness.status(), Some("already on the last page"));

    harness.press(KeyCode::Char('p'));
    harness.press(KeyCode::Char('p'));
    harness.press(KeyCode::Char('p'));
    assert_eq!(harness.screen.model.page().page(), 1);
    assert_eq!(harness.status(), Some("already on the first page"));
}

#[test]
fn page_size_keys_cycle_through_steps() {
    let mut harness = Harness::loaded(numbered_dataset(120));
    assert_eq!(harness.screen.model.page().page_size(), 100);

    harness.press(KeyCode::Char('+'));
    assert_eq!(harness.screen.model.page().page_size(), 200);
    assert_eq!(harness.status(), Some("page size: 200"));

    harness.press(KeyCode::Char('-'));
    harness.press(KeyCode::Char('-'));
    harness.press(KeyCode::Char('-'));
    assert_eq!(harness.screen.model.page().page_size(), 0);
    assert_eq!(harness.screen.model.row_count(), 120);
    assert_eq!(harness.status(), Some("page size: all"));
}

#[test]
fn next_page_size_handles_unlisted_sizes() {
    assert_eq!(next_page_size(500, true), 0);
    assert_eq!(next_page_size(0, false), 500);
    assert_eq!(next_page_size(75, true), 100);
    assert_eq!(PAGE_SIZE_STEPS[0], 0);
}

#[test]
fn cursor_moves_within_page_and_visible_columns() {
    let mut harness = Harness::loaded(subgroup_dataset(&groups(4)));
    let visible = harness.screen.visible_columns();

    harness.press(KeyCode::Up);
    assert_eq!(harness.screen.selected_row, 0);
    for _ in 0..10 {
        harness.press(KeyCode::Down);
    }
    assert_eq!(harness.screen.selected_row, 3);
    harness.press(KeyCode::Char('g'));
    assert_eq!(harness.screen.selected_row, 0);

    for _ in 0..40 {
        harness.press(KeyCode::Right);
    }
    assert_eq!(Some(&harness.screen.selected_col), visible.last());
    harness.press(KeyCode::Left);
    assert_eq!(harness.screen.selected_col, visible[visible.len() - 2]);
}

#[test]
fn column_selector_applies_and_persists() {
    let mut harness = Harness::loaded(subgroup_dataset(&groups(3)));

    harness.press(KeyCode::Char('c'));
    assert_eq!(harness.screen.state.mode, ListingMode::ColumnSelector);
    harness.press(KeyCode::Char('x'));
    harness.press(KeyCode::Enter);
    assert_eq!(harness.screen.state.mode, ListingMode::ColumnSelector);
    assert_eq!(harness.status(), Some("keep at least one column visible"));

    harness.press(KeyCode::Char('d'));
    harness.press(KeyCode::Char(' '));
    harness.press(KeyCode::Enter);

    assert_eq!(harness.screen.state.mode, ListingMode::Browse);
    assert_eq!(harness.runtime.saved.len(), 1);
    assert_eq!(harness.runtime.saved[0].get(KEY_SUBGROUP_ID), Some(&false));
    assert_eq!(harness.status(), Some("columns saved"));
    assert!(!harness.screen.visible_columns().contains(&0));
    assert_ne!(harness.screen.selected_col, 0);
}

#[test]
fn column_selector_escape_discards_changes() {
    let mut harness = Harness::loaded(subgroup_dataset(&groups(3)));
    let before = harness.screen.visibility.clone();

    harness.press(KeyCode::Char('c'));
    harness.press(KeyCode::Char('a'));
    harness.press(KeyCode::Esc);

    assert_eq!(harness.screen.visibility, before);
    assert!(harness.runtime.saved.is_empty());
}

#[test]
fn reset_key_restores_defaults_and_clears_storage() {
    let mut persisted = ColumnVisibility::new();
    persisted.insert(KEY_DESCRIPTION.to_owned(), true);
    let runtime = TestRuntime {
        persisted: Some(persisted),
        ..TestRuntime::default()
    };
    let mut harness = Harness::loaded_with(subgroup_dataset(&groups(3)), runtime);
    assert_eq!(harness.screen.visibility.get(KEY_DESCRIPTION), Some(&true));

    harness.press(KeyCode::Char('R'));
    assert_eq!(harness.runtime.resets, 1);
    assert_eq!(harness.status(), Some("column visibility reset"));
    assert_eq!(harness.screen.visibility.get(KEY_DESCRIPTION), Some(&false));

    harness.reload();
    assert_eq!(
        harness.screen.visibility.get(KEY_DESCRIPTION),
        Some(&false),
        "reload does not bring back the removed settings"
    );
}

#[test]
fn export_keys_send_filtered_visible_rows() {
    let groups = groups(9);
    let mut harness = Harness::loaded(subgroup_dataset(&groups));
    harness.screen.model.set_page_size(2);
    harness.select_column(KEY_MEMBER_COUNT);
    harness.press(KeyCode::Char('#'));
    harness.type_text("1-");
    harness.press(KeyCode::Enter);

    harness.press(KeyCode::Char('e'));
    harness.press(KeyCode::Char('E'));

    let expected = groups.iter().filter(|group| !group.members.is_empty()).count();
    assert_eq!(harness.runtime.exports.len(), 2);
    let (table, format) = &harness.runtime.exports[0];
    assert_eq!(*format, ExportFormat::Csv);
    assert_eq!(table.rows.len(), expected);
    assert!(!table.headers.iter().any(|header| header == "Description"));
    assert_eq!(harness.runtime.exports[1].1, ExportFormat::Xlsx);
    assert!(
        harness
            .status()
            .is_some_and(|status| status.contains("listing.xlsx"))
    );
}

#[test]
fn export_with_no_rows_is_skipped() {
    let mut harness = Harness::loaded(subgroup_dataset(&[]));
    harness.press(KeyCode::Char('e'));
    assert!(harness.runtime.exports.is_empty());
    assert_eq!(harness.status(), Some("nothing to export"));
}

#[test]
fn open_key_uses_the_first_line_link() {
    let groups = groups(2);
    let mut harness = Harness::loaded(subgroup_dataset(&groups));
    harness.select_column(KEY_SUBGROUP_NAME);

    harness.press(KeyCode::Char('o'));
    assert_eq!(
        harness.runtime.opened,
        vec![format!("{DEFAULT_SUBGROUP_LINK_BASE}{}", groups[0].id)]
    );

    harness.select_column(KEY_MEMBER_COUNT);
    harness.press(KeyCode::Enter);
    assert_eq!(harness.runtime.opened.len(), 1);
    assert_eq!(harness.status(), Some("no link in this cell"));
}

#[test]
fn open_failure_is_reported() {
    let runtime = TestRuntime {
        fail_open: true,
        ..TestRuntime::default()
    };
    let mut harness = Harness::loaded_with(subgroup_dataset(&groups(1)), runtime);
    harness.select_column(KEY_SUBGROUP_NAME);
    harness.press(KeyCode::Char('o'));
    assert!(
        harness
            .status()
            .is_some_and(|status| status.contains("no opener"))
    );
}

#[test]
fn mouse_hover_and_click_resolve_the_line_under_the_pointer() {
    let mut group = groups(1).remove(0);
    group.samples = vec![
        ("s-1".to_owned(), "Powder".to_owned()),
        ("s-2".to_owned(), "Film".to_owned()),
        ("s-3".to_owned(), "Wire".to_owned()),
    ];
    let mut harness = Harness::loaded(subgroup_dataset(&[group]));
    harness.screen.set_viewport(Rect::new(0, 0, 1000, 30));

    let col = harness
        .screen
        .model
        .store()
        .column_index(KEY_RELATED_SAMPLES)
        .expect("column");
    let geometry = harness.screen.table_geometry(harness.screen.viewport);
    let column = geometry
        .columns
        .iter()
        .find(|slot| slot.col == col)
        .copied()
        .expect("samples column on screen");
    let row = geometry.rows[0];
    assert!(row.height >= 3);

    harness.mouse(MouseEventKind::Moved, column.x, row.y + 1);
    let hover = harness.screen.hover.clone().expect("hovering a link");
    assert_eq!(hover.line, 1);
    assert_eq!(hover.url, format!("{DEFAULT_SAMPLE_LINK_BASE}s-2"));

    harness.mouse(MouseEventKind::Down(MouseButton::Left), column.x, row.y + 2);
    assert_eq!(
        harness.runtime.opened,
        vec![format!("{DEFAULT_SAMPLE_LINK_BASE}s-3")]
    );
    assert_eq!(harness.screen.selected_col, col);

    harness.mouse(MouseEventKind::Moved, 0, 0);
    assert_eq!(harness.screen.hover, None);
}

#[test]
fn stale_status_clear_is_ignored() {
    let mut harness = Harness::loaded(subgroup_dataset(&groups(2)));
    harness.press(KeyCode::Char('C'));
    harness.press(KeyCode::Char('C'));
    let current = harness.screen.status_token;

    harness
        .tx
        .send(InternalEvent::ClearStatus { token: current - 1 })
        .expect("send");
    harness.drain();
    assert_eq!(harness.status(), Some("filters cleared"));

    harness
        .tx
        .send(InternalEvent::ClearStatus { token: current })
        .expect("send");
    harness.drain();
    assert_eq!(harness.status(), None);
}

#[test]
fn help_opens_and_closes_and_q_quits() {
    let mut harness = Harness::loaded(subgroup_dataset(&groups(1)));

    assert!(!harness.press(KeyCode::Char('?')));
    assert_eq!(harness.screen.state.mode, ListingMode::Help);
    assert!(!harness.press(KeyCode::Char('q')), "q closes help first");
    assert_eq!(harness.screen.state.mode, ListingMode::Browse);

    harness.press(KeyCode::Char('/'));
    assert!(!harness.press(KeyCode::Char('q')), "q is text while typing");
    harness.press(KeyCode::Esc);
    assert!(harness.press(KeyCode::Char('q')));
}

#[test]
fn render_shows_counts_rows_and_filter_summary() {
    let groups = groups(5);
    let mut harness = Harness::loaded(subgroup_dataset(&groups));
    harness.select_column(KEY_SUBGROUP_ID);
    harness.press(KeyCode::Char('/'));
    harness.type_text(&groups[2].id);
    harness.press(KeyCode::Enter);
    harness.press(KeyCode::Char('f'));
    harness.screen.set_viewport(Rect::new(0, 0, 160, 24));

    let screen = rendered_lines(&harness.screen, 160, 24).join("\n");
    assert!(screen.contains("total: 5 / filtered: 1 / page 1 of 1"), "{screen}");
    assert!(screen.contains(&format!("Group ID:{}", groups[2].id)), "{screen}");
    assert!(screen.contains(&groups[2].id));
    assert!(!screen.contains(&groups[0].id));
}

#[test]
fn render_overlays_for_help_and_columns() {
    let mut harness = Harness::loaded(subgroup_dataset(&groups(2)));
    harness.screen.set_viewport(Rect::new(0, 0, 120, 40));

    harness.press(KeyCode::Char('?'));
    let help = rendered_lines(&harness.screen, 120, 40).join("\n");
    assert!(help.contains("export CSV/XLSX"), "{help}");

    harness.press(KeyCode::Esc);
    harness.press(KeyCode::Char('c'));
    let selector = rendered_lines(&harness.screen, 120, 40).join("\n");
    assert!(selector.contains("[ ] Description"), "{selector}");
    assert!(selector.contains("[x] Group name"), "{selector}");
}

#[test]
fn empty_listing_renders_placeholder() -> Result<()> {
    let harness = Harness::loaded(subgroup_dataset(&[]));
    let screen = rendered_lines(&harness.screen, 80, 20).join("\n");
    assert!(screen.contains("no subgroups loaded"), "{screen}");
    assert!(screen.contains("total: 0 / filtered: 0 / page 1 of 1"), "{screen}");
    Ok(())
}
