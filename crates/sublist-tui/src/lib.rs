// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod layout;
mod render;

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::text::Line;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use sublist_app::{
    ColumnVisibility, DEFAULT_PAGE_SIZE, ExportFormat, ExportTable, FilterDraft, ListingCommand,
    ListingMode, ListingState, PageSpec, RangeBounds, RecordSource, default_visibility,
    resolve_visibility, visible_column_indices,
};
use sublist_view::{
    CellPolicy, DEFAULT_FILTER_DEBOUNCE, Debounce, FilterSpec, LinkTarget, ListingModel,
    ReloadEvent, ReloadPipeline,
};

use crate::layout::{
    COLUMN_SPACING, MAX_COLUMN_WIDTH, MIN_COLUMN_WIDTH, TableGeometry, body_height,
    screen_areas, scroll_to_show, table_inner,
};

/// Page sizes offered by `+`/`-`; zero shows every filtered row.
pub const PAGE_SIZE_STEPS: [usize; 5] = [0, 50, 100, 200, 500];

const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);
const EVENT_POLL: Duration = Duration::from_millis(120);
const LINK_LINE_HEIGHT: u32 = 1;

/// Side effects the listing screen needs from its host.
pub trait ListingRuntime {
    fn load_column_visibility(&mut self) -> Result<Option<ColumnVisibility>>;
    /// Persisting is best effort; failures are logged by the runtime.
    fn save_column_visibility(&mut self, visibility: &ColumnVisibility);
    fn reset_column_visibility(&mut self);
    fn export_table(&mut self, table: &ExportTable, format: ExportFormat) -> Result<PathBuf>;
    fn open_url(&mut self, url: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    ApplyFilters { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenOptions {
    pub policy: CellPolicy,
    pub page_size: usize,
    pub filter_debounce: Duration,
}

impl Default for ScreenOptions {
    fn default() -> Self {
        Self {
            policy: CellPolicy::new(),
            page_size: DEFAULT_PAGE_SIZE,
            filter_debounce: DEFAULT_FILTER_DEBOUNCE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ColumnSelectorUiState {
    cursor: usize,
    pending: ColumnVisibility,
}

/// Everything the listing screen owns: the view chain, the reload worker,
/// the typed filter text and the cursor.
#[derive(Debug)]
pub struct ListingScreen {
    state: ListingState,
    model: ListingModel,
    reload: ReloadPipeline,
    draft: FilterDraft,
    debounce: Debounce,
    persisted: Option<ColumnVisibility>,
    visibility: ColumnVisibility,
    selected_row: usize,
    selected_col: usize,
    row_offset: usize,
    col_offset: usize,
    input: String,
    input_error: Option<String>,
    selector: ColumnSelectorUiState,
    hover: Option<LinkTarget>,
    status_token: u64,
    viewport: Rect,
}

impl ListingScreen {
    pub fn new(options: ScreenOptions, source: Arc<dyn RecordSource>) -> Self {
        Self {
            state: ListingState::default(),
            model: ListingModel::with_page_spec(
                options.policy,
                PageSpec::new(options.page_size, 1),
            ),
            reload: ReloadPipeline::new(source),
            draft: FilterDraft::new(),
            debounce: Debounce::new(options.filter_debounce),
            persisted: None,
            visibility: ColumnVisibility::new(),
            selected_row: 0,
            selected_col: 0,
            row_offset: 0,
            col_offset: 0,
            input: String::new(),
            input_error: None,
            selector: ColumnSelectorUiState::default(),
            hover: None,
            status_token: 0,
            viewport: Rect::default(),
        }
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    pub fn model(&self) -> &ListingModel {
        &self.model
    }

    pub fn draft(&self) -> &FilterDraft {
        &self.draft
    }

    pub fn visibility(&self) -> &ColumnVisibility {
        &self.visibility
    }

    /// Column indices drawn and exported. Falls back to every column when
    /// the stored visibility hides them all.
    pub fn visible_columns(&self) -> Vec<usize> {
        let columns = self.model.columns();
        let visible = visible_column_indices(columns, &self.visibility);
        if visible.is_empty() {
            (0..columns.len()).collect()
        } else {
            visible
        }
    }

    fn column_key(&self, column: usize) -> Option<String> {
        self.model
            .columns()
            .get(column)
            .map(|column| column.key.clone())
    }

    fn load_persisted_visibility<R: ListingRuntime>(
        &mut self,
        runtime: &mut R,
        tx: &Sender<InternalEvent>,
    ) {
        match runtime.load_column_visibility() {
            Ok(persisted) => self.persisted = persisted,
            Err(error) => {
                self.emit_status(tx, format!("column settings unavailable: {error:#}"));
            }
        }
    }

    fn start_reload(&mut self, tx: &Sender<InternalEvent>) {
        match self.reload.trigger() {
            Ok(Some(event)) => self.apply_reload_event(tx, event),
            Ok(None) => self.emit_status(tx, "reload already running"),
            Err(error) => self.fail_load(tx, format!("{error:#}")),
        }
    }

    fn poll_reload(&mut self, tx: &Sender<InternalEvent>) {
        if let Some(event) = self.reload.poll(&mut self.model) {
            self.apply_reload_event(tx, event);
        }
    }

    fn apply_reload_event(&mut self, tx: &Sender<InternalEvent>, event: ReloadEvent) {
        match event {
            ReloadEvent::Loading => {
                self.state.dispatch(ListingCommand::ReloadStarted);
            }
            ReloadEvent::Ready { rows } => {
                let resolved = {
                    let base = if self.visibility.is_empty() {
                        self.persisted.as_ref()
                    } else {
                        Some(&self.visibility)
                    };
                    resolve_visibility(self.model.columns(), base)
                };
                self.visibility = resolved;
                self.hover = None;
                self.apply_filters();
                self.state.dispatch(ListingCommand::ReloadFinished { rows });
            }
            ReloadEvent::Failed { message } => self.fail_load(tx, message),
        }
    }

    fn fail_load(&mut self, tx: &Sender<InternalEvent>, message: String) {
        self.state.dispatch(ListingCommand::ReloadFailed(message));
        self.bump_status_token(tx);
    }

    fn emit_status(&mut self, tx: &Sender<InternalEvent>, message: impl Into<String>) {
        self.state.dispatch(ListingCommand::SetStatus(message.into()));
        self.bump_status_token(tx);
    }

    fn bump_status_token(&mut self, tx: &Sender<InternalEvent>) {
        self.status_token = self.status_token.wrapping_add(1);
        schedule_status_clear(tx, self.status_token);
    }

    fn apply_filters(&mut self) {
        let spec = FilterSpec::from_draft(self.model.columns(), &self.draft);
        self.model.set_filter_spec(spec);
        self.clamp_cursor();
        tracing::debug!(
            filtered = self.model.filtered_rows(),
            page = self.model.page().page(),
            "filters applied"
        );
    }

    fn clamp_cursor(&mut self) {
        let rows = self.model.row_count();
        self.selected_row = self.selected_row.min(rows.saturating_sub(1));
        self.row_offset = self.row_offset.min(self.selected_row);

        let visible = self.visible_columns();
        if !visible.contains(&self.selected_col) {
            self.selected_col = visible
                .iter()
                .copied()
                .find(|col| *col > self.selected_col)
                .or_else(|| visible.last().copied())
                .unwrap_or(0);
        }
        let position = visible
            .iter()
            .position(|col| *col == self.selected_col)
            .unwrap_or(0);
        self.col_offset = self.col_offset.min(position);
    }

    fn set_viewport(&mut self, area: Rect) {
        self.viewport = area;
        self.sync_scroll();
    }

    fn sync_scroll(&mut self) {
        let visible = self.visible_columns();
        let (widths, heights) = self.page_extents(&visible);
        let inner = table_inner(screen_areas(self.viewport, self.state.filters_collapsed).table);

        self.row_offset = scroll_to_show(
            &heights,
            0,
            self.row_offset,
            self.selected_row,
            body_height(inner),
        );

        let column_widths: Vec<u16> = widths.iter().map(|(_, width)| *width).collect();
        let position = visible
            .iter()
            .position(|col| *col == self.selected_col)
            .unwrap_or(0);
        self.col_offset = scroll_to_show(
            &column_widths,
            COLUMN_SPACING,
            self.col_offset,
            position,
            inner.width,
        );
    }

    /// Desired width per visible column and height per page row, both
    /// measured from display text.
    fn page_extents(&self, visible: &[usize]) -> (Vec<(usize, u16)>, Vec<u16>) {
        let store = self.model.store();
        let mut widths: Vec<(usize, u16)> = visible
            .iter()
            .map(|col| (*col, text_width(&store.column(*col).label)))
            .collect();
        let mut heights = Vec::with_capacity(self.model.row_count());

        for local in 0..self.model.row_count() {
            let mut height = 1u16;
            for (slot, col) in widths.iter_mut().zip(visible) {
                let text = self.model.cell_display(local, *col);
                let mut lines = 0u16;
                for line in text.split('\n') {
                    lines = lines.saturating_add(1);
                    slot.1 = slot.1.max(text_width(line));
                }
                height = height.max(lines);
            }
            heights.push(height);
        }

        for slot in &mut widths {
            slot.1 = slot.1.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
        }
        (widths, heights)
    }

    fn table_geometry(&self, area: Rect) -> TableGeometry {
        let visible = self.visible_columns();
        let (widths, heights) = self.page_extents(&visible);
        let inner = table_inner(screen_areas(area, self.state.filters_collapsed).table);
        TableGeometry::layout(inner, &widths, self.col_offset, &heights, self.row_offset)
    }

    fn selected_cell_truncated(&self) -> bool {
        self.selected_row < self.model.row_count()
            && self.selected_col < self.model.columns().len()
            && self.model.cell_is_truncated(self.selected_row, self.selected_col)
    }

    fn move_row(&mut self, delta: isize) {
        let rows = self.model.row_count();
        if rows == 0 {
            return;
        }
        self.selected_row = self.selected_row.saturating_add_signed(delta).min(rows - 1);
    }

    fn move_col(&mut self, delta: isize) {
        let visible = self.visible_columns();
        let Some(position) = visible.iter().position(|col| *col == self.selected_col) else {
            if let Some(first) = visible.first() {
                self.selected_col = *first;
            }
            return;
        };
        let next = position
            .saturating_add_signed(delta)
            .min(visible.len().saturating_sub(1));
        self.selected_col = visible[next];
    }

    fn turn_page(&mut self, tx: &Sender<InternalEvent>, forward: bool) {
        let moved = if forward {
            self.model.next_page()
        } else {
            self.model.prev_page()
        };
        if moved {
            self.selected_row = 0;
            self.row_offset = 0;
            self.hover = None;
        } else if forward {
            self.emit_status(tx, "already on the last page");
        } else {
            self.emit_status(tx, "already on the first page");
        }
    }

    fn cycle_page_size(&mut self, tx: &Sender<InternalEvent>, forward: bool) {
        let size = next_page_size(self.model.page().page_size(), forward);
        self.model.set_page_size(size);
        self.selected_row = 0;
        self.row_offset = 0;
        self.hover = None;
        self.emit_status(tx, format!("page size: {}", page_size_label(size)));
    }

    fn begin_filter_input(&mut self, tx: &Sender<InternalEvent>) {
        let Some(key) = self.column_key(self.selected_col) else {
            self.emit_status(tx, "nothing loaded yet");
            return;
        };
        self.input = self.draft.text(&key).to_owned();
        self.input_error = None;
        self.state
            .dispatch(ListingCommand::EditFilter(self.selected_col));
    }

    fn begin_range_input(&mut self, tx: &Sender<InternalEvent>) {
        let Some(column) = self.model.columns().get(self.selected_col) else {
            self.emit_status(tx, "nothing loaded yet");
            return;
        };
        if !column.is_range_column() {
            self.emit_status(tx, "range filters apply to count columns");
            return;
        }
        self.input = self.draft.range(&column.key).to_string();
        self.input_error = None;
        self.state
            .dispatch(ListingCommand::EditRange(self.selected_col));
    }

    fn filter_text_edited(&mut self, tx: &Sender<InternalEvent>, column: usize) {
        let Some(key) = self.column_key(column) else {
            return;
        };
        self.draft.set_text(&key, &self.input);
        self.debounce
            .schedule(tx, |token| InternalEvent::ApplyFilters { token });
    }

    fn range_text_edited(&mut self, tx: &Sender<InternalEvent>, column: usize) {
        match RangeBounds::parse(&self.input) {
            Ok(bounds) => {
                self.input_error = None;
                self.set_range(column, bounds);
                self.debounce
                    .schedule(tx, |token| InternalEvent::ApplyFilters { token });
            }
            Err(error) => self.input_error = Some(format!("{error:#}")),
        }
    }

    fn set_range(&mut self, column: usize, bounds: RangeBounds) {
        if let Some(key) = self.column_key(column) {
            self.draft.set_range(&key, bounds);
        }
    }

    /// Leaves a filter or range input, applying whatever the draft holds
    /// without waiting for the debounce window.
    fn finish_input(&mut self) {
        self.debounce.cancel();
        self.apply_filters();
        self.input.clear();
        self.input_error = None;
        self.state.dispatch(ListingCommand::ExitToBrowse);
    }

    fn clear_filters(&mut self, tx: &Sender<InternalEvent>) {
        self.draft.clear();
        self.debounce.cancel();
        self.apply_filters();
        self.emit_status(tx, "filters cleared");
    }

    fn open_column_selector(&mut self) {
        if self.model.columns().is_empty() {
            return;
        }
        self.selector = ColumnSelectorUiState {
            cursor: 0,
            pending: resolve_visibility(self.model.columns(), Some(&self.visibility)),
        };
        self.state.dispatch(ListingCommand::OpenColumnSelector);
    }

    fn set_all_pending(&mut self, visible: bool) {
        for value in self.selector.pending.values_mut() {
            *value = visible;
        }
    }

    fn toggle_pending(&mut self) {
        let Some(key) = self.column_key(self.selector.cursor) else {
            return;
        };
        let entry = self.selector.pending.entry(key).or_insert(false);
        *entry = !*entry;
    }

    fn apply_column_selection<R: ListingRuntime>(
        &mut self,
        runtime: &mut R,
        tx: &Sender<InternalEvent>,
    ) {
        if !self.selector.pending.values().any(|visible| *visible) {
            self.emit_status(tx, "keep at least one column visible");
            return;
        }
        self.visibility = std::mem::take(&mut self.selector.pending);
        self.state.dispatch(ListingCommand::ExitToBrowse);
        self.clamp_cursor();

        runtime.save_column_visibility(&self.visibility);
        self.emit_status(tx, "columns saved");
    }

    fn reset_columns<R: ListingRuntime>(&mut self, runtime: &mut R, tx: &Sender<InternalEvent>) {
        runtime.reset_column_visibility();
        self.persisted = None;
        self.visibility = default_visibility(self.model.columns());
        self.clamp_cursor();
        self.emit_status(tx, "column visibility reset");
    }

    fn export<R: ListingRuntime>(
        &mut self,
        runtime: &mut R,
        tx: &Sender<InternalEvent>,
        format: ExportFormat,
    ) {
        let table = self.model.export_table(&self.visible_columns());
        if table.rows.is_empty() {
            self.emit_status(tx, "nothing to export");
            return;
        }
        match runtime.export_table(&table, format) {
            Ok(path) => self.emit_status(
                tx,
                format!("exported {} rows to {}", table.rows.len(), path.display()),
            ),
            Err(error) => {
                self.emit_status(tx, format!("{} export failed: {error:#}", format.label()));
            }
        }
    }

    fn open_selected_link<R: ListingRuntime>(
        &mut self,
        runtime: &mut R,
        tx: &Sender<InternalEvent>,
    ) {
        if self.selected_row >= self.model.row_count()
            || self.selected_col >= self.model.columns().len()
        {
            return;
        }
        match self
            .model
            .link_at(self.selected_row, self.selected_col, LINK_LINE_HEIGHT, 0)
        {
            Some(target) => self.open_link(runtime, tx, &target.url),
            None => self.emit_status(tx, "no link in this cell"),
        }
    }

    fn open_link<R: ListingRuntime>(
        &mut self,
        runtime: &mut R,
        tx: &Sender<InternalEvent>,
        url: &str,
    ) {
        match runtime.open_url(url) {
            Ok(()) => self.emit_status(tx, format!("opened {url}")),
            Err(error) => self.emit_status(tx, format!("could not open {url}: {error:#}")),
        }
    }
}

/// Drives the listing screen until the user quits. The first reload starts
/// immediately; rows appear once the worker delivers them.
pub fn run_app<R: ListingRuntime>(screen: &mut ListingScreen, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, EnableMouseCapture)
        .context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    let (internal_tx, internal_rx) = mpsc::channel();

    screen.load_persisted_visibility(runtime, &internal_tx);
    screen.start_reload(&internal_tx);

    let mut result = Ok(());
    loop {
        process_internal_events(screen, &internal_rx);
        screen.poll_reload(&internal_tx);

        match terminal.size() {
            Ok(size) => screen.set_viewport(Rect::new(0, 0, size.width, size.height)),
            Err(error) => {
                result = Err(error).context("read terminal size");
                break;
            }
        }
        if let Err(error) = terminal.draw(|frame| render::render(frame, screen)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(EVENT_POLL).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if !has_event {
            continue;
        }
        match event::read().context("read event") {
            Ok(Event::Key(key)) => {
                if handle_key_event(screen, runtime, &internal_tx, key) {
                    break;
                }
            }
            Ok(Event::Mouse(mouse)) => handle_mouse_event(screen, runtime, &internal_tx, mouse),
            Ok(_) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(
        io::stdout(),
        terminal::LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("leave alternate screen")?;
    result
}

fn process_internal_events(screen: &mut ListingScreen, rx: &Receiver<InternalEvent>) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == screen.status_token => {
                screen.state.dispatch(ListingCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::ApplyFilters { token } if screen.debounce.is_current(token) => {
                screen.apply_filters();
            }
            InternalEvent::ApplyFilters { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn handle_key_event<R: ListingRuntime>(
    screen: &mut ListingScreen,
    runtime: &mut R,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match screen.state.mode {
        ListingMode::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?' | 'q')) {
                screen.state.dispatch(ListingCommand::ExitToBrowse);
            }
            false
        }
        ListingMode::ColumnSelector => {
            handle_column_selector_key(screen, runtime, internal_tx, key);
            false
        }
        ListingMode::FilterInput { column } => {
            handle_filter_input_key(screen, internal_tx, column, key);
            false
        }
        ListingMode::RangeInput { column } => {
            handle_range_input_key(screen, internal_tx, column, key);
            false
        }
        ListingMode::Browse => handle_browse_key(screen, runtime, internal_tx, key),
    }
}

fn handle_browse_key<R: ListingRuntime>(
    screen: &mut ListingScreen,
    runtime: &mut R,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Up | KeyCode::Char('k') => screen.move_row(-1),
        KeyCode::Down | KeyCode::Char('j') => screen.move_row(1),
        KeyCode::Left | KeyCode::Char('h') => screen.move_col(-1),
        KeyCode::Right | KeyCode::Char('l') => screen.move_col(1),
        KeyCode::Home | KeyCode::Char('g') => screen.move_row(isize::MIN),
        KeyCode::End | KeyCode::Char('G') => screen.move_row(isize::MAX),
        KeyCode::Char('/') => screen.begin_filter_input(internal_tx),
        KeyCode::Char('#') => screen.begin_range_input(internal_tx),
        KeyCode::Char('C') => screen.clear_filters(internal_tx),
        KeyCode::Char('f') => {
            screen
                .state
                .dispatch(ListingCommand::ToggleFiltersCollapsed);
        }
        KeyCode::Char('n') => screen.turn_page(internal_tx, true),
        KeyCode::Char('p') => screen.turn_page(internal_tx, false),
        KeyCode::Char('+') => screen.cycle_page_size(internal_tx, true),
        KeyCode::Char('-') => screen.cycle_page_size(internal_tx, false),
        KeyCode::Char('c') => screen.open_column_selector(),
        KeyCode::Char('R') => screen.reset_columns(runtime, internal_tx),
        KeyCode::Char('r') | KeyCode::F(5) => screen.start_reload(internal_tx),
        KeyCode::Char('e') => screen.export(runtime, internal_tx, ExportFormat::Csv),
        KeyCode::Char('E') => screen.export(runtime, internal_tx, ExportFormat::Xlsx),
        KeyCode::Char('o') | KeyCode::Enter => screen.open_selected_link(runtime, internal_tx),
        KeyCode::Char('?') => {
            screen.state.dispatch(ListingCommand::OpenHelp);
        }
        _ => {}
    }
    false
}

fn handle_filter_input_key(
    screen: &mut ListingScreen,
    internal_tx: &Sender<InternalEvent>,
    column: usize,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => screen.finish_input(),
        KeyCode::Backspace => {
            screen.input.pop();
            screen.filter_text_edited(internal_tx, column);
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            screen.input.push(ch);
            screen.filter_text_edited(internal_tx, column);
        }
        _ => {}
    }
}

fn handle_range_input_key(
    screen: &mut ListingScreen,
    internal_tx: &Sender<InternalEvent>,
    column: usize,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Enter => match RangeBounds::parse(&screen.input) {
            Ok(bounds) => {
                screen.set_range(column, bounds);
                screen.finish_input();
            }
            Err(error) => screen.emit_status(internal_tx, format!("{error:#}")),
        },
        KeyCode::Esc => screen.finish_input(),
        KeyCode::Backspace => {
            screen.input.pop();
            screen.range_text_edited(internal_tx, column);
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            screen.input.push(ch);
            screen.range_text_edited(internal_tx, column);
        }
        _ => {}
    }
}

fn handle_column_selector_key<R: ListingRuntime>(
    screen: &mut ListingScreen,
    runtime: &mut R,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let last = screen.model.columns().len().saturating_sub(1);
    match key.code {
        KeyCode::Esc => {
            screen.selector = ColumnSelectorUiState::default();
            screen.state.dispatch(ListingCommand::ExitToBrowse);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            screen.selector.cursor = screen.selector.cursor.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            screen.selector.cursor = (screen.selector.cursor + 1).min(last);
        }
        KeyCode::Char(' ') => screen.toggle_pending(),
        KeyCode::Char('a') => screen.set_all_pending(true),
        KeyCode::Char('x') => screen.set_all_pending(false),
        KeyCode::Char('d') => {
            screen.selector.pending = default_visibility(screen.model.columns());
        }
        KeyCode::Enter => screen.apply_column_selection(runtime, internal_tx),
        _ => {}
    }
}

/// Hover and click both resolve through the link resolver with one terminal
/// line per logical line.
fn handle_mouse_event<R: ListingRuntime>(
    screen: &mut ListingScreen,
    runtime: &mut R,
    internal_tx: &Sender<InternalEvent>,
    mouse: MouseEvent,
) {
    if screen.state.mode != ListingMode::Browse {
        return;
    }
    let hit = screen
        .table_geometry(screen.viewport)
        .hit(mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Moved => {
            screen.hover = hit.and_then(|(local, col, y)| {
                screen
                    .model
                    .link_at(local, col, LINK_LINE_HEIGHT, u32::from(y))
            });
        }
        MouseEventKind::Down(MouseButton::Left) => {
            let Some((local, col, y)) = hit else {
                return;
            };
            screen.selected_row = local;
            screen.selected_col = col;
            if let Some(target) = screen
                .model
                .link_at(local, col, LINK_LINE_HEIGHT, u32::from(y))
            {
                screen.open_link(runtime, internal_tx, &target.url);
            }
        }
        MouseEventKind::ScrollDown => screen.move_row(1),
        MouseEventKind::ScrollUp => screen.move_row(-1),
        _ => {}
    }
}

fn next_page_size(current: usize, forward: bool) -> usize {
    let steps = PAGE_SIZE_STEPS.len();
    let next = match PAGE_SIZE_STEPS.iter().position(|size| *size == current) {
        Some(position) if forward => (position + 1) % steps,
        Some(position) => (position + steps - 1) % steps,
        None => PAGE_SIZE_STEPS
            .iter()
            .position(|size| *size == DEFAULT_PAGE_SIZE)
            .unwrap_or(0),
    };
    PAGE_SIZE_STEPS[next]
}

fn page_size_label(size: usize) -> String {
    if size == 0 {
        "all".to_owned()
    } else {
        size.to_string()
    }
}

fn text_width(text: &str) -> u16 {
    u16::try_from(Line::from(text).width()).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests;
