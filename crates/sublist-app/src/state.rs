// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingMode {
    Browse,
    FilterInput { column: usize },
    RangeInput { column: usize },
    ColumnSelector,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready { rows: usize },
    Failed(String),
}

impl LoadState {
    pub fn label(&self) -> String {
        match self {
            Self::Idle => String::new(),
            Self::Loading => "loading...".to_owned(),
            Self::Ready { rows } => format!("loaded {rows} rows"),
            Self::Failed(message) => format!("load failed: {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingState {
    pub mode: ListingMode,
    pub load: LoadState,
    pub filters_collapsed: bool,
    pub status_line: Option<String>,
}

impl Default for ListingState {
    fn default() -> Self {
        Self {
            mode: ListingMode::Browse,
            load: LoadState::Idle,
            filters_collapsed: false,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingCommand {
    EditFilter(usize),
    EditRange(usize),
    OpenColumnSelector,
    OpenHelp,
    ExitToBrowse,
    ToggleFiltersCollapsed,
    ReloadStarted,
    ReloadFinished { rows: usize },
    ReloadFailed(String),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingEvent {
    ModeChanged(ListingMode),
    LoadChanged(LoadState),
    FiltersCollapsedChanged(bool),
    StatusUpdated(String),
    StatusCleared,
}

impl ListingState {
    pub fn dispatch(&mut self, command: ListingCommand) -> Vec<ListingEvent> {
        match command {
            ListingCommand::EditFilter(column) => {
                self.set_mode(ListingMode::FilterInput { column })
            }
            ListingCommand::EditRange(column) => self.set_mode(ListingMode::RangeInput { column }),
            ListingCommand::OpenColumnSelector => self.set_mode(ListingMode::ColumnSelector),
            ListingCommand::OpenHelp => self.set_mode(ListingMode::Help),
            ListingCommand::ExitToBrowse => self.set_mode(ListingMode::Browse),
            ListingCommand::ToggleFiltersCollapsed => {
                self.filters_collapsed = !self.filters_collapsed;
                vec![ListingEvent::FiltersCollapsedChanged(
                    self.filters_collapsed,
                )]
            }
            ListingCommand::ReloadStarted => {
                self.load = LoadState::Loading;
                vec![ListingEvent::LoadChanged(self.load.clone())]
            }
            ListingCommand::ReloadFinished { rows } => {
                self.load = LoadState::Ready { rows };
                vec![ListingEvent::LoadChanged(self.load.clone())]
            }
            ListingCommand::ReloadFailed(message) => {
                self.load = LoadState::Failed(message.clone());
                vec![
                    ListingEvent::LoadChanged(self.load.clone()),
                    self.set_status(format!("load failed: {message}")),
                ]
            }
            ListingCommand::SetStatus(message) => vec![self.set_status(message)],
            ListingCommand::ClearStatus => {
                self.status_line = None;
                vec![ListingEvent::StatusCleared]
            }
        }
    }

    pub fn is_editing_text(&self) -> bool {
        matches!(
            self.mode,
            ListingMode::FilterInput { .. } | ListingMode::RangeInput { .. }
        )
    }

    fn set_mode(&mut self, mode: ListingMode) -> Vec<ListingEvent> {
        self.mode = mode;
        vec![ListingEvent::ModeChanged(mode)]
    }

    fn set_status(&mut self, message: String) -> ListingEvent {
        self.status_line = Some(message.clone());
        ListingEvent::StatusUpdated(message)
    }
}
