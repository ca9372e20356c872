use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

use crate::app::Result;

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
}

pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    pub fn next(&self) -> Result<AppEvent> {
        if event::poll(self.tick_rate)? {
            if let Event::Key(key) = event::read()? {
                return Ok(AppEvent::Key(key));
            }
        }
        Ok(AppEvent::Tick)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    NextPane,
    PrevPane,
    Select,
    ToggleFavorite,
    Refresh,
    LoadMore,
    CycleSize,
    ToggleBreedInfo,
    StartSearch,
    ClearFilters,
    OpenInBrowser,
    DismissError,
    None,
}

impl From<KeyEvent> for Action {
    fn from(key: KeyEvent) -> Self {
        match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
            KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
            KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
            KeyCode::Tab => Action::NextPane,
            KeyCode::BackTab => Action::PrevPane,
            KeyCode::Enter => Action::Select,
            KeyCode::Char('f') => Action::ToggleFavorite,
            KeyCode::Char('R') => Action::Refresh,
            KeyCode::Char('n') | KeyCode::PageDown => Action::LoadMore,
            KeyCode::Char('s') => Action::CycleSize,
            KeyCode::Char('b') => Action::ToggleBreedInfo,
            KeyCode::Char('/') => Action::StartSearch,
            KeyCode::Char('c') => Action::ClearFilters,
            KeyCode::Char('o') => Action::OpenInBrowser,
            KeyCode::Esc => Action::DismissError,
            _ => Action::None,
        }
    }
}
