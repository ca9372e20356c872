use crate::domain::{Breed, Cat, Category};
use crate::feed::FeedState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    Breeds,
    Categories,
    Feed,
    Detail,
}

impl ActivePane {
    pub fn next(self) -> Self {
        match self {
            ActivePane::Breeds => ActivePane::Categories,
            ActivePane::Categories => ActivePane::Feed,
            ActivePane::Feed => ActivePane::Detail,
            ActivePane::Detail => ActivePane::Breeds,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActivePane::Breeds => ActivePane::Detail,
            ActivePane::Categories => ActivePane::Breeds,
            ActivePane::Feed => ActivePane::Categories,
            ActivePane::Detail => ActivePane::Feed,
        }
    }
}

/// Selection and input state local to the terminal UI. Everything the
/// feed itself knows lives in [`FeedState`]; this struct only remembers
/// where the cursors are.
pub struct TuiApp {
    pub active_pane: ActivePane,
    pub breed_index: usize,
    pub category_index: usize,
    pub feed_index: usize,
    pub detail_scroll: u16,
    /// `Some` while the user is typing a breed search.
    pub search_input: Option<String>,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl TuiApp {
    pub fn new() -> Self {
        Self {
            active_pane: ActivePane::Feed,
            breed_index: 0,
            category_index: 0,
            feed_index: 0,
            detail_scroll: 0,
            search_input: None,
            should_quit: false,
            status_message: None,
        }
    }

    pub fn in_search_mode(&self) -> bool {
        self.search_input.is_some()
    }

    pub fn selected_breed<'a>(&self, state: &'a FeedState) -> Option<&'a Breed> {
        state.breeds.get(self.breed_index)
    }

    pub fn selected_category<'a>(&self, state: &'a FeedState) -> Option<&'a Category> {
        state.categories.get(self.category_index)
    }

    pub fn selected_cat<'a>(&self, state: &'a FeedState) -> Option<&'a Cat> {
        state.items.get(self.feed_index)
    }

    pub fn move_up(&mut self, state: &FeedState) {
        match self.active_pane {
            ActivePane::Breeds => self.breed_index = self.breed_index.saturating_sub(1),
            ActivePane::Categories => self.category_index = self.category_index.saturating_sub(1),
            ActivePane::Feed => {
                self.feed_index = self.feed_index.saturating_sub(1);
                self.detail_scroll = 0;
            }
            ActivePane::Detail => self.detail_scroll = self.detail_scroll.saturating_sub(1),
        }
        self.clamp_selection(state);
    }

    /// Move the cursor down. Returns true when the feed cursor lands on
    /// the last loaded item, the signal the event loop uses to request
    /// the next page.
    pub fn move_down(&mut self, state: &FeedState) -> bool {
        match self.active_pane {
            ActivePane::Breeds => {
                if self.breed_index + 1 < state.breeds.len() {
                    self.breed_index += 1;
                }
                false
            }
            ActivePane::Categories => {
                if self.category_index + 1 < state.categories.len() {
                    self.category_index += 1;
                }
                false
            }
            ActivePane::Feed => {
                if self.feed_index + 1 < state.items.len() {
                    self.feed_index += 1;
                    self.detail_scroll = 0;
                }
                !state.items.is_empty() && self.feed_index == state.items.len() - 1
            }
            ActivePane::Detail => {
                self.detail_scroll = self.detail_scroll.saturating_add(1);
                false
            }
        }
    }

    /// Keep cursors inside the lists after the state shrinks (filter
    /// change, search result replacement).
    pub fn clamp_selection(&mut self, state: &FeedState) {
        if self.breed_index >= state.breeds.len() {
            self.breed_index = state.breeds.len().saturating_sub(1);
        }
        if self.category_index >= state.categories.len() {
            self.category_index = state.categories.len().saturating_sub(1);
        }
        if self.feed_index >= state.items.len() {
            self.feed_index = state.items.len().saturating_sub(1);
        }
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }
}

impl Default for TuiApp {
    fn default() -> Self {
        Self::new()
    }
}
