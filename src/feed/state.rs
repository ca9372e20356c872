use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::domain::{Breed, Cat, Category};

/// Image size preference, mapped onto the remote `size` parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl ImageSize {
    pub fn api_value(self) -> &'static str {
        match self {
            ImageSize::Small => "small",
            ImageSize::Medium => "med",
            ImageSize::Large => "full",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ImageSize::Small => "Small",
            ImageSize::Medium => "Medium",
            ImageSize::Large => "Large",
        }
    }

    pub fn next(self) -> Self {
        match self {
            ImageSize::Small => ImageSize::Medium,
            ImageSize::Medium => ImageSize::Large,
            ImageSize::Large => ImageSize::Small,
        }
    }
}

/// Where the feed currently is in its load cycle.
///
/// A single tagged value instead of independent `is_loading` /
/// `is_loading_more` flags, so "both loading at once" cannot be
/// represented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPhase {
    #[default]
    Idle,
    LoadingInitial,
    LoadingMore,
    Ready,
    Failed,
}

impl LoadPhase {
    pub fn is_loading(self) -> bool {
        matches!(self, LoadPhase::LoadingInitial | LoadPhase::LoadingMore)
    }

    pub fn is_loading_initial(self) -> bool {
        self == LoadPhase::LoadingInitial
    }

    pub fn is_loading_more(self) -> bool {
        self == LoadPhase::LoadingMore
    }
}

/// Typed events accepted by the controller.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    LoadRandomCats,
    LoadMoreCats,
    Refresh,
    SearchBreeds(String),
    SelectBreed(Option<Breed>),
    SelectCategory(Option<Category>),
    ToggleFavorite(String),
    ChangeImageSize(ImageSize),
    ToggleShowOnlyWithBreeds(bool),
    ClearError,
    LoadBreeds,
    LoadCategories,
}

/// The aggregate the controller owns. Observers receive clones of this
/// through a watch channel; nobody else mutates it.
#[derive(Debug, Clone)]
pub struct FeedState {
    /// Concatenation of all successful page fetches since the last
    /// reset, in fetch order.
    pub items: Vec<Cat>,
    pub phase: LoadPhase,
    pub error_message: Option<String>,

    // Pagination
    pub has_more_data: bool,
    pub current_page: u32,

    // Filtering and search
    pub breeds: Vec<Breed>,
    pub categories: Vec<Category>,
    pub selected_breed: Option<Breed>,
    pub selected_category: Option<Category>,
    pub search_query: String,
    pub is_searching: bool,

    // Display preferences
    pub image_size: ImageSize,
    pub show_only_with_breeds: bool,

    // Mirrored from the favorites store, never written directly
    pub favorite_ids: HashSet<String>,

    // Informational only, not used for control flow
    pub total_cats_loaded: usize,
    pub last_refresh_time: Option<DateTime<Utc>>,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            phase: LoadPhase::Idle,
            error_message: None,
            has_more_data: true,
            current_page: 0,
            breeds: Vec::new(),
            categories: Vec::new(),
            selected_breed: None,
            selected_category: None,
            search_query: String::new(),
            is_searching: false,
            image_size: ImageSize::default(),
            show_only_with_breeds: false,
            favorite_ids: HashSet::new(),
            total_cats_loaded: 0,
            last_refresh_time: None,
        }
    }
}

impl FeedState {
    /// Any filter that changes which cats the remote search returns.
    pub fn has_active_filters(&self) -> bool {
        self.selected_breed.is_some()
            || self.selected_category.is_some()
            || self.show_only_with_breeds
    }

    pub fn is_favorite(&self, cat_id: &str) -> bool {
        self.favorite_ids.contains(cat_id)
    }

    /// One-line description of the active filters for the status bar.
    pub fn filter_summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(breed) = &self.selected_breed {
            parts.push(format!("Breed: {}", breed.name));
        }
        if let Some(category) = &self.selected_category {
            parts.push(format!("Category: {}", category.name));
        }
        if self.show_only_with_breeds {
            parts.push("With descriptions".to_string());
        }
        parts.push(format!("Size: {}", self.image_size.display_name()));
        parts.join(" • ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = FeedState::default();
        assert!(state.items.is_empty());
        assert_eq!(state.phase, LoadPhase::Idle);
        assert!(state.has_more_data);
        assert_eq!(state.current_page, 0);
        assert_eq!(state.image_size, ImageSize::Medium);
        assert!(!state.has_active_filters());
    }

    #[test]
    fn test_image_size_wire_values() {
        assert_eq!(ImageSize::Small.api_value(), "small");
        assert_eq!(ImageSize::Medium.api_value(), "med");
        assert_eq!(ImageSize::Large.api_value(), "full");
    }

    #[test]
    fn test_image_size_cycles() {
        assert_eq!(ImageSize::Small.next(), ImageSize::Medium);
        assert_eq!(ImageSize::Medium.next(), ImageSize::Large);
        assert_eq!(ImageSize::Large.next(), ImageSize::Small);
    }

    #[test]
    fn test_load_phase_predicates() {
        assert!(LoadPhase::LoadingInitial.is_loading());
        assert!(LoadPhase::LoadingMore.is_loading());
        assert!(!LoadPhase::Ready.is_loading());
        assert!(!LoadPhase::Failed.is_loading());
        assert!(LoadPhase::LoadingMore.is_loading_more());
        assert!(!LoadPhase::LoadingInitial.is_loading_more());
    }

    #[test]
    fn test_active_filters() {
        let mut state = FeedState::default();
        state.show_only_with_breeds = true;
        assert!(state.has_active_filters());

        let mut state = FeedState::default();
        state.selected_breed = Some(Breed::named("siam", "Siamese"));
        assert!(state.has_active_filters());
    }

    #[test]
    fn test_filter_summary() {
        let mut state = FeedState::default();
        assert_eq!(state.filter_summary(), "Size: Medium");

        state.selected_breed = Some(Breed::named("siam", "Siamese"));
        state.show_only_with_breeds = true;
        assert_eq!(
            state.filter_summary(),
            "Breed: Siamese • With descriptions • Size: Medium"
        );
    }
}
