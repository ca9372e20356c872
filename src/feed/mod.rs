//! The feed state machine: owns the UI state, drives paging, merges
//! results, resets on filter changes and debounces breed searches.

pub mod controller;
pub mod state;

pub use controller::FeedController;
pub use state::{FeedEvent, FeedState, ImageSize, LoadPhase};
