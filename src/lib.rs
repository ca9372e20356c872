//! # Whisker
//!
//! A terminal browser for a cat image API: a paginated, filterable feed
//! with local favorite-marking.
//!
//! ## Architecture
//!
//! ```text
//! Event → FeedController → Query layer → CatService → FeedState → UI
//! ```
//!
//! - [`api`]: HTTP client for the remote cat API
//! - [`query`]: parameter validation, clamping and client-side filtering
//! - [`feed`]: the state machine driving pagination, filters and search
//! - [`favorites`]: persistent favorite set with a live change stream
//! - [`tui`]: terminal user interface built with ratatui
//!
//! ## Quick Start
//!
//! ```bash
//! # Ten random cats
//! whisker random
//!
//! # Search breeds
//! whisker breeds --search siamese
//!
//! # Mark a favorite
//! whisker favorites --toggle MTY3ODIyMQ
//!
//! # Launch the TUI
//! whisker tui
//! ```
//!
//! ## Modules
//!
//! - [`app`]: application context and error types
//! - [`cli`]: command-line interface definitions
//! - [`config`]: configuration file handling
//! - [`domain`]: core domain models (Cat, Breed, Category)

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) wires together the remote service and
/// the favorites store; [`WhiskerError`](app::WhiskerError) is the
/// crate-wide error taxonomy.
pub mod app;

/// Remote cat image API.
///
/// - [`CatService`](api::CatService): async trait over the endpoints
/// - [`HttpCatService`](api::HttpCatService): reqwest-based implementation
pub mod api;

/// Command-line interface using clap.
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/whisker/config.toml`: API base URL, key and
/// timeout.
pub mod config;

/// Core domain models.
///
/// - [`Cat`](domain::Cat): one image record
/// - [`Breed`](domain::Breed): breed metadata with ~25 optional attributes
/// - [`Category`](domain::Category): image category
pub mod domain;

/// Persistent favorites.
///
/// - [`FavoritesStore`](favorites::FavoritesStore): trait with an
///   observable change stream
/// - [`SqliteFavorites`](favorites::SqliteFavorites): SQLite implementation
pub mod favorites;

/// The feed state machine.
///
/// [`FeedController`](feed::FeedController) owns [`FeedState`](feed::FeedState),
/// accepts typed [`FeedEvent`](feed::FeedEvent)s and publishes snapshots
/// through a watch channel. Handles pagination, filter resets and the
/// debounced breed search.
pub mod feed;

/// Query building and post-fetch filtering.
///
/// Use cases that sanitize parameters (limit clamping, page flooring,
/// blank-id rejection) and apply the client-side filters and rankings.
pub mod query;

/// Terminal user interface.
///
/// Four-pane layout built with ratatui: breeds and categories on the
/// left, the cat feed and a detail view on the right. Keybindings:
/// j/k navigate, Tab cycles panes, Enter applies a filter, f toggles
/// favorite, / searches breeds, R refreshes, q quits.
pub mod tui;
