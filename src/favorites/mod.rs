pub mod sqlite;

use std::collections::HashSet;

use tokio::sync::watch;

use crate::app::Result;

pub use sqlite::SqliteFavorites;

/// Durable set of favorited cat ids.
///
/// One writer path (`toggle`), arbitrarily many readers through the watch
/// stream. The feed controller mirrors the stream into its own state and
/// never writes the set directly.
pub trait FavoritesStore: Send + Sync {
    /// Subscribe to the favorite set. The receiver immediately holds the
    /// current set and is notified after every toggle.
    fn observe(&self) -> watch::Receiver<HashSet<String>>;

    /// Add the id if absent, remove it if present.
    fn toggle(&self, cat_id: &str) -> Result<()>;

    /// Read the current set from the store.
    fn favorites(&self) -> Result<HashSet<String>>;
}
