use std::path::PathBuf;
use std::sync::Arc;

use crate::api::{CatService, HttpCatService};
use crate::app::error::{Result, WhiskerError};
use crate::config::Config;
use crate::favorites::{FavoritesStore, SqliteFavorites};

/// Wires the remote service and the local favorites store together for
/// the CLI commands and the TUI.
pub struct AppContext {
    pub service: Arc<dyn CatService>,
    pub favorites: Arc<dyn FavoritesStore>,
    pub config: Config,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let db_path = Self::default_db_path()?;
        Self::with_db_path(config, db_path)
    }

    pub fn with_db_path(config: Config, db_path: PathBuf) -> Result<Self> {
        let service: Arc<dyn CatService> = Arc::new(HttpCatService::new(&config.api)?);
        let favorites: Arc<dyn FavoritesStore> = Arc::new(SqliteFavorites::new(&db_path)?);
        Ok(Self {
            service,
            favorites,
            config,
        })
    }

    /// Context with a throwaway favorites set, used in tests.
    pub fn in_memory(config: Config) -> Result<Self> {
        let service: Arc<dyn CatService> = Arc::new(HttpCatService::new(&config.api)?);
        let favorites: Arc<dyn FavoritesStore> = Arc::new(SqliteFavorites::in_memory()?);
        Ok(Self {
            service,
            favorites,
            config,
        })
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| WhiskerError::Config("Could not find data directory".into()))?;
        let whisker_dir = data_dir.join("whisker");
        std::fs::create_dir_all(&whisker_dir)?;
        Ok(whisker_dir.join("favorites.db"))
    }
}
