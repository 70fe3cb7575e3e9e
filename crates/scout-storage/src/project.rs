//! Project directory: schema JSON, store file and settings kept in step.
//!
//! Layout:
//! ```text
//! <dir>/game_config.json   schema model
//! <dir>/scout.db           SQLite store
//! <dir>/scout.toml         settings (optional on open)
//! ```

use std::path::{Path, PathBuf};

use tracing::info;

use scout_core::constants::{DATABASE_FILE, GAME_CONFIG_FILE, SETTINGS_FILE};
use scout_core::{GameConfig, ScoutConfig, StoreError, StoreResult};

use crate::connection::Database;
use crate::gateway::QueryGateway;
use crate::sync::{create_database, SchemaSynchronizer, SyncReport};

pub struct ScoutProject {
    dir: PathBuf,
    schema: GameConfig,
    settings: ScoutConfig,
    db: Database,
}

impl ScoutProject {
    /// Bootstrap a new project directory. Fails if a schema or store is
    /// already present.
    pub fn create(dir: impl Into<PathBuf>, schema: GameConfig, settings: ScoutConfig) -> StoreResult<Self> {
        let dir = dir.into();
        schema.validate()?;

        let schema_path = dir.join(GAME_CONFIG_FILE);
        if schema_path.exists() {
            return Err(StoreError::AlreadyExists(schema_path));
        }
        std::fs::create_dir_all(&dir)?;

        let db = Database::open(dir.join(DATABASE_FILE), settings.storage.clone());
        create_database(&db, &schema)?;
        schema.save(&schema_path)?;
        settings.save(&dir.join(SETTINGS_FILE))?;

        info!(dir = %dir.display(), fields = schema.field_count(), "Project created");
        Ok(Self {
            dir,
            schema,
            settings,
            db,
        })
    }

    /// Open an existing project. A missing `scout.toml` means defaults.
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        let schema_path = dir.join(GAME_CONFIG_FILE);
        let db_path = dir.join(DATABASE_FILE);
        if !schema_path.exists() || !db_path.exists() {
            return Err(StoreError::NotInitialized(dir));
        }

        let settings = ScoutConfig::load(&dir.join(SETTINGS_FILE))?;
        let schema = GameConfig::load(&schema_path)?;
        let db = Database::open(db_path, settings.storage.clone());

        info!(dir = %dir.display(), fields = schema.field_count(), "Project opened");
        Ok(Self {
            dir,
            schema,
            settings,
            db,
        })
    }

    /// Migrate the store to `schema`, then persist it as the project schema.
    /// On a failed migration neither the store nor the JSON changes.
    pub fn update_schema(&mut self, schema: GameConfig) -> StoreResult<SyncReport> {
        let report = SchemaSynchronizer::new(&self.db).synchronize(&schema)?;
        schema.save(&self.dir.join(GAME_CONFIG_FILE))?;
        self.schema = schema;
        Ok(report)
    }

    pub fn gateway(&self) -> QueryGateway<'_> {
        QueryGateway::new(&self.db, &self.schema)
    }

    pub fn schema(&self) -> &GameConfig {
        &self.schema
    }

    pub fn settings(&self) -> &ScoutConfig {
        &self.settings
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn shutdown(&self) {
        self.db.shutdown();
    }
}
