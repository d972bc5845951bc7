//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading rate tables
//! from YAML files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};

use super::registry::RateTableRegistry;
use super::types::RateTableDefinition;
use super::RateTable;

/// Loads rate tables from a configuration directory.
///
/// # Directory Structure
///
/// Every `.yaml` file in the directory is one rate table:
/// ```text
/// config/rates/
/// ├── ng-2026.yaml
/// └── uk-2024-25.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use tax_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/rates").unwrap();
/// let table = loader.registry().get("UK", "2024-25").unwrap();
/// println!("Loaded {} ({})", table.id(), table.currency());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    source: PathBuf,
    registry: RateTableRegistry,
}

impl ConfigLoader {
    /// Loads every rate table in the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The directory is missing or holds no `.yaml` files
    /// - Any file contains invalid YAML or is missing a required field
    /// - Any table fails validation
    /// - Two files define the same jurisdiction and tax year
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let dir = path.as_ref();
        let dir_str = dir.display().to_string();

        if !dir.is_dir() {
            return Err(EngineError::ConfigNotFound { path: dir_str });
        }

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml" || ext == "yml") {
                files.push(path);
            }
        }
        // Directory order is platform dependent.
        files.sort();

        if files.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no rate table files found)", dir_str),
            });
        }

        let mut registry = RateTableRegistry::new();
        for file in &files {
            let table = Self::load_table(file)?;
            debug!(table = %table.id(), file = %file.display(), "Loaded rate table");
            registry.insert(table)?;
        }

        info!(
            directory = %dir_str,
            tables = registry.len(),
            "Rate tables loaded"
        );

        Ok(Self {
            source: dir.to_path_buf(),
            registry,
        })
    }

    /// Loads and validates a single rate table file.
    pub fn load_table(path: &Path) -> EngineResult<RateTable> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse_table(&content, &path_str)
    }

    /// Parses and validates a rate table from YAML text.
    ///
    /// `origin` names the source in parse errors.
    pub fn parse_table(yaml: &str, origin: &str) -> EngineResult<RateTable> {
        let definition: RateTableDefinition =
            serde_yaml::from_str(yaml).map_err(|e| EngineError::ConfigParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        RateTable::new(definition)
    }

    /// Returns the directory the tables were loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Returns the loaded tables.
    pub fn registry(&self) -> &RateTableRegistry {
        &self.registry
    }

    /// Consumes the loader, returning the loaded tables.
    pub fn into_registry(self) -> RateTableRegistry {
        self.registry
    }
}
