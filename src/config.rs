use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::asset::AssetId;

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read { path: String, source: std::io::Error },

    /// The config file is not valid JSON for `LibraryConfig`
    #[error("Failed to parse config file {path}: {source}")]
    Parse { path: String, source: serde_json::Error },
}

/// Settings for a library session
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LibraryConfig {
    /// First id handed out to a library asset
    pub first_asset_id: AssetId,
    /// Whether the catalog starts with the demo books
    pub seed_demo_books: bool,
    /// Number of copies stocked for each demo book, zero to skip seeding
    pub demo_copies: u32,
}

impl LibraryConfig {
    /// Default starting point for library asset ids
    pub const DEFAULT_FIRST_ASSET_ID: AssetId = 100;
    /// Default number of copies for each demo book
    pub const DEFAULT_DEMO_COPIES: u32 = 5;

    /// Load a config from a JSON file. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or parsed
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;
        Self::from_json_str(&contents)
            .map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })
    }

    /// Parse a config from JSON text
    ///
    /// # Errors
    ///
    /// Returns the parser error if the text is not a valid config
    pub fn from_json_str(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            first_asset_id: Self::DEFAULT_FIRST_ASSET_ID,
            seed_demo_books: true,
            demo_copies: Self::DEFAULT_DEMO_COPIES,
        }
    }
}
