//! Grid configuration.
//!
//! Three persistent scalars drive every invocation: the UV channel to
//! operate on and the grid's column and row counts. They are read from a TOML
//! file (missing keys take their defaults) and passed explicitly to the
//! operators.
//!
//! ```toml
//! uv_channel = "ch3"
//! grid_columns = 4
//! grid_rows = 2
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algo::grid::Grid;
use crate::error::{SnapError, SnapResult};

/// Errors raised while reading or writing a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("failed to access config {path}: {source}")]
    Io {
        /// The file path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`GridConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The values parsed but are out of range.
    #[error(transparent)]
    Invalid(#[from] SnapError),
}

/// Default UV channel name.
pub const DEFAULT_UV_CHANNEL: &str = "ch3";
/// Default number of grid columns.
pub const DEFAULT_COLUMNS: u32 = 4;
/// Default number of grid rows.
pub const DEFAULT_ROWS: u32 = 2;

/// Grid configuration shared by the snap and offset operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Name of the UV channel to move.
    pub uv_channel: String,
    /// Number of grid columns, at least 1.
    pub grid_columns: u32,
    /// Number of grid rows, at least 1.
    pub grid_rows: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            uv_channel: DEFAULT_UV_CHANNEL.to_string(),
            grid_columns: DEFAULT_COLUMNS,
            grid_rows: DEFAULT_ROWS,
        }
    }
}

impl GridConfig {
    /// Set the UV channel name.
    pub fn with_uv_channel(mut self, channel: impl Into<String>) -> Self {
        self.uv_channel = channel.into();
        self
    }

    /// Set the grid dimensions.
    pub fn with_grid(mut self, columns: u32, rows: u32) -> Self {
        self.grid_columns = columns;
        self.grid_rows = rows;
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> SnapResult<()> {
        if self.uv_channel.trim().is_empty() {
            return Err(SnapError::invalid_param(
                "uv_channel",
                &self.uv_channel,
                "must not be empty",
            ));
        }
        self.grid().map(|_| ())
    }

    /// The grid described by this configuration.
    pub fn grid(&self) -> SnapResult<Grid> {
        Grid::new(self.grid_columns, self.grid_rows)
    }

    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GridConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML text.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Load and validate a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Write the configuration to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        fs::write(path, self.to_toml_string()?).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
