//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use trackr_core::DEFAULT_CELL_WIDTH;

/// Narrowest cell that still fits a `100%` cell.
pub const MIN_CELL_WIDTH: usize = 4;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the interval log, current task and task list.
    pub data_dir: PathBuf,

    /// Width of one report table cell, in characters.
    pub cell_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: dirs_data_path().unwrap_or_else(|| PathBuf::from("trackr")),
            cell_width: DEFAULT_CELL_WIDTH,
        }
    }
}

impl Config {
    /// Loads configuration from default locations, optionally merging a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // TRACKR_DATA_DIR, TRACKR_CELL_WIDTH
        figment = figment.merge(Env::prefixed("TRACKR_"));

        let config: Self = figment.extract()?;
        if config.cell_width < MIN_CELL_WIDTH {
            return Err(figment::Error::from(format!(
                "cell_width must be at least {MIN_CELL_WIDTH}, got {}",
                config.cell_width
            )));
        }
        Ok(config)
    }
}

/// Returns the platform-specific config directory for trackr.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("trackr"))
}

/// Returns the platform-specific data directory for trackr.
///
/// On Linux: `~/.local/share/trackr`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("trackr"))
}
