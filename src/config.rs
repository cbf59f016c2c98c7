//! Layered application configuration.
//!
//! Settings are resolved in this order, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config FILE`, or `config.toml` in the platform config dir)
//! 3. `DUPEWISE_*` environment variables
//! 4. Command-line flags (applied by the caller)
//!
//! ```toml
//! min_size = 4096
//! extensions = [".jpg", ".png"]
//! max_depth = 16
//! io_threads = 2
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::scanner::{WalkerConfig, DEFAULT_MAX_DEPTH, DEFAULT_MIN_SIZE};

/// Prefix of environment variables read into the configuration.
pub const ENV_PREFIX: &str = "DUPEWISE_";

/// Scan settings shared by the config file, environment and CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Minimum file size in bytes
    pub min_size: u64,
    /// Maximum file size in bytes
    pub max_size: Option<u64>,
    /// Extension allow-list; empty accepts every extension
    pub extensions: Vec<String>,
    /// Maximum recursion depth below the root
    pub max_depth: usize,
    /// Follow symbolic links while walking
    pub follow_symlinks: bool,
    /// Hashing threads
    pub io_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            max_size: None,
            extensions: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            follow_symlinks: false,
            io_threads: 4,
        }
    }
}

impl Config {
    /// Platform-specific location of the default config file.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "dupewise", "dupewise")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Build the provider chain without extracting it.
    ///
    /// A missing file is not an error; figment simply contributes nothing
    /// for it.
    #[must_use]
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        match config_file.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => {
                log::debug!("Reading configuration from {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
            None => log::debug!("No configuration directory available"),
        }

        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load defaults, file and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or an environment variable holds a value
    /// of the wrong type.
    pub fn load(config_file: Option<&Path>) -> Result<Self, Box<figment::Error>> {
        Self::figment(config_file).extract().map_err(Box::new)
    }

    /// Walker settings derived from this configuration.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::default()
            .with_min_size(self.min_size)
            .with_max_size(self.max_size)
            .with_extensions(&self.extensions)
            .with_max_depth(self.max_depth)
            .with_follow_symlinks(self.follow_symlinks)
    }
}
