//! Configuration file loading for ensemble
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `ENSEMBLE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./ensemble.toml` or `./.ensemble.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/ensemble/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileBestOfNConfig, FileConfig, FileDebateConfig, FileLoggingConfig,
    FileProviderConfig, FileProvidersConfig, FileSelectionConfig, FileTiersConfig,
};
pub use loader::ConfigLoader;
