//! # Farmstead Configuration
//!
//! Strongly-typed settings for every crate in the workspace, plus the one-time
//! tracing setup shared by the binaries.
//!
//! Settings are layered: built-in defaults, then an optional `config.toml` in the
//! working directory, then `FARMSTEAD__<SECTION>__<KEY>` environment variables.

use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    BaselineSettings, DatabaseSettings, LoggingSettings, MAX_HORIZON_MONTHS, ProjectionSettings,
    ServerOverrides, ServerSettings, Settings,
};

/// The file `load_config` looks for in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Loads the application configuration from `config.toml` and the environment.
///
/// A missing file is not an error; every section falls back to its defaults.
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from(Path::new(DEFAULT_CONFIG_FILE))
}

/// Loads the application configuration from an explicit file path.
pub fn load_config_from(path: &Path) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("FARMSTEAD")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}
