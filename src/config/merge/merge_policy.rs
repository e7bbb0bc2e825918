//! Built-in defaults as the lowest-precedence layer.

use crate::config::BotConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Start a builder seeded with `BotConfig::default()`.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = Config::try_from(&BotConfig::default())?;
    Ok(Config::builder().add_source(defaults))
}
