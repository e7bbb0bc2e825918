//! Environment variable source: OGSBOT_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

/// Add environment variable overlay to builder.
///
/// `OGSBOT_LAUNCH__API_KEY` sets `launch.api_key`, `OGSBOT_MONITOR__ENABLED` sets
/// `monitor.enabled`, and so on.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("OGSBOT")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    )
}
