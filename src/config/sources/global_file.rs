//! Global config file source (`$XDG_CONFIG_HOME/ogsbot/config.toml`).

use crate::config::xdg;
use config::builder::DefaultState;
use config::{ConfigBuilder, File, FileFormat};

/// Add the global config file if the config home can be resolved.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    match xdg::global_config_path() {
        Ok(path) => builder.add_source(
            File::from(path)
                .format(FileFormat::Toml)
                .required(false),
        ),
        Err(e) => {
            tracing::debug!(error = %e, "Skipping global config file");
            builder
        }
    }
}
