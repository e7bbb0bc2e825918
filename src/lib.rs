//! ogsbot: bootstrap and launch a KataGo bot on the Online Go Server
//!
//! Prepares a workspace with everything the bot needs (shared libraries, the
//! KataGo engine and network, the gtp2ogs bridge, a patched engine config and a
//! bot-policy file) and then runs the bridge in the foreground, optionally with a
//! CPU monitor alongside it.

pub mod config;
pub mod engine_config;
pub mod error;
pub mod fetch;
pub mod install;
pub mod integrity;
pub mod launch;
pub mod logging;
pub mod monitor;
pub mod policy;
pub mod tooling;
pub mod workflow;

pub use config::{BotConfig, ConfigLoader, InstallLayout};
pub use error::SetupError;
pub use workflow::Workflow;
