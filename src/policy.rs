//! Bot policy file for the bridge.
//!
//! The bridge reads a JSON document that decides which challenges it accepts and
//! how the bot talks in game chat. It is regenerated from config on every run.

use crate::error::SetupError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Policy settings as they appear in `ogsbot.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Players whose challenges are always declined
    #[serde(default = "default_blacklist")]
    pub blacklist: Vec<String>,

    /// Players whose challenges are always considered
    #[serde(default = "default_whitelist")]
    pub whitelist: Vec<String>,

    #[serde(default = "default_true")]
    pub allow_ranked: bool,

    #[serde(default = "default_true")]
    pub allow_unranked: bool,

    #[serde(default)]
    pub decline_new_challenges: bool,

    #[serde(default = "default_max_games")]
    pub max_games_per_player: u32,

    #[serde(default)]
    pub hidden: bool,

    #[serde(default = "default_board_sizes")]
    pub allowed_board_sizes: Vec<u32>,

    /// Free-text engine description shown to opponents
    #[serde(default = "default_engine_description")]
    pub engine: String,

    #[serde(default = "default_true")]
    pub farewellscore: bool,

    /// Share principal variations with the server
    #[serde(default = "default_true")]
    pub send_pv_data: bool,

    #[serde(default = "default_true")]
    pub send_chats: bool,
}

fn default_true() -> bool {
    true
}

fn default_blacklist() -> Vec<String> {
    ["Tilano", "ujykfyijhgf", "Benneviss", "world2049", "extoom"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_whitelist() -> Vec<String> {
    [
        "xqqzldh",
        "Golaxy 9D",
        "俱乐部AI",
        "Doudoubot",
        "Katagui40b",
        "Kata_speed",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_max_games() -> u32 {
    1
}

fn default_board_sizes() -> Vec<u32> {
    vec![9, 13, 19]
}

fn default_engine_description() -> String {
    "KataGo b18 network with usually only 7 visits, takes about 10 seconds or more per move. \
     Support us at https://changcheng967.github.io/Kata_web/ to make the play speed faster \
     and play with more people!"
        .to_string()
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            blacklist: default_blacklist(),
            whitelist: default_whitelist(),
            allow_ranked: true,
            allow_unranked: true,
            decline_new_challenges: false,
            max_games_per_player: default_max_games(),
            hidden: false,
            allowed_board_sizes: default_board_sizes(),
            engine: default_engine_description(),
            farewellscore: true,
            send_pv_data: true,
            send_chats: true,
        }
    }
}

/// Chat and analysis sharing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotMessaging {
    pub send_pv_data: bool,
    pub send_chats: bool,
}

/// The document written for the bridge. Field order is the file's key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotPolicy {
    pub blacklist: Vec<String>,
    pub whitelist: Vec<String>,
    pub allow_ranked: bool,
    pub decline_new_challenges: bool,
    pub max_games_per_player: u32,
    pub hidden: bool,
    pub allowed_board_sizes: Vec<u32>,
    pub engine: String,
    pub allow_unranked: bool,
    pub farewellscore: bool,
    pub bot: BotMessaging,
    /// Always null: correspondence games are disabled
    pub allowed_correspondence_settings: Option<serde_json::Value>,
}

impl From<&PolicyConfig> for BotPolicy {
    fn from(config: &PolicyConfig) -> Self {
        Self {
            blacklist: config.blacklist.clone(),
            whitelist: config.whitelist.clone(),
            allow_ranked: config.allow_ranked,
            decline_new_challenges: config.decline_new_challenges,
            max_games_per_player: config.max_games_per_player,
            hidden: config.hidden,
            allowed_board_sizes: config.allowed_board_sizes.clone(),
            engine: config.engine.clone(),
            allow_unranked: config.allow_unranked,
            farewellscore: config.farewellscore,
            bot: BotMessaging {
                send_pv_data: config.send_pv_data,
                send_chats: config.send_chats,
            },
            allowed_correspondence_settings: None,
        }
    }
}

impl BotPolicy {
    /// Serialize with four-space indentation; non-ASCII text is written as-is.
    pub fn to_json(&self) -> Result<String, SetupError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)
            .map_err(|e| SetupError::Config(format!("Failed to serialize bot policy: {}", e)))?;
        String::from_utf8(buf)
            .map_err(|e| SetupError::Config(format!("Bot policy is not UTF-8: {}", e)))
    }

    /// Overwrite `path` with this policy.
    pub fn write_to(&self, path: &Path) -> Result<(), SetupError> {
        std::fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), "Bot policy written");
        Ok(())
    }
}
