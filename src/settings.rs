//! Authentication and logging settings for the bot.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use simplelog::LevelFilter;
use tokio::fs;
use twilight_model::id::marker::GuildMarker;
use twilight_model::id::Id;

/// Main structure that holds all the settings of this bot.
#[derive(Deserialize)]
pub struct Settings {
    /// Logger specific configuration.
    pub logging: Logging,
    /// Discord related settings.
    pub discord: Discord,
}

/// All configuration for the logging of the bot, including different logging backends like a file
/// or the terminal.
#[derive(Deserialize)]
pub struct Logging {
    /// Logging settings for the terminal backend.
    pub terminal: Option<BaseLogger>,
    /// File backend settings.
    pub file: Option<FileLogger>,
}

/// The base logger describes the very basic settings that apply to each logging backend.
#[derive(Deserialize)]
pub struct BaseLogger {
    /// Maximum logging level that the backend outputs.
    #[serde(with = "SerdeLevelFilter")]
    pub filter: LevelFilter,
}

/// Logging configuration specific to file backends.
#[derive(Deserialize)]
pub struct FileLogger {
    /// base logging backend configuration.
    #[serde(flatten)]
    pub base: BaseLogger,
    /// Location of the file to write logs to.
    pub path: PathBuf,
}

/// Configuration for the Discord API and the registration targets within the guild.
#[derive(Deserialize)]
pub struct Discord {
    /// A token to authenticate against the Discord API as a bot.
    pub token: String,
    /// Identifier of the one guild the bot operates in.
    pub guild_id: String,
    /// Name of the channel whose messages are treated as registration requests.
    pub rsn_channel: String,
    /// Name of the role granted to everyone who registers a name.
    pub role_to_apply: String,
}

impl Discord {
    /// Parse the configured guild identifier into a typed id.
    pub fn target_guild(&self) -> Result<Id<GuildMarker>> {
        let raw = self
            .guild_id
            .parse::<u64>()
            .with_context(|| format!("guild id '{}' is not an integer", self.guild_id))?;

        Id::new_checked(raw).context("guild id must be non-zero")
    }
}

/// A wrapper for the [LevelFilter] that allows to use it in [serde], as it doesn't provide support
/// for it out of the box.
#[derive(Deserialize)]
#[serde(remote = "LevelFilter", rename_all = "lowercase")]
enum SerdeLevelFilter {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// An intermediate structure for the authentication related settings that allows to parse them
/// separately and merge them into a single [Settings] structure later.
#[derive(Deserialize)]
struct Auth {
    discord: Discord,
}

impl Settings {
    /// Create a new instance of the settings and fill it with the configuration from the
    /// `config/log.toml` and `config/auth.toml` files. All auth related settings are overwritten
    /// by env vars if they exist.
    pub async fn new() -> Result<Self> {
        let logging = load_toml("config/log.toml").await?;
        let Auth { mut discord } = load_toml("config/auth.toml").await?;

        if let Ok(token) = env::var("DISCORD_TOKEN") {
            discord.token = token;
        }

        if let Ok(guild_id) = env::var("GUILD_ID") {
            discord.guild_id = guild_id;
        }

        if let Ok(rsn_channel) = env::var("RSN_CHANNEL_NAME") {
            discord.rsn_channel = rsn_channel;
        }

        if let Ok(role_to_apply) = env::var("ROLE_NAME_TO_APPLY") {
            discord.role_to_apply = role_to_apply;
        }

        Ok(Self { logging, discord })
    }
}

/// Load any deserializable structure from the given file path as TOML and provide helpful error
/// messages in case something goes wrong during the process.
async fn load_toml<T>(path: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let content = fs::read(path)
        .await
        .with_context(|| format!("failed loading config file at '{}'", path))?;

    toml::from_slice(&content).with_context(|| format!("failed to parse TOML config from '{}'", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_logging_section() {
        let logging: Logging = toml::from_str(
            r#"
            [terminal]
            filter = "debug"

            [file]
            filter = "info"
            path = "rsn_bot.log"
            "#,
        )
        .unwrap();

        assert_eq!(LevelFilter::Debug, logging.terminal.unwrap().filter);

        let file = logging.file.unwrap();
        assert_eq!(LevelFilter::Info, file.base.filter);
        assert_eq!(PathBuf::from("rsn_bot.log"), file.path);
    }

    #[test]
    fn parse_guild_id() {
        let discord = Discord {
            token: String::new(),
            guild_id: "123456789".to_owned(),
            rsn_channel: String::new(),
            role_to_apply: String::new(),
        };

        assert_eq!(Id::new(123_456_789), discord.target_guild().unwrap());
    }

    #[test]
    fn reject_bad_guild_id() {
        let discord = Discord {
            token: String::new(),
            guild_id: "not-a-number".to_owned(),
            rsn_channel: String::new(),
            role_to_apply: String::new(),
        };

        assert!(discord.target_guild().is_err());
    }
}
