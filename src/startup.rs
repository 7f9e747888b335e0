//! Startup checks against the configured guild, and the context shared by the
//! event handlers afterwards.

use std::sync::Arc;

use anyhow::{bail, Result};
use log::error;
use twilight_http::Client as HttpClient;
use twilight_model::guild::Permissions;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, RoleMarker, UserMarker};
use twilight_model::id::Id;
use twilight_util::permission_calculator::PermissionCalculator;

use crate::lookup;
use crate::models::BotUser;
use crate::settings::Discord;

/// Everything the event handlers need, resolved once at startup and treated
/// as immutable afterwards.
pub struct Context {
    pub http: Arc<HttpClient>,
    pub guild_id: Id<GuildMarker>,
    /// The one channel whose messages are treated as registration requests.
    pub channel_id: Id<ChannelMarker>,
    /// The role granted on every successful registration.
    pub role_id: Id<RoleMarker>,
    pub role_name: String,
    pub bot_user_id: Id<UserMarker>,
}

/// Resolve the configured guild, channel and role and verify the bot's own
/// permissions.
///
/// Returns `Ok(None)` when the guild, a guild-wide permission, the watched
/// channel or the channel-scoped permission is missing. Each case is logged
/// and the caller is expected to stay inert without a context. A missing
/// grantable role is an error and ends the process.
pub async fn initialize(
    http: Arc<HttpClient>,
    settings: &Discord,
    bot: &BotUser,
) -> Result<Option<Arc<Context>>> {
    let guild_id = settings.target_guild()?;

    let guild = match http.guild(guild_id).exec().await {
        Ok(response) => response.model().await?,
        Err(e) => {
            error!("Unable to load guild {}: {}", guild_id, e);
            return Ok(None);
        }
    };

    // Fresh snapshots of our own member record, the roles and the channels,
    // so the lookups below don't run on stale data.
    let me = http
        .guild_member(guild_id, bot.id)
        .exec()
        .await?
        .model()
        .await?;
    let roles = http.roles(guild_id).exec().await?.models().await?;
    let channels = http.guild_channels(guild_id).exec().await?.models().await?;

    // The everyone role always shares its id with the guild.
    let everyone = roles
        .iter()
        .find(|role| role.id == guild_id.cast())
        .map(|role| role.permissions)
        .unwrap_or_else(Permissions::empty);
    let member_roles = roles
        .iter()
        .filter(|role| me.roles.contains(&role.id))
        .map(|role| (role.id, role.permissions))
        .collect::<Vec<_>>();

    let calculator = PermissionCalculator::new(guild_id, bot.id, everyone, &member_roles)
        .owner_id(guild.owner_id);

    let guild_permissions = calculator.clone().root();
    if !guild_permissions.contains(Permissions::MANAGE_NICKNAMES) {
        error!("Missing permission MANAGE_NICKNAMES for guild {}", guild_id);
        return Ok(None);
    }
    if !guild_permissions.contains(Permissions::MANAGE_ROLES) {
        error!("Missing permission MANAGE_ROLES for guild {}", guild_id);
        return Ok(None);
    }

    let channel = match lookup::find_channel_by_name(&channels, &settings.rsn_channel) {
        Some(channel) => channel,
        None => {
            error!(
                "Unable to load channel '{}', not found inside guild {}",
                settings.rsn_channel, guild_id
            );
            return Ok(None);
        }
    };

    let overwrites = channel.permission_overwrites.as_deref().unwrap_or_default();
    let channel_permissions = calculator.in_channel(channel.kind, overwrites);
    if !channel_permissions.contains(Permissions::MANAGE_MESSAGES) {
        error!(
            "Missing permission MANAGE_MESSAGES for channel '{}'",
            settings.rsn_channel
        );
        return Ok(None);
    }

    let role = match lookup::find_role_by_name(&roles, &settings.role_to_apply) {
        Some(role) => role,
        None => bail!("unable to load role '{}' to apply", settings.role_to_apply),
    };

    Ok(Some(Arc::new(Context {
        http,
        guild_id,
        channel_id: channel.id,
        role_id: role.id,
        role_name: role.name.clone(),
        bot_user_id: bot.id,
    })))
}
