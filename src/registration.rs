//! The per-message core: treat a post in the watched channel as a username
//! registration, apply it and clean up.

use anyhow::Result;
use log::{debug, error};

use crate::models::Incoming;
use crate::startup::Context;

/// RuneScape usernames are at most 12 characters long.
pub const MAX_NAME_LEN: usize = 12;

/// Marker tokens stripped from a message before it is treated as a name.
/// At every position the tokens are tried in this order, so the longer ones
/// are not torn apart by the bare `!`.
const MARKERS: [&str; 4] = ["!set", "!rsn", "!", "#"];

const LIMIT_REPLY: &str = "Maximum character limit: 12 (Name is too long) - ONLY post your Runescape username, NO OTHER TEXT";

/// Handle one new message.
///
/// The role grant, the nickname update and the message deletion are attempted
/// independently. A failed one is logged and the remaining ones still run;
/// none of them is retried.
pub async fn handle_message(ctx: &Context, msg: &Incoming) {
    if !is_registration_request(ctx, msg) {
        return;
    }

    let name = strip_markers(&msg.content);
    debug!(
        "{} | Candidate name '{}' from {}",
        msg.shard_id, name, msg.author_id
    );

    if exceeds_limit(&name) {
        if let Err(e) = send_limit_reply(ctx).await {
            error!("Failed sending the length limit reply: {}", e);
        }
        return;
    }

    if let Err(e) = grant_role(ctx, msg).await {
        error!(
            "Unable to apply role '{}' to member, make sure the bot's role is above it in the role list: {}",
            ctx.role_name, e
        );
    }

    if let Err(e) = set_display_name(ctx, msg, &name).await {
        error!("Failed setting nickname '{}' for {}: {}", name, msg.author_id, e);
    }

    if let Err(e) = delete_trigger(ctx, msg).await {
        error!("Failed deleting message {}: {}", msg.id, e);
    }
}

/// A message only counts as a registration request when it was posted in the
/// watched channel, by someone other than the bot itself, and the author
/// still has a member record in the guild.
pub fn is_registration_request(ctx: &Context, msg: &Incoming) -> bool {
    msg.channel_id == ctx.channel_id && msg.author_id != ctx.bot_user_id && msg.has_member
}

/// Remove every occurrence of the marker tokens and trim the remainder.
///
/// The input is scanned once from the left. Text a removal splices together
/// is kept as-is instead of being matched again.
pub fn strip_markers(content: &str) -> String {
    let mut name = String::with_capacity(content.len());
    let mut rest = content;

    'scan: while !rest.is_empty() {
        for marker in MARKERS {
            if let Some(tail) = rest.strip_prefix(marker) {
                rest = tail;
                continue 'scan;
            }
        }

        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            name.push(ch);
        }
        rest = chars.as_str();
    }

    name.trim().to_owned()
}

/// Whether a candidate name is longer than [MAX_NAME_LEN] characters.
pub fn exceeds_limit(name: &str) -> bool {
    name.chars().count() > MAX_NAME_LEN
}

async fn send_limit_reply(ctx: &Context) -> Result<()> {
    ctx.http
        .create_message(ctx.channel_id)
        .content(LIMIT_REPLY)?
        .exec()
        .await?;

    Ok(())
}

async fn grant_role(ctx: &Context, msg: &Incoming) -> Result<()> {
    ctx.http
        .add_guild_member_role(ctx.guild_id, msg.author_id, ctx.role_id)
        .exec()
        .await?;

    Ok(())
}

async fn set_display_name(ctx: &Context, msg: &Incoming, name: &str) -> Result<()> {
    ctx.http
        .update_guild_member(ctx.guild_id, msg.author_id)
        .nick(Some(name))?
        .exec()
        .await?;

    Ok(())
}

async fn delete_trigger(ctx: &Context, msg: &Incoming) -> Result<()> {
    ctx.http
        .delete_message(ctx.channel_id, msg.id)
        .exec()
        .await?;

    Ok(())
}
