//! Scheduled scan of the watched channel for stale bot messages.

use anyhow::Result;
use log::{error, info};
use tokio::time::Duration;
use twilight_model::channel::Message;
use twilight_model::id::marker::{MessageMarker, UserMarker};
use twilight_model::id::Id;

use crate::startup::Context;

/// How often the watched channel is scanned.
pub const PURGE_PERIOD: Duration = Duration::from_secs(60 * 10);

/// How many of the most recent messages are fetched per pass.
pub const FETCH_LIMIT: u16 = 20;

/// Run one purge pass over the watched channel.
///
/// The pass fetches the most recent messages, narrows them down to the ones
/// the bot posted itself and logs the count. No delete call is issued for the
/// matched set. Messages from other authors are never touched.
pub async fn run(ctx: &Context) {
    match fetch_recent(ctx).await {
        Ok(messages) => {
            let stale = authored_by(&messages, ctx.bot_user_id);
            info!(
                "Purge pass matched {} own message(s) out of {} fetched",
                stale.len(),
                messages.len()
            );
        }
        Err(e) => error!("Failed fetching messages for the purge pass: {}", e),
    }
}

async fn fetch_recent(ctx: &Context) -> Result<Vec<Message>> {
    let messages = ctx
        .http
        .channel_messages(ctx.channel_id)
        .limit(FETCH_LIMIT)?
        .exec()
        .await?
        .models()
        .await?;

    Ok(messages)
}

/// Narrow a fetched batch down to the messages a single author posted.
pub fn authored_by(messages: &[Message], author: Id<UserMarker>) -> Vec<Id<MessageMarker>> {
    messages
        .iter()
        .filter(|message| message.author.id == author)
        .map(|message| message.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn message(id: u64, author_id: u64) -> Message {
        serde_json::from_value(json!({
            "id": id.to_string(),
            "channel_id": "100",
            "author": {
                "id": author_id.to_string(),
                "username": "someone",
                "discriminator": "0001",
                "avatar": null,
            },
            "content": "hello",
            "timestamp": "2023-01-01T00:00:00.000000+00:00",
            "edited_timestamp": null,
            "tts": false,
            "mention_everyone": false,
            "mentions": [],
            "mention_roles": [],
            "attachments": [],
            "embeds": [],
            "pinned": false,
            "type": 0,
        }))
        .expect("valid message payload")
    }

    #[test]
    fn keeps_only_the_given_author() {
        let messages = [message(1, 50), message(2, 60), message(3, 50)];

        let ids = authored_by(&messages, Id::new(50));
        assert_eq!(vec![Id::new(1), Id::new(3)], ids);
    }

    #[test]
    fn empty_when_author_posted_nothing() {
        let messages = [message(1, 60), message(2, 61)];

        assert!(authored_by(&messages, Id::new(50)).is_empty());
    }

    #[test]
    fn empty_batch_stays_empty() {
        assert!(authored_by(&[], Id::new(50)).is_empty());
    }

    #[test]
    fn fetch_limit_fits_one_page() {
        // The request builder takes the limit as u16, capped at 100 per page.
        let limit: u16 = FETCH_LIMIT;
        assert_eq!(20, limit);
    }
}
