use std::sync::Arc;

use anyhow::Result;
use futures_util::StreamExt;
use log::{debug, error, info};
use tokio::sync::mpsc::Sender;
use twilight_gateway::cluster::{Cluster, Events};
use twilight_gateway::Event;
use twilight_http::Client as HttpClient;
use twilight_model::channel::Message;
use twilight_model::gateway::Intents;
use twilight_model::user::CurrentUser;

use crate::models;
use crate::settings::Discord;

/// Connect to the Discord gateway and forward the events the bot cares about
/// to the given sender as [models::Event]s.
pub async fn start(settings: &Discord, sender: Sender<models::Event>) -> Result<()> {
    // Guild metadata, message events and the message text itself. The
    // cluster creates as many shards as Discord suggests.
    let intents = Intents::GUILDS | Intents::GUILD_MESSAGES | Intents::MESSAGE_CONTENT;

    let (cluster, events) = Cluster::builder(settings.token.clone(), intents)
        .build()
        .await?;

    debug!("Cluster set up");

    let cluster = Arc::new(cluster);
    let cluster_spawn = Arc::clone(&cluster);

    // Start all shards in the cluster in the background.
    tokio::spawn(async move {
        debug!("Spawning cluster");
        cluster_spawn.up().await;

        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed setting up CTRL+C listener: {}", e);
        }

        debug!("Stopping cluster");
        cluster_spawn.down();
    });

    // Handle Discord events on a separate task.
    tokio::spawn(forward_events(events, sender));

    Ok(())
}

async fn forward_events(mut events: Events, sender: Sender<models::Event>) {
    while let Some((shard_id, event)) = events.next().await {
        let event = match event {
            Event::Ready(ready) => {
                info!("Connected on shard {}", shard_id);
                models::Event::Ready(ready.user.into())
            }
            Event::MessageCreate(msg) => {
                debug!("{} | New message in {}", shard_id, msg.channel_id);
                models::Event::NewMessage((shard_id, msg.0).into())
            }
            _ => continue,
        };

        if sender.send(event).await.is_err() {
            return;
        }
    }

    sender.send(models::Event::Shutdown).await.ok();
}

/// Create a new HTTP client for the Discord API. HTTP is separate from the
/// gateway connection.
pub fn new_client(settings: &Discord) -> HttpClient {
    HttpClient::new(settings.token.clone())
}

impl From<(u64, Message)> for models::Incoming {
    fn from((shard_id, m): (u64, Message)) -> Self {
        Self {
            shard_id,
            id: m.id,
            channel_id: m.channel_id,
            author_id: m.author.id,
            content: m.content,
            has_member: m.member.is_some(),
        }
    }
}

impl From<CurrentUser> for models::BotUser {
    fn from(u: CurrentUser) -> Self {
        Self {
            id: u.id,
            name: u.name,
        }
    }
}
