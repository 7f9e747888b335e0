use twilight_model::id::marker::{ChannelMarker, MessageMarker, UserMarker};
use twilight_model::id::Id;

/// Events delivered from the gateway and timer tasks to the dispatcher.
#[derive(Debug)]
pub enum Event {
    Ready(BotUser),
    NewMessage(Incoming),
    PurgeTick,
    Shutdown,
}

/// The bot's own account, as reported by the gateway on connect.
#[derive(Debug)]
pub struct BotUser {
    pub id: Id<UserMarker>,
    pub name: String,
}

/// A new message observed on the gateway, reduced to the fields the
/// registration handler needs.
#[derive(Debug)]
pub struct Incoming {
    pub shard_id: u64,
    pub id: Id<MessageMarker>,
    pub channel_id: Id<ChannelMarker>,
    pub author_id: Id<UserMarker>,
    pub content: String,
    /// Whether the author still had a guild member record attached.
    pub has_member: bool,
}
