//! Pure lookups over channel and role snapshots fetched at startup.
//!
//! Matching is case-sensitive and returns the first hit in the order the
//! platform enumerated the snapshot. Duplicate names are resolved by that
//! order, nothing more.

use twilight_model::channel::{Channel, ChannelType};
use twilight_model::guild::Role;

/// Find a text based guild channel by its exact name.
pub fn find_channel_by_name<'a>(channels: &'a [Channel], name: &str) -> Option<&'a Channel> {
    channels
        .iter()
        .find(|channel| is_guild_text(channel.kind) && channel.name.as_deref() == Some(name))
}

/// Find a role by its exact name.
pub fn find_role_by_name<'a>(roles: &'a [Role], name: &str) -> Option<&'a Role> {
    roles.iter().find(|role| role.name == name)
}

fn is_guild_text(kind: ChannelType) -> bool {
    matches!(kind, ChannelType::GuildText | ChannelType::GuildNews)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn channel(id: u64, kind: u8, name: &str) -> Channel {
        serde_json::from_value(json!({
            "id": id.to_string(),
            "type": kind,
            "name": name,
        }))
        .expect("valid channel payload")
    }

    fn role(id: u64, name: &str) -> Role {
        serde_json::from_value(json!({
            "id": id.to_string(),
            "name": name,
            "color": 0,
            "hoist": false,
            "managed": false,
            "mentionable": false,
            "permissions": "0",
            "position": 0,
        }))
        .expect("valid role payload")
    }

    #[test]
    fn channel_exact_match() {
        let channels = [channel(1, 0, "general"), channel(2, 0, "rsn-registration")];

        let found = find_channel_by_name(&channels, "rsn-registration").unwrap();
        assert_eq!(channels[1].id, found.id);
    }

    #[test]
    fn channel_match_is_case_sensitive() {
        let channels = [channel(1, 0, "RSN-Registration")];

        assert!(find_channel_by_name(&channels, "rsn-registration").is_none());
    }

    #[test]
    fn channel_skips_non_text_kinds() {
        // 2 = voice, 4 = category, same name as the text channel behind them.
        let channels = [
            channel(1, 2, "rsn"),
            channel(2, 4, "rsn"),
            channel(3, 0, "rsn"),
        ];

        let found = find_channel_by_name(&channels, "rsn").unwrap();
        assert_eq!(channels[2].id, found.id);
    }

    #[test]
    fn channel_first_match_wins() {
        let channels = [channel(1, 0, "rsn"), channel(2, 0, "rsn")];

        let found = find_channel_by_name(&channels, "rsn").unwrap();
        assert_eq!(channels[0].id, found.id);
    }

    #[test]
    fn role_exact_match() {
        let roles = [role(1, "Admin"), role(2, "Member")];

        let found = find_role_by_name(&roles, "Member").unwrap();
        assert_eq!(roles[1].id, found.id);
    }

    #[test]
    fn role_match_is_case_sensitive() {
        let roles = [role(1, "member")];

        assert!(find_role_by_name(&roles, "Member").is_none());
    }
}
