//! A single-guild Discord bot that turns posts in one watched channel into
//! RuneScape-username registrations: the name becomes the poster's nickname,
//! a fixed role is granted and the triggering message is removed.

/// Gateway connection and translation into crate events.
pub mod discord;
/// Pure name lookups over fetched channel/role snapshots.
pub mod lookup;
/// Events and reduced message models passed from the gateway to the dispatcher.
pub mod models;
/// Scheduled scan of the watched channel for stale bot messages.
pub mod purge;
/// The per-message registration handler.
pub mod registration;
/// File and environment based configuration.
pub mod settings;
/// Startup checks and the shared handler context.
pub mod startup;
