//! The remote platform as seen by the migration engine.
//!
//! Transport, authentication and rate limiting all live behind these traits.
//! The engine only calls them sequentially and classifies the errors they
//! return.

use crate::errors::{PlatformError, Result};
use crate::structs::{Channel, Message, OutboundMessage, Relay, SentMessage, Sticker, Thread};

use async_trait::async_trait;
use std::result;

/// A remote history cursor that yields newest messages first.
#[async_trait]
pub trait HistoryCursor {
    /// `None` once the history is exhausted. A transport failure is reported
    /// as `Error::Platform`, anything else is a local failure.
    async fn next(&mut self) -> Option<Result<Message>>;
}

#[async_trait]
pub trait Platform: Send + Sync {
    type Cursor: HistoryCursor + Send;

    /// History of a channel or thread, starting from the newest message.
    fn history(&self, container: u64) -> Self::Cursor;

    async fn list_relays(&self, channel: &Channel) -> result::Result<Vec<Relay>, PlatformError>;

    async fn create_relay(
        &self,
        channel: &Channel,
        name: &str,
        avatar: Option<&str>,
    ) -> result::Result<Relay, PlatformError>;

    async fn send_via_relay(
        &self,
        relay: &Relay,
        message: &OutboundMessage,
    ) -> result::Result<SentMessage, PlatformError>;

    /// Ids of archived posts of a forum, newest first.
    async fn list_archived_posts(&self, forum: &Channel) -> result::Result<Vec<u64>, PlatformError>;

    /// Active posts of a forum, newest first.
    async fn list_active_posts(&self, forum: &Channel)
        -> result::Result<Vec<Thread>, PlatformError>;

    async fn fetch_post(&self, forum: &Channel, id: u64) -> result::Result<Thread, PlatformError>;

    /// Opens a public thread from an already sent message, returning the thread id.
    async fn create_thread_from_message(
        &self,
        channel: &Channel,
        message: &SentMessage,
        name: &str,
    ) -> result::Result<u64, PlatformError>;

    async fn guild_stickers(&self, guild: u64) -> result::Result<Vec<Sticker>, PlatformError>;
}
