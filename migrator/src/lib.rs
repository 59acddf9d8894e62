//! Copies the content of one channel into another: messages, threads and
//! forum posts, in their original order and under their original authors'
//! names, through a relay sender bound to the destination channel.

mod channel;
mod compose;
mod errors;
mod history;
mod message;
pub mod platform;
mod relay;
mod report;
pub mod structs;
mod thread;

#[cfg(test)]
mod testing;

pub use channel::migrate_channel;
pub use compose::{compose, compose_body, poll_to_text, split_chunks, Composed, MESSAGE_LEN_LIMIT};
pub use errors::{Error, ErrorCode, PlatformError, Result};
pub use history::{classify, flatten_history, FetchStep, Order};
pub use message::{migrate_message, Migrated};
pub use platform::{HistoryCursor, Platform};
pub use relay::{resolve_relay, RelayConfig, DEFAULT_RELAY_NAME};
pub use report::Report;
pub use thread::migrate_thread;

/// Everything a migration step needs besides the content it moves
pub struct MigrationContext<'a, P: ?Sized> {
    pub platform: &'a P,
    pub relay: &'a RelayConfig,
}

impl<'a, P: ?Sized> MigrationContext<'a, P> {
    pub const fn new(platform: &'a P, relay: &'a RelayConfig) -> MigrationContext<'a, P> {
        MigrationContext { platform, relay }
    }
}
