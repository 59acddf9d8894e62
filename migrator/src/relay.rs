use crate::errors::Result;
use crate::platform::Platform;
use crate::structs::{Channel, Relay};

use log::{debug, info};

pub const DEFAULT_RELAY_NAME: &str = "DBF";

/// How relays are recognised and provisioned in a destination channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub name: String,
    // path of the image uploaded when a relay has to be created
    pub avatar: Option<String>,
    // ignore same-named relays that belong to follower feeds or other apps
    pub managed_only: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        RelayConfig {
            name: DEFAULT_RELAY_NAME.to_string(),
            avatar: None,
            managed_only: true,
        }
    }
}

impl RelayConfig {
    pub fn new(name: impl Into<String>) -> RelayConfig {
        RelayConfig {
            name: name.into(),
            ..RelayConfig::default()
        }
    }

    fn is_ours(&self, relay: &Relay) -> bool {
        relay.name.as_deref() == Some(self.name.as_str()) && (relay.managed || !self.managed_only)
    }
}

/// Finds the relay of a channel, creating it when there is none yet.
///
/// Two migrations resolving a fresh channel at the same time can each create
/// one; afterwards the first listed relay always wins.
pub async fn resolve_relay<P>(platform: &P, config: &RelayConfig, channel: &Channel) -> Result<Relay>
where
    P: Platform + ?Sized,
{
    let existing = platform.list_relays(channel).await?;
    if let Some(relay) = existing.into_iter().find(|r| config.is_ours(r)) {
        debug!("reusing relay {} in channel {}", relay.id, channel.id);
        return Ok(relay);
    }

    let relay = platform
        .create_relay(channel, &config.name, config.avatar.as_deref())
        .await?;
    info!(
        "created relay {} named {} in channel {}",
        relay.id, config.name, channel.id
    );
    Ok(relay)
}
