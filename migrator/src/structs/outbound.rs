use serde_json::Value;

/// A channel-bound sender that can post under any display name and avatar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relay {
    pub id: u64,
    pub channel: u64,
    pub name: Option<String>,
    // created by a user or bot for posting, as opposed to follower or app relays
    pub managed: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutboundMessage {
    pub content: String,
    pub embeds: Vec<Value>,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub reply_to: Option<u64>,
    pub thread: Option<u64>,
    pub thread_name: Option<String>,
}

impl OutboundMessage {
    pub fn new(content: impl Into<String>) -> OutboundMessage {
        OutboundMessage {
            content: content.into(),
            ..OutboundMessage::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub id: u64,
    pub channel: u64,
    // set when the message landed inside a thread
    pub thread: Option<u64>,
}
