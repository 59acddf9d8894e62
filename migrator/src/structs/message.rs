use crate::structs::{Poll, Thread};

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MessageKind {
    Default,
    Reply,
    ThreadStarter,
    Other,
}

impl MessageKind {
    /// Kinds whose text is worth quoting when something replies to them
    #[inline]
    pub const fn is_quotable(&self) -> bool {
        matches!(
            self,
            MessageKind::Default | MessageKind::Reply | MessageKind::ThreadStarter
        )
    }
}

impl Default for MessageKind {
    fn default() -> Self {
        MessageKind::Default
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    pub display_name: String,
    pub avatar_url: String,
}

/// A sticker as referenced from a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickerRef {
    pub id: u64,
    pub name: String,
}

/// A custom sticker available in a guild
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sticker {
    pub id: u64,
    pub name: String,
    pub url: String,
}

impl Sticker {
    #[inline]
    pub fn matches(&self, wanted: &StickerRef) -> bool {
        self.id == wanted.id || self.name == wanted.name
    }
}

#[derive(Debug, Clone, Default)]
pub struct Message {
    // snowflakes locating the message
    pub id: u64,
    pub channel: u64,
    pub guild: Option<u64>,

    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
    pub author: Author,

    pub content: String,
    // forwarded verbatim, never inspected
    pub embeds: Vec<Value>,
    // urls of the uploaded files
    pub attachments: Vec<String>,
    pub reactions: usize,
    pub stickers: Vec<StickerRef>,
    pub poll: Option<Poll>,

    pub referenced: Option<Box<Message>>,
    pub thread: Option<Box<Thread>>,
}

impl Message {
    /// Returns a URI that references the message in discord. When clicked inside a
    /// discord client it will auto scroll to the message
    pub fn jump_url(&self) -> String {
        let guild = self
            .guild
            .map_or_else(|| "@me".to_string(), |g| g.to_string());
        format!(
            "https://discord.com/channels/{guild}/{}/{}",
            self.channel, self.id
        )
    }

    /// A message carrying nothing that can be reposted. Attachments do not
    /// count, a bare upload is treated as empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
            && self.embeds.is_empty()
            && self.poll.is_none()
            && self.reactions == 0
            && self.stickers.is_empty()
    }
}

impl Ord for Message {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl PartialOrd for Message {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Message {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::{PollAnswer, PollMedia};
    use serde_json::json;

    #[test]
    fn test_message_equality() {
        // same id with different data, only the id should be compared
        let message1 = Message {
            id: 1,
            content: "a".to_string(),
            ..Message::default()
        };
        let message2 = Message {
            id: 1,
            channel: 2,
            content: "b".to_string(),
            ..Message::default()
        };

        assert_eq!(message1, message2);
    }

    #[test]
    fn test_jump_url() {
        let msg = Message {
            id: 3,
            channel: 2,
            guild: Some(1),
            ..Message::default()
        };
        assert_eq!("https://discord.com/channels/1/2/3", msg.jump_url());
    }

    #[test]
    fn test_jump_url_direct_message() {
        let msg = Message {
            id: 3,
            channel: 2,
            ..Message::default()
        };
        assert_eq!("https://discord.com/channels/@me/2/3", msg.jump_url());
    }

    #[test]
    fn test_empty_message() {
        assert!(Message::default().is_empty());

        let attachment_only = Message {
            attachments: vec!["https://cdn.example/a.png".to_string()],
            ..Message::default()
        };
        assert!(attachment_only.is_empty());
    }

    #[test]
    fn test_non_empty_messages() {
        let cases = [
            Message {
                content: "hi".to_string(),
                ..Message::default()
            },
            Message {
                embeds: vec![json!({"title": "t"})],
                ..Message::default()
            },
            Message {
                reactions: 1,
                ..Message::default()
            },
            Message {
                stickers: vec![StickerRef {
                    id: 1,
                    name: "wave".to_string(),
                }],
                ..Message::default()
            },
            Message {
                poll: Some(Poll {
                    question: PollMedia::text("q"),
                    answers: vec![PollAnswer {
                        media: PollMedia::text("a"),
                        votes: 0,
                    }],
                    finished: false,
                }),
                ..Message::default()
            },
        ];
        for msg in cases {
            assert!(!msg.is_empty(), "{msg:?} should not be empty");
        }
    }

    #[test]
    fn test_sticker_match_by_id_or_name() {
        let sticker = Sticker {
            id: 5,
            name: "wave".to_string(),
            url: "https://media.example/5.png".to_string(),
        };
        assert!(sticker.matches(&StickerRef {
            id: 5,
            name: "other".to_string()
        }));
        assert!(sticker.matches(&StickerRef {
            id: 6,
            name: "wave".to_string()
        }));
        assert!(!sticker.matches(&StickerRef {
            id: 6,
            name: "other".to_string()
        }));
    }
}
