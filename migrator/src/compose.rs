//! Turns a source message into the text and embeds that get reposted.

use crate::platform::Platform;
use crate::structs::{Channel, Emoji, Message, Poll, PollMedia, Sticker, StickerRef};

use log::{trace, warn};
use serde_json::Value;

/// Largest body the platform accepts in a single message
pub const MESSAGE_LEN_LIMIT: usize = 2000;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composed {
    pub chunks: Vec<String>,
    pub embeds: Vec<Value>,
}

fn media_to_text(media: &PollMedia) -> String {
    let emoji = media.emoji.as_ref().map(|emoji| match emoji {
        Emoji::Custom { id, name } => format!("<:{name}:{id}>"),
        Emoji::Unicode(glyph) => glyph.clone(),
    });
    emoji
        .into_iter()
        .chain(media.text.iter().cloned())
        .collect::<Vec<String>>()
        .join(" ")
}

/// Renders a poll as static text, the votes themselves cannot be migrated
pub fn poll_to_text(poll: &Poll) -> String {
    let answers = poll
        .answers
        .iter()
        .map(|answer| format!("{:04} - {}", answer.votes, media_to_text(&answer.media)))
        .collect::<Vec<String>>()
        .join("\n");
    let text = format!("{}\n{answers}", media_to_text(&poll.question));
    if poll.finished {
        format!("(Poll finished) {text}")
    } else {
        text
    }
}

fn reply_quote(parent: &Message) -> Option<String> {
    if !parent.kind.is_quotable() {
        return None;
    }
    let quoted = match &parent.poll {
        Some(poll) => poll_to_text(poll),
        None => parent.content.clone(),
    };
    let lines = quoted
        .lines()
        .map(|line| format!("> {line}"))
        .collect::<Vec<String>>()
        .join("\n");
    Some(format!(
        "> **{}** said:\n{lines}",
        parent.author.display_name
    ))
}

fn prepend(body: &mut String, piece: &str) {
    if body.is_empty() {
        body.push_str(piece);
    } else {
        body.insert(0, '\n');
        body.insert_str(0, piece);
    }
}

/// Prepends sticker urls, plus a notice naming the ones the guild does not have
fn prepend_stickers(body: &mut String, wanted: &[StickerRef], available: &[Sticker]) {
    let usable: Vec<&Sticker> = available
        .iter()
        .filter(|s| wanted.iter().any(|w| s.matches(w)))
        .collect();
    let missing: Vec<&str> = wanted
        .iter()
        .filter(|w| !usable.iter().any(|s| s.matches(w)))
        .map(|w| w.name.as_str())
        .collect();

    if !missing.is_empty() {
        prepend(body, &format!("Sticker {} not available", missing.join(",")));
    }
    for sticker in usable {
        prepend(body, &sticker.url);
    }
}

/// Fixed width slices of at most `limit` characters
pub fn split_chunks(body: &str, limit: usize) -> Vec<String> {
    let chars: Vec<char> = body.chars().collect();
    chars
        .chunks(limit.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Builds the body of a message without touching the network.
pub fn compose_body(message: &Message, guild_stickers: &[Sticker]) -> String {
    let mut body = message.content.clone();

    if let Some(quote) = message.referenced.as_deref().and_then(reply_quote) {
        prepend(&mut body, &quote);
    }

    if !message.attachments.is_empty() {
        prepend(&mut body, &message.attachments.join("\n"));
    }

    if !message.stickers.is_empty() {
        prepend_stickers(&mut body, &message.stickers, guild_stickers);
    }

    if let Some(poll) = &message.poll {
        prepend(&mut body, &poll_to_text(poll));
    }

    body
}

/// Composes a message for `dest`, looking up the destination guild's
/// stickers only when the message uses any.
pub async fn compose<P>(platform: &P, message: &Message, dest: &Channel) -> Composed
where
    P: Platform + ?Sized,
{
    let mut guild_stickers = Vec::new();
    if !message.stickers.is_empty() {
        if let Some(guild) = dest.guild {
            match platform.guild_stickers(guild).await {
                Ok(stickers) => guild_stickers = stickers,
                Err(why) => warn!("failed to list stickers of guild {guild}: {why}"),
            }
        }
    }

    let body = compose_body(message, &guild_stickers);
    let chunks = split_chunks(&body, MESSAGE_LEN_LIMIT);
    trace!(
        "message {} composed into {} chunks",
        message.id,
        chunks.len()
    );

    Composed {
        chunks,
        embeds: message.embeds.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::{Author, MessageKind, PollAnswer};
    use crate::testing::{text_channel, text_message, FakePlatform};

    fn poll(finished: bool) -> Poll {
        Poll {
            question: PollMedia {
                text: Some("Lunch?".to_string()),
                emoji: Some(Emoji::Unicode("🍔".to_string())),
            },
            answers: vec![
                PollAnswer {
                    media: PollMedia::text("Pizza"),
                    votes: 12,
                },
                PollAnswer {
                    media: PollMedia {
                        text: Some("Tacos".to_string()),
                        emoji: Some(Emoji::Custom {
                            id: 42,
                            name: "taco".to_string(),
                        }),
                    },
                    votes: 3,
                },
            ],
            finished,
        }
    }

    #[test]
    fn test_open_poll_text() {
        assert_eq!(
            "🍔 Lunch?\n0012 - Pizza\n0003 - <:taco:42> Tacos",
            poll_to_text(&poll(false))
        );
    }

    #[test]
    fn test_finished_poll_text() {
        assert_eq!(
            "(Poll finished) 🍔 Lunch?\n0012 - Pizza\n0003 - <:taco:42> Tacos",
            poll_to_text(&poll(true))
        );
    }

    #[test]
    fn test_plain_body_unchanged() {
        assert_eq!("hi", compose_body(&text_message(1, "hi"), &[]));
    }

    #[test]
    fn test_reply_quote() {
        let parent = Message {
            author: Author {
                display_name: "Ann".to_string(),
                avatar_url: String::new(),
            },
            ..text_message(1, "first line\nsecond line")
        };
        let reply = Message {
            kind: MessageKind::Reply,
            referenced: Some(Box::new(parent)),
            ..text_message(2, "agreed")
        };
        assert_eq!(
            "> **Ann** said:\n> first line\n> second line\nagreed",
            compose_body(&reply, &[])
        );
    }

    #[test]
    fn test_reply_to_poll_quotes_poll() {
        let parent = Message {
            poll: Some(poll(false)),
            author: Author {
                display_name: "Bo".to_string(),
                avatar_url: String::new(),
            },
            ..text_message(1, "")
        };
        let reply = Message {
            referenced: Some(Box::new(parent)),
            ..text_message(2, "pizza!")
        };
        assert_eq!(
            "> **Bo** said:\n> 🍔 Lunch?\n> 0012 - Pizza\n> 0003 - <:taco:42> Tacos\npizza!",
            compose_body(&reply, &[])
        );
    }

    #[test]
    fn test_reply_to_system_message_not_quoted() {
        let parent = Message {
            kind: MessageKind::Other,
            ..text_message(1, "joined")
        };
        let reply = Message {
            referenced: Some(Box::new(parent)),
            ..text_message(2, "welcome")
        };
        assert_eq!("welcome", compose_body(&reply, &[]));
    }

    #[test]
    fn test_attachments_prepended() {
        let msg = Message {
            attachments: vec![
                "https://cdn.example/a.png".to_string(),
                "https://cdn.example/b.png".to_string(),
            ],
            ..text_message(1, "look")
        };
        assert_eq!(
            "https://cdn.example/a.png\nhttps://cdn.example/b.png\nlook",
            compose_body(&msg, &[])
        );
    }

    #[test]
    fn test_stickers_available_and_missing() {
        let msg = Message {
            stickers: vec![
                StickerRef {
                    id: 1,
                    name: "wave".to_string(),
                },
                StickerRef {
                    id: 2,
                    name: "gone".to_string(),
                },
            ],
            ..text_message(1, "hey")
        };
        let guild = [Sticker {
            id: 99,
            name: "wave".to_string(),
            url: "https://media.example/99.png".to_string(),
        }];
        assert_eq!(
            "https://media.example/99.png\nSticker gone not available\nhey",
            compose_body(&msg, &guild)
        );
    }

    #[test]
    fn test_poll_goes_first() {
        let msg = Message {
            poll: Some(poll(false)),
            attachments: vec!["https://cdn.example/a.png".to_string()],
            ..text_message(1, "")
        };
        assert_eq!(
            "🍔 Lunch?\n0012 - Pizza\n0003 - <:taco:42> Tacos\nhttps://cdn.example/a.png",
            compose_body(&msg, &[])
        );
    }

    #[test]
    fn test_chunk_count_and_round_trip() {
        for len in [0, 1, 1999, 2000, 2001, 4500, 6000] {
            let body = "x".repeat(len);
            let chunks = split_chunks(&body, MESSAGE_LEN_LIMIT);
            assert_eq!((len + MESSAGE_LEN_LIMIT - 1) / MESSAGE_LEN_LIMIT, chunks.len());
            assert_eq!(body, chunks.concat());
        }
    }

    #[test]
    fn test_chunks_split_on_characters() {
        let body = "é".repeat(2001);
        let chunks = split_chunks(&body, MESSAGE_LEN_LIMIT);
        assert_eq!(vec![2000, 1], chunks.iter().map(|c| c.chars().count()).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_compose_fetches_destination_stickers() {
        let platform = FakePlatform::new().with_sticker(Sticker {
            id: 7,
            name: "wave".to_string(),
            url: "https://media.example/7.png".to_string(),
        });
        let msg = Message {
            stickers: vec![StickerRef {
                id: 7,
                name: "wave".to_string(),
            }],
            ..text_message(1, "")
        };
        let composed = compose(&platform, &msg, &text_channel(10)).await;
        assert_eq!(vec!["https://media.example/7.png".to_string()], composed.chunks);
    }
}
