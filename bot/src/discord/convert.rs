//! Conversions from serenity's models into the migrator's.

use chrono::{TimeZone, Utc};
use log::{trace, warn};
use migrator::structs::{
    Author, Channel, ChannelKind, Emoji, Message, MessageKind, Poll, PollAnswer, PollMedia,
    Relay, SentMessage, Sticker, StickerRef, Thread, ThreadInfo,
};
use migrator::{ErrorCode, PlatformError};
use serde::Deserialize;
use serde_json::Value;
use serenity::builder::CreateEmbed;
use serenity::http::HttpError;
use serenity::model::channel::{
    ChannelType, Embed, GuildChannel, Message as DiscordMessage, MessageType,
};
use serenity::model::sticker::Sticker as DiscordSticker;
use serenity::model::webhook::{Webhook, WebhookType};

fn http_error_code(err: &HttpError) -> Option<u32> {
    match err {
        HttpError::UnsuccessfulRequest(response) => u32::try_from(response.error.code).ok(),
        _ => None,
    }
}

pub fn platform_error(err: serenity::Error) -> PlatformError {
    let code = match &err {
        serenity::Error::Http(inner) => http_error_code(inner),
        _ => None,
    };
    PlatformError::new(code, err.to_string())
}

pub fn channel(channel: &GuildChannel) -> Channel {
    let kind = match channel.kind {
        ChannelType::Text => ChannelKind::Text,
        ChannelType::Forum => ChannelKind::Forum,
        _ => ChannelKind::Other,
    };
    Channel::new(
        channel.id.get(),
        Some(channel.guild_id.get()),
        channel.name.clone(),
        kind,
    )
}

fn thread_info(thread: &GuildChannel) -> ThreadInfo {
    ThreadInfo {
        id: thread.id.get(),
        parent: thread.parent_id.map(|id| id.get()),
        name: thread.name.clone(),
    }
}

/// A post of a forum, `initial_post` is `None` once its author deleted it
pub fn forum_post(thread: &GuildChannel, initial_post: Option<Message>) -> Thread {
    Thread::ForumPost {
        info: thread_info(thread),
        initial_post: initial_post.map(Box::new),
    }
}

/// The starter message of a post. Only an unknown message means the author
/// deleted it, any other failure is reported.
pub fn initial_post(
    fetched: Result<DiscordMessage, PlatformError>,
) -> Result<Option<Message>, PlatformError> {
    match fetched {
        Ok(msg) => Ok(Some(message(&msg))),
        Err(why) if why.error_code() == Some(ErrorCode::UnknownMessage) => Ok(None),
        Err(why) => Err(why),
    }
}

/// A thread hanging off a text channel message
fn spawned_thread(thread: &GuildChannel, parent_message: Message) -> Thread {
    let info = thread_info(thread);
    match thread.kind {
        ChannelType::PublicThread => Thread::PublicThread {
            info,
            parent_message: Some(Box::new(parent_message)),
        },
        _ => Thread::Private { info },
    }
}

pub fn relay(webhook: &Webhook, channel: u64) -> Relay {
    Relay {
        id: webhook.id.get(),
        channel,
        name: webhook.name.clone(),
        managed: webhook.kind == WebhookType::Incoming,
    }
}

pub fn sent(message: &DiscordMessage, in_thread: bool) -> SentMessage {
    SentMessage {
        id: message.id.get(),
        channel: message.channel_id.get(),
        thread: in_thread.then(|| message.channel_id.get()),
    }
}

pub fn sticker(sticker: &DiscordSticker) -> Option<Sticker> {
    sticker.image_url().map(|url| Sticker {
        id: sticker.id.get(),
        name: sticker.name.clone(),
        url,
    })
}

pub fn embed(embed: &Embed) -> Option<Value> {
    serde_json::to_value(embed).ok()
}

pub fn create_embed(value: &Value) -> Option<CreateEmbed> {
    match serde_json::from_value::<Embed>(value.clone()) {
        Ok(embed) => Some(CreateEmbed::from(embed)),
        Err(why) => {
            warn!("dropping embed that could not be restored: {why}");
            None
        }
    }
}

fn message_kind(kind: MessageType) -> MessageKind {
    match kind {
        MessageType::Regular => MessageKind::Default,
        MessageType::InlineReply => MessageKind::Reply,
        MessageType::ThreadStarterMessage => MessageKind::ThreadStarter,
        _ => MessageKind::Other,
    }
}

fn author(msg: &DiscordMessage) -> Author {
    let nick = msg.member.as_ref().and_then(|member| member.nick.clone());
    Author {
        display_name: nick
            .or_else(|| msg.author.global_name.clone())
            .unwrap_or_else(|| msg.author.name.clone()),
        avatar_url: msg.author.face(),
    }
}

pub fn message(msg: &DiscordMessage) -> Message {
    let mut converted = Message {
        id: msg.id.get(),
        channel: msg.channel_id.get(),
        guild: msg.guild_id.map(|id| id.get()),
        kind: message_kind(msg.kind),
        created_at: Utc
            .timestamp_opt(msg.timestamp.unix_timestamp(), 0)
            .single()
            .unwrap_or_default(),
        author: author(msg),
        content: msg.content.clone(),
        embeds: msg.embeds.iter().filter_map(embed).collect(),
        attachments: msg.attachments.iter().map(|a| a.url.clone()).collect(),
        reactions: msg.reactions.len(),
        stickers: msg
            .sticker_items
            .iter()
            .map(|s| StickerRef {
                id: s.id.get(),
                name: s.name.clone(),
            })
            .collect(),
        poll: msg
            .poll
            .as_ref()
            .and_then(|poll| serde_json::to_value(poll).ok())
            .and_then(poll_from_json),
        referenced: msg
            .referenced_message
            .as_ref()
            .map(|referenced| Box::new(message(referenced))),
        thread: None,
    };

    if let Some(thread) = msg.thread.as_ref() {
        trace!("message {} owns thread {}", msg.id, thread.id);
        let parent = converted.clone();
        converted.thread = Some(Box::new(spawned_thread(thread, parent)));
    }
    converted
}

// Polls are read through their JSON form, which is stable across library versions
#[derive(Deserialize)]
struct RawEmoji {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct RawMedia {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    emoji: Option<RawEmoji>,
}

#[derive(Deserialize)]
struct RawAnswer {
    answer_id: Value,
    poll_media: RawMedia,
}

#[derive(Deserialize)]
struct RawCount {
    id: Value,
    count: u64,
}

#[derive(Deserialize)]
struct RawResults {
    #[serde(default)]
    is_finalized: bool,
    #[serde(default)]
    answer_counts: Vec<RawCount>,
}

#[derive(Deserialize)]
struct RawPoll {
    question: RawMedia,
    #[serde(default)]
    answers: Vec<RawAnswer>,
    #[serde(default)]
    results: Option<RawResults>,
}

/// Snowflakes and answer ids come as either numbers or strings
fn json_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn media(raw: RawMedia) -> PollMedia {
    let emoji = raw.emoji.and_then(|emoji| {
        match (emoji.id.as_ref().and_then(json_id), emoji.name) {
            (Some(id), name) => Some(Emoji::Custom {
                id,
                name: name.unwrap_or_else(|| "emoji".to_string()),
            }),
            (None, Some(name)) => Some(Emoji::Unicode(name)),
            (None, None) => None,
        }
    });
    PollMedia {
        text: raw.text,
        emoji,
    }
}

pub fn poll_from_json(value: Value) -> Option<Poll> {
    let raw: RawPoll = match serde_json::from_value(value) {
        Ok(raw) => raw,
        Err(why) => {
            warn!("failed to read poll: {why}");
            return None;
        }
    };

    let finished = raw.results.as_ref().map_or(false, |r| r.is_finalized);
    let counts = raw.results.map(|r| r.answer_counts).unwrap_or_default();
    let answers = raw
        .answers
        .into_iter()
        .map(|answer| {
            let id = json_id(&answer.answer_id);
            let votes = counts
                .iter()
                .find(|c| id.is_some() && json_id(&c.id) == id)
                .map_or(0, |c| c.count);
            PollAnswer {
                media: media(answer.poll_media),
                votes,
            }
        })
        .collect();

    Some(Poll {
        question: media(raw.question),
        answers,
        finished,
    })
}
