//! In-memory platform used by the unit tests.

use crate::errors::{Error, PlatformError, Result};
use crate::platform::{HistoryCursor, Platform};
use crate::structs::{
    Author, Channel, ChannelKind, Message, OutboundMessage, Relay, SentMessage, Sticker, Thread,
};

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::result;
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub enum Step {
    Message(Message),
    // transport failure with this code
    Fail(Option<u32>),
    // local failure unrelated to the transport
    Broken,
}

pub struct FakeCursor {
    steps: VecDeque<Step>,
}

impl FakeCursor {
    pub fn new(steps: Vec<Step>) -> FakeCursor {
        FakeCursor {
            steps: steps.into(),
        }
    }
}

#[async_trait]
impl HistoryCursor for FakeCursor {
    async fn next(&mut self) -> Option<Result<Message>> {
        self.steps.pop_front().map(|step| match step {
            Step::Message(msg) => Ok(msg),
            Step::Fail(code) => Err(Error::Platform(PlatformError::new(code, "scripted"))),
            Step::Broken => Err(Error::ConstStr("broken entry")),
        })
    }
}

pub fn text_message(id: u64, content: &str) -> Message {
    Message {
        id,
        channel: 1,
        guild: Some(1),
        author: Author {
            display_name: format!("author {id}"),
            avatar_url: format!("https://cdn.example/avatars/{id}.png"),
        },
        content: content.to_string(),
        ..Message::default()
    }
}

pub fn text_channel(id: u64) -> Channel {
    Channel::new(id, Some(1), format!("text {id}"), ChannelKind::Text)
}

pub fn forum_channel(id: u64) -> Channel {
    Channel::new(id, Some(1), format!("forum {id}"), ChannelKind::Forum)
}

#[derive(Default)]
struct State {
    relays: Vec<Relay>,
    sends: Vec<(OutboundMessage, SentMessage)>,
    created_threads: Vec<(u64, String, u64)>,
    next_id: u64,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        1000 + self.next_id
    }
}

#[derive(Default)]
pub struct FakePlatform {
    histories: HashMap<u64, Vec<Step>>,
    archived: Vec<Thread>,
    active: Vec<Thread>,
    stickers: Vec<Sticker>,
    send_failures: Vec<(String, Option<u32>)>,
    reject_empty: bool,
    state: Mutex<State>,
}

impl FakePlatform {
    pub fn new() -> FakePlatform {
        FakePlatform::default()
    }

    pub fn with_history(mut self, container: u64, newest_first: Vec<Step>) -> FakePlatform {
        self.histories.insert(container, newest_first);
        self
    }

    pub fn with_relay(self, relay: Relay) -> FakePlatform {
        self.state.lock().unwrap().relays.push(relay);
        self
    }

    pub fn with_sticker(mut self, sticker: Sticker) -> FakePlatform {
        self.stickers.push(sticker);
        self
    }

    pub fn with_archived(mut self, newest_first: Vec<Thread>) -> FakePlatform {
        self.archived = newest_first;
        self
    }

    pub fn with_active(mut self, newest_first: Vec<Thread>) -> FakePlatform {
        self.active = newest_first;
        self
    }

    /// Any send whose content contains `marker` fails with `code`
    pub fn fail_send_containing(mut self, marker: &str, code: Option<u32>) -> FakePlatform {
        self.send_failures.push((marker.to_string(), code));
        self
    }

    /// Reject sends with neither content nor embeds, like the real platform
    pub fn reject_empty(mut self) -> FakePlatform {
        self.reject_empty = true;
        self
    }

    pub fn relay_count(&self) -> usize {
        self.state.lock().unwrap().relays.len()
    }

    /// Every successful send, in order
    pub fn sends(&self) -> Vec<OutboundMessage> {
        let state = self.state.lock().unwrap();
        state.sends.iter().map(|(out, _)| out.clone()).collect()
    }

    pub fn sent_ids(&self) -> Vec<u64> {
        let state = self.state.lock().unwrap();
        state.sends.iter().map(|(_, sent)| sent.id).collect()
    }

    pub fn sent_threads(&self) -> Vec<Option<u64>> {
        let state = self.state.lock().unwrap();
        state.sends.iter().map(|(_, sent)| sent.thread).collect()
    }

    /// (source message id, thread name, thread id) per thread opened from a message
    pub fn created_threads(&self) -> Vec<(u64, String, u64)> {
        self.state.lock().unwrap().created_threads.clone()
    }

    fn all_posts(&self) -> impl Iterator<Item = &Thread> {
        self.archived.iter().chain(self.active.iter())
    }
}

#[async_trait]
impl Platform for FakePlatform {
    type Cursor = FakeCursor;

    fn history(&self, container: u64) -> FakeCursor {
        FakeCursor::new(self.histories.get(&container).cloned().unwrap_or_default())
    }

    async fn list_relays(&self, channel: &Channel) -> result::Result<Vec<Relay>, PlatformError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .relays
            .iter()
            .filter(|r| r.channel == channel.id)
            .cloned()
            .collect())
    }

    async fn create_relay(
        &self,
        channel: &Channel,
        name: &str,
        _avatar: Option<&str>,
    ) -> result::Result<Relay, PlatformError> {
        let mut state = self.state.lock().unwrap();
        let relay = Relay {
            id: state.next_id(),
            channel: channel.id,
            name: Some(name.to_string()),
            managed: true,
        };
        state.relays.push(relay.clone());
        Ok(relay)
    }

    async fn send_via_relay(
        &self,
        relay: &Relay,
        message: &OutboundMessage,
    ) -> result::Result<SentMessage, PlatformError> {
        if let Some((_, code)) = self
            .send_failures
            .iter()
            .find(|(marker, _)| message.content.contains(marker.as_str()))
        {
            return Err(PlatformError::new(*code, "scripted send failure"));
        }
        if self.reject_empty && message.content.is_empty() && message.embeds.is_empty() {
            return Err(PlatformError::new(Some(50006), "Cannot send an empty message"));
        }

        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let thread = match (message.thread, &message.thread_name) {
            (Some(thread), _) => Some(thread),
            (None, Some(_)) => Some(state.next_id()),
            (None, None) => None,
        };
        let sent = SentMessage {
            id,
            channel: thread.unwrap_or(relay.channel),
            thread,
        };
        state.sends.push((message.clone(), sent.clone()));
        Ok(sent)
    }

    async fn list_archived_posts(&self, _forum: &Channel) -> result::Result<Vec<u64>, PlatformError> {
        Ok(self.archived.iter().map(|t| t.info().id).collect())
    }

    async fn list_active_posts(&self, _forum: &Channel) -> result::Result<Vec<Thread>, PlatformError> {
        Ok(self.active.clone())
    }

    async fn fetch_post(&self, _forum: &Channel, id: u64) -> result::Result<Thread, PlatformError> {
        self.all_posts()
            .find(|t| t.info().id == id)
            .cloned()
            .ok_or_else(|| PlatformError::new(Some(10003), "Unknown Channel"))
    }

    async fn create_thread_from_message(
        &self,
        _channel: &Channel,
        message: &SentMessage,
        name: &str,
    ) -> result::Result<u64, PlatformError> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state
            .created_threads
            .push((message.id, name.to_string(), id));
        Ok(id)
    }

    async fn guild_stickers(&self, _guild: u64) -> result::Result<Vec<Sticker>, PlatformError> {
        Ok(self.stickers.clone())
    }
}
