use crate::discord::convert;

use async_trait::async_trait;
use log::{debug, warn};
use migrator::structs::Message;
use migrator::HistoryCursor;
use serenity::builder::GetMessages;
use serenity::http::Http;
use serenity::model::channel::Message as DiscordMessage;
use serenity::model::id::{ChannelId, MessageId};
use std::collections::VecDeque;
use std::sync::Arc;

const PAGE_SIZE: u8 = 100;

/// Walks a channel's history backwards a page at a time.
///
/// A failed page is reported to the caller and retried on the next call,
/// until `failure_budget` consecutive failures end the history.
pub struct DiscordHistory {
    http: Arc<Http>,
    channel: ChannelId,
    before: Option<MessageId>,
    buffer: VecDeque<DiscordMessage>,
    exhausted: bool,
    failures: u8,
    failure_budget: u8,
}

impl DiscordHistory {
    pub fn new(http: Arc<Http>, channel: u64, failure_budget: u8) -> DiscordHistory {
        DiscordHistory {
            http,
            channel: ChannelId::new(channel),
            before: None,
            buffer: VecDeque::new(),
            exhausted: false,
            failures: 0,
            failure_budget: failure_budget.max(1),
        }
    }

    async fn fetch_page(&mut self) -> serenity::Result<()> {
        let mut request = GetMessages::new().limit(PAGE_SIZE);
        if let Some(before) = self.before {
            request = request.before(before);
        }
        let page = self.channel.messages(&*self.http, request).await?;
        debug!(
            "fetched {} messages of {} before {:?}",
            page.len(),
            self.channel,
            self.before
        );

        if page.len() < usize::from(PAGE_SIZE) {
            self.exhausted = true;
        }
        self.before = page.last().map(|msg| msg.id);
        self.buffer.extend(page);
        self.failures = 0;
        Ok(())
    }
}

#[async_trait]
impl HistoryCursor for DiscordHistory {
    async fn next(&mut self) -> Option<migrator::Result<Message>> {
        if self.buffer.is_empty() && !self.exhausted {
            if let Err(why) = self.fetch_page().await {
                self.failures += 1;
                if self.failures >= self.failure_budget {
                    warn!(
                        "giving up on history of {} after {} failed pages",
                        self.channel, self.failures
                    );
                    self.exhausted = true;
                }
                return Some(Err(migrator::Error::Platform(convert::platform_error(why))));
            }
        }
        self.buffer.pop_front().map(|msg| Ok(convert::message(&msg)))
    }
}
