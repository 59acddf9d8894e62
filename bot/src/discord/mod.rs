//! Discord adapter for the migration engine, built on serenity's REST client.

mod convert;
mod history;
mod relay_cache;

pub use history::DiscordHistory;

use crate::errors::{Error, Result};
use relay_cache::RelayCache;

use async_trait::async_trait;
use log::{debug, info, trace, warn};
use migrator::structs::{Channel, OutboundMessage, Relay, SentMessage, Sticker, Thread};
use migrator::{Platform, PlatformError};
use serenity::builder::{
    CreateAllowedMentions, CreateAttachment, CreateThread, CreateWebhook, ExecuteWebhook,
};
use serenity::http::Http;
use serenity::model::channel::GuildChannel;
use serenity::model::id::{ChannelId, GuildId, MessageId, WebhookId};
use serenity::model::webhook::Webhook;
use std::result;
use std::sync::Arc;

const AUDIT_REASON: &str = "Message migration";

fn local_error(err: Error) -> PlatformError {
    PlatformError::new(None, err.to_string())
}

pub struct DiscordPlatform {
    http: Arc<Http>,
    page_failure_budget: u8,
    webhooks: RelayCache,
}

impl DiscordPlatform {
    pub fn new(token: &str, page_failure_budget: u8) -> DiscordPlatform {
        DiscordPlatform {
            http: Arc::new(Http::new(token)),
            page_failure_budget,
            webhooks: RelayCache::default(),
        }
    }

    /// Resolves a guild channel by id
    pub async fn channel(&self, id: u64) -> Result<Channel> {
        match ChannelId::new(id).to_channel(&*self.http).await?.guild() {
            Some(channel) => Ok(convert::channel(&channel)),
            None => Err(Error::Internal(format!("{id} is not a guild channel"))),
        }
    }

    async fn guild_channel(&self, id: u64) -> serenity::Result<Option<GuildChannel>> {
        Ok(ChannelId::new(id).to_channel(&*self.http).await?.guild())
    }

    async fn webhook(&self, relay: &Relay) -> result::Result<Webhook, PlatformError> {
        if let Some(webhook) = self.webhooks.get(relay.id).map_err(local_error)? {
            return Ok(webhook);
        }
        debug!("webhook {} not cached, fetching", relay.id);
        let webhook = Webhook::from_id(&*self.http, WebhookId::new(relay.id))
            .await
            .map_err(convert::platform_error)?;
        self.webhooks.insert(&webhook).map_err(local_error)?;
        Ok(webhook)
    }

    async fn post(&self, thread: &GuildChannel) -> result::Result<Thread, PlatformError> {
        // a forum post's starter message shares the post's id
        let fetched = thread
            .id
            .message(&*self.http, MessageId::new(thread.id.get()))
            .await
            .map_err(convert::platform_error);
        let initial_post = convert::initial_post(fetched)?;
        if initial_post.is_none() {
            debug!("post {} has no initial message", thread.id);
        }
        Ok(convert::forum_post(thread, initial_post))
    }
}

#[async_trait]
impl Platform for DiscordPlatform {
    type Cursor = DiscordHistory;

    fn history(&self, container: u64) -> DiscordHistory {
        DiscordHistory::new(Arc::clone(&self.http), container, self.page_failure_budget)
    }

    async fn list_relays(&self, channel: &Channel) -> result::Result<Vec<Relay>, PlatformError> {
        let webhooks = ChannelId::new(channel.id)
            .webhooks(&*self.http)
            .await
            .map_err(convert::platform_error)?;
        let mut relays = Vec::with_capacity(webhooks.len());
        for webhook in &webhooks {
            self.webhooks.insert(webhook).map_err(local_error)?;
            relays.push(convert::relay(webhook, channel.id));
        }
        Ok(relays)
    }

    async fn create_relay(
        &self,
        channel: &Channel,
        name: &str,
        avatar: Option<&str>,
    ) -> result::Result<Relay, PlatformError> {
        let attachment = match avatar {
            Some(path) => match CreateAttachment::path(path).await {
                Ok(attachment) => Some(attachment),
                Err(why) => {
                    warn!("could not read relay avatar {path}: {why}");
                    None
                }
            },
            None => None,
        };
        let mut builder = CreateWebhook::new(name).audit_log_reason(AUDIT_REASON);
        if let Some(attachment) = attachment.as_ref() {
            builder = builder.avatar(attachment);
        }

        let webhook = ChannelId::new(channel.id)
            .create_webhook(&*self.http, builder)
            .await
            .map_err(convert::platform_error)?;
        info!("created relay {} in {}", webhook.id, channel.id);
        self.webhooks.insert(&webhook).map_err(local_error)?;
        Ok(convert::relay(&webhook, channel.id))
    }

    async fn send_via_relay(
        &self,
        relay: &Relay,
        message: &OutboundMessage,
    ) -> result::Result<SentMessage, PlatformError> {
        let webhook = self.webhook(relay).await?;

        if let Some(reply_to) = message.reply_to {
            // webhooks cannot reply, so the chain is not rendered
            trace!("dropping reply reference to {reply_to}");
        }
        let mut builder = ExecuteWebhook::new()
            .content(message.content.as_str())
            .embeds(message.embeds.iter().filter_map(convert::create_embed).collect())
            .allowed_mentions(CreateAllowedMentions::new());
        if let Some(username) = message.username.as_ref() {
            builder = builder.username(username.as_str());
        }
        if let Some(avatar_url) = message.avatar_url.as_ref() {
            builder = builder.avatar_url(avatar_url.as_str());
        }
        if let Some(thread) = message.thread {
            builder = builder.in_thread(ChannelId::new(thread));
        }
        if let Some(name) = message.thread_name.as_ref() {
            builder = builder.thread_name(name.clone());
        }

        let sent = webhook
            .execute(&*self.http, true, builder)
            .await
            .map_err(convert::platform_error)?;
        match sent {
            Some(sent) => Ok(convert::sent(
                &sent,
                message.thread.is_some() || message.thread_name.is_some(),
            )),
            None => Err(PlatformError::new(None, "webhook returned no message")),
        }
    }

    async fn list_archived_posts(&self, forum: &Channel) -> result::Result<Vec<u64>, PlatformError> {
        let data = ChannelId::new(forum.id)
            .get_archived_public_threads(&*self.http, None, None)
            .await
            .map_err(convert::platform_error)?;
        if data.has_more {
            warn!("forum {} has more archived posts than a single listing returns", forum.id);
        }
        Ok(data.threads.iter().map(|t| t.id.get()).collect())
    }

    async fn list_active_posts(
        &self,
        forum: &Channel,
    ) -> result::Result<Vec<Thread>, PlatformError> {
        let guild = match forum.guild {
            Some(guild) => GuildId::new(guild),
            None => return Ok(Vec::new()),
        };
        let data = guild
            .get_active_threads(&*self.http)
            .await
            .map_err(convert::platform_error)?;

        let mut threads: Vec<&GuildChannel> = data
            .threads
            .iter()
            .filter(|t| t.parent_id.map(|p| p.get()) == Some(forum.id))
            .collect();
        threads.sort_by(|a, b| b.id.cmp(&a.id));

        let mut posts = Vec::with_capacity(threads.len());
        for thread in threads {
            match self.post(thread).await {
                Ok(post) => posts.push(post),
                Err(why) => warn!("skipping active post {}: {why}", thread.id),
            }
        }
        Ok(posts)
    }

    async fn fetch_post(&self, _forum: &Channel, id: u64) -> result::Result<Thread, PlatformError> {
        match self.guild_channel(id).await {
            Ok(Some(thread)) => self.post(&thread).await,
            Ok(None) => Err(PlatformError::new(Some(10003), format!("{id} is not a post"))),
            Err(why) => Err(convert::platform_error(why)),
        }
    }

    async fn create_thread_from_message(
        &self,
        channel: &Channel,
        message: &SentMessage,
        name: &str,
    ) -> result::Result<u64, PlatformError> {
        let thread = ChannelId::new(channel.id)
            .create_thread_from_message(
                &*self.http,
                MessageId::new(message.id),
                CreateThread::new(name).audit_log_reason(AUDIT_REASON),
            )
            .await
            .map_err(convert::platform_error)?;
        Ok(thread.id.get())
    }

    async fn guild_stickers(&self, guild: u64) -> result::Result<Vec<Sticker>, PlatformError> {
        let stickers = GuildId::new(guild)
            .stickers(&*self.http)
            .await
            .map_err(convert::platform_error)?;
        Ok(stickers.iter().filter_map(convert::sticker).collect())
    }
}
