use crate::compose::compose;
use crate::errors::{Error, ErrorCode, Result};
use crate::platform::Platform;
use crate::relay::resolve_relay;
use crate::structs::{Channel, Message, OutboundMessage, Relay, SentMessage, ThreadTarget};
use crate::MigrationContext;

use log::{debug, trace, warn};

/// Result of reposting one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migrated {
    // where the next message of the same logical thread should go
    pub thread: ThreadTarget,
    pub sent: Option<SentMessage>,
}

/// Codes meaning the destination cannot be written to at all
const fn is_unreachable(code: ErrorCode) -> bool {
    matches!(
        code,
        ErrorCode::UnknownChannel
            | ErrorCode::UnknownMessage
            | ErrorCode::MissingAccess
            | ErrorCode::MissingPermissions
    )
}

fn fallback_notice(message: &Message, code: Option<ErrorCode>) -> String {
    let reason = code.map_or_else(|| "of unknown error code".to_string(), |c| c.reason());
    format!(
        "Message {} {} cannot be migrated because {reason}",
        message.jump_url(),
        message.id
    )
}

/// Reposts `message` into `dest` through the channel's relay under the
/// original author's name and avatar.
///
/// Bodies longer than the platform limit are sent as a chain of messages,
/// each replying to the previous one. A send rejected for a recoverable
/// reason is replaced by a single notice linking the original. A rejection
/// meaning the destination is unreachable aborts with `Error::Denied`.
pub async fn migrate_message<P>(
    ctx: &MigrationContext<'_, P>,
    message: &Message,
    dest: &Channel,
    target: ThreadTarget,
) -> Result<Migrated>
where
    P: Platform + ?Sized,
{
    repost(ctx, message, dest, target, false).await
}

/// Like `migrate_message`, but always sends at least one payload so a
/// thread can be opened on the result.
pub(crate) async fn migrate_root<P>(
    ctx: &MigrationContext<'_, P>,
    message: &Message,
    dest: &Channel,
    target: ThreadTarget,
) -> Result<Migrated>
where
    P: Platform + ?Sized,
{
    repost(ctx, message, dest, target, true).await
}

async fn repost<P>(
    ctx: &MigrationContext<'_, P>,
    message: &Message,
    dest: &Channel,
    target: ThreadTarget,
    always_send: bool,
) -> Result<Migrated>
where
    P: Platform + ?Sized,
{
    if !dest.accepts_migration() {
        return Err(Error::UnsupportedDestination(dest.kind));
    }

    trace!(
        "migrating message {} posted {} into channel {}",
        message.id,
        message.created_at,
        dest.id
    );
    let relay = resolve_relay(ctx.platform, ctx.relay, dest).await?;
    let composed = compose(ctx.platform, message, dest).await;

    let mut chunks = composed.chunks;
    if chunks.is_empty() {
        // embeds alone are postable, and a pending thread must still be opened
        if composed.embeds.is_empty() && !target.is_pending() && !always_send {
            trace!("message {} has nothing to send", message.id);
            return Ok(Migrated {
                thread: target,
                sent: None,
            });
        }
        chunks.push(String::new());
    }

    let mut sender = Sender {
        platform: ctx.platform,
        relay: &relay,
        message,
        target,
        last: None,
    };

    for (i, chunk) in chunks.into_iter().enumerate() {
        let embeds = if i == 0 {
            composed.embeds.clone()
        } else {
            Vec::new()
        };
        let outbound = sender.outbound(chunk, embeds, true);
        match sender.send(&outbound).await {
            Ok(()) => {}
            Err(Error::Platform(why)) => {
                let code = why.error_code();
                if let Some(code) = code.filter(|c| is_unreachable(*c)) {
                    warn!(
                        "message {} cannot reach channel {}: {}",
                        message.id,
                        dest.id,
                        code.reason()
                    );
                    return Err(Error::Denied(code));
                }

                warn!(
                    "message {} rejected ({why}), posting a notice instead",
                    message.id
                );
                let notice = sender.outbound(fallback_notice(message, code), Vec::new(), false);
                sender.send(&notice).await?;
                break;
            }
            Err(other) => return Err(other),
        }
    }

    debug!(
        "migrated message {} into channel {} ({:?})",
        message.id, dest.id, sender.target
    );
    Ok(Migrated {
        thread: sender.target,
        sent: sender.last,
    })
}

/// Per-message send state: the reply chain and the thread it is landing in
struct Sender<'a, P: ?Sized> {
    platform: &'a P,
    relay: &'a Relay,
    message: &'a Message,
    target: ThreadTarget,
    last: Option<SentMessage>,
}

impl<P> Sender<'_, P>
where
    P: Platform + ?Sized,
{
    fn outbound(&self, content: String, embeds: Vec<serde_json::Value>, chain: bool) -> OutboundMessage {
        let (thread, thread_name) = match &self.target {
            ThreadTarget::NotAThread => (None, None),
            ThreadTarget::PendingCreate(name) => (None, Some(name.clone())),
            ThreadTarget::Existing(id) => (Some(*id), None),
        };
        let author = &self.message.author;
        OutboundMessage {
            content,
            embeds,
            username: Some(author.display_name.clone()),
            avatar_url: Some(author.avatar_url.clone()).filter(|url| !url.is_empty()),
            reply_to: if chain {
                self.last.as_ref().map(|sent| sent.id)
            } else {
                None
            },
            thread,
            thread_name,
        }
    }

    async fn send(&mut self, outbound: &OutboundMessage) -> Result<()> {
        let sent = self.platform.send_via_relay(self.relay, outbound).await?;
        if let Some(thread) = sent.thread {
            // once a thread exists every later chunk goes into it
            self.target = ThreadTarget::Existing(thread);
        }
        self.last = Some(sent);
        Ok(())
    }
}
