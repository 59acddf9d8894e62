use crate::errors::{Error, Result};
use crate::history::{flatten_history, Order};
use crate::message::{migrate_message, migrate_root};
use crate::platform::Platform;
use crate::relay::resolve_relay;
use crate::report::Report;
use crate::structs::{Channel, ChannelKind, OutboundMessage, Thread, ThreadTarget};
use crate::MigrationContext;

use log::{debug, error, info};

const DELETED_ROOT_PLACEHOLDER: &str = "This message has been deleted by original author";

/// Forum posts go to forums, public threads go to text channels
fn kinds_compatible(origin: &Thread, dest: ChannelKind) -> bool {
    matches!(
        (origin, dest),
        (Thread::ForumPost { .. }, ChannelKind::Forum)
            | (Thread::PublicThread { .. }, ChannelKind::Text)
    )
}

/// Opens the destination thread for an origin whose root message is gone.
async fn open_with_placeholder<P>(
    ctx: &MigrationContext<'_, P>,
    origin: &Thread,
    dest: &Channel,
) -> Result<u64>
where
    P: Platform + ?Sized,
{
    let relay = resolve_relay(ctx.platform, ctx.relay, dest).await?;
    let name = &origin.info().name;

    match dest.kind {
        ChannelKind::Forum => {
            let placeholder = OutboundMessage {
                thread_name: Some(name.clone()),
                ..OutboundMessage::new(DELETED_ROOT_PLACEHOLDER)
            };
            let sent = ctx.platform.send_via_relay(&relay, &placeholder).await?;
            sent.thread
                .ok_or(Error::ConstStr("placeholder post did not open a thread"))
        }
        ChannelKind::Text => {
            let placeholder = OutboundMessage::new(DELETED_ROOT_PLACEHOLDER);
            let sent = ctx.platform.send_via_relay(&relay, &placeholder).await?;
            Ok(ctx
                .platform
                .create_thread_from_message(dest, &sent, name)
                .await?)
        }
        ChannelKind::Other => Err(Error::UnsupportedDestination(dest.kind)),
    }
}

/// Reposts the root of a plain thread into the channel and opens the
/// destination thread from the result.
async fn open_from_root<P>(
    ctx: &MigrationContext<'_, P>,
    origin: &Thread,
    dest: &Channel,
) -> Result<u64>
where
    P: Platform + ?Sized,
{
    let root = origin
        .root()
        .ok_or(Error::ConstStr("thread has no root message"))?;
    let migrated = migrate_root(ctx, root, dest, ThreadTarget::NotAThread).await?;
    let sent = migrated
        .sent
        .ok_or(Error::ConstStr("root message produced nothing to open a thread on"))?;
    debug!("opening thread from sent message {}", sent.id);
    Ok(ctx
        .platform
        .create_thread_from_message(dest, &sent, &origin.info().name)
        .await?)
}

/// Replicates one thread or forum post into `dest`.
///
/// The destination thread is opened by the root message when it still
/// exists, otherwise by a placeholder. Empty messages are skipped unless
/// they have to open the thread. The first message that cannot be migrated
/// ends the thread, since its destination can no longer be tracked.
pub async fn migrate_thread<P>(ctx: &MigrationContext<'_, P>, origin: &Thread, dest: &Channel) -> Report
where
    P: Platform + ?Sized,
{
    let mut report = Report::default();
    let info = origin.info();
    if !kinds_compatible(origin, dest.kind) {
        debug!(
            "thread {} cannot be migrated into a {:?} channel",
            info.id, dest.kind
        );
        return report;
    }
    report.threads = 1;

    let mut cursor = ctx.platform.history(info.id);
    let history = flatten_history(&mut cursor, Order::OldestFirst).await;
    info!(
        "migrating thread {} ({}) with {} messages into channel {}",
        info.id,
        info.name,
        history.len(),
        dest.id
    );

    let root = origin.root();
    let mut target = ThreadTarget::PendingCreate(info.name.clone());
    if root.is_none() {
        match open_with_placeholder(ctx, origin, dest).await {
            Ok(id) => target = ThreadTarget::Existing(id),
            Err(why) => {
                error!("failed to open thread for {}: {why}", info.id);
                report.failed += 1;
                return report;
            }
        }
    }

    for (i, msg) in history.iter().enumerate() {
        if i == 0 {
            if let Some(root) = root {
                // (next target, whether the root was sent)
                let opened = match origin {
                    Thread::ForumPost { .. } if root.id != msg.id => {
                        migrate_root(ctx, root, dest, target.clone())
                            .await
                            .map(|m| (m.thread, m.sent.is_some()))
                    }
                    Thread::PublicThread { .. } => open_from_root(ctx, origin, dest)
                        .await
                        .map(|id| (ThreadTarget::Existing(id), true)),
                    _ => Ok((target.clone(), false)),
                };
                match opened {
                    Ok((next, sent)) => {
                        if sent {
                            report.migrated += 1;
                        }
                        target = next;
                    }
                    Err(why) => {
                        error!("failed to open thread for {}: {why}", info.id);
                        report.failed += 1;
                        return report;
                    }
                }
            }
        }

        if msg.is_empty() && !target.is_pending() {
            report.skipped += 1;
            continue;
        }

        match migrate_message(ctx, msg, dest, target.clone()).await {
            Ok(migrated) => {
                report.migrated += 1;
                target = migrated.thread;
            }
            Err(why) => {
                error!(
                    "stopping thread {} at message {}: {why}",
                    info.id, msg.id
                );
                report.failed += 1;
                break;
            }
        }
    }

    info!("thread {} done: {report}", info.id);
    report
}
