use crate::errors::Error;
use crate::history::{flatten_history, Order};
use crate::message::migrate_message;
use crate::platform::Platform;
use crate::report::Report;
use crate::structs::{Channel, ChannelKind, ThreadTarget};
use crate::thread::migrate_thread;
use crate::MigrationContext;

use log::{debug, error, info, warn};

async fn migrate_forum<P>(ctx: &MigrationContext<'_, P>, origin: &Channel, dest: &Channel) -> Report
where
    P: Platform + ?Sized,
{
    let mut report = Report::default();

    let mut archived = match ctx.platform.list_archived_posts(origin).await {
        Ok(ids) => ids,
        Err(why) => {
            error!("failed to list archived posts of {}: {why}", origin.id);
            Vec::new()
        }
    };
    archived.reverse();
    info!("migrating {} archived posts of {}", archived.len(), origin.id);
    for id in archived {
        match ctx.platform.fetch_post(origin, id).await {
            Ok(post) => report += migrate_thread(ctx, &post, dest).await,
            Err(why) => {
                warn!("skipping archived post {id}: {why}");
                report.failed += 1;
            }
        }
    }

    let mut active = match ctx.platform.list_active_posts(origin).await {
        Ok(posts) => posts,
        Err(why) => {
            error!("failed to list active posts of {}: {why}", origin.id);
            Vec::new()
        }
    };
    active.reverse();
    info!("migrating {} active posts of {}", active.len(), origin.id);
    for post in &active {
        report += migrate_thread(ctx, post, dest).await;
    }

    report
}

async fn migrate_text<P>(ctx: &MigrationContext<'_, P>, origin: &Channel, dest: &Channel) -> Report
where
    P: Platform + ?Sized,
{
    let mut report = Report::default();
    let mut cursor = ctx.platform.history(origin.id);
    let messages = flatten_history(&mut cursor, Order::OldestFirst).await;
    info!("migrating {} messages of {}", messages.len(), origin.id);

    for msg in &messages {
        if let Some(thread) = &msg.thread {
            report += migrate_thread(ctx, thread, dest).await;
            continue;
        }

        match migrate_message(ctx, msg, dest, ThreadTarget::NotAThread).await {
            Ok(_) => report.migrated += 1,
            Err(Error::Denied(code)) => {
                error!(
                    "channel {} cannot be written to, stopping: {}",
                    dest.id,
                    code.reason()
                );
                report.failed += 1;
                break;
            }
            Err(why) => {
                warn!("failed to migrate message {}: {why}", msg.id);
                report.failed += 1;
            }
        }
    }

    report
}

/// Migrates everything in `origin` into `dest`, oldest content first.
///
/// Forums are copied post by post, archived posts before active ones. Text
/// channels are replayed message by message, with threads copied in place
/// of the message that spawned them. Remote failures are logged and never
/// abort the run, except a destination that cannot be written to at all.
pub async fn migrate_channel<P>(ctx: &MigrationContext<'_, P>, origin: &Channel, dest: &Channel) -> Report
where
    P: Platform + ?Sized,
{
    let report = match (origin.kind, dest.kind) {
        (ChannelKind::Forum, ChannelKind::Forum) => migrate_forum(ctx, origin, dest).await,
        (ChannelKind::Text, ChannelKind::Text) => migrate_text(ctx, origin, dest).await,
        (from, to) => {
            debug!("cannot migrate a {from:?} channel into a {to:?} channel");
            Report::default()
        }
    };
    info!("channel {} migrated into {}: {report}", origin.id, dest.id);
    report
}
