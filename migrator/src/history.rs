use crate::errors::{Error, ErrorCode, Result};
use crate::platform::HistoryCursor;
use crate::structs::Message;

use log::{debug, trace, warn};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Order {
    NewestFirst,
    OldestFirst,
}

/// Outcome of advancing a history cursor once
#[derive(Debug)]
pub enum FetchStep {
    Message(Message),
    Skip(Error),
    // None when the history simply ran out
    Stop(Option<ErrorCode>),
}

/// Codes after which nothing more can be read from the container
const fn denies_reading(code: ErrorCode) -> bool {
    matches!(
        code,
        ErrorCode::ArchivedThread
            | ErrorCode::UnknownChannel
            | ErrorCode::MissingAccess
            | ErrorCode::MissingPermissions
    )
}

pub fn classify(next: Option<Result<Message>>) -> FetchStep {
    match next {
        None => FetchStep::Stop(None),
        Some(Ok(msg)) => FetchStep::Message(msg),
        Some(Err(Error::Platform(inner))) => match inner.error_code() {
            Some(code) if denies_reading(code) => FetchStep::Stop(Some(code)),
            _ => FetchStep::Skip(Error::Platform(inner)),
        },
        Some(Err(other)) => FetchStep::Skip(other),
    }
}

/// Drains a cursor into a list, tolerating failures along the way. A denial
/// returns whatever was read before it.
pub async fn flatten_history<C>(cursor: &mut C, order: Order) -> Vec<Message>
where
    C: HistoryCursor + Send + ?Sized,
{
    let mut messages = Vec::new();
    loop {
        match classify(cursor.next().await) {
            FetchStep::Message(msg) => {
                trace!("read message {}", msg.id);
                messages.push(msg);
            }
            FetchStep::Skip(why) => {
                warn!("skipping history entry: {why}");
            }
            FetchStep::Stop(Some(code)) => {
                warn!(
                    "history read stopped after {} messages: {}",
                    messages.len(),
                    code.reason()
                );
                break;
            }
            FetchStep::Stop(None) => break,
        }
    }
    debug!("read {} messages of history", messages.len());

    if order == Order::OldestFirst {
        messages.reverse();
    }
    messages
}
