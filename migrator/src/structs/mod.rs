mod channel;
mod message;
mod outbound;
mod poll;

pub use channel::{Channel, ChannelKind, Thread, ThreadInfo, ThreadTarget};
pub use message::{Author, Message, MessageKind, Sticker, StickerRef};
pub use outbound::{OutboundMessage, Relay, SentMessage};
pub use poll::{Emoji, Poll, PollAnswer, PollMedia};
