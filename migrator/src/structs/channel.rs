use crate::structs::Message;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Text,
    Forum,
    Other,
}

#[derive(Debug, Clone)]
pub struct Channel {
    pub id: u64,
    pub guild: Option<u64>,
    pub name: String,
    pub kind: ChannelKind,
}

impl Channel {
    pub fn new(id: u64, guild: Option<u64>, name: impl Into<String>, kind: ChannelKind) -> Channel {
        Channel {
            id,
            guild,
            name: name.into(),
            kind,
        }
    }

    /// Only text and forum channels can receive migrated content
    #[inline]
    pub const fn accepts_migration(&self) -> bool {
        matches!(self.kind, ChannelKind::Text | ChannelKind::Forum)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadInfo {
    pub id: u64,
    pub parent: Option<u64>,
    pub name: String,
}

/// A container of messages nested under a channel.
///
/// The root is the message that spawned the thread. It is `None` when the
/// original author deleted it.
#[derive(Debug, Clone)]
pub enum Thread {
    ForumPost {
        info: ThreadInfo,
        initial_post: Option<Box<Message>>,
    },
    PublicThread {
        info: ThreadInfo,
        parent_message: Option<Box<Message>>,
    },
    Private {
        info: ThreadInfo,
    },
}

impl Thread {
    #[inline]
    pub const fn info(&self) -> &ThreadInfo {
        match self {
            Thread::ForumPost { info, .. }
            | Thread::PublicThread { info, .. }
            | Thread::Private { info } => info,
        }
    }

    pub fn root(&self) -> Option<&Message> {
        match self {
            Thread::ForumPost { initial_post, .. } => initial_post.as_deref(),
            Thread::PublicThread { parent_message, .. } => parent_message.as_deref(),
            Thread::Private { .. } => None,
        }
    }
}

/// Where a send should land relative to threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadTarget {
    /// Plain channel message.
    NotAThread,
    /// The next send opens a new thread with this name.
    PendingCreate(String),
    /// Send into this existing thread.
    Existing(u64),
}

impl ThreadTarget {
    #[inline]
    pub const fn is_pending(&self) -> bool {
        matches!(self, ThreadTarget::PendingCreate(_))
    }

    #[inline]
    pub const fn thread_id(&self) -> Option<u64> {
        match self {
            ThreadTarget::Existing(id) => Some(*id),
            _ => None,
        }
    }
}
