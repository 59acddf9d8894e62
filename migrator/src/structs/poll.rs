#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emoji {
    Custom { id: u64, name: String },
    Unicode(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollMedia {
    pub text: Option<String>,
    pub emoji: Option<Emoji>,
}

impl PollMedia {
    pub fn text(text: impl Into<String>) -> PollMedia {
        PollMedia {
            text: Some(text.into()),
            emoji: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollAnswer {
    pub media: PollMedia,
    pub votes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poll {
    pub question: PollMedia,
    pub answers: Vec<PollAnswer>,
    // results are final, no more votes will be counted
    pub finished: bool,
}
