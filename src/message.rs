use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identity of a message within a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Which side of the conversation a message is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sender {
    /// The exporting user, drawn on the right
    #[serde(rename = "self")]
    Me,
    /// The other participant, drawn on the left
    #[serde(rename = "other")]
    Them,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::Me => "self",
            Sender::Them => "other",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Sender::Me => "mlg-me",
            Sender::Them => "mlg-them",
        }
    }

    pub fn swapped(self) -> Self {
        match self {
            Sender::Me => Sender::Them,
            Sender::Them => Sender::Me,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    /// Payload is an image URL
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender: Sender,
    #[serde(default)]
    pub kind: MessageKind,
    pub payload: String,
}

impl Message {
    pub fn new(sender: Sender, kind: MessageKind, payload: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            sender,
            kind,
            payload: payload.into(),
        }
    }

    pub fn text(sender: Sender, text: impl Into<String>) -> Self {
        Self::new(sender, MessageKind::Text, text)
    }

    pub fn image(sender: Sender, url: impl Into<String>) -> Self {
        Self::new(sender, MessageKind::Image, url)
    }
}
