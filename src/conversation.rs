use crate::error::MsglogError;
use crate::message::{Message, MessageId, MessageKind, Sender};
use crate::preset::{StyleRegistry, DEFAULT_STYLE_KEY};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Avatar image URL per side. Empty means no avatar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarMap {
    #[serde(rename = "self")]
    pub me: String,
    #[serde(rename = "other")]
    pub them: String,
}

impl AvatarMap {
    pub fn get(&self, sender: Sender) -> &str {
        match sender {
            Sender::Me => &self.me,
            Sender::Them => &self.them,
        }
    }

    pub fn set(&mut self, sender: Sender, url: impl Into<String>) {
        match sender {
            Sender::Me => self.me = url.into(),
            Sender::Them => self.them = url.into(),
        }
    }
}

/// The message currently being edited and its unsaved text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub id: MessageId,
    pub draft: String,
}

/// Complete in-memory state of a mock conversation.
///
/// This is the only input the renderer reads. Message order is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConversationData")]
pub struct Conversation {
    pub style: String,
    pub avatars: AvatarMap,
    messages: Vec<Message>,
    #[serde(skip)]
    editing: Option<EditSession>,
}

/// Serialized form of [`Conversation`], checked before it becomes one.
#[derive(Deserialize)]
struct ConversationData {
    style: String,
    #[serde(default)]
    avatars: AvatarMap,
    #[serde(default)]
    messages: Vec<Message>,
}

impl TryFrom<ConversationData> for Conversation {
    type Error = MsglogError;

    fn try_from(data: ConversationData) -> Result<Self, Self::Error> {
        let mut seen = HashSet::new();
        for message in &data.messages {
            if !seen.insert(message.id) {
                return Err(MsglogError::DuplicateMessageId {
                    id: message.id.to_string(),
                });
            }
        }
        Ok(Self {
            style: data.style,
            avatars: data.avatars,
            messages: data.messages,
            editing: None,
        })
    }
}

impl Default for Conversation {
    /// Two seed messages on the default style, as shown on first launch.
    fn default() -> Self {
        let mut conversation = Self::empty();
        conversation.messages = vec![
            Message::text(Sender::Them, "Hey there!"),
            Message::text(Sender::Me, "Testing Message Log Generator."),
        ];
        conversation
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// No messages, default style, no avatars.
    pub fn empty() -> Self {
        Self {
            style: DEFAULT_STYLE_KEY.to_string(),
            avatars: AvatarMap::default(),
            messages: Vec::new(),
            editing: None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    fn get_mut(&mut self, id: MessageId) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == id)
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    /// Set the style key. Unknown keys are kept and render with the default preset.
    pub fn set_style(&mut self, key: impl Into<String>) {
        self.style = key.into();
        if StyleRegistry::builtin().get(&self.style).is_none() {
            tracing::debug!(key = %self.style, "style key is not a built-in preset");
        }
    }

    pub fn set_avatar(&mut self, sender: Sender, url: impl Into<String>) {
        self.avatars.set(sender, url);
    }

    /// Append a message. Blank or whitespace-only payloads are ignored.
    pub fn add_message(
        &mut self,
        sender: Sender,
        kind: MessageKind,
        payload: impl Into<String>,
    ) -> Option<MessageId> {
        let payload = payload.into();
        if payload.trim().is_empty() {
            tracing::debug!(sender = sender.as_str(), "ignoring blank message");
            return None;
        }
        let message = Message::new(sender, kind, payload);
        let id = message.id;
        self.messages.push(message);
        Some(id)
    }

    /// Open an edit session on `id`, seeding the draft with its payload.
    /// Replaces any session already open.
    pub fn start_edit(&mut self, id: MessageId) -> bool {
        let Some(draft) = self.get(id).map(|m| m.payload.clone()) else {
            return false;
        };
        self.editing = Some(EditSession { id, draft });
        true
    }

    /// Update the draft text. Targeting a different message than the open
    /// session moves the session to that message.
    pub fn set_draft(&mut self, id: MessageId, text: impl Into<String>) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.editing = Some(EditSession {
            id,
            draft: text.into(),
        });
        true
    }

    /// Write the draft into its message and close the session.
    pub fn save_edit(&mut self) -> bool {
        let Some(session) = self.editing.take() else {
            return false;
        };
        match self.get_mut(session.id) {
            Some(message) => {
                message.payload = session.draft;
                true
            }
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn swap_sender(&mut self, id: MessageId) -> bool {
        match self.get_mut(id) {
            Some(message) => {
                message.sender = message.sender.swapped();
                true
            }
            None => false,
        }
    }

    /// Remove a message. Closes the edit session if it was on this message.
    pub fn delete_message(&mut self, id: MessageId) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != id);
        if self.editing.as_ref().is_some_and(|s| s.id == id) {
            self.editing = None;
        }
        self.messages.len() != before
    }
}
