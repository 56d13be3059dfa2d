//! # msglog
//!
//! Renders a mock chat conversation as a self-contained HTML fragment styled
//! after a chat app (iMessage, KakaoTalk, Instagram DM, Twitter DM, LINE).
//!
//! ## Features
//! - Owned conversation snapshot with add / edit / swap / delete operations
//! - Built-in style presets, extendable from YAML
//! - Escaping of all user text and an allow-list for image URLs
//! - Script stripping for the live preview
//!
//! ## Example
//! ```ignore
//! use msglog::{render_document, Conversation, MessageKind, Sender};
//!
//! let mut conv = Conversation::empty();
//! conv.set_style("kakao");
//! conv.add_message(Sender::Them, MessageKind::Text, "Lunch?");
//! conv.add_message(Sender::Me, MessageKind::Text, "Sure");
//!
//! let html = render_document(&conv);
//! ```

pub mod conversation;
pub mod error;
pub mod export;
pub mod message;
pub mod preset;
pub mod preview;
pub mod render;
pub mod sanitize;

// --- Core types ---
pub use conversation::{AvatarMap, Conversation, EditSession};
pub use error::{ClipboardError, MsglogError, MsglogResult};
pub use export::{ClipboardSink, CopyButton, CopyStatus};
pub use message::{Message, MessageId, MessageKind, Sender};
pub use preset::{StylePreset, StyleRegistry, DEFAULT_STYLE_KEY};
pub use preview::PreviewBuffer;

// --- Pure functions ---
pub use preset::{compile_style_block, resolve_style};
pub use preview::strip_scripts;
pub use render::{render_document, render_document_with_registry, render_message};
pub use sanitize::{escape_attribute, escape_text, resolve_image_url};

/// Load a style registry from YAML (built-ins included unless disabled)
pub fn load_registry(yaml: &str) -> MsglogResult<StyleRegistry> {
    StyleRegistry::from_yaml(yaml)
}
