//! Conversation snapshot to export HTML.
//!
//! Every user-supplied value passes through [`escape_text`], [`escape_attribute`]
//! or [`resolve_image_url`] before it is written. No scripts, no event handlers.

use crate::conversation::{AvatarMap, Conversation};
use crate::message::{Message, MessageKind};
use crate::preset::StyleRegistry;
use crate::sanitize::{escape_attribute, escape_text, resolve_image_url};

/// Bubble text shown in place of an image whose URL was rejected.
pub const INVALID_IMAGE_PLACEHOLDER: &str = "[Invalid image URL]";

/// Render one message as an `<article>` holding an optional avatar and a bubble.
///
/// Markup order is always avatar then bubble; the `mlg-me` class flips the
/// visual order for the user's own messages.
pub fn render_message(message: &Message, avatars: &AvatarMap) -> String {
    let mut out = String::new();
    write_message(&mut out, message, avatars);
    out
}

fn write_message(out: &mut String, message: &Message, avatars: &AvatarMap) {
    out.push_str("<article class=\"mlg-message ");
    out.push_str(message.sender.css_class());
    out.push_str("\">");

    let avatar_url = resolve_image_url(avatars.get(message.sender));
    if !avatar_url.is_empty() {
        out.push_str(&format!(
            "<img class=\"mlg-avatar\" src=\"{}\" alt=\"{} avatar\">",
            escape_attribute(&avatar_url),
            message.sender.as_str()
        ));
    }

    match message.kind {
        MessageKind::Image => {
            let image_url = resolve_image_url(&message.payload);
            if image_url.is_empty() {
                out.push_str(&format!(
                    "<p class=\"mlg-bubble\">{}</p>",
                    escape_text(INVALID_IMAGE_PLACEHOLDER)
                ));
            } else {
                out.push_str(&format!(
                    "<div class=\"mlg-bubble mlg-bubble--image\"><img class=\"mlg-bubble-img\" src=\"{}\" alt=\"image\" /></div>",
                    escape_attribute(&image_url)
                ));
            }
        }
        MessageKind::Text => {
            out.push_str(&format!(
                "<p class=\"mlg-bubble\">{}</p>",
                escape_text(&message.payload)
            ));
        }
    }

    out.push_str("</article>");
}

/// Render a full export document using the built-in style registry.
pub fn render_document(conversation: &Conversation) -> String {
    render_document_with_registry(conversation, StyleRegistry::builtin())
}

/// Render a full export document: the compiled stylesheet followed by the
/// message thread. Output depends only on `conversation` and `registry`.
pub fn render_document_with_registry(
    conversation: &Conversation,
    registry: &StyleRegistry,
) -> String {
    let preset = registry.resolve(&conversation.style);
    let css = registry.compile_style_block(&preset.key);

    let mut html = String::new();
    html.push_str("<style>");
    html.push_str(&css);
    html.push_str("</style>");
    html.push_str("<div class=\"mlg-wrap\">");
    html.push_str(&format!(
        "<section class=\"mlg {}\">",
        escape_attribute(&preset.class_name())
    ));
    html.push_str("<div class=\"mlg-thread\">");
    for message in conversation.messages() {
        write_message(&mut html, message, &conversation.avatars);
    }
    html.push_str("</div></section></div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Sender;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_text_message() {
        let msg = Message::text(Sender::Me, "Hi");
        assert_eq!(
            render_message(&msg, &AvatarMap::default()),
            r#"<article class="mlg-message mlg-me"><p class="mlg-bubble">Hi</p></article>"#
        );
    }

    #[test]
    fn test_render_text_is_escaped() {
        let msg = Message::text(Sender::Them, "<b>bold</b> & \"quoted\"");
        assert_eq!(
            render_message(&msg, &AvatarMap::default()),
            "<article class=\"mlg-message mlg-them\"><p class=\"mlg-bubble\">&lt;b&gt;bold&lt;&#47;b&gt; &amp; &quot;quoted&quot;</p></article>"
        );
    }

    #[test]
    fn test_render_avatar_when_valid() {
        let avatars = AvatarMap {
            me: String::new(),
            them: "https://example.com/a.png".to_string(),
        };
        let msg = Message::text(Sender::Them, "yo");
        assert_eq!(
            render_message(&msg, &avatars),
            "<article class=\"mlg-message mlg-them\"><img class=\"mlg-avatar\" src=\"https:&#47;&#47;example.com&#47;a.png\" alt=\"other avatar\"><p class=\"mlg-bubble\">yo</p></article>"
        );

        let mine = Message::text(Sender::Me, "yo");
        assert!(!render_message(&mine, &avatars).contains("mlg-avatar"));
    }

    #[test]
    fn test_render_avatar_rejected_url_is_omitted() {
        let avatars = AvatarMap {
            me: "javascript:alert(1)".to_string(),
            them: String::new(),
        };
        let html = render_message(&Message::text(Sender::Me, "x"), &avatars);
        assert!(!html.contains("<img"));
        assert!(!html.contains("javascript"));
    }

    #[test]
    fn test_render_image_message() {
        let msg = Message::image(Sender::Me, "data:image/png;base64,AAAA");
        assert_eq!(
            render_message(&msg, &AvatarMap::default()),
            "<article class=\"mlg-message mlg-me\"><div class=\"mlg-bubble mlg-bubble--image\"><img class=\"mlg-bubble-img\" src=\"data:image&#47;png;base64,AAAA\" alt=\"image\" /></div></article>"
        );
    }

    #[test]
    fn test_render_invalid_image_placeholder() {
        let msg = Message::image(Sender::Them, "javascript:alert(1)");
        let html = render_message(&msg, &AvatarMap::default());
        assert_eq!(
            html,
            "<article class=\"mlg-message mlg-them\"><p class=\"mlg-bubble\">[Invalid image URL]</p></article>"
        );
    }

    #[test]
    fn test_render_image_url_quotes_are_escaped() {
        let msg = Message::image(Sender::Me, "https://x/a.png?\"onerror=\"alert(1)");
        let html = render_message(&msg, &AvatarMap::default());
        assert!(!html.contains("\"onerror"));
        assert!(html.contains("&quot;onerror=&quot;"));
    }

    #[test]
    fn test_render_document_shape() {
        let mut conv = Conversation::empty();
        conv.set_style("line");
        conv.add_message(Sender::Them, MessageKind::Text, "a");
        conv.add_message(Sender::Me, MessageKind::Text, "b");

        let html = render_document(&conv);
        let css = StyleRegistry::builtin().compile_style_block("line");
        let expected = format!(
            "<style>{}</style><div class=\"mlg-wrap\"><section class=\"mlg mlg-line\"><div class=\"mlg-thread\">\
<article class=\"mlg-message mlg-them\"><p class=\"mlg-bubble\">a</p></article>\
<article class=\"mlg-message mlg-me\"><p class=\"mlg-bubble\">b</p></article>\
</div></section></div>",
            css
        );
        assert_eq!(html, expected);
    }

    #[test]
    fn test_render_document_empty_thread() {
        let html = render_document(&Conversation::empty());
        assert!(html.ends_with("<div class=\"mlg-thread\"></div></section></div>"));
    }

    #[test]
    fn test_render_document_unknown_style_uses_default() {
        let mut conv = Conversation::empty();
        conv.set_style("\"><script>alert(1)</script>");
        let html = render_document(&conv);
        assert!(html.contains("<section class=\"mlg mlg-imessage\">"));
        assert!(html.contains("--mlg-me-bg: #007aff;"));
        assert!(!html.contains("<script>"));
    }
}
