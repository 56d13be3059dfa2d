use crate::conversation::Conversation;
use crate::preset::StyleRegistry;
use crate::render::render_document_with_registry;
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

fn script_element_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<\s*script\b[^>]*>.*?<\s*/\s*script\s*>").unwrap())
}

/// Remove `<script>` elements (open tag through close tag) before HTML is shown
/// in the live preview. Matching is case-insensitive and spans lines.
///
/// Runs until nothing matches, so a tag split around an inner script element
/// cannot reassemble. Best effort only: this is not a sanitizer and is not
/// applied to exports.
pub fn strip_scripts(html: &str) -> Cow<'_, str> {
    let re = script_element_re();
    if !re.is_match(html) {
        return Cow::Borrowed(html);
    }
    let mut stripped = re.replace_all(html, "").into_owned();
    while re.is_match(&stripped) {
        stripped = re.replace_all(&stripped, "").into_owned();
    }
    Cow::Owned(stripped)
}

/// What the preview and the export show: the rendered conversation, or a
/// hand-edited copy of the HTML once the user has changed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewBuffer {
    edited: Option<String>,
}

impl PreviewBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the output with hand-edited HTML until [`PreviewBuffer::reset`].
    pub fn edit(&mut self, html: impl Into<String>) {
        self.edited = Some(html.into());
    }

    /// Drop the hand edit and go back to rendering the conversation.
    pub fn reset(&mut self) {
        self.edited = None;
    }

    pub fn is_dirty(&self) -> bool {
        self.edited.is_some()
    }

    /// The HTML that would be exported, before any preview filtering.
    pub fn source<'a>(
        &'a self,
        conversation: &Conversation,
        registry: &StyleRegistry,
    ) -> Cow<'a, str> {
        match &self.edited {
            Some(html) => Cow::Borrowed(html.as_str()),
            None => Cow::Owned(render_document_with_registry(conversation, registry)),
        }
    }

    /// HTML safe to hand to the live preview surface.
    pub fn preview_html(&self, conversation: &Conversation, registry: &StyleRegistry) -> String {
        strip_scripts(&self.source(conversation, registry)).into_owned()
    }

    /// HTML written to the export target. Not script-filtered.
    pub fn export_html(&self, conversation: &Conversation, registry: &StyleRegistry) -> String {
        self.source(conversation, registry).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{MessageKind, Sender};
    use crate::render::render_document;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_scripts_basic() {
        assert_eq!(
            strip_scripts("<p>a</p><script>alert(1)</script><p>b</p>"),
            "<p>a</p><p>b</p>"
        );
    }

    #[test]
    fn test_strip_scripts_case_and_whitespace() {
        let html = "<div><SCRIPT type=\"text/javascript\">\nalert(1);\n</ScRiPt ></div>< script>x</ script>";
        assert_eq!(strip_scripts(html), "<div></div>");
    }

    #[test]
    fn test_strip_scripts_non_greedy() {
        let html = "<script>a</script><em>keep</em><script>b</script>";
        assert_eq!(strip_scripts(html), "<em>keep</em>");
    }

    #[test]
    fn test_strip_scripts_nested_split_tag() {
        let html = "<p>a</p><scr<script></script>ipt>alert(1)</script><p>b</p>";
        assert_eq!(strip_scripts(html), "<p>a</p><p>b</p>");

        let deeper = "<scr<scr<script></script>ipt></script>ipt>x</script>";
        assert_eq!(strip_scripts(deeper), "");
    }

    #[test]
    fn test_strip_scripts_leaves_other_tags() {
        let html = "<style>.a{}</style><section class=\"mlg\"><img src=\"x\"></section>";
        assert_eq!(strip_scripts(html), html);
        assert!(matches!(strip_scripts(html), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_scripts_does_not_touch_similar_names() {
        let html = "<scripted>keep</scripted>";
        assert_eq!(strip_scripts(html), html);
    }

    #[test]
    fn test_buffer_renders_until_edited() {
        let registry = StyleRegistry::builtin();
        let mut conv = Conversation::empty();
        conv.add_message(Sender::Me, MessageKind::Text, "hello");

        let mut buffer = PreviewBuffer::new();
        assert!(!buffer.is_dirty());
        assert_eq!(buffer.export_html(&conv, registry), render_document(&conv));

        buffer.edit("<p>mine</p><script>steal()</script>");
        assert!(buffer.is_dirty());
        assert_eq!(buffer.preview_html(&conv, registry), "<p>mine</p>");
        assert_eq!(
            buffer.export_html(&conv, registry),
            "<p>mine</p><script>steal()</script>"
        );

        conv.add_message(Sender::Them, MessageKind::Text, "ignored while dirty");
        assert!(!buffer.export_html(&conv, registry).contains("ignored"));

        buffer.reset();
        assert_eq!(buffer.export_html(&conv, registry), render_document(&conv));
    }
}
