//! Escaping and URL checks for every user-supplied value that ends up in markup.

use url::Url;

const DATA_IMAGE_PREFIX: &str = "data:image/";

/// Escape free text for placement inside markup.
///
/// `&` is replaced first so entities introduced by later substitutions are
/// not escaped twice.
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
        .replace('/', "&#47;")
}

/// Escape an attribute value. Same rules as [`escape_text`].
pub fn escape_attribute(value: &str) -> String {
    escape_text(value)
}

/// Returns `url` unchanged when it is an embedded `data:image/` URL or an
/// absolute `http`/`https` URL, and an empty string otherwise.
pub fn resolve_image_url(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    if url.starts_with(DATA_IMAGE_PREFIX) {
        return url.to_string();
    }
    match Url::parse(url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => url.to_string(),
        _ => String::new(),
    }
}
