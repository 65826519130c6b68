//! Locates an image URL inside a loosely-shaped upstream completion payload.
//!
//! Providers do not agree on where the URL goes, so extraction is an ordered
//! list of strategies. The first strategy that yields a URL wins and later
//! strategies are never consulted.

use serde_json::Value;

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp"];
const SCHEMES: &[&str] = &["https://", "http://"];

pub type Extractor = fn(&Value) -> Option<String>;

/// Extraction strategies in priority order.
pub const STRATEGIES: &[(&str, Extractor)] = &[
    ("message_content", from_message_content),
    ("url_field", from_url_field),
    ("output_string", from_output_string),
    ("output_list", from_output_list),
];

/// Returns the first image URL found in `payload`, or `None` when no
/// strategy matches. Never fails on well-formed JSON of any shape.
pub fn extract_image_url(payload: &Value) -> Option<String> {
    STRATEGIES.iter().find_map(|(name, extract)| {
        let url = extract(payload)?;
        log::debug!("Image URL located by strategy '{}'", name);
        Some(url)
    })
}

fn from_message_content(payload: &Value) -> Option<String> {
    let content = payload
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()?;

    find_image_link(content).or_else(|| find_any_link(content))
}

fn from_url_field(payload: &Value) -> Option<String> {
    non_empty_str(payload.get("url")?)
}

fn from_output_string(payload: &Value) -> Option<String> {
    non_empty_str(payload.get("output")?)
}

fn from_output_list(payload: &Value) -> Option<String> {
    non_empty_str(payload.get("output")?.as_array()?.first()?)
}

fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Leftmost `http(s)://` link whose non-whitespace tail ends in a known image
/// extension. When several extensions occur in the same run, the match
/// extends to the last one.
pub fn find_image_link(text: &str) -> Option<String> {
    link_starts(text).find_map(|(start, body_start)| {
        let run = non_whitespace_run(&text[body_start..]).as_bytes();
        // The path needs at least one character before the extension.
        (1..run.len()).rev().find_map(|split| {
            IMAGE_EXTENSIONS
                .iter()
                .find(|ext| starts_with_ignore_case(&run[split..], ext.as_bytes()))
                .map(|ext| text[start..body_start + split + ext.len()].to_string())
        })
    })
}

/// Leftmost `http(s)://` link followed by at least one non-whitespace character.
pub fn find_any_link(text: &str) -> Option<String> {
    link_starts(text).find_map(|(start, body_start)| {
        let run = non_whitespace_run(&text[body_start..]);
        (!run.is_empty()).then(|| text[start..body_start + run.len()].to_string())
    })
}

/// Yields `(scheme_start, body_start)` byte offsets for every scheme prefix,
/// left to right.
fn link_starts(text: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    let bytes = text.as_bytes();
    (0..bytes.len()).filter_map(move |start| {
        SCHEMES
            .iter()
            .find(|scheme| starts_with_ignore_case(&bytes[start..], scheme.as_bytes()))
            .map(|scheme| (start, start + scheme.len()))
    })
}

fn non_whitespace_run(text: &str) -> &str {
    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    &text[..end]
}

fn starts_with_ignore_case(haystack: &[u8], prefix: &[u8]) -> bool {
    haystack.len() >= prefix.len() && haystack[..prefix.len()].eq_ignore_ascii_case(prefix)
}
