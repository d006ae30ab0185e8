//! Attribute-level helpers for `<img>` tags in static HTML.
//!
//! Pages are hand-written, so tags are located with patterns instead of a
//! full parser; edits touch only the matched tag text.

use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::OnceLock;

static IMG_TAG_REGEX: OnceLock<Regex> = OnceLock::new();
static ATTR_REGEX: OnceLock<Regex> = OnceLock::new();
static REMOTE_REGEX: OnceLock<Regex> = OnceLock::new();
static HTTP_REGEX: OnceLock<Regex> = OnceLock::new();

fn img_tag_regex() -> &'static Regex {
    IMG_TAG_REGEX.get_or_init(|| Regex::new(r"(?i)<img\b[^>]*>").unwrap())
}

fn attr_regex() -> &'static Regex {
    ATTR_REGEX.get_or_init(|| {
        Regex::new(r#"([a-zA-Z0-9:-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
    })
}

/// A quoted attribute inside a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr<'a> {
    pub name: &'a str,
    pub value: &'a str,
    /// Byte range of the whole `name="value"` text within the tag.
    pub span: Range<usize>,
}

/// Quoted attributes of `tag`, in source order.
pub fn attr_spans(tag: &str) -> impl Iterator<Item = Attr<'_>> {
    attr_regex().captures_iter(tag).filter_map(|caps| {
        let whole = caps.get(0)?;
        let name = caps.get(1)?.as_str();
        let value = caps.get(2).or_else(|| caps.get(3))?.as_str();
        Some(Attr {
            name,
            value,
            span: whole.range(),
        })
    })
}

/// All `<img>` tags in document order.
pub fn img_tags(html: &str) -> Vec<&str> {
    img_tag_regex().find_iter(html).map(|m| m.as_str()).collect()
}

/// Attribute map with lowercased names. A repeated attribute keeps its last value.
pub fn attrs(tag: &str) -> HashMap<String, String> {
    attr_spans(tag)
        .map(|a| (a.name.to_ascii_lowercase(), a.value.to_string()))
        .collect()
}

pub fn get_attr<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    attr_spans(tag)
        .find(|a| a.name.eq_ignore_ascii_case(name))
        .map(|a| a.value)
}

pub fn has_attr(tag: &str, name: &str) -> bool {
    get_attr(tag, name).is_some()
}

/// Set `name` to `value`, replacing the first existing occurrence or
/// inserting it right after the tag name.
pub fn set_attr(tag: &str, name: &str, value: &str) -> String {
    let rendered = format!("{}=\"{}\"", name, value);

    if let Some(existing) = attr_spans(tag).find(|a| a.name.eq_ignore_ascii_case(name)) {
        let mut out = String::with_capacity(tag.len() + value.len());
        out.push_str(&tag[..existing.span.start]);
        out.push_str(&rendered);
        out.push_str(&tag[existing.span.end..]);
        return out;
    }

    // "<img" is ASCII, so byte 4 is a char boundary
    format!("{} {}{}", &tag[..4], rendered, &tag[4..])
}

/// `http:`, `https:` or protocol-relative URL.
pub fn is_remote_url(url: &str) -> bool {
    REMOTE_REGEX
        .get_or_init(|| Regex::new(r"(?i)^(https?:)?//").unwrap())
        .is_match(url)
}

/// Absolute `http:` or `https:` URL.
pub fn is_http_url(url: &str) -> bool {
    HTTP_REGEX
        .get_or_init(|| Regex::new(r"(?i)^https?://").unwrap())
        .is_match(url)
}
