//! Identifier extraction from request paths
//!
//! Every parser returns `None` when the path does not match. None of them
//! fail on malformed input.

use regex::Regex;
use std::sync::LazyLock;

static STREAM_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/stream/([A-Za-z0-9-]+)").expect("valid stream key regex"));

static MANIFEST_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/stream/([A-Za-z0-9-]+)_?.*\.(?:m3u8|ts)$").expect("valid manifest id regex")
});

static SEGMENT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/stream/(.+\.ts)$").expect("valid segment regex"));

/// Stream key (or session id) from `/stream/{key}`
pub fn parse_stream_key(path: &str) -> Option<&str> {
    STREAM_KEY_RE
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Manifest or variant id from `/stream/{id}[_suffix].m3u8` or `/stream/{id}....ts`
///
/// The id is everything before the first underscore, slash or extension.
pub fn parse_manifest_id(path: &str) -> Option<&str> {
    MANIFEST_ID_RE
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Segment name: the remainder of a `.ts` path after `/stream/`
pub fn parse_segment_name(path: &str) -> Option<&str> {
    SEGMENT_NAME_RE
        .captures(path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
