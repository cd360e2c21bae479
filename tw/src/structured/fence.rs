//! Fenced-block extraction for model replies
//!
//! Models wrap JSON in markdown fences despite being told not to. The
//! extraction rules are:
//!
//! 1. Trim the reply.
//! 2. If a "```json" opener exists anywhere, the payload is everything after
//!    the first one up to the next "```" (or the end of the text when the
//!    fence is never closed).
//! 3. Otherwise, if any "```" exists, the payload is everything after the
//!    first one up to the next "```" (or the end of the text). An info
//!    string such as `python` is kept verbatim.
//! 4. Otherwise the payload is the whole trimmed reply.
//!
//! The payload is trimmed again before it is returned. Only the first fence
//! pair is ever considered; anything after it is ignored, even when malformed.

use tracing::debug;

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// Which rule produced the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    /// First "```json" block
    Json,
    /// First generic "```" block
    Generic,
    /// No fence present
    None,
}

/// Return the text between the first `opener` and the following fence
fn between<'a>(text: &'a str, opener: &str) -> Option<&'a str> {
    let start = text.find(opener)? + opener.len();
    let rest = &text[start..];
    let body = match rest.find(FENCE) {
        Some(end) => &rest[..end],
        None => rest,
    };
    Some(body.trim())
}

/// Extract the payload and report which rule matched
pub fn extract_with_kind(raw: &str) -> (&str, FenceKind) {
    let trimmed = raw.trim();
    if let Some(body) = between(trimmed, JSON_FENCE) {
        debug!(len = body.len(), "extract_payload: json fence");
        return (body, FenceKind::Json);
    }
    if let Some(body) = between(trimmed, FENCE) {
        debug!(len = body.len(), "extract_payload: generic fence");
        return (body, FenceKind::Generic);
    }
    debug!("extract_payload: no fence");
    (trimmed, FenceKind::None)
}

/// Extract the JSON payload from a model reply
pub fn extract_payload(raw: &str) -> &str {
    extract_with_kind(raw).0
}
