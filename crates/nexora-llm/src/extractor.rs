//! Extraction utilities for cleaning LLM responses
//!
//! Models frequently wrap structured output in a markdown code block even
//! when told not to. These helpers strip that wrapping before parsing.

use crate::error::{LLMError, Result};
use serde::de::DeserializeOwned;

const FENCE: &str = "```";

/// Body of the first complete fenced code block, trimmed
///
/// Fences are line-delimited: the opening fence starts a line, and the
/// closing fence ends one. The info string after the opening fence (`json`,
/// `JSON`, ...) is skipped. Backticks inside a line of prose are an inline
/// span, not a block. A reply that is a single line is unwrapped only when
/// it both starts and ends with a fence.
///
/// Returns `None` when no complete block is found.
pub fn extract_fenced_block(content: &str) -> Option<&str> {
    let content = content.trim();
    if !content.contains('\n') {
        return single_line_block(content);
    }

    let mut offset = 0;
    let mut body_start = None;
    for line in content.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let text = line.trim();

        match body_start {
            None => {
                let opens = text
                    .strip_prefix(FENCE)
                    .is_some_and(|info| !info.contains(FENCE));
                if opens {
                    body_start = Some(offset);
                }
            }
            Some(start) if text.ends_with(FENCE) => {
                let end = line_start + line.trim_end().len() - FENCE.len();
                return Some(content[start..end.max(start)].trim());
            }
            Some(_) => {}
        }
    }
    None
}

/// ```{"a":1}``` or ```json {"a":1}```
fn single_line_block(line: &str) -> Option<&str> {
    let inner = line.strip_prefix(FENCE)?.strip_suffix(FENCE)?;
    if inner.contains(FENCE) {
        return None;
    }

    let inner = inner.trim();
    match inner.split_once(char::is_whitespace) {
        Some((tag, rest))
            if tag.chars().all(|c| c.is_ascii_alphanumeric())
                && rest.trim_start().starts_with(['{', '[']) =>
        {
            Some(rest.trim())
        }
        _ => Some(inner),
    }
}

/// Trim, then unwrap a fenced block if one is present
///
/// Falls back to the whole trimmed string.
pub fn normalize_response(raw: &str) -> &str {
    let trimmed = raw.trim();
    extract_fenced_block(trimmed).unwrap_or(trimmed)
}

/// Normalize and deserialize a JSON completion
pub fn extract_json<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let normalized = normalize_response(raw);
    if normalized.is_empty() {
        return Err(LLMError::InvalidResponse("empty completion".to_string()));
    }
    Ok(serde_json::from_str(normalized)?)
}
