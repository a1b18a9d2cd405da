//! JSON payload extraction from conversational model output
//!
//! The text model wraps its structured answers in prose more often than
//! not. This module pulls the first balanced JSON object out of a response
//! and deserializes it, distinguishing "no JSON at all" from "JSON present
//! but malformed" so callers can log the right thing.

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Why a payload could not be extracted from model output
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The response contains no balanced JSON object
    #[error("no JSON object found in model response")]
    NoJsonBlock,

    /// A JSON block was found but did not deserialize
    #[error("malformed JSON payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

/// Find the first balanced `{ ... }` block in `text`
///
/// Brace counting is string-literal aware: braces inside JSON strings
/// (including escaped quotes) do not affect nesting depth. Returns `None`
/// when no opening brace exists or the first block never closes.
pub fn first_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Extract and deserialize the first JSON object in model output
pub fn parse_json_block<T: DeserializeOwned>(text: &str) -> Result<T, ExtractError> {
    let block = first_json_block(text).ok_or(ExtractError::NoJsonBlock)?;
    Ok(serde_json::from_str(block)?)
}
