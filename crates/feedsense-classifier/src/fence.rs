// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Markdown code-fence removal for completion text.
//!
//! Accepted shape, after trimming surrounding whitespace:
//!
//! ````text
//! ``` [lang] \n
//! interior
//! \n ```
//! ````
//!
//! The opening fence is three or more backticks. The language tag is optional
//! and sits on the opening line. The closing fence has exactly the opening
//! length and stands on its own line at the very end. Anything else is not a
//! fence and is left alone apart from trimming.

const MIN_FENCE_LEN: usize = 3;

/// Returns the fenced interior, or the trimmed input when it is not fenced.
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    fenced_interior(text).unwrap_or(text)
}

fn fenced_interior(text: &str) -> Option<&str> {
    let fence_len = text.bytes().take_while(|&b| b == b'`').count();
    if fence_len < MIN_FENCE_LEN {
        return None;
    }

    let (tag, body) = text[fence_len..].split_once('\n')?;
    if !is_language_tag(tag.trim()) {
        return None;
    }

    let closing_len = body.bytes().rev().take_while(|&b| b == b'`').count();
    if closing_len != fence_len {
        return None;
    }

    let before_close = body[..body.len() - closing_len].trim_end_matches([' ', '\t']);
    let interior = if before_close.is_empty() {
        before_close
    } else {
        before_close.strip_suffix('\n')?
    };
    Some(interior.trim())
}

fn is_language_tag(tag: &str) -> bool {
    tag.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.'))
}
