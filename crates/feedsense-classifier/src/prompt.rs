// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt text sent to the completion service.

/// System message preceding every classification prompt.
pub const SYSTEM_INSTRUCTION: &str =
    "You are a helpful assistant that only responds with valid JSON.";

const PROMPT_HEADER: &str = r#"You are a sentiment analysis engine.

Given the following AI-generated system message and a user comment in response to it, return a JSON object with:

- "sentiment_score": integer from -2 (very negative) to +2 (very positive)
- "sentiment_type": one of ["complaint", "suggestion", "compliment", "neutral"]
- "aspect": one of ["response_quality", "completeness", "speed_or_timing", "interface_or_functionality", "praise"]
"#;

/// Builds the user prompt for one feedback row.
///
/// Both texts are embedded verbatim. The output is a pure function of its
/// inputs, so identical rows always produce identical requests.
pub fn build_prompt(system_message: &str, user_comment: &str) -> String {
    format!(
        "{PROMPT_HEADER}\nSystem Message: {system_message}\n\nUser Comment: {user_comment}\n\nOutput JSON:\n"
    )
}
