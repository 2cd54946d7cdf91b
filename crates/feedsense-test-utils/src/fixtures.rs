// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row and reply builders.

use feedsense_core::FeedbackRow;

/// A feedback row with the given identity and a fixed assistant message.
pub fn feedback_row(user_id: &str, message_id: &str, user_comment: &str) -> FeedbackRow {
    FeedbackRow {
        user_id: user_id.to_string(),
        chat_id: format!("chat-{user_id}"),
        message_id: message_id.to_string(),
        timestamp: "2024-05-01 10:00:00".to_string(),
        system_message: "Here is the summary you asked for.".to_string(),
        user_comment: user_comment.to_string(),
        source_type: "web".to_string(),
        user_feedback_type: "thumbs_down".to_string(),
    }
}

/// A well-formed classification reply.
pub fn classification_json(score: i64, sentiment_type: &str, aspect: &str) -> String {
    serde_json::json!({
        "sentiment_score": score,
        "sentiment_type": sentiment_type,
        "aspect": aspect,
    })
    .to_string()
}
