// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across adapter traits and the Feedsense pipeline.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues (or intentionally disabled).
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the role an adapter plays in a run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Completion,
    Source,
    Sink,
    Notification,
}

// --- Feedback rows ---

/// One user feedback event to classify.
///
/// Every field is carried as text. The store may hold integers or timestamps
/// in these columns; they are rendered to text on read so the identity key
/// compares the same way on every backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackRow {
    pub user_id: String,
    pub chat_id: String,
    pub message_id: String,
    pub timestamp: String,
    pub system_message: String,
    pub user_comment: String,
    pub source_type: String,
    pub user_feedback_type: String,
}

impl FeedbackRow {
    /// The dedup identity of this row.
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey {
            user_id: self.user_id.clone(),
            message_id: self.message_id.clone(),
            user_comment: self.user_comment.clone(),
        }
    }

    /// Both texts the classifier needs are present and not whitespace-only.
    pub fn has_classifiable_text(&self) -> bool {
        !self.system_message.trim().is_empty() && !self.user_comment.trim().is_empty()
    }
}

/// The `(user_id, message_id, user_comment)` triple used for dedup.
///
/// Two rows with equal keys are the same feedback event regardless of
/// their other fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey {
    pub user_id: String,
    pub message_id: String,
    pub user_comment: String,
}

// --- Classification ---

/// Sentiment polarity, an integer in `-2..=2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct SentimentScore(i8);

impl SentimentScore {
    pub const MIN: i64 = -2;
    pub const MAX: i64 = 2;

    pub fn value(self) -> i8 {
        self.0
    }
}

impl TryFrom<i64> for SentimentScore {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value as i8))
        } else {
            Err(format!(
                "sentiment_score {value} outside {}..={}",
                Self::MIN,
                Self::MAX
            ))
        }
    }
}

impl From<SentimentScore> for i64 {
    fn from(score: SentimentScore) -> Self {
        i64::from(score.0)
    }
}

impl std::fmt::Display for SentimentScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of feedback the comment is.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SentimentType {
    Complaint,
    Suggestion,
    Compliment,
    Neutral,
}

/// Which part of the assistant experience the comment is about.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Aspect {
    ResponseQuality,
    Completeness,
    SpeedOrTiming,
    InterfaceOrFunctionality,
    Praise,
}

/// The three fields the model is asked to produce, after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub sentiment_score: SentimentScore,
    pub sentiment_type: SentimentType,
    pub aspect: Aspect,
}

/// A validated classification stamped with the time it was accumulated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentimentResult {
    pub classification: Classification,
    pub processed_at: DateTime<Utc>,
}

impl SentimentResult {
    pub fn new(classification: Classification, processed_at: DateTime<Utc>) -> Self {
        Self {
            classification,
            processed_at,
        }
    }
}

/// A feedback row joined with its sentiment result, as appended to the output store.
///
/// Flat on purpose: both the CSV writer and the SQLite insert address columns by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub user_id: String,
    pub chat_id: String,
    pub message_id: String,
    pub timestamp: String,
    pub system_message: String,
    pub user_comment: String,
    pub source_type: String,
    pub user_feedback_type: String,
    pub sentiment_score: SentimentScore,
    pub sentiment_type: SentimentType,
    pub aspect: Aspect,
    pub processed_at: DateTime<Utc>,
}

impl OutputRecord {
    /// Column order of the output store.
    pub const COLUMNS: [&'static str; 12] = [
        "user_id",
        "chat_id",
        "message_id",
        "timestamp",
        "system_message",
        "user_comment",
        "source_type",
        "user_feedback_type",
        "sentiment_score",
        "sentiment_type",
        "aspect",
        "processed_at",
    ];

    pub fn new(row: FeedbackRow, result: SentimentResult) -> Self {
        let SentimentResult {
            classification,
            processed_at,
        } = result;
        Self {
            user_id: row.user_id,
            chat_id: row.chat_id,
            message_id: row.message_id,
            timestamp: row.timestamp,
            system_message: row.system_message,
            user_comment: row.user_comment,
            source_type: row.source_type,
            user_feedback_type: row.user_feedback_type,
            sentiment_score: classification.sentiment_score,
            sentiment_type: classification.sentiment_type,
            aspect: classification.aspect,
            processed_at,
        }
    }

    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey {
            user_id: self.user_id.clone(),
            message_id: self.message_id.clone(),
            user_comment: self.user_comment.clone(),
        }
    }

    /// `processed_at` as stored by every backend: RFC 3339, UTC, microseconds.
    pub fn processed_at_rfc3339(&self) -> String {
        self.processed_at.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    /// Text of one output column, `None` for names outside [`Self::COLUMNS`].
    pub fn column_text(&self, column: &str) -> Option<String> {
        let text = match column {
            "user_id" => self.user_id.clone(),
            "chat_id" => self.chat_id.clone(),
            "message_id" => self.message_id.clone(),
            "timestamp" => self.timestamp.clone(),
            "system_message" => self.system_message.clone(),
            "user_comment" => self.user_comment.clone(),
            "source_type" => self.source_type.clone(),
            "user_feedback_type" => self.user_feedback_type.clone(),
            "sentiment_score" => self.sentiment_score.value().to_string(),
            "sentiment_type" => self.sentiment_type.to_string(),
            "aspect" => self.aspect.to_string(),
            "processed_at" => self.processed_at_rfc3339(),
            _ => return None,
        };
        Some(text)
    }
}

// --- Completion service ---

/// Role tag of a chat message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single role-tagged message in a completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// A request to the completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Token accounting reported by the completion service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A single text completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    pub id: String,
    pub content: String,
    pub model: String,
    pub finish_reason: Option<String>,
    pub usage: Option<TokenUsage>,
}
