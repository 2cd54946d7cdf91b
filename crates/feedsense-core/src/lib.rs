// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Feedsense sentiment pipeline.
//!
//! This crate provides the adapter traits, error type, and domain types used
//! throughout the workspace. Stores, completion services, secret providers,
//! and notification sinks all implement traits defined here.

pub mod error;
pub mod selection;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::FeedsenseError;
pub use selection::select_unprocessed;
pub use types::{
    AdapterType, Aspect, ChatMessage, ChatRole, Classification, CompletionRequest,
    CompletionResponse, FeedbackRow, HealthStatus, IdentityKey, OutputRecord, SentimentResult,
    SentimentScore, SentimentType, TokenUsage,
};

pub use traits::{
    CompletionAdapter, FeedbackSource, NotificationAdapter, PluginAdapter, ResultSink,
    SecretProvider,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn sentiment_score_accepts_only_its_domain() {
        for value in -2..=2 {
            let score = SentimentScore::try_from(value).expect("in domain");
            assert_eq!(i64::from(score), value);
        }
        assert!(SentimentScore::try_from(5).is_err());
        assert!(SentimentScore::try_from(-3).is_err());
    }

    #[test]
    fn sentiment_type_wire_names() {
        let names: Vec<String> = SentimentType::iter().map(|t| t.to_string()).collect();
        assert_eq!(names, ["complaint", "suggestion", "compliment", "neutral"]);
        assert!(SentimentType::from_str("Complaint").is_err());
    }

    #[test]
    fn aspect_wire_names() {
        let names: Vec<String> = Aspect::iter().map(|a| a.to_string()).collect();
        assert_eq!(
            names,
            [
                "response_quality",
                "completeness",
                "speed_or_timing",
                "interface_or_functionality",
                "praise"
            ]
        );
        assert_eq!(
            Aspect::from_str("speed_or_timing").unwrap(),
            Aspect::SpeedOrTiming
        );
    }

    #[test]
    fn serde_and_strum_names_agree() {
        for aspect in Aspect::iter() {
            let json = serde_json::to_string(&aspect).unwrap();
            assert_eq!(json, format!("\"{aspect}\""));
        }
        for kind in SentimentType::iter() {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }

    #[test]
    fn blank_text_is_not_classifiable() {
        let mut row = FeedbackRow {
            system_message: "Answer".into(),
            user_comment: "   \t".into(),
            ..FeedbackRow::default()
        };
        assert!(!row.has_classifiable_text());
        row.user_comment = "thanks".into();
        assert!(row.has_classifiable_text());
        row.system_message = String::new();
        assert!(!row.has_classifiable_text());
    }

    #[test]
    fn output_record_keeps_row_identity() {
        let row = FeedbackRow {
            user_id: "u1".into(),
            chat_id: "c1".into(),
            message_id: "m1".into(),
            timestamp: "2024-05-01 10:00:00".into(),
            system_message: "Here you go".into(),
            user_comment: "too slow".into(),
            source_type: "web".into(),
            user_feedback_type: "thumbs_down".into(),
        };
        let classification = Classification {
            sentiment_score: SentimentScore::try_from(-1).unwrap(),
            sentiment_type: SentimentType::Complaint,
            aspect: Aspect::SpeedOrTiming,
        };
        let record = OutputRecord::new(
            row.clone(),
            SentimentResult::new(classification, chrono::Utc::now()),
        );
        assert_eq!(record.identity_key(), row.identity_key());
        assert_eq!(record.chat_id, "c1");
        assert_eq!(record.sentiment_type, SentimentType::Complaint);
        assert_eq!(OutputRecord::COLUMNS.len(), 12);
    }

    #[test]
    fn configuration_errors_are_fatal() {
        assert!(FeedsenseError::Config("bad".into()).is_fatal_configuration());
        assert!(
            FeedsenseError::Secret {
                id: "openai-api-key".into(),
                message: "missing".into()
            }
            .is_fatal_configuration()
        );
        assert!(!FeedsenseError::provider("timeout").is_fatal_configuration());
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_completion_adapter<T: CompletionAdapter>() {}
        fn _assert_feedback_source<T: FeedbackSource>() {}
        fn _assert_result_sink<T: ResultSink>() {}
        fn _assert_notification_adapter<T: NotificationAdapter>() {}
        fn _assert_secret_provider<T: SecretProvider>() {}
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn identity_ignores_non_key_fields(
                user in "[a-z0-9]{1,8}",
                message in "[a-z0-9]{1,8}",
                comment in ".{0,40}",
                chat_a in ".{0,10}",
                chat_b in ".{0,10}",
            ) {
                let a = FeedbackRow {
                    user_id: user.clone(),
                    message_id: message.clone(),
                    user_comment: comment.clone(),
                    chat_id: chat_a,
                    ..FeedbackRow::default()
                };
                let b = FeedbackRow { chat_id: chat_b, ..a.clone() };
                prop_assert_eq!(a.identity_key(), b.identity_key());
            }
        }
    }
}
