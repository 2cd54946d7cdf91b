// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Run-level behaviour of the pipeline over in-memory adapters.

use feedsense_core::{Aspect, FeedsenseError, SentimentType};
use feedsense_pipeline::RunOutcome;
use feedsense_test_utils::{TestHarness, classification_json, feedback_row};

#[tokio::test]
async fn empty_source_is_a_no_op() {
    let harness = TestHarness::builder().build();

    let report = harness.run().await.unwrap();
    assert_eq!(report.outcome, RunOutcome::NothingToDo);
    assert_eq!(report.selected, 0);
    assert_eq!(harness.store.append_calls(), 0);
    assert!(harness.completion.requests().await.is_empty());
    assert!(harness.notifier.messages().await.is_empty());
}

#[tokio::test]
async fn all_rows_written_in_one_batch_and_announced() {
    let harness = TestHarness::builder()
        .with_rows(vec![
            feedback_row("u1", "m1", "too slow"),
            feedback_row("u2", "m2", "great answer"),
        ])
        .with_mock_responses(vec![
            classification_json(-1, "complaint", "speed_or_timing"),
            classification_json(2, "compliment", "praise"),
        ])
        .build();

    let report = harness.run().await.unwrap();
    assert_eq!(report.outcome, RunOutcome::Wrote(2));
    assert_eq!(report.failed(), 0);
    assert!(report.notified);
    assert_eq!(harness.store.append_calls(), 1);

    let output = harness.store.output().await;
    assert_eq!(output.len(), 2);
    assert_eq!(output[0].user_id, "u1");
    assert_eq!(output[0].sentiment_score.value(), -1);
    assert_eq!(output[0].sentiment_type, SentimentType::Complaint);
    assert_eq!(output[0].aspect, Aspect::SpeedOrTiming);
    assert_eq!(output[1].sentiment_type, SentimentType::Compliment);
    assert_eq!(output[1].chat_id, "chat-u2");

    assert_eq!(
        harness.notifier.messages().await,
        vec!["LLM pipeline processed 2 new rows.".to_string()]
    );
}

#[tokio::test]
async fn second_run_selects_nothing() {
    let harness = TestHarness::builder()
        .with_rows(vec![
            feedback_row("u1", "m1", "too slow"),
            feedback_row("u2", "m2", "great answer"),
        ])
        .build();

    harness.run().await.unwrap();
    let requests_after_first = harness.completion.requests().await.len();

    let report = harness.run().await.unwrap();
    assert_eq!(report.outcome, RunOutcome::NothingToDo);
    assert_eq!(harness.store.output().await.len(), 2);
    assert_eq!(harness.store.append_calls(), 1);
    assert_eq!(harness.completion.requests().await.len(), requests_after_first);
    assert_eq!(harness.notifier.messages().await.len(), 1);
}

#[tokio::test]
async fn failing_row_does_not_block_its_neighbours() {
    let harness = TestHarness::builder()
        .with_rows(vec![
            feedback_row("u1", "m1", "fine"),
            feedback_row("u2", "m2", "broken row"),
            feedback_row("u3", "m3", "also fine"),
        ])
        .with_failing_comment("broken")
        .build();

    let report = harness.run().await.unwrap();
    assert_eq!(report.outcome, RunOutcome::Wrote(2));
    assert_eq!(report.classify_failed, 1);
    // one attempt each for the good rows, three for the failing one
    assert_eq!(harness.completion.requests().await.len(), 5);

    let ids: Vec<String> = harness
        .store
        .output()
        .await
        .into_iter()
        .map(|r| r.user_id)
        .collect();
    assert_eq!(ids, vec!["u1", "u3"]);

    // the failed row is picked up again and still fails
    let retry = harness.run().await.unwrap();
    assert_eq!(retry.selected, 1);
    assert_eq!(retry.outcome, RunOutcome::NoValidResponses);
    assert_eq!(harness.store.append_calls(), 1);
    assert_eq!(harness.notifier.messages().await.len(), 1);
}

#[tokio::test]
async fn invalid_reply_is_skipped_without_retry() {
    let harness = TestHarness::builder()
        .with_rows(vec![
            feedback_row("u1", "m1", "meh"),
            feedback_row("u2", "m2", "nice"),
        ])
        .with_mock_responses(vec![
            r#"{"sentiment_score": "1", "sentiment_type": "neutral", "aspect": "praise"}"#
                .to_string(),
            classification_json(1, "compliment", "praise"),
        ])
        .build();

    let report = harness.run().await.unwrap();
    assert_eq!(report.parse_failed, 1);
    assert_eq!(report.outcome, RunOutcome::Wrote(1));
    assert_eq!(harness.completion.requests().await.len(), 2);
    assert_eq!(harness.store.output().await[0].user_id, "u2");
}

#[tokio::test]
async fn fenced_reply_is_accepted() {
    let harness = TestHarness::builder()
        .with_rows(vec![feedback_row("u1", "m1", "could be more complete")])
        .with_mock_responses(vec![format!(
            "```json\n{}\n```",
            classification_json(-1, "suggestion", "completeness")
        )])
        .build();

    let report = harness.run().await.unwrap();
    assert_eq!(report.outcome, RunOutcome::Wrote(1));
    let output = harness.store.output().await;
    assert_eq!(output[0].sentiment_type, SentimentType::Suggestion);
    assert_eq!(output[0].aspect, Aspect::Completeness);
}

#[tokio::test]
async fn only_invalid_replies_write_nothing() {
    let harness = TestHarness::builder()
        .with_rows(vec![feedback_row("u1", "m1", "hmm")])
        .with_mock_responses(vec!["I think this is negative.".to_string()])
        .build();

    let report = harness.run().await.unwrap();
    assert_eq!(report.outcome, RunOutcome::NoValidResponses);
    assert_eq!(report.parse_failed, 1);
    assert_eq!(harness.store.append_calls(), 0);
    assert!(harness.notifier.messages().await.is_empty());
}

#[tokio::test]
async fn blank_rows_are_skipped_without_a_request() {
    let mut blank_system = feedback_row("u2", "m2", "ok");
    blank_system.system_message = " ".to_string();
    let harness = TestHarness::builder()
        .with_rows(vec![
            feedback_row("u1", "m1", "   "),
            blank_system,
            feedback_row("u3", "m3", "thanks"),
        ])
        .build();

    let report = harness.run().await.unwrap();
    assert_eq!(report.skipped_blank, 2);
    assert_eq!(report.outcome, RunOutcome::Wrote(1));
    assert_eq!(harness.completion.requests().await.len(), 1);
}

#[tokio::test]
async fn sink_failure_is_fatal_and_skips_notification() {
    let harness = TestHarness::builder()
        .with_rows(vec![
            feedback_row("u1", "m1", "a"),
            feedback_row("u2", "m2", "b"),
        ])
        .build();
    harness.store.set_failing(true);

    let err = harness.run().await.unwrap_err();
    assert!(
        matches!(err, FeedsenseError::SinkWrite { pending: 2, .. }),
        "got: {err}"
    );
    assert_eq!(harness.store.append_calls(), 1);
    assert!(harness.store.output().await.is_empty());
    assert!(harness.notifier.messages().await.is_empty());

    // nothing was persisted, so the next run recomputes both rows
    harness.store.set_failing(false);
    let report = harness.run().await.unwrap();
    assert_eq!(report.outcome, RunOutcome::Wrote(2));
}

#[tokio::test]
async fn notification_failure_does_not_fail_the_run() {
    let harness = TestHarness::builder()
        .with_rows(vec![feedback_row("u1", "m1", "a")])
        .build();
    harness.notifier.set_failing(true);

    let report = harness.run().await.unwrap();
    assert_eq!(report.outcome, RunOutcome::Wrote(1));
    assert!(!report.notified);
    assert_eq!(harness.store.output().await.len(), 1);
    assert_eq!(harness.notifier.messages().await.len(), 1);
}

#[tokio::test]
async fn limit_leaves_remaining_rows_for_later() {
    let harness = TestHarness::builder()
        .with_rows(vec![
            feedback_row("u1", "m1", "a"),
            feedback_row("u2", "m2", "b"),
            feedback_row("u3", "m3", "c"),
        ])
        .with_limit(2)
        .build();

    let first = harness.run().await.unwrap();
    assert_eq!(first.selected, 3);
    assert_eq!(first.attempted, 2);
    assert_eq!(first.outcome, RunOutcome::Wrote(2));

    let second = harness.run().await.unwrap();
    assert_eq!(second.selected, 1);
    assert_eq!(second.outcome, RunOutcome::Wrote(1));
    assert_eq!(harness.store.output().await[2].user_id, "u3");
}

#[tokio::test]
async fn new_feedback_is_processed_incrementally() {
    let harness = TestHarness::builder()
        .with_rows(vec![feedback_row("u1", "m1", "a")])
        .build();
    harness.run().await.unwrap();

    harness.store.push_row(feedback_row("u1", "m1", "a")).await;
    harness.store.push_row(feedback_row("u1", "m1", "edited comment")).await;

    let report = harness.run().await.unwrap();
    assert_eq!(report.selected, 1);
    assert_eq!(report.outcome, RunOutcome::Wrote(1));
    assert_eq!(
        harness.store.output().await[1].user_comment,
        "edited comment"
    );
}

#[tokio::test]
async fn prompt_carries_both_texts() {
    let harness = TestHarness::builder()
        .with_rows(vec![feedback_row("u1", "m1", "too verbose")])
        .build();
    harness.run().await.unwrap();

    let requests = harness.completion.requests().await;
    let prompt = &requests[0].messages[1].content;
    assert!(prompt.contains("Here is the summary you asked for."));
    assert!(prompt.contains("too verbose"));
    assert_eq!(requests[0].model, "test-model");
}
