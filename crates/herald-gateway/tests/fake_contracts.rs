//! Contract tests for ChangeSource, ModelGateway, and PublishTarget.
//!
//! These tests pin the behaviour of the in-memory fakes that the pipeline
//! tests rely on.

use chrono::{NaiveDate, TimeZone, Utc};
use herald_gateway::fakes::{RecordingTarget, ScriptedModel, StaticChangeSource};
use herald_gateway::*;

fn record(number: u64) -> ChangeRecord {
    ChangeRecord {
        number,
        title: format!("Policy update {number}"),
        body: String::new(),
        url: format!("https://github.com/team-mirai/policy/pull/{number}"),
        merged_at: Utc.with_ymd_and_hms(2025, 7, 19, 9, 0, 0).unwrap(),
        author: "octocat".to_string(),
    }
}

// ===========================================================================
// ChangeSource
// ===========================================================================

#[tokio::test]
async fn change_source_returns_records_and_captures_query() {
    let source = StaticChangeSource::new(vec![record(1), record(2)]);
    let window = MergeWindow::for_day(NaiveDate::from_ymd_opt(2025, 7, 19).unwrap());
    let query = ChangeQuery::new("team-mirai/policy", window);

    let records = source.merged_changes(&query).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(source.queries(), vec![query]);
}

#[tokio::test]
async fn change_source_failure_is_returned_verbatim() {
    let source = StaticChangeSource::failing(GatewayError::Quota("search".into()));
    let window = MergeWindow::trailing_day(Utc::now());
    let err = source
        .merged_changes(&ChangeQuery::new("a/b", window))
        .await
        .unwrap_err();

    assert_eq!(err, GatewayError::Quota("search".into()));
}

// ===========================================================================
// ModelGateway
// ===========================================================================

#[tokio::test]
async fn scripted_model_answers_in_order() {
    let model = ScriptedModel::new().with_reply("first").with_reply("second");

    assert_eq!(model.generate("p1").await.unwrap(), "first");
    assert_eq!(model.generate("p2").await.unwrap(), "second");
    assert_eq!(model.calls(), 2);
    assert_eq!(model.prompts(), vec!["p1".to_string(), "p2".to_string()]);
}

#[tokio::test]
async fn scripted_model_fails_when_exhausted() {
    let model = ScriptedModel::new();
    let err = model.generate("anything").await.unwrap_err();

    assert!(matches!(err, GatewayError::Response(_)));
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn scripted_model_replays_errors() {
    let model = ScriptedModel::new()
        .with_error(GatewayError::Transport("timeout".into()))
        .with_reply("ok");

    assert!(model.generate("a").await.is_err());
    assert_eq!(model.generate("b").await.unwrap(), "ok");
    assert_eq!(model.remaining(), 0);
}

// ===========================================================================
// PublishTarget
// ===========================================================================

#[tokio::test]
async fn recording_target_builds_reply_chain() {
    let target = RecordingTarget::new();
    let first = target.post("headline (1/2)", None).await.unwrap();
    let second = target.post("detail (2/2)", Some(&first)).await.unwrap();

    let posts = target.posts();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].in_reply_to, None);
    assert_eq!(posts[1].in_reply_to, Some(first));
    assert_eq!(posts[1].id, second);
}

#[tokio::test]
async fn recording_target_injected_failure_keeps_earlier_posts() {
    let target = RecordingTarget::new().fail_at(2);
    let first = target.post("one", None).await.unwrap();
    let err = target.post("two", Some(&first)).await.unwrap_err();

    assert!(matches!(err, GatewayError::Transport(_)));
    assert_eq!(target.posts().len(), 1);
}
