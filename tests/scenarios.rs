//! End-to-end conversation scenarios against a scripted extractor

mod common;

use common::*;
use playlist_slicer::{
    Event, ExtractionOutcome, FlowKind, OutcomeKind, PlaylistSettings, RangeEnd, Stage, UserId,
    messages,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::assert_ok;

const USER: UserId = UserId(4242);
const WAIT: Duration = Duration::from_secs(5);

fn link(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", id)
}

#[tokio::test]
async fn quick_flow_delivers_links_in_order() {
    let extractor = Arc::new(ScriptedExtractor::succeeding(&["a", "b", "c"]));
    let h = harness(extractor.clone());
    let mut events = h.bot.subscribe();

    assert_ok!(h.bot.handle_message(USER, "/quick").await);
    assert_eq!(h.bot.sessions().stage(USER).await, Stage::AwaitingUrl);
    assert_ok!(h.bot.handle_message(USER, PLAYLIST_URL).await);

    assert_eq!(
        h.sink.messages_for(USER),
        vec![
            messages::ASK_URL.to_string(),
            messages::FETCHING.to_string(),
            link("a"),
            link("b"),
            link("c"),
            messages::found(3),
        ]
    );
    assert_eq!(h.bot.sessions().stage(USER).await, Stage::Idle);

    let calls = extractor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].url, PLAYLIST_URL);
    assert_eq!(calls[0].settings, PlaylistSettings::quick(50));

    let seen = events_until_cleared(&mut events, USER, WAIT).await;
    assert_eq!(
        seen.first(),
        Some(&Event::FlowStarted {
            user: USER,
            kind: FlowKind::Quick
        })
    );
    assert!(seen.iter().any(|e| matches!(
        e,
        Event::ExtractionFinished {
            outcome: OutcomeKind::Success { entries: 3 },
            ..
        }
    )));
}

#[tokio::test]
async fn end_before_start_is_reprompted() {
    let h = harness(Arc::new(ScriptedExtractor::succeeding(&[])));

    for reply in ["/configure", PLAYLIST_URL, "5"] {
        assert_ok!(h.bot.handle_message(USER, reply).await);
    }
    assert_ok!(h.bot.handle_message(USER, "3").await);

    let session = h.bot.sessions().get(USER).await.unwrap();
    assert_eq!(session.stage(), Stage::AwaitingEnd);
    assert_eq!(session.draft().start, Some(5));
    assert_eq!(session.draft().end, None);

    let sent = h.sink.messages_for(USER);
    assert_eq!(
        sent.last().unwrap(),
        &messages::reprompt(&playlist_slicer::ValidationError::EndBeforeStart {
            start: 5,
            end: 3
        })
    );
    assert_no_links(&h.sink, USER);
}

#[tokio::test]
async fn tool_failure_is_reported_once() {
    let extractor = ScriptedExtractor::new(ExtractionOutcome::ProcessFailed(
        "network error".to_string(),
    ));
    let h = harness(Arc::new(extractor));

    assert_ok!(h.bot.handle_message(USER, PLAYLIST_URL).await);

    let failures: Vec<String> = h
        .sink
        .messages_for(USER)
        .into_iter()
        .filter(|m| m.contains("network error"))
        .collect();
    assert_eq!(failures, vec![messages::process_failed("network error")]);
    assert_no_links(&h.sink, USER);
    assert_eq!(h.bot.sessions().stage(USER).await, Stage::Idle);
}

#[tokio::test]
async fn timeout_notice_resets_session() {
    let h = harness(Arc::new(ScriptedExtractor::new(ExtractionOutcome::TimedOut)));

    assert_ok!(h.bot.handle_message(USER, "/quick").await);
    assert_ok!(h.bot.handle_message(USER, PLAYLIST_URL).await);

    assert_transcript_ends_with(&h.sink, USER, &[messages::TIMED_OUT.to_string()]);
    assert!(h.bot.sessions().get(USER).await.is_none());
}

#[tokio::test]
async fn empty_playlist_is_nothing_found() {
    let h = harness(Arc::new(ScriptedExtractor::succeeding(&[])));

    assert_ok!(h.bot.handle_message(USER, PLAYLIST_URL).await);

    let sent = h.sink.messages_for(USER);
    assert_eq!(sent.last().unwrap(), messages::NOTHING_FOUND);
    assert!(!sent.iter().any(|m| m.starts_with("✅")));
}

#[tokio::test]
async fn configured_flow_collects_every_parameter() {
    let ids: Vec<String> = (1..=7).map(|i| format!("v{}", i)).collect();
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    let extractor = Arc::new(ScriptedExtractor::succeeding(&id_refs));
    let h = harness(extractor.clone());

    let replies = ["/configure", PLAYLIST_URL, "3", "0", "reverse", "3"];
    for reply in replies {
        assert_ok!(h.bot.handle_message(USER, reply).await);
    }

    let expected = PlaylistSettings {
        start: 3,
        end: RangeEnd::Unbounded,
        reverse: true,
        batch_size: 3,
    };
    assert_eq!(extractor.calls()[0].settings, expected);
    assert_eq!(extractor.calls()[0].timeout, Duration::from_secs(120));

    let sent = h.sink.messages_for(USER);
    let prompts: Vec<&String> = sent.iter().filter(|m| is_prompt(m)).collect();
    assert_eq!(
        prompts,
        vec![
            messages::ASK_URL,
            messages::ASK_START,
            messages::ASK_END,
            messages::ASK_ORDER,
            messages::ASK_BATCH_SIZE,
        ]
    );
    assert!(sent.contains(&messages::settings_summary(&expected)));
    assert_eq!(progress_count(&h.sink, USER), 2);
    assert_transcript_ends_with(
        &h.sink,
        USER,
        &[
            messages::progress(6, 7),
            link("v7"),
            messages::found(7),
        ],
    );
}

#[tokio::test]
async fn invalid_replies_keep_the_stage() {
    let h = harness(Arc::new(ScriptedExtractor::succeeding(&["a"])));

    assert_ok!(h.bot.handle_message(USER, "/configure").await);
    assert_ok!(h.bot.handle_message(USER, "not a link").await);
    assert_eq!(h.bot.sessions().stage(USER).await, Stage::AwaitingUrl);

    assert_ok!(h.bot.handle_message(USER, PLAYLIST_URL).await);
    assert_ok!(h.bot.handle_message(USER, "zero").await);
    assert_ok!(h.bot.handle_message(USER, "0").await);
    assert_eq!(h.bot.sessions().stage(USER).await, Stage::AwaitingStart);

    assert_ok!(h.bot.handle_message(USER, "1").await);
    assert_ok!(h.bot.handle_message(USER, "0").await);
    assert_ok!(h.bot.handle_message(USER, "sideways").await);
    assert_eq!(h.bot.sessions().stage(USER).await, Stage::AwaitingReverse);

    assert_ok!(h.bot.handle_message(USER, "forward").await);
    assert_ok!(h.bot.handle_message(USER, "101").await);
    assert_eq!(h.bot.sessions().stage(USER).await, Stage::AwaitingBatchSize);

    assert_ok!(h.bot.handle_message(USER, "10").await);
    assert_eq!(h.bot.sessions().stage(USER).await, Stage::Idle);
    assert_transcript_ends_with(&h.sink, USER, &[link("a"), messages::found(1)]);
}

#[tokio::test]
async fn restarting_a_flow_discards_collected_values() {
    let extractor = Arc::new(ScriptedExtractor::succeeding(&["a"]));
    let h = harness(extractor.clone());

    for reply in ["/configure", PLAYLIST_URL, "4"] {
        assert_ok!(h.bot.handle_message(USER, reply).await);
    }
    assert_ok!(h.bot.handle_message(USER, "/quick").await);
    let session = h.bot.sessions().get(USER).await.unwrap();
    assert!(session.is_quick());
    assert_eq!(session.draft().start, None);

    assert_ok!(h.bot.handle_message(USER, PLAYLIST_URL).await);
    assert_eq!(extractor.calls()[0].settings.start, 1);
}

#[tokio::test]
async fn replies_during_extraction_get_busy_notice() {
    let extractor = Arc::new(
        ScriptedExtractor::succeeding(&["a"]).with_delay(Duration::from_millis(300)),
    );
    let h = harness(extractor.clone());

    let bot = h.bot.clone();
    let job = tokio::spawn(async move { bot.handle_message(USER, PLAYLIST_URL).await });

    wait_for_stage(&h.bot, USER, Stage::Extracting, WAIT).await;

    assert_ok!(h.bot.handle_message(USER, "/configure").await);
    assert_ok!(h.bot.handle_message(USER, "5").await);
    assert_ok!(job.await.unwrap());

    let busy = h
        .sink
        .messages_for(USER)
        .iter()
        .filter(|m| *m == messages::BUSY)
        .count();
    assert_eq!(busy, 2);
    assert_eq!(extractor.calls().len(), 1);
    assert_eq!(h.bot.sessions().stage(USER).await, Stage::Idle);
}

#[tokio::test]
async fn users_do_not_block_each_other() {
    let extractor = Arc::new(
        ScriptedExtractor::succeeding(&["a", "b"]).with_delay(Duration::from_millis(100)),
    );
    let h = harness(extractor.clone());

    let mut handles = vec![];
    for id in 1..=8 {
        let bot = h.bot.clone();
        handles.push(tokio::spawn(async move {
            bot.handle_message(UserId(id), PLAYLIST_URL).await
        }));
    }

    let started = std::time::Instant::now();
    for handle in handles {
        assert_ok!(handle.await.unwrap());
    }
    // Eight serialized extractions would take at least 800ms
    assert!(started.elapsed() < Duration::from_millis(700));

    for id in 1..=8 {
        assert_eq!(
            h.sink.messages_for(UserId(id)),
            vec![
                messages::FETCHING.to_string(),
                link("a"),
                link("b"),
                messages::found(2)
            ]
        );
    }
    assert!(h.bot.sessions().is_empty().await);
}

#[tokio::test]
async fn aborted_turn_still_returns_session_to_idle() {
    let extractor = Arc::new(
        ScriptedExtractor::succeeding(&["a"]).with_delay(Duration::from_millis(500)),
    );
    let h = harness(extractor);
    let mut events = h.bot.subscribe();

    let bot = h.bot.clone();
    let job = tokio::spawn(async move { bot.handle_message(USER, PLAYLIST_URL).await });
    wait_for_stage(&h.bot, USER, Stage::Extracting, WAIT).await;

    job.abort();
    assert!(job.await.unwrap_err().is_cancelled());

    events_until_cleared(&mut events, USER, WAIT).await;
    assert_eq!(h.bot.sessions().stage(USER).await, Stage::Idle);

    // A fresh flow starts normally instead of hitting the busy notice
    assert_ok!(h.bot.handle_message(USER, "/quick").await);
    assert_transcript_ends_with(&h.sink, USER, &[messages::ASK_URL.to_string()]);
    assert_no_links(&h.sink, USER);
}

#[tokio::test]
async fn timed_out_caller_still_returns_session_to_idle() {
    let extractor = Arc::new(
        ScriptedExtractor::succeeding(&["a"]).with_delay(Duration::from_millis(500)),
    );
    let h = harness(extractor);

    let turn = tokio::time::timeout(
        Duration::from_millis(100),
        h.bot.handle_message(USER, PLAYLIST_URL),
    )
    .await;
    assert!(turn.is_err());

    wait_for_stage(&h.bot, USER, Stage::Idle, WAIT).await;
    assert!(h.bot.sessions().get(USER).await.is_none());
}

#[tokio::test]
async fn link_without_scheme_is_accepted_and_normalised() {
    let extractor = Arc::new(ScriptedExtractor::succeeding(&["a"]));
    let h = harness(extractor.clone());

    assert_ok!(
        h.bot
            .handle_message(USER, "www.youtube.com/playlist?list=PLtest123")
            .await
    );

    assert_eq!(extractor.calls()[0].url, PLAYLIST_URL);
    assert_transcript_ends_with(&h.sink, USER, &[link("a"), messages::found(1)]);
}
