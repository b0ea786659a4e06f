//! Custom test assertions for integration tests

use playlist_slicer::{Event, MemorySink, PlaylistBot, Stage, UserId, messages};
use std::time::Duration;
use tokio::sync::broadcast;

/// Drain events until the user's session is cleared
///
/// Panics if the channel closes or nothing arrives within `timeout`.
pub async fn events_until_cleared(
    events: &mut broadcast::Receiver<Event>,
    user: UserId,
    timeout: Duration,
) -> Vec<Event> {
    let collected = tokio::time::timeout(timeout, async {
        let mut seen = vec![];
        loop {
            match events.recv().await {
                Ok(event) => {
                    let done = event == Event::SessionCleared { user };
                    seen.push(event);
                    if done {
                        return seen;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    panic!("event receiver lagged by {} events", n)
                }
                Err(broadcast::error::RecvError::Closed) => panic!("event channel closed"),
            }
        }
    })
    .await;

    match collected {
        Ok(events) => events,
        Err(_) => panic!("session of user {} was not cleared within {:?}", user, timeout),
    }
}

/// Poll until the user's session reaches `stage`
///
/// Panics if it does not get there within `timeout`.
pub async fn wait_for_stage(bot: &PlaylistBot, user: UserId, stage: Stage, timeout: Duration) {
    let reached = tokio::time::timeout(timeout, async {
        while bot.sessions().stage(user).await != stage {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    assert!(
        reached.is_ok(),
        "user {} did not reach {:?} within {:?}",
        user,
        stage,
        timeout
    );
}

/// Assert that a user's transcript ends with `tail`
pub fn assert_transcript_ends_with(sink: &MemorySink, user: UserId, tail: &[String]) {
    let sent = sink.messages_for(user);
    assert!(
        sent.len() >= tail.len(),
        "transcript too short: {:#?}",
        sent
    );
    assert_eq!(&sent[sent.len() - tail.len()..], tail, "full transcript: {:#?}", sent);
}

/// Assert that no video links were sent to a user
pub fn assert_no_links(sink: &MemorySink, user: UserId) {
    let links: Vec<String> = sink
        .messages_for(user)
        .into_iter()
        .filter(|m| m.starts_with("https://www.youtube.com/watch?v="))
        .collect();
    assert!(links.is_empty(), "unexpected links: {:?}", links);
}

/// Count progress notifications in a user's transcript
pub fn progress_count(sink: &MemorySink, user: UserId) -> usize {
    sink.messages_for(user)
        .iter()
        .filter(|m| m.starts_with("📦"))
        .count()
}

/// Whether a message is one of the flow prompts
pub fn is_prompt(text: &str) -> bool {
    [
        messages::ASK_URL,
        messages::ASK_START,
        messages::ASK_END,
        messages::ASK_ORDER,
        messages::ASK_BATCH_SIZE,
    ]
    .contains(&text)
}
