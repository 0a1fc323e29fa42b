use std::sync::atomic::Ordering;

use avatalk_common::{NoticeLevel, Phase, SessionError, SpeakMode, UiEvent};

use super::fakes::{drain, harness};

#[tokio::test]
async fn assistant_reply_is_spoken() {
    let mut h = harness(SpeakMode::Assistant);
    h.orch.start().await.unwrap();

    h.orch.submit_text("Who are you?").await.unwrap();

    assert_eq!(h.rec.spoken(), vec!["Hi, I am your avatar."]);
    assert_eq!(
        h.api.calls()[2..],
        ["create_message", "create_run", "retrieve_run", "list_messages"]
    );
    assert!(h.orch.pending_input().is_empty());
    assert!(drain(&mut h.events)
        .iter()
        .any(|e| matches!(e, UiEvent::Reply { text } if text == "Hi, I am your avatar.")));
}

#[tokio::test]
async fn direct_mode_speaks_input_verbatim() {
    let h = harness(SpeakMode::Direct);
    h.orch.start().await.unwrap();

    h.orch.submit_text("Repeat after me.").await.unwrap();

    assert_eq!(h.rec.spoken(), vec!["Repeat after me."]);
    assert!(h.orch.pending_input().is_empty());
}

#[tokio::test]
async fn failed_speak_keeps_input_and_session() {
    let mut h = harness(SpeakMode::Direct);
    h.orch.start().await.unwrap();
    h.rec.fail_speak.store(true, Ordering::SeqCst);

    let err = h.orch.submit_text("try again later").await.unwrap_err();

    assert!(matches!(err, SessionError::SpeakFailed(_)));
    assert_eq!(h.orch.phase(), Phase::Active);
    assert_eq!(h.orch.pending_input(), "try again later");
    assert!(h.orch.controls().speak_enabled);
    assert!(drain(&mut h.events).iter().any(|e| matches!(
        e,
        UiEvent::Notice { level: NoticeLevel::Error, .. }
    )));

    h.rec.fail_speak.store(false, Ordering::SeqCst);
    h.orch.submit().await.unwrap();
    assert_eq!(h.rec.spoken(), vec!["try again later"]);
    assert!(h.orch.pending_input().is_empty());
}

#[tokio::test]
async fn failed_run_keeps_input() {
    let h = harness(SpeakMode::Assistant);
    h.orch.start().await.unwrap();
    h.api.fail_run.store(true, Ordering::SeqCst);

    let err = h.orch.submit_text("hello").await.unwrap_err();

    assert!(matches!(err, SessionError::ProviderUnavailable(ref m) if m.contains("failed")));
    assert_eq!(h.orch.pending_input(), "hello");
    assert_eq!(h.orch.phase(), Phase::Active);
    assert!(h.rec.spoken().is_empty());
}

#[tokio::test]
async fn submit_without_session_is_rejected() {
    let h = harness(SpeakMode::Direct);

    let err = h.orch.submit_text("hello").await.unwrap_err();

    assert!(matches!(err, SessionError::NotInitialized(_)));
    assert_eq!(h.orch.pending_input(), "hello");
}

#[tokio::test]
async fn blank_input_is_not_sent() {
    let h = harness(SpeakMode::Direct);
    h.orch.start().await.unwrap();

    h.orch.submit_text("   ").await.unwrap();

    assert!(!h.rec.calls().contains(&"speak".to_string()));
}

#[tokio::test]
async fn reply_after_end_is_discarded() {
    let mut h = harness(SpeakMode::Assistant);
    h.orch.start().await.unwrap();
    h.api.hold.store(true, Ordering::SeqCst);

    let (result, ()) = tokio::join!(h.orch.submit_text("slow question"), async {
        h.api.run_started.notified().await;
        h.orch.end().await;
        h.api.release.notify_one();
    });

    assert!(result.is_ok());
    assert_eq!(h.orch.phase(), Phase::Idle);
    assert!(!h.rec.calls().contains(&"speak".to_string()));
    assert!(!drain(&mut h.events)
        .iter()
        .any(|e| matches!(e, UiEvent::Reply { .. })));
}

#[tokio::test]
async fn second_submission_while_outstanding_is_busy() {
    let h = harness(SpeakMode::Assistant);
    h.orch.start().await.unwrap();
    h.api.hold.store(true, Ordering::SeqCst);

    let (first, second) = tokio::join!(h.orch.submit_text("one"), async {
        h.api.run_started.notified().await;
        assert!(!h.orch.controls().speak_enabled);
        let second = h.orch.submit().await;
        h.api.release.notify_one();
        second
    });

    assert!(first.is_ok());
    assert!(matches!(second, Err(SessionError::Busy(_))));
    assert_eq!(h.api.count("create_message"), 1);
    assert_eq!(h.rec.spoken(), vec!["Hi, I am your avatar."]);
}

#[tokio::test]
async fn speak_control_needs_active_session_and_input() {
    let h = harness(SpeakMode::Direct);
    h.orch.set_input("hello");
    assert!(!h.orch.controls().speak_enabled);

    h.orch.start().await.unwrap();
    assert!(h.orch.controls().speak_enabled);

    h.orch.set_input("");
    assert!(!h.orch.controls().speak_enabled);
}
