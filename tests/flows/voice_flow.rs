//! Spoken Q&A: answers, regeneration and the follow-up after no answer.

use crate::helpers::{voice_controller, Call, FakeBackend};
use qa_client::{AskOutcome, RegenerateRequest, TeachRequest};
use std::sync::Arc;
use voice_qa::{FlowOutcome, SessionState};

#[tokio::test]
async fn accepted_regeneration_replaces_answer() {
    let backend = Arc::new(
        FakeBackend::new()
            .answer("A citrus fruit.", "local")
            .regenerate_reply(Ok(Some("A sour yellow fruit.".into()))),
    );
    let (mut controller, surface, speaker) =
        voice_controller(&backend, &["what is a lemon", "yes please"]);
    let mut session = SessionState::new();

    let outcome = controller.ask_voice(&mut session).await;

    assert_eq!(
        outcome,
        FlowOutcome::Regenerated {
            answer: "A sour yellow fruit.".into()
        }
    );
    assert_eq!(
        backend.calls()[1],
        Call::Regenerate(RegenerateRequest {
            question: "what is a lemon".into(),
            exclude: "A citrus fruit.".into(),
        })
    );
    assert_eq!(
        surface.last_text().as_deref(),
        Some("Alternate Answer: A sour yellow fruit. (regenerated)")
    );
    assert_eq!(session.last_answer.as_deref(), Some("A sour yellow fruit."));
    assert_eq!(
        speaker.spoken(),
        vec![
            "Please ask your question.",
            "A citrus fruit.",
            "Do you want a different explanation? Say yes or no.",
            "Here is another explanation: A sour yellow fruit.",
        ]
    );
}

#[tokio::test]
async fn identical_regeneration_changes_nothing() {
    let backend = Arc::new(
        FakeBackend::new()
            .answer("A citrus fruit.", "local")
            .regenerate_reply(Ok(Some("A citrus fruit.".into()))),
    );
    let (mut controller, surface, speaker) =
        voice_controller(&backend, &["what is a lemon", "yes"]);
    let mut session = SessionState::new();

    let outcome = controller.ask_voice(&mut session).await;

    assert_eq!(outcome, FlowOutcome::RegenerationUnchanged);
    assert_eq!(surface.texts().len(), 1);
    assert_eq!(session.last_answer.as_deref(), Some("A citrus fruit."));
    assert_eq!(
        speaker.spoken().last().map(String::as_str),
        Some("Sorry, I couldn't find a different explanation.")
    );
}

#[tokio::test]
async fn declined_regeneration_sends_nothing_more() {
    let backend = Arc::new(FakeBackend::new().answer("A citrus fruit.", "local"));
    let (mut controller, _surface, _speaker) =
        voice_controller(&backend, &["what is a lemon", "no thanks"]);
    let mut session = SessionState::new();

    assert_eq!(
        controller.ask_voice(&mut session).await,
        FlowOutcome::Declined
    );
    assert_eq!(backend.calls().len(), 1);
}

#[tokio::test]
async fn follow_up_search_after_no_answer() {
    let backend = Arc::new(
        FakeBackend::new()
            .no_answer()
            .found("Durian is known for its smell.", "web"),
    );
    let (mut controller, _surface, speaker) =
        voice_controller(&backend, &["what is a durian", "search"]);
    let mut session = SessionState::new();

    let outcome = controller.ask_voice(&mut session).await;

    assert!(matches!(outcome, FlowOutcome::Found { .. }));
    assert_eq!(
        speaker.spoken().last().map(String::as_str),
        Some("I found this answer: Durian is known for its smell.")
    );
    assert!(session.pending_question.is_none());
}

#[tokio::test]
async fn follow_up_stop_cancels() {
    let backend = Arc::new(FakeBackend::new().no_answer());
    let (mut controller, _surface, _speaker) =
        voice_controller(&backend, &["what is a durian", "stop"]);
    let mut session = SessionState::new();

    assert_eq!(
        controller.ask_voice(&mut session).await,
        FlowOutcome::Cancelled
    );
    assert_eq!(backend.calls().len(), 1);
    assert!(session.is_idle());
}

#[tokio::test]
async fn follow_up_reply_is_taught_as_the_answer() {
    let backend = Arc::new(FakeBackend::new().no_answer().teach_reply(Ok(None)));
    let (mut controller, surface, speaker) = voice_controller(
        &backend,
        &["what is a durian", "A spiky tropical fruit."],
    );
    let mut session = SessionState::new();

    let outcome = controller.ask_voice(&mut session).await;

    assert!(matches!(outcome, FlowOutcome::Taught { .. }));
    assert_eq!(
        backend.calls()[1],
        Call::Teach(TeachRequest::new("what is a durian", "A spiky tropical fruit."))
    );
    assert_eq!(
        surface.last_text().as_deref(),
        Some("Learned: \"what is a durian\" \u{2192} \"A spiky tropical fruit.\"")
    );
    assert_eq!(
        speaker.spoken().last().map(String::as_str),
        Some("Thanks! I have learned the new answer.")
    );
    assert!(session.pending_question.is_none());
}

#[tokio::test]
async fn follow_up_answer_with_cancel_word_is_taught() {
    let backend = Arc::new(FakeBackend::new().no_answer().teach_reply(Ok(None)));
    let (mut controller, _surface, _speaker) = voice_controller(
        &backend,
        &["do elephants remember", "Elephants never forget."],
    );
    let mut session = SessionState::new();

    let outcome = controller.ask_voice(&mut session).await;

    assert!(matches!(outcome, FlowOutcome::Taught { .. }));
    assert_eq!(
        backend.calls()[1],
        Call::Teach(TeachRequest::new(
            "do elephants remember",
            "Elephants never forget."
        ))
    );
}

#[tokio::test]
async fn spoken_correction_of_no_is_taught() {
    let backend = Arc::new(
        FakeBackend::new()
            .ask_reply(Ok(AskOutcome::NeedsCorrection { message: None }))
            .teach_reply(Ok(None)),
    );
    let (mut controller, _surface, _speaker) =
        voice_controller(&backend, &["is a tomato a vegetable", "No"]);
    let mut session = SessionState::new();

    let outcome = controller.ask_voice(&mut session).await;

    assert!(matches!(outcome, FlowOutcome::Taught { .. }));
    assert_eq!(
        backend.calls()[1],
        Call::Teach(TeachRequest::new("is a tomato a vegetable", "No"))
    );
}

#[tokio::test]
async fn silence_at_the_first_prompt_resets() {
    let backend = Arc::new(FakeBackend::new());
    let (mut controller, surface, _speaker) = voice_controller(&backend, &[]);
    let mut session = SessionState::new();

    assert_eq!(
        controller.ask_voice(&mut session).await,
        FlowOutcome::NoResponse
    );
    assert!(backend.calls().is_empty());
    assert!(surface.texts().is_empty());
    assert!(session.is_idle());
}
