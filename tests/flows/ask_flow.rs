//! Typed ask and search flows.

use crate::helpers::{text_controller, Call, FakeBackend};
use qa_client::{AskOutcome, AskRequest, SearchRequest};
use std::sync::Arc;
use voice_qa::surface::{Affordance, Panel, Tone};
use voice_qa::{FlowOutcome, SessionState};

#[tokio::test]
async fn answer_is_shown_with_its_source() {
    let backend = Arc::new(FakeBackend::new().answer("A tropical stone fruit.", "local"));
    let (mut controller, surface) = text_controller(&backend);
    let mut session = SessionState::new();

    let outcome = controller.ask(&mut session, "what is a mango").await;

    assert_eq!(
        outcome,
        FlowOutcome::Answered {
            question: "what is a mango".into(),
            answer: "A tropical stone fruit.".into(),
            source: "local".into(),
        }
    );
    let shown = surface.last_text().unwrap();
    assert!(shown.contains("A tropical stone fruit."));
    assert!(shown.contains("local"));
    assert_eq!(session.last_question.as_deref(), Some("what is a mango"));
    assert_eq!(session.last_answer.as_deref(), Some("A tropical stone fruit."));
    assert!(session.pending_question.is_none());
}

#[tokio::test]
async fn previous_pair_is_sent_as_context() {
    let backend = Arc::new(
        FakeBackend::new()
            .answer("A tropical stone fruit.", "local")
            .answer("Mostly India.", "local"),
    );
    let (mut controller, _surface) = text_controller(&backend);
    let mut session = SessionState::new();

    controller.ask(&mut session, "what is a mango").await;
    controller.ask(&mut session, "where does it grow").await;

    let calls = backend.calls();
    assert_eq!(calls[0], Call::Ask(AskRequest::new("what is a mango")));
    assert_eq!(
        calls[1],
        Call::Ask(AskRequest::new("where does it grow").with_context(
            Some("what is a mango".into()),
            Some("A tropical stone fruit.".into())
        ))
    );
}

#[tokio::test]
async fn no_answer_offers_search_and_teach() {
    let backend = Arc::new(FakeBackend::new().no_answer());
    let (mut controller, surface) = text_controller(&backend);
    let mut session = SessionState::new();

    let outcome = controller.ask(&mut session, "what is a quince").await;

    assert_eq!(
        outcome,
        FlowOutcome::AwaitingFollowUp {
            question: "what is a quince".into()
        }
    );
    let offers = surface.offers();
    assert_eq!(offers.len(), 1);
    assert!(offers[0].contains(&Affordance::Search));
    assert!(offers[0].contains(&Affordance::Teach));
    assert_eq!(session.pending_question.as_deref(), Some("what is a quince"));
    assert!(session.awaiting_follow_up);
}

#[tokio::test]
async fn correction_marker_expects_a_taught_answer() {
    let backend = Arc::new(FakeBackend::new().ask_reply(Ok(AskOutcome::NeedsCorrection {
        message: Some("What should the answer be?".into()),
    })));
    let (mut controller, surface) = text_controller(&backend);
    let mut session = SessionState::new();

    let outcome = controller.ask(&mut session, "is a tomato a fruit").await;

    assert!(matches!(outcome, FlowOutcome::AwaitingCorrection { .. }));
    assert!(session.expecting_teaching_answer);
    assert_eq!(surface.last_text().as_deref(), Some("What should the answer be?"));
}

#[tokio::test]
async fn learned_marker_clears_pending() {
    let backend = Arc::new(FakeBackend::new().ask_reply(Ok(AskOutcome::Learned {
        message: Some("Learned successfully!".into()),
    })));
    let (mut controller, surface) = text_controller(&backend);
    let mut session = SessionState::new();

    let outcome = controller.ask(&mut session, "a kiwi is brown outside").await;

    assert_eq!(
        outcome,
        FlowOutcome::Learned {
            message: "Learned successfully!".into()
        }
    );
    assert!(session.is_idle());
    assert_eq!(
        surface.shown().last().unwrap(),
        &(Panel::Qa, Tone::Success, "Learned successfully!".to_owned())
    );
}

#[tokio::test]
async fn empty_question_sends_nothing() {
    let backend = Arc::new(FakeBackend::new());
    let (mut controller, surface) = text_controller(&backend);
    let mut session = SessionState::new();

    let outcome = controller.ask(&mut session, "   ").await;

    assert!(matches!(outcome, FlowOutcome::Invalid { .. }));
    assert!(backend.calls().is_empty());
    assert_eq!(surface.texts().len(), 1);
}

#[tokio::test]
async fn expand_followup_searches_last_question() {
    let backend = Arc::new(
        FakeBackend::new()
            .answer("A tropical stone fruit.", "local")
            .found("Mangoes are drupes native to South Asia.", "wikipedia"),
    );
    let (mut controller, surface) = text_controller(&backend);
    let mut session = SessionState::new();

    controller.ask(&mut session, "what is a mango").await;
    let outcome = controller.search(&mut session, "explain more").await;

    assert_eq!(
        backend.calls()[1],
        Call::Search(SearchRequest {
            question: "what is a mango".into(),
            last_question: Some("what is a mango".into()),
        })
    );
    assert!(matches!(outcome, FlowOutcome::Found { ref question, .. } if question == "what is a mango"));
    assert_eq!(
        surface.last_text().as_deref(),
        Some("Answer: Mangoes are drupes native to South Asia. (from wikipedia)")
    );
}

#[tokio::test]
async fn search_with_nothing_found() {
    let backend = Arc::new(FakeBackend::new().search_reply(Ok(None)));
    let (mut controller, surface) = text_controller(&backend);
    let mut session = SessionState::new();

    let outcome = controller.search(&mut session, "what is a jabuticaba").await;

    assert_eq!(
        outcome,
        FlowOutcome::NotFound {
            question: "what is a jabuticaba".into()
        }
    );
    assert!(surface.last_text().unwrap().contains("couldn't find"));
    assert!(session.pending_question.is_none());
}
