//! Routing of typed chat messages.

use super::{DialogueController, FlowOutcome};
use crate::error::Result;
use crate::phrases;
use crate::session::SessionState;
use crate::surface::{Panel, Tone};
use qa_client::QaBackend;
use tracing::debug;

const TEACH_PROMPT: &str = "Okay, type the answer and I'll remember it.";
const CORRECTION_PROMPT: &str = "Sorry about that. What is the correct answer?";
const CANCELLED: &str = "Okay, cancelled.";

impl<B: QaBackend> DialogueController<B> {
    /// Handle one typed chat message.
    ///
    /// Pending teaching and follow-up choices take precedence; otherwise the
    /// message is feedback, a request for more detail, small talk or a new
    /// question.
    pub async fn handle_chat(&mut self, session: &mut SessionState, message: &str) -> FlowOutcome {
        let message = message.trim();
        if message.is_empty() {
            return FlowOutcome::NoResponse;
        }
        let result = self.route_chat(session, message).await;
        self.finish(session, Panel::Qa, false, result).await
    }

    async fn route_chat(&mut self, session: &mut SessionState, message: &str) -> Result<FlowOutcome> {
        if session.expecting_teaching_answer {
            if phrases::is_cancel_answer(message) {
                return Ok(self.cancel_pending());
            }
            if let Some(question) = session.pending_question.clone() {
                debug!("chat message is a taught answer");
                return self.save_answer(session, &question, message, false).await;
            }
        }

        if session.awaiting_follow_up {
            if let Some(question) = session.pending_question.clone() {
                if phrases::is_search_choice(message) {
                    return self.search_inner(session, &question, false).await;
                }
                if phrases::is_teach_request(message) {
                    session.expect_teaching(&question);
                    self.surface.clear_offers();
                    self.surface.show(Panel::Qa, Tone::Info, TEACH_PROMPT);
                    return Ok(FlowOutcome::AwaitingTeachingAnswer { question });
                }
                if phrases::is_cancel(message) {
                    return Ok(self.cancel_pending());
                }
            }
        }

        if phrases::is_negative_feedback(message) {
            if let Some(last) = session.last_question.clone() {
                session.expect_teaching(&last);
                self.surface.clear_offers();
                self.surface.show(Panel::Qa, Tone::Info, CORRECTION_PROMPT);
                return Ok(FlowOutcome::AwaitingCorrection { question: last });
            }
        }

        if phrases::is_expand_followup(message) && session.last_question.is_some() {
            return self.search_inner(session, message, false).await;
        }

        if phrases::is_casual(message) {
            session.clear_pending();
            self.surface.clear_offers();
            self.surface.show(Panel::Qa, Tone::Info, "Okay!");
            return Ok(FlowOutcome::Acknowledged);
        }

        self.ask_inner(session, message, false).await
    }

    fn cancel_pending(&mut self) -> FlowOutcome {
        self.surface.show(Panel::Qa, Tone::Info, CANCELLED);
        FlowOutcome::Cancelled
    }
}
