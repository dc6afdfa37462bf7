//! The "different explanation?" offer after a spoken answer.

use super::{DialogueController, FlowOutcome};
use crate::error::Result;
use crate::phrases;
use crate::session::SessionState;
use crate::surface::{Panel, Tone};
use qa_client::{QaBackend, RegenerateRequest};
use tracing::{debug, info};

const OFFER: &str = "Do you want a different explanation? Say yes or no.";
const UNCHANGED: &str = "Sorry, I couldn't find a different explanation.";

impl<B: QaBackend> DialogueController<B> {
    /// Offer an alternative to `answer` and fetch one if the user accepts.
    ///
    /// The displayed answer and session only change when the backend returns
    /// something different from `answer`.
    pub(super) async fn offer_regeneration(
        &mut self,
        session: &mut SessionState,
        question: &str,
        answer: &str,
    ) -> Result<FlowOutcome> {
        let Some(reply) = self.prompt(session, OFFER).await? else {
            return Ok(FlowOutcome::NoResponse);
        };
        if !phrases::is_affirmative(&reply, &self.config.affirmative_phrases) {
            self.say(session, "Okay.").await?;
            return Ok(FlowOutcome::Declined);
        }

        debug!("requesting alternative answer");
        let request = RegenerateRequest {
            question: question.to_owned(),
            exclude: answer.to_owned(),
        };
        let alternative = self
            .backend
            .regenerate(&request)
            .await?
            .filter(|alt| alt.trim() != answer.trim());

        match alternative {
            Some(alternative) => {
                self.surface.show(
                    Panel::Qa,
                    Tone::Success,
                    &format!("Alternate Answer: {alternative} (regenerated)"),
                );
                session.record_answer(question, &alternative);
                info!("answer regenerated");
                self.say(session, &format!("Here is another explanation: {alternative}"))
                    .await?;
                Ok(FlowOutcome::Regenerated {
                    answer: alternative,
                })
            }
            None => {
                self.say(session, UNCHANGED).await?;
                Ok(FlowOutcome::RegenerationUnchanged)
            }
        }
    }
}
