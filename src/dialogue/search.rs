//! External search flow.

use super::{DialogueController, FlowOutcome};
use crate::error::Result;
use crate::phrases;
use crate::session::SessionState;
use crate::surface::{Panel, Tone};
use qa_client::{ClientError, QaBackend, SearchRequest};
use tracing::{debug, info};

const NOT_FOUND: &str = "Sorry, I couldn't find anything useful online.";

impl<B: QaBackend> DialogueController<B> {
    /// Search for `input`.
    ///
    /// A generic follow-up such as "explain more" searches the previous
    /// question instead, and blank input searches the pending question.
    pub async fn search(&mut self, session: &mut SessionState, input: &str) -> FlowOutcome {
        let result = self.search_inner(session, input, false).await;
        self.finish(session, Panel::Qa, false, result).await
    }

    pub(super) async fn search_inner(
        &mut self,
        session: &mut SessionState,
        input: &str,
        spoken: bool,
    ) -> Result<FlowOutcome> {
        let question = resolve_search_question(session, input).ok_or_else(|| {
            ClientError::Validation("There is no question to search for.".into())
        })?;
        debug!(question = %question, "searching");

        let request = SearchRequest {
            question: question.clone(),
            last_question: session.last_question.clone(),
        };
        let found = self.backend.search(&request).await?;
        session.clear_pending();
        self.surface.clear_offers();

        match found {
            Some(found) => {
                self.surface.show(
                    Panel::Qa,
                    Tone::Success,
                    &format!("Answer: {} (from {})", found.answer, found.source),
                );
                session.record_answer(&question, &found.answer);
                info!(source = %found.source, "search found an answer");
                if spoken {
                    self.say(session, &format!("I found this answer: {}", found.answer))
                        .await?;
                }
                Ok(FlowOutcome::Found {
                    question,
                    answer: found.answer,
                    source: found.source,
                })
            }
            None => {
                self.surface.show(Panel::Qa, Tone::Info, NOT_FOUND);
                info!("search found nothing");
                if spoken {
                    self.say(session, NOT_FOUND).await?;
                }
                Ok(FlowOutcome::NotFound { question })
            }
        }
    }
}

/// Pick the question a search should actually run on.
fn resolve_search_question(session: &SessionState, input: &str) -> Option<String> {
    let input = input.trim();
    if phrases::is_expand_followup(input) {
        if let Some(last) = &session.last_question {
            return Some(last.clone());
        }
    }
    if input.is_empty() || (phrases::is_search_choice(input) && session.pending_question.is_some()) {
        return session.pending_question.clone();
    }
    Some(input.to_owned())
}
