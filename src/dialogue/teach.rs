//! Teaching flows: typed pairs, spoken pairs and bulk files.

use super::{DialogueController, FlowOutcome};
use crate::error::Result;
use crate::session::SessionState;
use crate::surface::{Panel, Tone};
use qa_client::{ClientError, QaBackend, TeachRequest};
use tracing::{debug, info};

const MISSING_FIELDS: &str = "Please provide both a question and an answer.";
const SAVED: &str = "Answer saved successfully.";

impl<B: QaBackend> DialogueController<B> {
    /// Teach a typed question/answer pair.
    ///
    /// Either field being blank is reported inline; nothing is sent.
    pub async fn teach(
        &mut self,
        session: &mut SessionState,
        question: &str,
        answer: &str,
    ) -> FlowOutcome {
        let result = if question.trim().is_empty() || answer.trim().is_empty() {
            Err(ClientError::Validation(MISSING_FIELDS.into()).into())
        } else {
            self.save_answer(session, question, answer, false).await
        };
        self.finish(session, Panel::Qa, false, result).await
    }

    /// Collect a pair by voice and teach it.
    ///
    /// With a pending question only the answer is asked for.
    pub async fn teach_voice(&mut self, session: &mut SessionState) -> FlowOutcome {
        let result = self.teach_voice_inner(session).await;
        self.finish(session, Panel::Qa, true, result).await
    }

    async fn teach_voice_inner(&mut self, session: &mut SessionState) -> Result<FlowOutcome> {
        let question = match session.pending_question.clone() {
            Some(pending) => pending,
            None => {
                let Some(question) = self
                    .prompt(session, "Say the question you want to teach.")
                    .await?
                else {
                    return Ok(FlowOutcome::NoResponse);
                };
                question
            }
        };

        let prompt = if session.pending_question.is_some() {
            "Say the answer for your earlier question."
        } else {
            "Now say the answer."
        };
        let Some(answer) = self.prompt(session, prompt).await? else {
            return Ok(FlowOutcome::NoResponse);
        };

        self.save_answer(session, &question, &answer, true).await
    }

    /// Teach several pairs at once. Incomplete entries are skipped.
    pub async fn teach_bulk(
        &mut self,
        session: &mut SessionState,
        entries: &[TeachRequest],
    ) -> FlowOutcome {
        let result = self.teach_bulk_inner(entries).await;
        self.finish(session, Panel::Qa, false, result).await
    }

    async fn teach_bulk_inner(&mut self, entries: &[TeachRequest]) -> Result<FlowOutcome> {
        let complete = entries.iter().filter(|e| e.is_complete()).count();
        debug!(total = entries.len(), complete, "bulk teaching");
        if complete == 0 {
            return Err(ClientError::Validation("No valid question/answer pairs to teach.".into()).into());
        }

        let message = self
            .backend
            .teach_bulk(entries)
            .await?
            .unwrap_or_else(|| format!("Learned {complete} answers."));
        self.surface.show(Panel::Qa, Tone::Success, &message);
        info!(count = complete, "bulk teach stored");
        Ok(FlowOutcome::BulkTaught { message })
    }

    /// Store `answer` for `question` and resolve the pending question.
    pub(super) async fn save_answer(
        &mut self,
        session: &mut SessionState,
        question: &str,
        answer: &str,
        spoken: bool,
    ) -> Result<FlowOutcome> {
        let request = TeachRequest::new(question.trim(), answer.trim());
        if !request.is_complete() {
            return Err(ClientError::Validation(MISSING_FIELDS.into()).into());
        }

        let message = self
            .backend
            .teach(&request)
            .await?
            .unwrap_or_else(|| "Learned.".to_owned());
        session.clear_pending();
        self.surface.clear_offers();
        self.surface.show(Panel::Qa, Tone::Success, &message);
        info!("answer taught");
        if spoken {
            self.say(session, SAVED).await?;
        }

        Ok(FlowOutcome::Taught {
            question: request.question,
            message,
        })
    }
}
