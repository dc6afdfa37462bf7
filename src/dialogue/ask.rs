//! Ask flow, typed and spoken.

use super::{DialogueController, FlowOutcome};
use crate::error::Result;
use crate::phrases;
use crate::session::SessionState;
use crate::surface::{Affordance, Panel, Tone};
use qa_client::{AskOutcome, AskRequest, ClientError, QaBackend};
use tracing::{debug, info};

const ASK_PROMPT: &str = "Please ask your question.";
const FOLLOW_UP_PROMPT: &str =
    "I don't know the answer. Say 'search' to find online, 'stop' to cancel, or tell me the answer directly.";
const NO_ANSWER_MESSAGE: &str = "I don't know the answer yet. You can search online or teach me.";
const CORRECTION_MESSAGE: &str = "Please tell me the correct answer.";

impl<B: QaBackend> DialogueController<B> {
    /// Ask a typed question.
    pub async fn ask(&mut self, session: &mut SessionState, question: &str) -> FlowOutcome {
        let result = self.ask_inner(session, question, false).await;
        self.finish(session, Panel::Qa, false, result).await
    }

    /// Spoken Q&A: prompt for a question, answer it, then run whichever
    /// follow-up the answer calls for.
    pub async fn ask_voice(&mut self, session: &mut SessionState) -> FlowOutcome {
        let result = self.ask_voice_inner(session).await;
        self.finish(session, Panel::Qa, true, result).await
    }

    async fn ask_voice_inner(&mut self, session: &mut SessionState) -> Result<FlowOutcome> {
        let Some(question) = self.prompt(session, ASK_PROMPT).await? else {
            return Ok(FlowOutcome::NoResponse);
        };

        match self.ask_inner(session, &question, true).await? {
            FlowOutcome::Answered {
                question, answer, ..
            } if self.config.offer_regeneration => {
                self.offer_regeneration(session, &question, &answer).await
            }
            FlowOutcome::AwaitingCorrection { question } => {
                let Some(answer) = self.listen_after_gap(session).await? else {
                    return Ok(FlowOutcome::NoResponse);
                };
                if phrases::is_cancel_answer(&answer) {
                    self.say(session, "Okay, cancelled.").await?;
                    return Ok(FlowOutcome::Cancelled);
                }
                self.save_answer(session, &question, &answer, true).await
            }
            FlowOutcome::AwaitingFollowUp { question } => {
                self.voice_follow_up(session, &question).await
            }
            other => Ok(other),
        }
    }

    /// Spoken choice after an unanswered question: search, stop, or the
    /// answer itself.
    async fn voice_follow_up(
        &mut self,
        session: &mut SessionState,
        question: &str,
    ) -> Result<FlowOutcome> {
        let Some(reply) = self.prompt(session, FOLLOW_UP_PROMPT).await? else {
            return Ok(FlowOutcome::NoResponse);
        };

        if phrases::is_cancel_answer(&reply) || phrases::says_stop(&reply) {
            self.say(session, "Okay, cancelled.").await?;
            return Ok(FlowOutcome::Cancelled);
        }
        if phrases::is_search_request(&reply) {
            return self.search_inner(session, question, true).await;
        }

        debug!("treating reply as a taught answer");
        let outcome = self.save_answer(session, question, &reply, false).await?;
        self.surface.show(
            Panel::Qa,
            Tone::Success,
            &format!("Learned: \"{question}\" \u{2192} \"{}\"", reply.trim()),
        );
        self.say(session, "Thanks! I have learned the new answer.").await?;
        Ok(outcome)
    }

    /// Submit one question and present whatever came back.
    pub(super) async fn ask_inner(
        &mut self,
        session: &mut SessionState,
        question: &str,
        spoken: bool,
    ) -> Result<FlowOutcome> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ClientError::Validation("Please enter a question.".into()).into());
        }

        debug!(question, "asking");
        session.begin_question(question);
        self.surface.clear_offers();

        let request = AskRequest::new(question)
            .with_context(session.last_question.clone(), session.last_answer.clone());

        match self.backend.ask(&request).await? {
            AskOutcome::Answered { answer, source } => {
                self.surface.show(
                    Panel::Qa,
                    Tone::Success,
                    &format!("Answer: {answer} (source: {source})"),
                );
                session.record_answer(question, &answer);
                info!(%source, "question answered");
                if spoken {
                    self.say(session, &answer).await?;
                }
                Ok(FlowOutcome::Answered {
                    question: question.to_owned(),
                    answer,
                    source,
                })
            }
            AskOutcome::NeedsCorrection { message } => {
                session.expect_teaching(question);
                let message = message.unwrap_or_else(|| CORRECTION_MESSAGE.to_owned());
                self.surface.show(Panel::Qa, Tone::Info, &message);
                if spoken {
                    self.say(session, &message).await?;
                }
                Ok(FlowOutcome::AwaitingCorrection {
                    question: question.to_owned(),
                })
            }
            AskOutcome::Learned { message } => {
                session.clear_pending();
                let message = message.unwrap_or_else(|| "Learned.".to_owned());
                self.surface.show(Panel::Qa, Tone::Success, &message);
                info!("backend learned from input");
                if spoken {
                    self.say(session, &message).await?;
                }
                Ok(FlowOutcome::Learned { message })
            }
            AskOutcome::NoAnswer { message } => {
                session.await_follow_up();
                let message = message.unwrap_or_else(|| NO_ANSWER_MESSAGE.to_owned());
                self.surface.show(Panel::Qa, Tone::Info, &message);
                self.surface.offer(&[Affordance::Search, Affordance::Teach]);
                info!("no answer, offering search and teach");
                Ok(FlowOutcome::AwaitingFollowUp {
                    question: question.to_owned(),
                })
            }
        }
    }
}
