//! Conversation state carried between dialogue turns.
//!
//! One [`SessionState`] lives for the whole program run and is passed by
//! `&mut` into every flow. Nothing is persisted.

/// What the speech channel is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activity {
    #[default]
    Idle,
    Speaking,
    Listening,
}

/// Mutable state shared by all dialogue flows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Question awaiting an answer, a search or teaching.
    pub pending_question: Option<String>,
    /// Most recent resolved question.
    pub last_question: Option<String>,
    /// Answer given for `last_question`.
    pub last_answer: Option<String>,
    /// The next chat message is a taught answer for `pending_question`.
    pub expecting_teaching_answer: bool,
    /// A "no answer" result is waiting for the user to pick search or teach.
    pub awaiting_follow_up: bool,
    activity: Activity,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn is_speaking(&self) -> bool {
        self.activity == Activity::Speaking
    }

    pub fn is_listening(&self) -> bool {
        self.activity == Activity::Listening
    }

    /// Switch the speech channel. Speaking and listening replace each other.
    pub fn set_activity(&mut self, activity: Activity) {
        self.activity = activity;
    }

    /// Start working on a new question.
    pub fn begin_question(&mut self, question: &str) {
        self.pending_question = Some(question.to_owned());
        self.expecting_teaching_answer = false;
        self.awaiting_follow_up = false;
    }

    /// Record a resolved pair and drop any pending question.
    pub fn record_answer(&mut self, question: &str, answer: &str) {
        self.last_question = Some(question.to_owned());
        self.last_answer = Some(answer.to_owned());
        self.clear_pending();
    }

    /// Wait for the next input to be a taught answer for `question`.
    pub fn expect_teaching(&mut self, question: &str) {
        self.pending_question = Some(question.to_owned());
        self.expecting_teaching_answer = true;
        self.awaiting_follow_up = false;
    }

    /// Offer search/teach follow-ups for the pending question.
    pub fn await_follow_up(&mut self) {
        self.awaiting_follow_up = self.pending_question.is_some();
        self.expecting_teaching_answer = false;
    }

    /// Drop the pending question and every flag gated on it.
    pub fn clear_pending(&mut self) {
        self.pending_question = None;
        self.expecting_teaching_answer = false;
        self.awaiting_follow_up = false;
    }

    /// Return to idle after an aborted or failed flow.
    pub fn reset(&mut self) {
        self.clear_pending();
        self.activity = Activity::Idle;
    }

    /// Whether no flow is mid-way.
    pub fn is_idle(&self) -> bool {
        self.pending_question.is_none()
            && !self.expecting_teaching_answer
            && !self.awaiting_follow_up
            && self.activity == Activity::Idle
    }
}
