//! Where dialogue results are shown.
//!
//! A [`Surface`] has one result area per interaction mode, a place for
//! follow-up affordances and a blocking alert. [`TerminalSurface`] renders
//! them as prefixed lines.

use std::io::Write;

/// Result area a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// Questions, answers, searches and teaching.
    Qa,
    /// Fruit prediction.
    Predict,
    /// Fruit image upload.
    Upload,
}

impl Panel {
    fn label(self) -> &'static str {
        match self {
            Self::Qa => "qa",
            Self::Predict => "predict",
            Self::Upload => "upload",
        }
    }
}

/// How a message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Error,
}

/// A follow-up action offered after an unanswered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    /// Look the question up online.
    Search,
    /// Teach the answer directly.
    Teach,
}

impl Affordance {
    /// Hint shown next to the affordance.
    pub fn hint(self) -> &'static str {
        match self {
            Self::Search => "'search' to look it up online",
            Self::Teach => "'teach' to tell me the answer",
        }
    }
}

/// Output side of the dialogue.
pub trait Surface: Send {
    /// Replace the contents of `panel`.
    fn show(&mut self, panel: Panel, tone: Tone, text: &str);

    /// Show an image next to the panel's text.
    fn show_image(&mut self, panel: Panel, url: &str);

    /// Present follow-up actions.
    fn offer(&mut self, affordances: &[Affordance]);

    /// Withdraw any offered follow-ups.
    fn clear_offers(&mut self);

    /// Interrupt the user with a message that must be acknowledged.
    fn alert(&mut self, text: &str);
}

/// Writes everything as prefixed lines.
pub struct TerminalSurface<W> {
    out: W,
}

impl TerminalSurface<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, line: &str) {
        // A closed terminal is not worth failing a dialogue turn over.
        let _ = writeln!(self.out, "{line}");
        let _ = self.out.flush();
    }
}

impl<W: Write + Send> Surface for TerminalSurface<W> {
    fn show(&mut self, panel: Panel, tone: Tone, text: &str) {
        let marker = match tone {
            Tone::Info => "",
            Tone::Success => "ok: ",
            Tone::Error => "error: ",
        };
        self.line(&format!("[{}] {marker}{text}", panel.label()));
    }

    fn show_image(&mut self, panel: Panel, url: &str) {
        self.line(&format!("[{}] image: {url}", panel.label()));
    }

    fn offer(&mut self, affordances: &[Affordance]) {
        if affordances.is_empty() {
            return;
        }
        let hints: Vec<&str> = affordances.iter().map(|a| a.hint()).collect();
        self.line(&format!("[next] type {}", hints.join(", or ")));
    }

    /// Printed hints cannot be taken back, so there is nothing to withdraw.
    fn clear_offers(&mut self) {}

    fn alert(&mut self, text: &str) {
        self.line(&format!("[alert] {text}"));
    }
}
