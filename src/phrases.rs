//! Reply classification for spoken and typed follow-ups.
//!
//! Matching is done on normalised text (lowercase, punctuation stripped,
//! whitespace collapsed) and on word boundaries, so "stop" matches
//! "please stop" but not "stopwatch". Where a reply may itself be an
//! answer, only whole-reply matches count.

/// Replies that abandon the current flow.
const CANCEL_PHRASES: &[&str] = &[
    "cancel",
    "stop",
    "leave",
    "nevermind",
    "never mind",
    "nvm",
    "forget it",
    "forget",
    "skip",
    "not now",
    "not interested",
    "let it go",
    "ignore that",
    "just leave it",
    "leave it",
];

/// Declines that cancel a pending choice but are valid taught answers.
const CANCEL_DECLINES: &[&str] = &["ok", "okay", "no"];

/// Courtesy words ignored at either end of a whole-reply match.
const COURTESY: &[&str] = &["please", "just", "oh"];

/// Generic requests for more detail about the previous question.
const EXPAND_PHRASES: &[&str] = &[
    "describe more",
    "more details",
    "explain more",
    "expand",
    "elaborate",
    "tell me more",
    "go deeper",
    "more info",
    "what else",
    "continue",
    "explain in detail",
    "add more",
];

/// Words allowed around an expand phrase without making it a new question.
const FILLER_WORDS: &[&str] = &[
    "please", "can", "could", "you", "it", "that", "this", "on", "about", "me", "a", "bit",
    "little", "some", "and", "now", "just",
];

/// Replies that say the last answer was wrong.
const NEGATIVE_PHRASES: &[&str] = &[
    "you're wrong",
    "you are wrong",
    "you are mistaken",
    "that's incorrect",
    "that is incorrect",
    "wrong answer",
    "that's wrong",
    "that is wrong",
    "not true",
    "not correct",
    "that's not correct",
    "that's not right",
    "that's not it",
    "that's false",
    "you got it wrong",
    "not what i asked",
    "completely wrong",
    "totally wrong",
    "absolutely wrong",
    "that's a mistake",
    "you said it wrong",
    "that's nonsense",
    "that makes no sense",
];

/// Negative replies that only count when they are the whole reply.
const NEGATIVE_EXACT: &[&str] = &["incorrect", "wrong", "false", "nope", "nah"];

/// Small talk that needs no backend round trip.
const CASUAL_PHRASES: &[&str] = &[
    "ok", "okay", "cool", "great", "thanks", "thank you", "fine", "awesome", "good", "alright",
    "nice",
];

/// Requests to look the pending question up online.
const SEARCH_PHRASES: &[&str] = &[
    "search",
    "search online",
    "look it up",
    "look online",
    "find online",
    "find it online",
];

/// Requests to teach the pending question directly.
const TEACH_PHRASES: &[&str] = &["teach", "teach you", "teach me", "let me teach you", "i'll teach you"];

/// Leading words that turn a reply into a refusal.
const REFUSALS: &[&str] = &["no", "nope", "nah", "not"];

/// Lowercase, drop punctuation (keeping apostrophes) and collapse whitespace.
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| match c {
            '\u{2019}' | '\u{2018}' => '\'',
            c if c.is_alphanumeric() || c == '\'' => c.to_ascii_lowercase(),
            _ => ' ',
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether `phrase` occurs in already-normalised `text` on word boundaries.
fn contains_phrase(text: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    format!(" {text} ").contains(&format!(" {phrase} "))
}

fn contains_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| contains_phrase(text, p))
}

fn equals_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| text == *p)
}

/// Normalise and drop courtesy words from both ends.
fn core_reply(reply: &str) -> String {
    let text = normalize(reply);
    let mut words: Vec<&str> = text.split_whitespace().collect();
    while words.first().is_some_and(|w| COURTESY.contains(w)) {
        words.remove(0);
    }
    while words.last().is_some_and(|w| COURTESY.contains(w)) {
        words.pop();
    }
    words.join(" ")
}

/// The user declines a pending search/teach choice.
pub fn is_cancel(reply: &str) -> bool {
    let text = core_reply(reply);
    equals_any(&text, CANCEL_DECLINES) || equals_any(&text, CANCEL_PHRASES)
}

/// The user abandons a flow that is waiting for an answer.
///
/// The whole reply must be a cancel phrase, so "Elephants never forget" or
/// a bare "No" is still an answer.
pub fn is_cancel_answer(reply: &str) -> bool {
    equals_any(&core_reply(reply), CANCEL_PHRASES)
}

/// The reply says "stop" anywhere, as the spoken follow-up prompt invites.
pub fn says_stop(reply: &str) -> bool {
    contains_phrase(&normalize(reply), "stop")
}

/// The reply is a generic "tell me more" about the previous question rather
/// than a question of its own.
pub fn is_expand_followup(reply: &str) -> bool {
    let text = normalize(reply);
    EXPAND_PHRASES.iter().any(|phrase| {
        if !contains_phrase(&text, phrase) {
            return false;
        }
        let rest = format!(" {text} ").replacen(&format!(" {phrase} "), " ", 1);
        rest.split_whitespace().all(|w| FILLER_WORDS.contains(&w))
    })
}

/// The reply says the previous answer was wrong.
pub fn is_negative_feedback(reply: &str) -> bool {
    let text = normalize(reply);
    equals_any(&text, NEGATIVE_EXACT) || contains_any(&text, NEGATIVE_PHRASES)
}

/// Small talk ("thanks", "ok") that needs no answer.
pub fn is_casual(reply: &str) -> bool {
    equals_any(&normalize(reply), CASUAL_PHRASES)
}

/// The user asks to search online.
pub fn is_search_request(reply: &str) -> bool {
    contains_any(&normalize(reply), SEARCH_PHRASES)
}

/// The whole reply picks the search option, as opposed to a new question
/// that happens to mention searching.
pub fn is_search_choice(reply: &str) -> bool {
    equals_any(&core_reply(reply), SEARCH_PHRASES)
}

/// The user offers to teach the answer.
pub fn is_teach_request(reply: &str) -> bool {
    equals_any(&normalize(reply), TEACH_PHRASES)
}

/// The reply accepts an offer, using the configured affirmative phrases.
///
/// A reply opening with a refusal ("no", "not") is never affirmative.
pub fn is_affirmative(reply: &str, phrases: &[String]) -> bool {
    let text = normalize(reply);
    if text
        .split_whitespace()
        .next()
        .is_some_and(|first| REFUSALS.contains(&first))
    {
        return false;
    }
    phrases
        .iter()
        .map(|p| normalize(p))
        .any(|p| contains_phrase(&text, &p))
}
