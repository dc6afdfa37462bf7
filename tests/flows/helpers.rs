//! Scripted fakes shared by the flow tests.

use async_trait::async_trait;
use qa_client::{
    AskOutcome, AskRequest, ClientError, Found, FruitAdded, FruitUpload, PredictRequest,
    Prediction, QaBackend, RegenerateRequest, SearchRequest, TeachRequest,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use voice_qa::speech::{Heard, Listener, Speaker, VoiceIo};
use voice_qa::surface::{Affordance, Panel, Surface, Tone};
use voice_qa::{DialogueConfig, DialogueController, SpeechConfig};

type Reply<T> = qa_client::Result<T>;

/// A backend request as the fake saw it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Ask(AskRequest),
    Search(SearchRequest),
    Teach(TeachRequest),
    TeachBulk(Vec<TeachRequest>),
    Regenerate(RegenerateRequest),
    Predict(PredictRequest),
    AddFruit { name: String, file_name: String },
}

/// Backend that replays queued responses and records every request.
///
/// A request with nothing queued fails like an unreachable server.
#[derive(Default)]
pub(crate) struct FakeBackend {
    asks: Mutex<VecDeque<Reply<AskOutcome>>>,
    searches: Mutex<VecDeque<Reply<Option<Found>>>>,
    teaches: Mutex<VecDeque<Reply<Option<String>>>>,
    regenerations: Mutex<VecDeque<Reply<Option<String>>>>,
    predictions: Mutex<VecDeque<Reply<Prediction>>>,
    uploads: Mutex<VecDeque<Reply<FruitAdded>>>,
    calls: Mutex<Vec<Call>>,
}

fn next<T>(queue: &Mutex<VecDeque<Reply<T>>>, route: &str) -> Reply<T> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(ClientError::Http(format!("nothing scripted for {route}"))))
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn ask_reply(self, reply: Reply<AskOutcome>) -> Self {
        self.asks.lock().unwrap().push_back(reply);
        self
    }

    pub(crate) fn answer(self, answer: &str, source: &str) -> Self {
        self.ask_reply(Ok(AskOutcome::Answered {
            answer: answer.into(),
            source: source.into(),
        }))
    }

    pub(crate) fn no_answer(self) -> Self {
        self.ask_reply(Ok(AskOutcome::NoAnswer {
            message: Some("I couldn't find an answer. Search online or teach me.".into()),
        }))
    }

    pub(crate) fn search_reply(self, reply: Reply<Option<Found>>) -> Self {
        self.searches.lock().unwrap().push_back(reply);
        self
    }

    pub(crate) fn found(self, answer: &str, source: &str) -> Self {
        self.search_reply(Ok(Some(Found {
            answer: answer.into(),
            source: source.into(),
        })))
    }

    pub(crate) fn teach_reply(self, reply: Reply<Option<String>>) -> Self {
        self.teaches.lock().unwrap().push_back(reply);
        self
    }

    pub(crate) fn regenerate_reply(self, reply: Reply<Option<String>>) -> Self {
        self.regenerations.lock().unwrap().push_back(reply);
        self
    }

    pub(crate) fn predict_reply(self, reply: Reply<Prediction>) -> Self {
        self.predictions.lock().unwrap().push_back(reply);
        self
    }

    pub(crate) fn upload_reply(self, reply: Reply<FruitAdded>) -> Self {
        self.uploads.lock().unwrap().push_back(reply);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl QaBackend for FakeBackend {
    async fn ask(&self, request: &AskRequest) -> Reply<AskOutcome> {
        self.record(Call::Ask(request.clone()));
        next(&self.asks, "/ask")
    }

    async fn search(&self, request: &SearchRequest) -> Reply<Option<Found>> {
        self.record(Call::Search(request.clone()));
        next(&self.searches, "/search")
    }

    async fn teach(&self, request: &TeachRequest) -> Reply<Option<String>> {
        self.record(Call::Teach(request.clone()));
        next(&self.teaches, "/teach")
    }

    async fn teach_bulk(&self, entries: &[TeachRequest]) -> Reply<Option<String>> {
        self.record(Call::TeachBulk(entries.to_vec()));
        next(&self.teaches, "/teach-bulk")
    }

    async fn regenerate(&self, request: &RegenerateRequest) -> Reply<Option<String>> {
        self.record(Call::Regenerate(request.clone()));
        next(&self.regenerations, "/regenerate-answer")
    }

    async fn predict(&self, request: &PredictRequest) -> Reply<Prediction> {
        self.record(Call::Predict(request.clone()));
        next(&self.predictions, "/predict")
    }

    async fn add_fruit(&self, upload: &FruitUpload) -> Reply<FruitAdded> {
        self.record(Call::AddFruit {
            name: upload.name.clone(),
            file_name: upload.file_name.clone(),
        });
        next(&self.uploads, "/add-fruit")
    }
}

/// Everything a [`RecordingSurface`] was asked to present.
#[derive(Debug, Default)]
pub(crate) struct SurfaceLog {
    pub(crate) shown: Vec<(Panel, Tone, String)>,
    pub(crate) images: Vec<(Panel, String)>,
    pub(crate) offers: Vec<Vec<Affordance>>,
    pub(crate) clears: usize,
    pub(crate) alerts: Vec<String>,
}

/// Surface whose log stays readable after it is boxed into a controller.
#[derive(Clone, Default)]
pub(crate) struct RecordingSurface(Arc<Mutex<SurfaceLog>>);

impl RecordingSurface {
    pub(crate) fn texts(&self) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .shown
            .iter()
            .map(|(_, _, text)| text.clone())
            .collect()
    }

    pub(crate) fn last_text(&self) -> Option<String> {
        self.texts().pop()
    }

    pub(crate) fn shown(&self) -> Vec<(Panel, Tone, String)> {
        self.0.lock().unwrap().shown.clone()
    }

    pub(crate) fn images(&self) -> Vec<(Panel, String)> {
        self.0.lock().unwrap().images.clone()
    }

    pub(crate) fn offers(&self) -> Vec<Vec<Affordance>> {
        self.0.lock().unwrap().offers.clone()
    }

    pub(crate) fn clears(&self) -> usize {
        self.0.lock().unwrap().clears
    }

    pub(crate) fn alerts(&self) -> Vec<String> {
        self.0.lock().unwrap().alerts.clone()
    }
}

impl Surface for RecordingSurface {
    fn show(&mut self, panel: Panel, tone: Tone, text: &str) {
        self.0.lock().unwrap().shown.push((panel, tone, text.to_owned()));
    }

    fn show_image(&mut self, panel: Panel, url: &str) {
        self.0.lock().unwrap().images.push((panel, url.to_owned()));
    }

    fn offer(&mut self, affordances: &[Affordance]) {
        self.0.lock().unwrap().offers.push(affordances.to_vec());
    }

    fn clear_offers(&mut self) {
        self.0.lock().unwrap().clears += 1;
    }

    fn alert(&mut self, text: &str) {
        self.0.lock().unwrap().alerts.push(text.to_owned());
    }
}

/// Speaker that records utterances instead of playing them.
#[derive(Clone, Default)]
pub(crate) struct RecordingSpeaker(Arc<Mutex<Vec<String>>>);

impl RecordingSpeaker {
    pub(crate) fn spoken(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

#[async_trait]
impl Speaker for RecordingSpeaker {
    async fn speak(&mut self, text: &str) -> voice_qa::Result<()> {
        self.0.lock().unwrap().push(text.to_owned());
        Ok(())
    }
}

/// Listener that replays transcripts; an empty string is silence, and an
/// exhausted script hears nothing.
pub(crate) struct ScriptedListener(VecDeque<Heard>);

impl ScriptedListener {
    pub(crate) fn new(replies: &[&str]) -> Self {
        Self(
            replies
                .iter()
                .map(|r| {
                    if r.is_empty() {
                        Heard::Nothing
                    } else {
                        Heard::Transcript((*r).to_owned())
                    }
                })
                .collect(),
        )
    }
}

#[async_trait]
impl Listener for ScriptedListener {
    async fn listen(&mut self) -> voice_qa::Result<Heard> {
        Ok(self.0.pop_front().unwrap_or(Heard::Nothing))
    }
}

pub(crate) type TestController = DialogueController<Arc<FakeBackend>>;

/// Short windows so voice tests never wait on real timing.
pub(crate) fn fast_speech() -> SpeechConfig {
    SpeechConfig {
        listen_timeout_ms: 200,
        turn_gap_ms: 1,
        ..SpeechConfig::default()
    }
}

/// A text-only controller.
pub(crate) fn text_controller(backend: &Arc<FakeBackend>) -> (TestController, RecordingSurface) {
    let surface = RecordingSurface::default();
    let controller = DialogueController::new(
        Arc::clone(backend),
        Box::new(surface.clone()),
        DialogueConfig::default(),
    );
    (controller, surface)
}

/// A controller whose listener hears `replies` in order.
pub(crate) fn voice_controller(
    backend: &Arc<FakeBackend>,
    replies: &[&str],
) -> (TestController, RecordingSurface, RecordingSpeaker) {
    voice_controller_with_listener(backend, Box::new(ScriptedListener::new(replies)))
}

pub(crate) fn voice_controller_with_listener(
    backend: &Arc<FakeBackend>,
    listener: Box<dyn Listener>,
) -> (TestController, RecordingSurface, RecordingSpeaker) {
    let (controller, surface) = text_controller(backend);
    let speaker = RecordingSpeaker::default();
    let voice = VoiceIo::new(Box::new(speaker.clone()), listener, &fast_speech());
    (controller.with_voice(voice), surface, speaker)
}
