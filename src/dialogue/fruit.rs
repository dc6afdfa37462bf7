//! Fruit prediction and image upload.

use super::{DialogueController, FlowOutcome};
use crate::error::Result;
use crate::session::SessionState;
use crate::surface::{Panel, Tone};
use qa_client::{ClientError, FruitUpload, PredictRequest, Prediction, QaBackend};
use std::path::Path;
use tracing::{debug, info};

const PREDICT_PROMPT: &str = "Please say the fruit name.";
const NOT_RECOGNIZED: &str = "Sorry, I could not recognize the fruit.";

impl<B: QaBackend> DialogueController<B> {
    /// Ask for a fruit name by voice and predict from it.
    pub async fn predict_voice(&mut self, session: &mut SessionState) -> FlowOutcome {
        let result = match self.prompt(session, PREDICT_PROMPT).await {
            Ok(Some(text)) => self.predict_inner(session, &text, true).await,
            Ok(None) => Ok(FlowOutcome::NoResponse),
            Err(err) => Err(err),
        };
        self.finish(session, Panel::Predict, true, result).await
    }

    /// Predict from typed text.
    pub async fn predict(&mut self, session: &mut SessionState, text: &str) -> FlowOutcome {
        let result = self.predict_inner(session, text, false).await;
        self.finish(session, Panel::Predict, false, result).await
    }

    async fn predict_inner(
        &mut self,
        session: &mut SessionState,
        text: &str,
        spoken: bool,
    ) -> Result<FlowOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ClientError::Validation("Please enter a fruit description.".into()).into());
        }
        debug!(text, "predicting fruit");

        let request = PredictRequest {
            text: text.to_owned(),
        };
        match self.backend.predict(&request).await? {
            Prediction::Match { fruit, image_url } => {
                self.surface
                    .show(Panel::Predict, Tone::Success, &format!("Prediction: {fruit}"));
                if let Some(url) = &image_url {
                    self.surface.show_image(Panel::Predict, url);
                }
                info!(%fruit, "fruit predicted");
                if spoken {
                    self.say(session, &format!("It looks like {fruit}")).await?;
                }
                Ok(FlowOutcome::Predicted { fruit, image_url })
            }
            Prediction::NoMatch { reason } => {
                self.surface.show(Panel::Predict, Tone::Error, &reason);
                info!("no fruit matched");
                if spoken {
                    self.say(session, NOT_RECOGNIZED).await?;
                }
                Ok(FlowOutcome::NotRecognized { reason })
            }
        }
    }

    /// Upload `image` labelled as `name`.
    ///
    /// A blank name or an unreadable or empty file is reported inline and
    /// nothing is sent.
    pub async fn upload(&mut self, session: &mut SessionState, name: &str, image: &Path) -> FlowOutcome {
        let result = self.upload_inner(name, image).await;
        self.finish(session, Panel::Upload, false, result).await
    }

    async fn upload_inner(&mut self, name: &str, image: &Path) -> Result<FlowOutcome> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::Validation("Please enter a fruit name and choose an image.".into()).into());
        }
        let upload = FruitUpload::from_path(name, image).await?;
        debug!(name, file = %upload.file_name, bytes = upload.bytes.len(), "uploading fruit image");

        let added = self.backend.add_fruit(&upload).await?;
        self.surface.show(Panel::Upload, Tone::Success, &added.message);
        if let Some(url) = &added.image_url {
            self.surface.show_image(Panel::Upload, url);
        }
        info!(name, "fruit image stored");
        Ok(FlowOutcome::FruitAdded {
            message: added.message,
            image_url: added.image_url,
        })
    }
}
