use std::sync::Arc;

use tracing::{debug, info, warn};

use logging::{EventLogger, SidekickEvent};
use petpal_core::{
    ClassifierOptions, Frame, ImageClassifier, Mood, MoodObservation, PetPalError,
};

use crate::backends::StubClassifier;

/// Which backend the detector ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorMode {
    /// Real classifier.
    Live,
    /// Stub, either configured or substituted after a failed initialization.
    Fallback,
}

/// Classifies a pet's mood from camera frames.
///
/// `detect` never returns an error. Low-confidence and failed calls both
/// produce [`MoodObservation::unknown`], and each is logged.
pub struct MoodDetector {
    classifier: Arc<dyn ImageClassifier>,
    options: ClassifierOptions,
    mode: DetectorMode,
    session_id: String,
}

impl MoodDetector {
    /// Detector backed by the stub from the start.
    pub fn stub(seed: Option<u64>, options: ClassifierOptions) -> Self {
        Self {
            classifier: Arc::new(StubClassifier::new(seed)),
            options,
            mode: DetectorMode::Fallback,
            session_id: String::new(),
        }
    }

    /// Acquire `classifier` once. If that fails the detector runs on the stub
    /// (seeded with `fallback_seed`) for the rest of its life.
    pub async fn initialize(
        classifier: Arc<dyn ImageClassifier>,
        options: ClassifierOptions,
        fallback_seed: Option<u64>,
    ) -> Self {
        match classifier.initialize().await {
            Ok(()) => {
                info!(classifier = classifier.name(), "Mood detector initialized");
                Self {
                    classifier,
                    options,
                    mode: DetectorMode::Live,
                    session_id: String::new(),
                }
            }
            Err(e) => {
                EventLogger::log_event(
                    "",
                    SidekickEvent::fallback(
                        "mood_detector",
                        format!("{} failed to initialize: {e:#}", classifier.name()),
                    ),
                );
                Self::stub(fallback_seed, options)
            }
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    pub fn mode(&self) -> DetectorMode {
        self.mode
    }

    pub fn options(&self) -> &ClassifierOptions {
        &self.options
    }

    /// Classify one frame.
    pub async fn detect(&self, frame: &Frame) -> MoodObservation {
        match self.try_detect(frame).await {
            Ok(observation) => {
                EventLogger::log_event(
                    &self.session_id,
                    SidekickEvent::MoodDetected {
                        mood: observation.mood.to_string(),
                        confidence: observation.confidence,
                    },
                );
                observation
            }
            Err(PetPalError::LowConfidenceDetection { threshold }) => {
                debug!(threshold, "No mood above threshold");
                MoodObservation::unknown()
            }
            Err(e) => {
                EventLogger::log_event(
                    &self.session_id,
                    SidekickEvent::fallback("mood_detector", e.to_string()),
                );
                MoodObservation::unknown()
            }
        }
    }

    async fn try_detect(&self, frame: &Frame) -> Result<MoodObservation, PetPalError> {
        let results = self
            .classifier
            .classify(frame, &self.options)
            .await
            .map_err(|e| PetPalError::service(self.classifier.name(), format!("{e:#}")))?;

        // The stub's samples are the fallback answer; only live scores are filtered.
        let threshold = match self.mode {
            DetectorMode::Live => self.options.score_threshold,
            DetectorMode::Fallback => 0.0,
        };
        let top = results
            .into_iter()
            .filter(|c| !c.score.is_nan())
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .filter(|c| c.score >= threshold)
            .ok_or(PetPalError::LowConfidenceDetection { threshold })?;

        let mood = Mood::from_label(&top.category_name);
        if mood == Mood::Unknown {
            warn!(label = %top.category_name, "Classifier returned an unrecognized mood label");
        }
        Ok(MoodObservation::new(mood, top.score))
    }
}
