//! Session controller.
//!
//! Owns the per-session state (current mood, active task, streak, displayed
//! message) and runs detection and suggestion cycles against it. One cycle
//! at a time: a trigger that arrives while another cycle is in flight is
//! rejected with [`PetPalError::Busy`].

use std::sync::{Arc, Mutex, RwLock};

use anyhow::Result;
use tracing::{debug, info};
use uuid::Uuid;

use logging::{EventLogger, SidekickEvent};
use petpal_config::{ClassifierMode, PetPalConfig};
use petpal_core::{
    CycleState, Frame, Mood, MoodObservation, PetPalError, PetProfile, TaskType, TriggerSource,
};
use petpal_vision::{HttpClassifier, MoodDetector};

use crate::activity::TimeOfDay;
use crate::engine::TaskSuggestionEngine;
use crate::generator::{AssistantGenerator, GenerateContext};
use crate::providers;
use crate::streak::{Completion, CompletionSink, StreakTracker};

/// Receives every new mood observation.
pub type MoodSink = Arc<dyn Fn(&MoodObservation) + Send + Sync>;

/// A task put in front of the child.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub task_type: TaskType,
    /// Catalog text with the pet's name filled in.
    pub prompt: String,
    /// What the sidekick says about it.
    pub message: String,
    pub source: TriggerSource,
}

/// Output of one detection cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub observation: MoodObservation,
    pub translation: String,
}

/// Puts the state machine back to idle when a cycle ends, including when
/// its future is dropped mid-flight.
struct CycleGuard<'a> {
    state: &'a Mutex<CycleState>,
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        *state = CycleState::Idle;
    }
}

pub struct Sidekick {
    profile: PetProfile,
    generator: AssistantGenerator,
    engine: TaskSuggestionEngine,
    detector: MoodDetector,
    state: Mutex<CycleState>,
    mood: RwLock<Option<MoodObservation>>,
    tracker: Mutex<StreakTracker>,
    message: RwLock<Option<String>>,
    mood_sink: Option<MoodSink>,
    session_id: String,
}

impl Sidekick {
    pub fn new(
        profile: PetProfile,
        generator: AssistantGenerator,
        engine: TaskSuggestionEngine,
        detector: MoodDetector,
    ) -> Self {
        let session_id = Uuid::new_v4().to_string();
        Self {
            tracker: Mutex::new(StreakTracker::new(profile.name.clone())),
            generator: generator.with_session_id(session_id.clone()),
            detector: detector.with_session_id(session_id.clone()),
            profile,
            engine,
            state: Mutex::new(CycleState::Idle),
            mood: RwLock::new(None),
            message: RwLock::new(None),
            mood_sink: None,
            session_id,
        }
    }

    /// Wire every collaborator from a prepared config.
    pub async fn from_config(config: &PetPalConfig) -> Result<Self> {
        let llm = config.llm();
        let generator = AssistantGenerator::new(
            providers::from_config(&llm),
            llm.model
                .clone()
                .unwrap_or_else(|| petpal_config::defaults::DEFAULT_MODEL.to_string()),
        );

        let sidekick_cfg = config.sidekick();
        let threshold = sidekick_cfg
            .mood_confidence_threshold
            .unwrap_or(petpal_config::defaults::DEFAULT_MOOD_CONFIDENCE_THRESHOLD);
        let engine = TaskSuggestionEngine::standard(threshold, sidekick_cfg.seed);

        let classifier = config.classifier();
        let options = classifier.options();
        let detector = match (classifier.mode, &classifier.endpoint) {
            (Some(ClassifierMode::Live), Some(endpoint)) => {
                let mut http = HttpClassifier::new(endpoint);
                if let Some(key) = &classifier.api_key {
                    http = http.with_api_key(key);
                }
                MoodDetector::initialize(Arc::new(http), options, classifier.seed).await
            }
            _ => MoodDetector::stub(classifier.seed, options),
        };

        Ok(Self::new(config.pet_profile(), generator, engine, detector))
    }

    pub fn with_mood_sink(mut self, sink: MoodSink) -> Self {
        self.mood_sink = Some(sink);
        self
    }

    pub fn with_completion_sink(self, sink: CompletionSink) -> Self {
        let tracker = match self.tracker.into_inner() {
            Ok(tracker) => tracker,
            Err(poisoned) => poisoned.into_inner(),
        };
        Self {
            tracker: Mutex::new(tracker.with_sink(sink)),
            ..self
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn profile(&self) -> &PetProfile {
        &self.profile
    }

    pub fn detector(&self) -> &MoodDetector {
        &self.detector
    }

    pub fn state(&self) -> CycleState {
        match self.state.lock() {
            Ok(state) => *state,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn current_mood(&self) -> Option<MoodObservation> {
        self.mood.read().ok().and_then(|m| *m)
    }

    pub fn message(&self) -> Option<String> {
        self.message.read().ok().and_then(|m| m.clone())
    }

    pub fn active_task(&self) -> Option<TaskType> {
        self.with_tracker(|t| t.active())
    }

    pub fn streak(&self) -> usize {
        self.with_tracker(|t| t.streak())
    }

    /// Suggest the next task. The active task and message change only once
    /// the reply is in hand.
    pub async fn suggest_task(&self, source: TriggerSource) -> Result<Suggestion, PetPalError> {
        let _guard = self.begin(CycleState::Suggesting, source)?;

        let observation = self.current_mood();
        let template = self.engine.select(
            observation.map(|o| o.mood),
            observation.map(|o| o.confidence),
        );
        let prompt = template.render(&self.profile.name);

        let context = self
            .context()
            .with_mood(observation.map(|o| o.mood).unwrap_or(Mood::Unknown))
            .with_completed_tasks(self.streak());
        let message = self.generator.generate(&prompt, &context).await;

        self.with_tracker(|t| t.set_active(template.task_type));
        self.set_message(&message);

        EventLogger::log_event(
            &self.session_id,
            SidekickEvent::TaskSuggested {
                task_type: template.task_type.to_string(),
                trigger: source.to_string(),
            },
        );

        Ok(Suggestion {
            task_type: template.task_type,
            prompt,
            message,
            source,
        })
    }

    /// Classify one frame, publish the mood, then translate it into the
    /// pet's voice. Classification always finishes before generation starts.
    pub async fn detect_mood(
        &self,
        frame: &Frame,
        source: TriggerSource,
    ) -> Result<Detection, PetPalError> {
        let _guard = self.begin(CycleState::Detecting, source)?;

        let observation = self.detector.detect(frame).await;
        self.update_mood(observation);

        let prompt = format!("My pet is feeling {}", observation.mood);
        let context = self.context().with_mood(observation.mood);
        let translation = self.generator.generate(&prompt, &context).await;
        self.set_message(&translation);

        Ok(Detection {
            observation,
            translation,
        })
    }

    /// Record a new observation and hand it to the mood sink.
    pub fn update_mood(&self, observation: MoodObservation) {
        if let Ok(mut mood) = self.mood.write() {
            *mood = Some(observation);
        }
        if let Some(sink) = &self.mood_sink {
            sink(&observation);
        }
    }

    /// Mark the active task done.
    pub fn complete_task(&self, task_type: TaskType) -> Result<Completion, PetPalError> {
        let completion = {
            let mut tracker = match self.tracker.lock() {
                Ok(tracker) => tracker,
                Err(poisoned) => poisoned.into_inner(),
            };
            tracker.complete(task_type)?
        };

        self.set_message(&completion.message);
        EventLogger::log_event(
            &self.session_id,
            SidekickEvent::TaskCompleted {
                task_type: task_type.to_string(),
                streak: completion.streak,
                tier: completion.tier.to_string(),
            },
        );
        Ok(completion)
    }

    /// Activity idea for the current mood. Does not touch session state.
    pub async fn suggest_activity(&self, time_of_day: TimeOfDay, weather: Option<&str>) -> String {
        let mood = self.current_mood().map(|o| o.mood).unwrap_or(Mood::Unknown);
        self.generator
            .suggest_activity(mood, &time_of_day.to_string(), weather)
            .await
    }

    fn begin(
        &self,
        next: CycleState,
        source: TriggerSource,
    ) -> Result<CycleGuard<'_>, PetPalError> {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *state != CycleState::Idle {
            info!(current = %*state, requested = %next, trigger = %source, "Trigger rejected, cycle in flight");
            return Err(PetPalError::Busy(*state));
        }
        *state = next;
        debug!(state = %next, trigger = %source, "Cycle started");
        Ok(CycleGuard { state: &self.state })
    }

    fn context(&self) -> GenerateContext {
        GenerateContext::new(&self.profile.name, &self.profile.species)
    }

    fn set_message(&self, message: &str) {
        if let Ok(mut current) = self.message.write() {
            *current = Some(message.to_string());
        }
    }

    fn with_tracker<T>(&self, f: impl FnOnce(&mut StreakTracker) -> T) -> T {
        let mut tracker = match self.tracker.lock() {
            Ok(tracker) => tracker,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut tracker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use anyhow::Result as AnyResult;
    use async_trait::async_trait;
    use petpal_core::{
        Classification, ClassifierOptions, EncouragementTier, ImageClassifier, LlmProvider,
    };

    use crate::catalog::default_catalog;
    use crate::generator::FALLBACK_RESPONSE;
    use crate::providers::MockProvider;

    struct FixedClassifier(&'static str, f32);

    #[async_trait]
    impl ImageClassifier for FixedClassifier {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn initialize(&self) -> AnyResult<()> {
            Ok(())
        }

        async fn classify(
            &self,
            _frame: &Frame,
            _options: &ClassifierOptions,
        ) -> AnyResult<Vec<Classification>> {
            Ok(vec![Classification {
                category_name: self.0.to_string(),
                score: self.1,
            }])
        }
    }

    fn frame() -> Frame {
        Frame::new(vec![0xff, 0xd8, 0xff], "image/jpeg")
    }

    async fn sidekick_with(provider: MockProvider, label: &'static str, score: f32) -> Sidekick {
        let provider: Arc<dyn LlmProvider> = Arc::new(provider);
        let detector = MoodDetector::initialize(
            Arc::new(FixedClassifier(label, score)),
            ClassifierOptions::default(),
            None,
        )
        .await;
        let engine = TaskSuggestionEngine::with_seed(default_catalog(), 0.7, 5).unwrap();
        Sidekick::new(
            PetProfile::default(),
            AssistantGenerator::new(provider, "gpt-3.5-turbo"),
            engine,
            detector,
        )
    }

    #[tokio::test]
    async fn hungry_pet_gets_fed_and_praised() {
        let sk = sidekick_with(MockProvider::new("mock"), "hungry", 0.9).await;

        let detection = sk.detect_mood(&frame(), TriggerSource::Timer).await.unwrap();
        assert_eq!(detection.observation.mood, Mood::Hungry);
        assert_eq!(detection.translation, "My pet is feeling hungry");
        assert_eq!(sk.message().as_deref(), Some("My pet is feeling hungry"));

        let suggestion = sk.suggest_task(TriggerSource::OnDemand).await.unwrap();
        assert_eq!(suggestion.task_type, TaskType::Feeding);
        assert_eq!(suggestion.prompt, "Max might be hungry - feeding time!");
        assert_eq!(sk.active_task(), Some(TaskType::Feeding));

        let done = sk.complete_task(TaskType::Feeding).unwrap();
        assert_eq!(done.streak, 1);
        assert_eq!(done.tier, EncouragementTier::Generic);
        assert_eq!(
            sk.message().as_deref(),
            Some("Great job taking care of Max! Keep up the amazing work! 🌟")
        );
        assert_eq!(sk.active_task(), None);
        assert_eq!(sk.state(), CycleState::Idle);
    }

    #[tokio::test]
    async fn low_confidence_detection_reports_unknown() {
        let sk = sidekick_with(MockProvider::new("mock"), "happy", 0.1).await;
        let detection = sk.detect_mood(&frame(), TriggerSource::Timer).await.unwrap();
        assert_eq!(detection.observation, MoodObservation::unknown());
        assert_eq!(detection.translation, "My pet is feeling unknown");
    }

    #[tokio::test]
    async fn generator_outage_still_commits_suggestion() {
        let sk = sidekick_with(MockProvider::new("mock").failing(), "tired", 0.95).await;
        sk.detect_mood(&frame(), TriggerSource::Timer).await.unwrap();
        let suggestion = sk.suggest_task(TriggerSource::Timer).await.unwrap();
        assert_eq!(suggestion.task_type, TaskType::Rest);
        assert_eq!(suggestion.message, FALLBACK_RESPONSE);
        assert_eq!(sk.active_task(), Some(TaskType::Rest));
    }

    #[tokio::test]
    async fn complete_without_suggestion_is_rejected() {
        let sk = sidekick_with(MockProvider::new("mock"), "happy", 0.9).await;
        assert!(matches!(
            sk.complete_task(TaskType::Grooming),
            Err(PetPalError::PreconditionViolation(_))
        ));
        assert_eq!(sk.streak(), 0);
        assert!(sk.message().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_trigger_is_rejected() {
        let provider = MockProvider::new("mock").with_delay(Duration::from_secs(2));
        let sk = sidekick_with(provider, "happy", 0.9).await;
        let frame = frame();

        let (first, second) = tokio::join!(
            sk.suggest_task(TriggerSource::Timer),
            sk.detect_mood(&frame, TriggerSource::Timer),
        );

        assert!(first.is_ok());
        assert!(matches!(second, Err(PetPalError::Busy(CycleState::Suggesting))));
        assert_eq!(sk.state(), CycleState::Idle);
        assert_eq!(sk.current_mood(), None);
    }

    #[tokio::test]
    async fn aborted_cycle_returns_to_idle() {
        let provider = MockProvider::new("mock").with_delay(Duration::from_secs(60));
        let sk = Arc::new(sidekick_with(provider, "happy", 0.9).await);

        let running = sk.clone();
        let handle =
            tokio::spawn(async move { running.suggest_task(TriggerSource::OnDemand).await });
        while sk.state() == CycleState::Idle {
            tokio::task::yield_now().await;
        }
        assert_eq!(sk.state(), CycleState::Suggesting);

        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());
        assert_eq!(sk.state(), CycleState::Idle);
        assert_eq!(sk.active_task(), None);
    }

    #[tokio::test]
    async fn mood_sink_sees_each_observation() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = seen.clone();
        let sk = sidekick_with(MockProvider::new("mock"), "calm", 0.8)
            .await
            .with_mood_sink(Arc::new(move |o| sink_seen.lock().unwrap().push(o.mood)));

        sk.detect_mood(&frame(), TriggerSource::Timer).await.unwrap();
        sk.update_mood(MoodObservation::new(Mood::Sad, 0.9));

        assert_eq!(*seen.lock().unwrap(), vec![Mood::Calm, Mood::Sad]);
    }

    #[tokio::test]
    async fn completion_sink_is_wired_through() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = seen.clone();
        let sk = sidekick_with(MockProvider::new("mock"), "excited", 0.9)
            .await
            .with_completion_sink(Arc::new(move |t| sink_seen.lock().unwrap().push(t)));

        let suggestion = sk.suggest_task(TriggerSource::OnDemand).await.unwrap();
        sk.complete_task(suggestion.task_type).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![suggestion.task_type]);
    }

    #[tokio::test]
    async fn suggestion_context_counts_completions() {
        let provider = Arc::new(MockProvider::new("mock"));
        let dyn_provider: Arc<dyn LlmProvider> = provider.clone();
        let sk = Sidekick::new(
            PetProfile::default(),
            AssistantGenerator::new(dyn_provider, "gpt-3.5-turbo"),
            TaskSuggestionEngine::standard(0.7, Some(1)),
            MoodDetector::stub(Some(1), ClassifierOptions::default()),
        );

        let first = sk.suggest_task(TriggerSource::OnDemand).await.unwrap();
        sk.complete_task(first.task_type).unwrap();
        sk.suggest_task(TriggerSource::OnDemand).await.unwrap();

        let requests = provider.requests();
        assert!(requests[0].system_prompt.contains("completed 0 tasks"));
        assert!(requests[0].system_prompt.contains("feeling unknown"));
        assert!(requests[1].system_prompt.contains("completed 1 tasks"));
        assert!(requests[1].system_prompt.contains("Dog named Max"));
    }
}
