//! Assistant Response Generator.
//!
//! Builds the companion's system instruction from explicit context and asks
//! the configured provider for one short reply. Stateless: nothing from one
//! call is remembered for the next.

use std::sync::Arc;

use logging::{EventLogger, SidekickEvent};
use petpal_core::{LlmProvider, LlmRequest, Mood, PetPalError};

pub const FALLBACK_RESPONSE: &str = "I'm here to help you take care of your pet!";

pub const FALLBACK_ACTIVITY: &str = "How about spending some quality time with your pet?";

pub const RESPONSE_TEMPERATURE: f32 = 0.7;

pub const ACTIVITY_TEMPERATURE: f32 = 0.8;

pub const MAX_OUTPUT_TOKENS: u32 = 100;

/// Everything the reply may depend on. Continuity is the caller's job.
#[derive(Debug, Clone, Default)]
pub struct GenerateContext {
    pub pet_name: String,
    pub pet_type: String,
    pub recent_mood: Option<Mood>,
    pub completed_tasks: Option<usize>,
    pub recent_activities: Vec<String>,
}

impl GenerateContext {
    pub fn new(pet_name: impl Into<String>, pet_type: impl Into<String>) -> Self {
        Self {
            pet_name: pet_name.into(),
            pet_type: pet_type.into(),
            ..Default::default()
        }
    }

    pub fn with_mood(mut self, mood: Mood) -> Self {
        self.recent_mood = Some(mood);
        self
    }

    pub fn with_completed_tasks(mut self, count: usize) -> Self {
        self.completed_tasks = Some(count);
        self
    }

    fn system_prompt(&self) -> String {
        let mood = self.recent_mood.unwrap_or(Mood::Unknown);
        let mut prompt = format!(
            "You are a friendly virtual pet companion helping a child take care of their {} named {}.\n\
             The pet is currently feeling {}.\n\
             The child has completed {} tasks today.\n",
            self.pet_type,
            self.pet_name,
            mood,
            self.completed_tasks.unwrap_or(0),
        );
        if !self.recent_activities.is_empty() {
            prompt.push_str(&format!(
                "Recent activities: {}.\n",
                self.recent_activities.join(", ")
            ));
        }
        prompt.push_str("Respond in a cheerful, encouraging, and child-friendly way.");
        prompt
    }
}

fn activity_prompt(mood: Mood, time_of_day: &str, weather: Option<&str>) -> String {
    let mut prompt = format!(
        "You are a friendly virtual pet companion. Suggest a fun and safe activity for a child to do with their pet.\n\
         Consider the following:\n\
         - Pet's current mood: {mood}\n\
         - Time of day: {time_of_day}\n"
    );
    if let Some(weather) = weather.filter(|w| !w.trim().is_empty()) {
        prompt.push_str(&format!("- Weather: {weather}\n"));
    }
    prompt.push_str("\nKeep the suggestion safe, age-appropriate, and engaging.");
    prompt
}

pub struct AssistantGenerator {
    provider: Arc<dyn LlmProvider>,
    model: String,
    session_id: String,
}

impl AssistantGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            session_id: String::new(),
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    /// Reply to `prompt` in the companion's voice. Never fails; a broken or
    /// silent service yields [`FALLBACK_RESPONSE`].
    pub async fn generate(&self, prompt: &str, context: &GenerateContext) -> String {
        let request = LlmRequest {
            model: self.model.clone(),
            system_prompt: context.system_prompt(),
            user_prompt: prompt.to_string(),
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: RESPONSE_TEMPERATURE,
        };
        self.complete_or(&request, FALLBACK_RESPONSE, "generator").await
    }

    /// Ask for an activity idea. Falls back to [`FALLBACK_ACTIVITY`].
    pub async fn suggest_activity(
        &self,
        mood: Mood,
        time_of_day: &str,
        weather: Option<&str>,
    ) -> String {
        let request = LlmRequest {
            model: self.model.clone(),
            system_prompt: activity_prompt(mood, time_of_day, weather),
            user_prompt: String::new(),
            max_tokens: MAX_OUTPUT_TOKENS,
            temperature: ACTIVITY_TEMPERATURE,
        };
        self.complete_or(&request, FALLBACK_ACTIVITY, "activity").await
    }

    async fn complete_or(&self, request: &LlmRequest, fallback: &str, component: &str) -> String {
        match self.try_complete(request).await {
            Ok(text) => text,
            Err(e) => {
                EventLogger::log_event(
                    &self.session_id,
                    SidekickEvent::fallback(component, e.to_string()),
                );
                fallback.to_string()
            }
        }
    }

    async fn try_complete(&self, request: &LlmRequest) -> Result<String, PetPalError> {
        let provider = self.provider.name();
        let response = self
            .provider
            .complete(request)
            .await
            .map_err(|e| PetPalError::service(provider, format!("{e:#}")))?;

        // A blank completion counts as a failure, so each caller has a single
        // fallback string for both cases.
        let text = response.content.trim();
        if text.is_empty() {
            return Err(PetPalError::service(provider, "empty completion"));
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockProvider;

    fn generator(provider: MockProvider) -> (AssistantGenerator, Arc<MockProvider>) {
        let provider = Arc::new(provider);
        let dyn_provider: Arc<dyn LlmProvider> = provider.clone();
        (AssistantGenerator::new(dyn_provider, "gpt-3.5-turbo"), provider)
    }

    fn context() -> GenerateContext {
        GenerateContext::new("Max", "Dog")
            .with_mood(Mood::Hungry)
            .with_completed_tasks(2)
    }

    #[tokio::test]
    async fn returns_trimmed_completion() {
        let (gen, _) = generator(MockProvider::new("m").with_response("  Woof! Let's eat!  \n"));
        assert_eq!(gen.generate("feed", &context()).await, "Woof! Let's eat!");
    }

    #[tokio::test]
    async fn failure_returns_fallback() {
        let (gen, _) = generator(MockProvider::new("m").failing());
        assert_eq!(gen.generate("feed", &context()).await, FALLBACK_RESPONSE);
    }

    #[tokio::test]
    async fn blank_completion_returns_fallback() {
        let (gen, _) = generator(MockProvider::new("m").with_response("   "));
        assert_eq!(gen.generate("feed", &context()).await, FALLBACK_RESPONSE);
    }

    #[tokio::test]
    async fn request_carries_context_and_limits() {
        let (gen, provider) = generator(MockProvider::new("m"));
        gen.generate("Max might be hungry - feeding time!", &context()).await;

        let req = &provider.requests()[0];
        assert_eq!(req.model, "gpt-3.5-turbo");
        assert_eq!(req.temperature, 0.7);
        assert_eq!(req.max_tokens, 100);
        assert_eq!(req.user_prompt, "Max might be hungry - feeding time!");
        assert!(req.system_prompt.contains("their Dog named Max"));
        assert!(req.system_prompt.contains("feeling hungry"));
        assert!(req.system_prompt.contains("completed 2 tasks"));
    }

    #[tokio::test]
    async fn missing_context_fields_use_defaults() {
        let (gen, provider) = generator(MockProvider::new("m"));
        gen.generate("hi", &GenerateContext::new("Luna", "Cat")).await;
        let system = &provider.requests()[0].system_prompt;
        assert!(system.contains("feeling unknown"));
        assert!(system.contains("completed 0 tasks"));
        assert!(!system.contains("Recent activities"));
    }

    #[tokio::test]
    async fn recent_activities_are_listed() {
        let (gen, provider) = generator(MockProvider::new("m"));
        let mut ctx = context();
        ctx.recent_activities = vec!["walk".into(), "bath".into()];
        gen.generate("hi", &ctx).await;
        assert!(provider.requests()[0]
            .system_prompt
            .contains("Recent activities: walk, bath."));
    }

    #[tokio::test]
    async fn activity_uses_own_template_and_temperature() {
        let (gen, provider) = generator(MockProvider::new("m").with_response("Build a pillow fort!"));
        let reply = gen.suggest_activity(Mood::Excited, "afternoon", Some("rainy")).await;
        assert_eq!(reply, "Build a pillow fort!");

        let req = &provider.requests()[0];
        assert_eq!(req.temperature, 0.8);
        assert_eq!(req.max_tokens, 100);
        assert!(req.user_prompt.is_empty());
        assert!(req.system_prompt.contains("current mood: excited"));
        assert!(req.system_prompt.contains("Time of day: afternoon"));
        assert!(req.system_prompt.contains("Weather: rainy"));
    }

    #[tokio::test]
    async fn activity_without_weather_omits_line() {
        let (gen, provider) = generator(MockProvider::new("m").with_response("Fetch!"));
        gen.suggest_activity(Mood::Calm, "morning", None).await;
        assert!(!provider.requests()[0].system_prompt.contains("Weather"));
    }

    #[tokio::test]
    async fn activity_failure_returns_activity_fallback() {
        let (gen, _) = generator(MockProvider::new("m").failing());
        let reply = gen.suggest_activity(Mood::Tired, "night", None).await;
        assert_eq!(reply, FALLBACK_ACTIVITY);
    }

    #[tokio::test]
    async fn blank_activity_matches_failure_fallback() {
        let (gen, _) = generator(MockProvider::new("m").with_response("\n  \t"));
        let reply = gen.suggest_activity(Mood::Happy, "evening", Some("sunny")).await;
        assert_eq!(reply, FALLBACK_ACTIVITY);
    }
}
