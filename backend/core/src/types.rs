use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Emotional state tag applied to a pet.
///
/// The set is closed: any label a classifier produces that is not listed
/// here parses to [`Mood::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Excited,
    Calm,
    Tired,
    Hungry,
    #[default]
    Unknown,
}

impl Mood {
    /// Moods the development stub draws from.
    pub const DETECTABLE: [Mood; 5] = [
        Mood::Happy,
        Mood::Excited,
        Mood::Calm,
        Mood::Tired,
        Mood::Hungry,
    ];

    /// Parse a classifier label. Never fails.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "happy" => Mood::Happy,
            "sad" => Mood::Sad,
            "excited" => Mood::Excited,
            "calm" => Mood::Calm,
            "tired" => Mood::Tired,
            "hungry" => Mood::Hungry,
            _ => Mood::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Excited => "excited",
            Mood::Calm => "calm",
            Mood::Tired => "tired",
            Mood::Hungry => "hungry",
            Mood::Unknown => "unknown",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Sad => "😢",
            Mood::Excited => "🎉",
            Mood::Tired => "😴",
            Mood::Hungry => "🍽️",
            Mood::Calm | Mood::Unknown => "🤔",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detection cycle's result. Overwritten every cycle, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodObservation {
    pub mood: Mood,
    pub confidence: f32,
}

impl MoodObservation {
    /// Build an observation, clamping confidence into `[0, 1]` (NaN becomes 0).
    pub fn new(mood: Mood, confidence: f32) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self { mood, confidence }
    }

    /// The "nothing detected" observation.
    pub fn unknown() -> Self {
        Self {
            mood: Mood::Unknown,
            confidence: 0.0,
        }
    }

    /// Whether the confidence clears `threshold` (strictly).
    pub fn is_confident(&self, threshold: f32) -> bool {
        self.confidence > threshold
    }
}

/// The pet the sidekick is helping with. Immutable for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetProfile {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age: u32,
}

impl Default for PetProfile {
    fn default() -> Self {
        Self {
            name: "Max".to_string(),
            species: "Dog".to_string(),
            breed: "Golden Retriever".to_string(),
            age: 2,
        }
    }
}

/// Kinds of pet-care task the sidekick can suggest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Grooming,
    Exercise,
    Feeding,
    Rest,
    Training,
}

impl TaskType {
    pub const ALL: [TaskType; 5] = [
        TaskType::Grooming,
        TaskType::Exercise,
        TaskType::Feeding,
        TaskType::Rest,
        TaskType::Training,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Grooming => "grooming",
            TaskType::Exercise => "exercise",
            TaskType::Feeding => "feeding",
            TaskType::Rest => "rest",
            TaskType::Training => "training",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Display title for the task list.
    pub fn title(&self) -> &'static str {
        match self {
            TaskType::Grooming => "Grooming Session",
            TaskType::Exercise => "Exercise Time",
            TaskType::Feeding => "Feeding Time",
            TaskType::Rest => "Rest Time",
            TaskType::Training => "Training Session",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TaskType::Grooming => "🦮",
            TaskType::Exercise => "🎾",
            TaskType::Feeding => "🍽️",
            TaskType::Rest => "😴",
            TaskType::Training => "🎯",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog entry: what to suggest, and under which moods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskTemplate {
    pub task_type: TaskType,
    /// Display text with a `{pet}` placeholder.
    pub prompt_text: String,
    pub applicable_moods: Vec<Mood>,
}

impl TaskTemplate {
    pub fn new(task_type: TaskType, prompt_text: impl Into<String>, moods: &[Mood]) -> Self {
        Self {
            task_type,
            prompt_text: prompt_text.into(),
            applicable_moods: moods.to_vec(),
        }
    }

    pub fn applies_to(&self, mood: Mood) -> bool {
        self.applicable_moods.contains(&mood)
    }

    /// Prompt text with the pet name filled in.
    pub fn render(&self, pet_name: &str) -> String {
        self.prompt_text.replace("{pet}", pet_name)
    }
}

/// An encoded video frame handed to the classifier.
#[derive(Debug, Clone)]
pub struct Frame {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub captured_at: DateTime<Utc>,
}

impl Frame {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            captured_at: Utc::now(),
        }
    }
}
