//! The virtual sidekick: task suggestions, assistant replies, streaks, and
//! the scheduler that drives them.

pub mod activity;
pub mod catalog;
pub mod engine;
pub mod generator;
pub mod providers;
pub mod scheduler;
pub mod sidekick;
pub mod streak;

pub use activity::TimeOfDay;
pub use catalog::default_catalog;
pub use engine::TaskSuggestionEngine;
pub use generator::{AssistantGenerator, GenerateContext, FALLBACK_ACTIVITY, FALLBACK_RESPONSE};
pub use scheduler::{CameraFactory, Scheduler};
pub use sidekick::{Detection, MoodSink, Sidekick, Suggestion};
pub use streak::{Completion, CompletionSink, StreakTracker};
