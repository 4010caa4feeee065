use serde::{Deserialize, Serialize};

use crate::event::EncouragementTier;
use crate::session::TriggerSource;
use crate::types::{MoodObservation, TaskType};

/// Front end → Scheduler: things the child (or the shell) asks for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Tap on the sidekick: suggest a task now.
    SuggestNow,
    /// Acquire the camera and start periodic mood detection.
    StartCamera,
    /// Stop detection and release the camera.
    StopCamera,
    /// Mark the active task as done.
    CompleteTask { task_type: TaskType },
    /// Tear everything down.
    Shutdown,
}

/// Scheduler → Front end: what the sidekick has to say.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    MoodUpdated(MoodObservation),
    /// Pet translation produced by a detection cycle.
    Translation { message: String },
    TaskSuggested {
        task_type: TaskType,
        message: String,
        source: TriggerSource,
    },
    TaskCompleted {
        task_type: TaskType,
        streak: usize,
        tier: EncouragementTier,
        message: String,
    },
    CameraStarted,
    CameraStopped,
    /// A command or timer could not be honoured.
    Rejected { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serialization_roundtrip() {
        let cmd = Command::CompleteTask {
            task_type: TaskType::Feeding,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"type\":\"complete_task\""));
        let back: Command = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            back,
            Command::CompleteTask {
                task_type: TaskType::Feeding
            }
        ));
    }

    #[test]
    fn test_notification_tagging() {
        let n = Notification::TaskSuggested {
            task_type: TaskType::Rest,
            message: "nap time".into(),
            source: TriggerSource::Timer,
        };
        let value = serde_json::to_value(&n).unwrap();
        assert_eq!(value["type"], "task_suggested");
        assert_eq!(value["task_type"], "rest");
        assert_eq!(value["source"], "timer");
    }
}
