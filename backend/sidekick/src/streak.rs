use std::sync::Arc;

use petpal_core::{EncouragementTier, PetPalError, TaskEvent, TaskType};

/// Called with the type of every task the child finishes.
pub type CompletionSink = Arc<dyn Fn(TaskType) + Send + Sync>;

/// Result of a successful completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub task_type: TaskType,
    /// Completions so far this session, including this one.
    pub streak: usize,
    pub tier: EncouragementTier,
    pub message: String,
}

/// Session-scoped record of finished tasks. Nothing here outlives the
/// session.
pub struct StreakTracker {
    pet_name: String,
    events: Vec<TaskEvent>,
    active: Option<TaskType>,
    sink: Option<CompletionSink>,
}

impl StreakTracker {
    pub fn new(pet_name: impl Into<String>) -> Self {
        Self {
            pet_name: pet_name.into(),
            events: Vec::new(),
            active: None,
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: CompletionSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Replace the active task. The previous one, if any, is dropped without
    /// being completed.
    pub fn set_active(&mut self, task_type: TaskType) {
        self.active = Some(task_type);
    }

    pub fn active(&self) -> Option<TaskType> {
        self.active
    }

    pub fn streak(&self) -> usize {
        self.events.len()
    }

    pub fn events(&self) -> &[TaskEvent] {
        &self.events
    }

    /// Finish the active task. Without a matching active task nothing
    /// changes and the call is rejected.
    pub fn complete(&mut self, task_type: TaskType) -> Result<Completion, PetPalError> {
        match self.active {
            None => {
                return Err(PetPalError::PreconditionViolation(
                    "no active task to complete".into(),
                ))
            }
            Some(active) if active != task_type => {
                return Err(PetPalError::PreconditionViolation(format!(
                    "active task is {active}, not {task_type}"
                )))
            }
            Some(_) => {}
        }

        self.events.push(TaskEvent::new(task_type));
        self.active = None;

        let streak = self.events.len();
        let tier = EncouragementTier::for_streak(streak);
        let message = format!(
            "Great job taking care of {}! {}",
            self.pet_name,
            tier.text(&self.pet_name)
        );

        if let Some(sink) = &self.sink {
            sink(task_type);
        }

        Ok(Completion {
            task_type,
            streak,
            tier,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn finish(tracker: &mut StreakTracker, task_type: TaskType) -> Completion {
        tracker.set_active(task_type);
        tracker.complete(task_type).unwrap()
    }

    #[test]
    fn first_completion_is_generic() {
        let mut tracker = StreakTracker::new("Max");
        let done = finish(&mut tracker, TaskType::Feeding);
        assert_eq!(done.streak, 1);
        assert_eq!(done.tier, EncouragementTier::Generic);
        assert_eq!(
            done.message,
            "Great job taking care of Max! Keep up the amazing work! 🌟"
        );
        assert_eq!(tracker.active(), None);
        assert_eq!(tracker.events().len(), 1);
    }

    #[test]
    fn milestones_pick_their_tier() {
        let mut tracker = StreakTracker::new("Max");
        let mut messages = Vec::new();
        for _ in 0..11 {
            messages.push(finish(&mut tracker, TaskType::Exercise).message);
        }
        assert!(messages[2].ends_with("You're on a roll! 🌟"));
        assert!(messages[3].ends_with("Keep up the amazing work! 🌟"));
        assert!(messages[4].ends_with("You're becoming a super pet parent! 🏆"));
        assert_eq!(
            messages[9],
            "Great job taking care of Max! You're legendary! Max is so lucky to have you! 👑"
        );
        assert!(messages[10].ends_with("Keep up the amazing work! 🌟"));
    }

    #[test]
    fn complete_without_active_task_is_rejected() {
        let mut tracker = StreakTracker::new("Max");
        assert!(matches!(
            tracker.complete(TaskType::Rest),
            Err(PetPalError::PreconditionViolation(_))
        ));
        assert_eq!(tracker.streak(), 0);
    }

    #[test]
    fn mismatched_type_is_rejected() {
        let mut tracker = StreakTracker::new("Max");
        tracker.set_active(TaskType::Grooming);
        assert!(tracker.complete(TaskType::Training).is_err());
        assert_eq!(tracker.streak(), 0);
        assert_eq!(tracker.active(), Some(TaskType::Grooming));
    }

    #[test]
    fn second_complete_is_rejected() {
        let mut tracker = StreakTracker::new("Max");
        finish(&mut tracker, TaskType::Rest);
        assert!(tracker.complete(TaskType::Rest).is_err());
        assert_eq!(tracker.streak(), 1);
    }

    #[test]
    fn sink_sees_each_completion() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = seen.clone();
        let mut tracker = StreakTracker::new("Max")
            .with_sink(Arc::new(move |t| sink_seen.lock().unwrap().push(t)));

        finish(&mut tracker, TaskType::Feeding);
        finish(&mut tracker, TaskType::Rest);
        let _ = tracker.complete(TaskType::Rest);

        assert_eq!(*seen.lock().unwrap(), vec![TaskType::Feeding, TaskType::Rest]);
    }
}
