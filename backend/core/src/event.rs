use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::TaskType;

/// A completed task. Appended to the session's streak, never removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEvent {
    pub id: Uuid,
    pub task_type: TaskType,
    pub timestamp: DateTime<Utc>,
}

impl TaskEvent {
    pub fn new(task_type: TaskType) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_type,
            timestamp: Utc::now(),
        }
    }
}

/// Milestone bands for the completion message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncouragementTier {
    Generic,
    /// 3rd completion.
    OnARoll,
    /// 5th completion.
    SuperParent,
    /// 10th completion.
    Legendary,
}

impl EncouragementTier {
    /// Tier for a streak length. Exact matches only; everything else is generic.
    pub fn for_streak(count: usize) -> Self {
        match count {
            3 => Self::OnARoll,
            5 => Self::SuperParent,
            10 => Self::Legendary,
            _ => Self::Generic,
        }
    }

    /// Text appended after the "Great job" opener.
    pub fn text(&self, pet_name: &str) -> String {
        match self {
            Self::Generic => "Keep up the amazing work! 🌟".to_string(),
            Self::OnARoll => "You're on a roll! 🌟".to_string(),
            Self::SuperParent => "You're becoming a super pet parent! 🏆".to_string(),
            Self::Legendary => {
                format!("You're legendary! {pet_name} is so lucky to have you! 👑")
            }
        }
    }
}

impl std::fmt::Display for EncouragementTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_else(|| format!("{:?}", self));
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(EncouragementTier::for_streak(3), EncouragementTier::OnARoll);
        assert_eq!(EncouragementTier::for_streak(5), EncouragementTier::SuperParent);
        assert_eq!(EncouragementTier::for_streak(10), EncouragementTier::Legendary);
    }

    #[test]
    fn test_tier_is_generic_elsewhere() {
        for count in (0..=30).filter(|c| ![3, 5, 10].contains(c)) {
            assert_eq!(
                EncouragementTier::for_streak(count),
                EncouragementTier::Generic,
                "count {count}"
            );
        }
    }

    #[test]
    fn test_legendary_text_names_the_pet() {
        let text = EncouragementTier::Legendary.text("Max");
        assert!(text.contains("Max is so lucky"));
        assert!(!text.contains('$'));
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(EncouragementTier::SuperParent.to_string(), "super_parent");
        assert_eq!(EncouragementTier::OnARoll.to_string(), "on_a_roll");
    }
}
