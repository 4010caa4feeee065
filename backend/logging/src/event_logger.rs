//! Sidekick Event Logger
//!
//! Structured events (fallbacks, suggestions, completions, detections)
//! routed through `tracing` so they land in the NDJSON log.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::redact::redact_sensitive_data;

pub const EVENT_TARGET: &str = "sidekick_events";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SidekickEvent {
    /// An adapter swallowed a failure and answered with a safe default.
    Fallback {
        component: String,
        reason: String,
    },
    MoodDetected {
        mood: String,
        confidence: f32,
    },
    TaskSuggested {
        task_type: String,
        trigger: String,
    },
    TaskCompleted {
        task_type: String,
        streak: usize,
        tier: String,
    },
}

impl SidekickEvent {
    pub fn fallback(component: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fallback {
            component: component.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: SidekickEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Log a sidekick event. Fallbacks go out at warn, everything else at info.
    pub fn log_event(session_id: &str, event: SidekickEvent) -> EventLogEntry {
        let event = match event {
            SidekickEvent::Fallback { component, reason } => SidekickEvent::Fallback {
                component,
                reason: redact_sensitive_data(&reason),
            },
            other => other,
        };

        let entry = EventLogEntry {
            session_id: session_id.into(),
            timestamp: Utc::now(),
            event,
        };

        let payload = serde_json::to_string(&entry.event).unwrap_or_default();
        match &entry.event {
            SidekickEvent::Fallback { component, .. } => {
                warn!(target: EVENT_TARGET, session_id, component = %component, event = %payload, "Fallback used");
            }
            _ => {
                info!(target: EVENT_TARGET, session_id, event = %payload, "Sidekick event");
            }
        }
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_reason_is_redacted() {
        let entry = EventLogger::log_event(
            "s1",
            SidekickEvent::fallback("generator", "auth failed for Bearer abc.def.ghi"),
        );
        match entry.event {
            SidekickEvent::Fallback { reason, .. } => {
                assert!(!reason.contains("abc.def.ghi"));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let event = SidekickEvent::TaskCompleted {
            task_type: "feeding".into(),
            streak: 3,
            tier: "on_a_roll".into(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "task_completed");
        assert_eq!(value["streak"], 3);
    }
}
