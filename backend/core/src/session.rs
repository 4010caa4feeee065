use std::fmt;

use serde::{Deserialize, Serialize};

/// What the sidekick is doing right now. Only one cycle runs at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CycleState {
    #[default]
    Idle,
    Detecting,
    Suggesting,
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleState::Idle => write!(f, "idle"),
            CycleState::Detecting => write!(f, "detecting"),
            CycleState::Suggesting => write!(f, "suggesting"),
        }
    }
}

/// Who asked for a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerSource {
    /// The periodic suggestion or detection timer.
    Timer,
    /// The child tapped the sidekick.
    OnDemand,
}

impl fmt::Display for TriggerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerSource::Timer => write!(f, "timer"),
            TriggerSource::OnDemand => write!(f, "on_demand"),
        }
    }
}
