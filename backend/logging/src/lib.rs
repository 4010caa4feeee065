//! Telemetry and structured logging for the PetPal+ runtime.
//!
//! Console + rolling NDJSON output, secret redaction, and the structured
//! sidekick events emitted on every fallback and task transition.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, EventLogger, SidekickEvent};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
