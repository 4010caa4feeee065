//! Pet mood detection.
//!
//! [`MoodDetector`] is the adapter the sidekick talks to. It never fails:
//! classifier errors become an `unknown` observation and an unavailable
//! classifier is replaced by the seeded-random [`StubClassifier`].

pub mod backends;
pub mod camera;
pub mod detector;
pub mod mime;

pub use backends::{HttpClassifier, StubClassifier};
pub use camera::{Camera, CameraSession, DirectoryCamera};
pub use detector::{DetectorMode, MoodDetector};
