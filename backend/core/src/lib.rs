pub mod error;
pub mod event;
pub mod message;
pub mod session;
pub mod traits;
pub mod types;

pub use error::PetPalError;
pub use event::{EncouragementTier, TaskEvent};
pub use message::{Command, Notification};
pub use session::{CycleState, TriggerSource};
pub use traits::{
    Classification, ClassifierOptions, Delegate, ImageClassifier, LlmProvider, LlmRequest,
    LlmResponse,
};
pub use types::{Frame, Mood, MoodObservation, PetProfile, TaskTemplate, TaskType};
