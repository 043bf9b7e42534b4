//! Headless skill-check minigame engine.
//!
//! A combat layer asks for a skill check; the engine runs one of six short
//! challenges against per-frame ticks and pointer input, then hands back one
//! or two outcome multipliers exactly once.

pub mod api;
pub mod core;
pub mod input;
pub mod session;
pub mod variants;

pub use glam;

// Re-export key types at crate root for convenience
pub use api::config::{DisplayDelays, SkillCheckConfig};
pub use api::emitter::{LatestOutcome, OutcomeEmitter, RecordedOutcomes};
pub use api::error::SkillCheckError;
pub use api::types::{
    AbilityDescriptor, AbilityKind, Cue, Feedback, Outcome, OutcomeRecord, SessionId,
    SkillCheckRequest, Variant,
};
pub use crate::core::rng::{RandomSource, Rng, SequenceRandom};
pub use crate::core::time::{Clock, FramePacer, ManualClock};
pub use input::queue::InputQueue;
pub use input::router::{InputRouter, PointerEvent, PointerPhase, RoutedInput, Surface};
pub use session::controller::SessionController;
pub use session::state::SkillCheckSession;
pub use session::view::{SessionView, VariantView};
pub use variants::{Step, VariantState};
