//! Per-variant state machines.
//!
//! Each variant owns its own rules and exposes the same three entry points:
//! `tick` (one simulation step), `input` (one routed pointer event) and,
//! where a variant pauses between rounds, `resume`. They never resolve a
//! session themselves; they return a [`Step`] and the session applies it.

pub mod drain;
pub mod flick;
pub mod mash;
pub mod reflex;
pub mod timing;

use crate::api::config::SkillCheckConfig;
use crate::api::types::{AbilityDescriptor, Cue, Feedback, Outcome, Variant};
use crate::core::rng::RandomSource;
use crate::input::router::RoutedInput;

pub use drain::{DrainField, DrainParticle};
pub use flick::{SwipeDirection, SwipeGesture};
pub use mash::MashMeter;
pub use reflex::{ReflexField, ReflexTarget, TargetTint};
pub use timing::{Oscillator, OscillatorMode, TargetZone};

/// What a variant asks the session to do after a tick or input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Keep playing.
    Continue,
    /// Show the current result, then call `resume` after the delay.
    Pause { delay_ms: f64 },
    /// Resolve now.
    Resolve(Outcome),
    /// Show the current result, then resolve after the delay.
    ResolveAfter { delay_ms: f64, outcome: Outcome },
}

/// Everything a variant may read or write besides its own state.
pub struct StepContext<'a> {
    /// Current timestamp (ms).
    pub now: f64,
    /// Time since the session started (ms).
    pub elapsed: f64,
    pub config: &'a SkillCheckConfig,
    pub rng: &'a mut dyn RandomSource,
    pub cues: &'a mut Vec<Cue>,
    pub feedback: &'a mut Option<Feedback>,
}

impl StepContext<'_> {
    pub fn cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    pub fn show(&mut self, feedback: Feedback) {
        *self.feedback = Some(feedback);
    }
}

/// Variant-specific session payload, tagged by variant.
#[derive(Debug, Clone)]
pub enum VariantState {
    Timing(Oscillator),
    Combo(Oscillator),
    Mash(MashMeter),
    Reflex(ReflexField),
    Drain(DrainField),
    Flick(SwipeGesture),
}

impl VariantState {
    /// Build the initial payload for a freshly started session.
    pub fn spawn(variant: Variant, ability: AbilityDescriptor, rng: &mut dyn RandomSource) -> Self {
        match variant {
            Variant::Timing => VariantState::Timing(Oscillator::new(OscillatorMode::Single, ability, rng)),
            Variant::Combo => VariantState::Combo(Oscillator::new(OscillatorMode::Combo, ability, rng)),
            Variant::Mash => VariantState::Mash(MashMeter::new()),
            Variant::Reflex => VariantState::Reflex(ReflexField::spawn(ability.kind, rng)),
            Variant::Drain => VariantState::Drain(DrainField::spawn(rng)),
            Variant::Flick => VariantState::Flick(SwipeGesture::new(SwipeDirection::random(rng))),
        }
    }

    pub fn variant(&self) -> Variant {
        match self {
            VariantState::Timing(_) => Variant::Timing,
            VariantState::Combo(_) => Variant::Combo,
            VariantState::Mash(_) => Variant::Mash,
            VariantState::Reflex(_) => Variant::Reflex,
            VariantState::Drain(_) => Variant::Drain,
            VariantState::Flick(_) => Variant::Flick,
        }
    }

    pub fn tick(&mut self, ctx: &mut StepContext) -> Step {
        match self {
            VariantState::Timing(osc) | VariantState::Combo(osc) => osc.tick(),
            VariantState::Mash(meter) => meter.tick(ctx),
            VariantState::Reflex(field) => field.tick(ctx),
            VariantState::Drain(field) => field.tick(ctx),
            VariantState::Flick(_) => Step::Continue,
        }
    }

    pub fn input(&mut self, input: &RoutedInput, ctx: &mut StepContext) -> Step {
        match self {
            VariantState::Timing(osc) | VariantState::Combo(osc) => osc.input(input, ctx),
            VariantState::Mash(meter) => meter.input(input, ctx),
            VariantState::Reflex(field) => field.input(input, ctx),
            VariantState::Drain(field) => field.input(input),
            VariantState::Flick(gesture) => gesture.input(input, ctx),
        }
    }

    /// Continue after a `Step::Pause` display delay.
    pub fn resume(&mut self, ctx: &mut StepContext) {
        if let VariantState::Combo(osc) = self {
            osc.next_stage(ctx);
        }
    }
}
