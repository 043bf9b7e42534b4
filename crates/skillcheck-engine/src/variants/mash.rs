use super::{Step, StepContext};
use crate::api::types::{Cue, Feedback, Outcome};
use crate::input::router::RoutedInput;

const MASH_DECAY: f32 = 0.05;
const MASH_TAP: f32 = 7.5;
const MASH_FULL: f32 = 100.0;
const MASH_SUCCESS: f32 = 1.5;

/// Rapid-tap meter: each tap adds a fixed amount, every tick drains a little.
#[derive(Debug, Clone, Default)]
pub struct MashMeter {
    /// 0–100.
    pub level: f32,
    pub taps: u32,
}

impl MashMeter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_full(&self) -> bool {
        self.level >= MASH_FULL
    }

    /// Timeout fallback: whatever fraction of the meter is filled.
    pub fn fallback_multiplier(&self) -> f32 {
        self.level / MASH_FULL
    }

    pub fn tick(&mut self, ctx: &mut StepContext) -> Step {
        if ctx.elapsed >= ctx.config.mash_timeout_ms {
            log::debug!("mash timed out at level {:.1}", self.level);
            return Step::Resolve(Outcome::single(self.fallback_multiplier()));
        }
        self.level = (self.level - MASH_DECAY).max(0.0);
        Step::Continue
    }

    pub fn input(&mut self, input: &RoutedInput, ctx: &mut StepContext) -> Step {
        if !input.is_press() {
            return Step::Continue;
        }
        self.taps += 1;
        self.level = (self.level + MASH_TAP).min(MASH_FULL);
        ctx.cue(Cue::Tap);
        if self.is_full() {
            ctx.cue(Cue::Complete);
            ctx.show(Feedback::Maxed);
            return Step::ResolveAfter {
                delay_ms: ctx.config.delays.mash_ms,
                outcome: Outcome::single(MASH_SUCCESS),
            };
        }
        Step::Continue
    }
}
