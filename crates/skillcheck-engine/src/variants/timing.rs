//! TIMING and COMBO: a marker bouncing across 0–100, tapped against a target zone.

use serde::Serialize;

use super::{Step, StepContext};
use crate::api::types::{AbilityDescriptor, Cue, Feedback, Outcome};
use crate::core::rng::RandomSource;
use crate::input::router::{RoutedInput, SESSION_SPACE};

const TIMING_SPEED: f32 = 3.5;
const COMBO_BASE_SPEED: f32 = 2.8;
const COMBO_SPEED_PER_STAGE: f32 = 1.0;

pub const COMBO_STAGES: u8 = 3;
const COMBO_ZONE_SHRINK: f32 = 0.85;
const COMBO_CRIT_SCORE: f32 = 0.8;
const COMBO_HIT_SCORE: f32 = 0.4;
const COMBO_FLOOR: f32 = 0.5;

const COMBO_ZONE_WIDTH: f32 = 36.0;
const SONIC_ZONE_WIDTH: f32 = 32.0;
const DEFAULT_ZONE_WIDTH: f32 = 18.0;
const FIXED_ZONE_START: f32 = 40.0;

/// The "hit" region of the 0–100 marker space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetZone {
    pub start: f32,
    pub width: f32,
}

impl TargetZone {
    pub fn new(start: f32, width: f32) -> Self {
        Self { start, width }
    }

    pub fn center(&self) -> f32 {
        self.start + self.width / 2.0
    }

    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    /// Distance from the zone center.
    pub fn diff(&self, position: f32) -> f32 {
        (position - self.center()).abs()
    }

    fn random(width: f32, rng: &mut dyn RandomSource) -> Self {
        Self::new(rng.range(0.0, SESSION_SPACE - width), width)
    }
}

/// Score a single TIMING tap.
pub fn timing_multiplier(diff: f32, half_width: f32) -> (f32, Feedback) {
    if diff <= half_width / 6.0 {
        (2.0, Feedback::Perfect)
    } else if diff <= half_width / 2.0 {
        (1.5, Feedback::Great)
    } else if diff <= half_width {
        (1.2, Feedback::Good)
    } else {
        (0.5, Feedback::Miss)
    }
}

/// Score contribution of one COMBO stage.
pub fn combo_stage_score(diff: f32, half_width: f32) -> (f32, Feedback) {
    if diff > half_width {
        (0.0, Feedback::Miss)
    } else if diff <= half_width / 4.0 {
        (COMBO_CRIT_SCORE, Feedback::Crit)
    } else {
        (COMBO_HIT_SCORE, Feedback::Hit)
    }
}

/// Final COMBO multiplier from the accumulated stage scores.
pub fn combo_multiplier(accumulated: f32) -> f32 {
    accumulated.max(COMBO_FLOOR)
}

fn combo_speed(stage: u8) -> f32 {
    COMBO_BASE_SPEED + stage as f32 * COMBO_SPEED_PER_STAGE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorMode {
    /// One tap, resolves immediately.
    Single,
    /// Three stages with a shrinking, relocating zone.
    Combo,
}

/// The bouncing marker plus its scoring state.
#[derive(Debug, Clone)]
pub struct Oscillator {
    pub mode: OscillatorMode,
    pub zone: TargetZone,
    pub position: f32,
    /// +1.0 or -1.0.
    pub direction: f32,
    pub speed: f32,
    /// Current COMBO stage, 1-based. Always 1 for TIMING.
    pub stage: u8,
    pub accumulated_score: f32,
    /// COMBO stages that landed inside the zone.
    pub combo_count: u32,
    /// Motion stopped for good.
    pub frozen: bool,
}

impl Oscillator {
    pub fn new(mode: OscillatorMode, ability: AbilityDescriptor, rng: &mut dyn RandomSource) -> Self {
        let zone = match mode {
            OscillatorMode::Combo => TargetZone::random(COMBO_ZONE_WIDTH, rng),
            OscillatorMode::Single if ability.sonic => TargetZone::new(FIXED_ZONE_START, SONIC_ZONE_WIDTH),
            OscillatorMode::Single => TargetZone::new(FIXED_ZONE_START, DEFAULT_ZONE_WIDTH),
        };
        Self::with_zone(mode, zone)
    }

    /// Start with an explicit zone.
    pub fn with_zone(mode: OscillatorMode, zone: TargetZone) -> Self {
        let stage = 1;
        Self {
            mode,
            zone,
            position: 0.0,
            direction: 1.0,
            speed: match mode {
                OscillatorMode::Single => TIMING_SPEED,
                OscillatorMode::Combo => combo_speed(stage),
            },
            stage,
            accumulated_score: 0.0,
            combo_count: 0,
            frozen: false,
        }
    }

    /// Advance the marker one step, reversing at the bounds.
    pub fn tick(&mut self) -> Step {
        if self.frozen {
            return Step::Continue;
        }
        self.position += self.direction * self.speed;
        if self.position >= SESSION_SPACE {
            self.position = SESSION_SPACE;
            self.direction = -1.0;
        } else if self.position <= 0.0 {
            self.position = 0.0;
            self.direction = 1.0;
        }
        Step::Continue
    }

    pub fn input(&mut self, input: &RoutedInput, ctx: &mut StepContext) -> Step {
        if !input.is_press() || self.frozen {
            return Step::Continue;
        }
        let diff = self.zone.diff(self.position);
        let half = self.zone.half_width();
        match self.mode {
            OscillatorMode::Single => {
                self.frozen = true;
                let (multiplier, feedback) = timing_multiplier(diff, half);
                ctx.cue(if diff <= half { Cue::Hit } else { Cue::Miss });
                ctx.show(feedback);
                Step::Resolve(Outcome::single(multiplier))
            }
            OscillatorMode::Combo => {
                let (score, feedback) = combo_stage_score(diff, half);
                self.accumulated_score += score;
                if diff <= half {
                    self.combo_count += 1;
                    ctx.cue(Cue::Hit);
                } else {
                    ctx.cue(Cue::Miss);
                }
                ctx.show(feedback);
                log::debug!(
                    "combo stage {}: diff {:.2} of {:.2}, total {:.2}",
                    self.stage,
                    diff,
                    half,
                    self.accumulated_score
                );

                let delay_ms = ctx.config.delays.combo_stage_ms;
                if self.stage >= COMBO_STAGES {
                    self.frozen = true;
                    ctx.cue(Cue::Complete);
                    Step::ResolveAfter {
                        delay_ms,
                        outcome: Outcome::single(combo_multiplier(self.accumulated_score)),
                    }
                } else {
                    ctx.cue(Cue::StageCleared { stage: self.stage });
                    Step::Pause { delay_ms }
                }
            }
        }
    }

    /// Move to the next COMBO stage: narrower zone, new spot, faster marker.
    pub fn next_stage(&mut self, ctx: &mut StepContext) {
        if self.mode != OscillatorMode::Combo || self.stage >= COMBO_STAGES {
            return;
        }
        self.stage += 1;
        self.speed = combo_speed(self.stage);
        self.zone = TargetZone::random(self.zone.width * COMBO_ZONE_SHRINK, ctx.rng);
        *ctx.feedback = None;
    }
}
