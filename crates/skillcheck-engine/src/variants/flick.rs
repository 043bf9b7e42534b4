use glam::Vec2;
use serde::Serialize;

use super::{Step, StepContext};
use crate::api::types::{Cue, Feedback, Outcome};
use crate::core::rng::RandomSource;
use crate::input::router::{PointerPhase, RoutedInput};

/// Displacement along the target direction that counts as a full flick.
pub const FLICK_REACH: f32 = 250.0;
const FLICK_MULTIPLIER: f32 = 2.2;

/// Required swipe direction. Screen space: +y points down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl SwipeDirection {
    pub const ALL: [SwipeDirection; 4] = [
        SwipeDirection::Up,
        SwipeDirection::Down,
        SwipeDirection::Left,
        SwipeDirection::Right,
    ];

    pub fn random(rng: &mut dyn RandomSource) -> Self {
        Self::ALL[rng.pick(Self::ALL.len())]
    }

    /// Unit vector for this direction.
    pub fn vector(self) -> Vec2 {
        match self {
            SwipeDirection::Up => Vec2::new(0.0, -1.0),
            SwipeDirection::Down => Vec2::new(0.0, 1.0),
            SwipeDirection::Left => Vec2::new(-1.0, 0.0),
            SwipeDirection::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Progress (0–100) of a swipe from `start` to `current`.
/// Only the component along `direction` counts; lateral drift is ignored.
pub fn flick_progress(start: Vec2, current: Vec2, direction: SwipeDirection) -> f32 {
    ((current - start).dot(direction.vector()) * 100.0 / FLICK_REACH).clamp(0.0, 100.0)
}

/// Directional swipe recognizer.
#[derive(Debug, Clone)]
pub struct SwipeGesture {
    pub direction: SwipeDirection,
    pub start: Option<Vec2>,
    pub current: Option<Vec2>,
    pub progress: f32,
    pub complete: bool,
}

impl SwipeGesture {
    pub fn new(direction: SwipeDirection) -> Self {
        Self {
            direction,
            start: None,
            current: None,
            progress: 0.0,
            complete: false,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }

    /// Drop the in-flight attempt so the player can try again.
    pub fn reset(&mut self) {
        self.start = None;
        self.current = None;
        self.progress = 0.0;
    }

    pub fn input(&mut self, input: &RoutedInput, ctx: &mut StepContext) -> Step {
        if self.complete {
            return Step::Continue;
        }
        match input.phase {
            PointerPhase::Down => {
                self.start = Some(input.raw);
                self.current = Some(input.raw);
                self.progress = 0.0;
                Step::Continue
            }
            PointerPhase::Move => {
                let Some(start) = self.start else {
                    return Step::Continue;
                };
                self.current = Some(input.raw);
                self.progress = flick_progress(start, input.raw, self.direction);
                if self.progress < 100.0 {
                    return Step::Continue;
                }
                self.complete = true;
                ctx.cue(Cue::Haptic);
                ctx.cue(Cue::Complete);
                ctx.show(Feedback::Flick);
                Step::ResolveAfter {
                    delay_ms: ctx.config.delays.flick_ms,
                    outcome: Outcome::single(FLICK_MULTIPLIER),
                }
            }
            PointerPhase::Up => {
                if self.is_tracking() {
                    log::debug!("flick released at {:.0}%", self.progress);
                    self.reset();
                }
                Step::Continue
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::SkillCheckConfig;
    use crate::core::rng::{Rng, SequenceRandom};

    fn send(gesture: &mut SwipeGesture, phase: PointerPhase, x: f32, y: f32) -> Step {
        let config = SkillCheckConfig::default();
        let mut rng = Rng::new(1);
        let mut cues = Vec::new();
        let mut feedback = None;
        let p = Vec2::new(x, y);
        gesture.input(
            &RoutedInput { phase, point: p, raw: p },
            &mut StepContext {
                now: 0.0,
                elapsed: 0.0,
                config: &config,
                rng: &mut rng,
                cues: &mut cues,
                feedback: &mut feedback,
            },
        )
    }

    #[test]
    fn upward_swipe_of_full_reach_completes() {
        let mut g = SwipeGesture::new(SwipeDirection::Up);
        send(&mut g, PointerPhase::Down, 100.0, 300.0);
        let step = send(&mut g, PointerPhase::Move, 100.0, 50.0);
        assert_eq!(g.progress, 100.0);
        assert_eq!(
            step,
            Step::ResolveAfter { delay_ms: 400.0, outcome: Outcome::single(2.2) }
        );
    }

    #[test]
    fn progress_ignores_lateral_motion() {
        let a = flick_progress(Vec2::ZERO, Vec2::new(125.0, 0.0), SwipeDirection::Right);
        let b = flick_progress(Vec2::ZERO, Vec2::new(125.0, 80.0), SwipeDirection::Right);
        assert_eq!(a, 50.0);
        assert_eq!(a, b);
    }

    #[test]
    fn wrong_way_swipe_has_no_progress() {
        assert_eq!(flick_progress(Vec2::ZERO, Vec2::new(0.0, 300.0), SwipeDirection::Up), 0.0);
        assert_eq!(flick_progress(Vec2::ZERO, Vec2::new(0.0, -900.0), SwipeDirection::Up), 100.0);
    }

    #[test]
    fn early_release_resets_without_resolving() {
        let mut g = SwipeGesture::new(SwipeDirection::Left);
        send(&mut g, PointerPhase::Down, 300.0, 100.0);
        send(&mut g, PointerPhase::Move, 200.0, 100.0);
        assert_eq!(g.progress, 40.0);
        let step = send(&mut g, PointerPhase::Up, 200.0, 100.0);
        assert_eq!(step, Step::Continue);
        assert_eq!(g.progress, 0.0);
        assert!(!g.is_tracking());

        // retry succeeds
        send(&mut g, PointerPhase::Down, 300.0, 100.0);
        let step = send(&mut g, PointerPhase::Move, 40.0, 100.0);
        assert!(matches!(step, Step::ResolveAfter { .. }));
    }

    #[test]
    fn move_without_press_is_ignored() {
        let mut g = SwipeGesture::new(SwipeDirection::Down);
        let step = send(&mut g, PointerPhase::Move, 0.0, 500.0);
        assert_eq!(step, Step::Continue);
        assert_eq!(g.progress, 0.0);
    }

    #[test]
    fn direction_comes_from_random_source() {
        let mut seq = SequenceRandom::new([0.0, 0.3, 0.6, 0.9]);
        let dirs: Vec<_> = (0..4).map(|_| SwipeDirection::random(&mut seq)).collect();
        assert_eq!(dirs, SwipeDirection::ALL.to_vec());
    }
}
