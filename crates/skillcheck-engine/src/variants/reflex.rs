//! REFLEX: three targets whose reward value drains until they are tapped.

use glam::Vec2;
use serde::Serialize;

use super::{Step, StepContext};
use crate::api::types::{AbilityKind, Cue, Feedback, Outcome};
use crate::core::rng::RandomSource;
use crate::input::router::RoutedInput;

pub const TARGET_COUNT: usize = 3;
const TARGET_START_VALUE: f32 = 100.0;
const TARGET_DECAY: f32 = 0.75;
/// Tap must land within this distance (session units) of a target.
const HIT_RADIUS: f32 = 9.0;
const SPAWN_MIN: f32 = 12.0;
const SPAWN_MAX: f32 = 88.0;
/// Spawn retries before accepting an overlapping position.
const SPAWN_ATTEMPTS: usize = 8;
const TIMEOUT_MULTIPLIER: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReflexTarget {
    pub id: u32,
    pub position: Vec2,
    /// Decays while unhit; frozen at the moment of the hit.
    pub value: f32,
    pub hit: bool,
}

/// Render tint for a target: hue follows the ability, intensity follows value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetTint {
    /// Hue in degrees.
    pub hue: f32,
    /// 0.0 to 1.0.
    pub intensity: f32,
}

impl TargetTint {
    pub fn for_value(kind: AbilityKind, value: f32) -> Self {
        let hue = match kind {
            AbilityKind::Heal => 130.0,
            AbilityKind::Shield => 210.0,
            AbilityKind::Damage => 0.0,
        };
        Self {
            hue,
            intensity: (value / TARGET_START_VALUE).clamp(0.0, 1.0),
        }
    }
}

/// Multiplier tier from the values recorded at each hit.
/// Order-independent: only the average matters.
pub fn reflex_multiplier(values: &[f32]) -> f32 {
    if values.is_empty() {
        return TIMEOUT_MULTIPLIER;
    }
    let avg = values.iter().sum::<f32>() / values.len() as f32;
    if avg > 75.0 {
        1.5
    } else if avg > 40.0 {
        1.2
    } else {
        1.0
    }
}

fn feedback_for(value: f32) -> Feedback {
    if value > 75.0 {
        Feedback::Perfect
    } else if value > 40.0 {
        Feedback::Great
    } else {
        Feedback::Good
    }
}

#[derive(Debug, Clone)]
pub struct ReflexField {
    pub targets: Vec<ReflexTarget>,
    pub ability: AbilityKind,
}

impl ReflexField {
    /// Spawn three targets at random, non-overlapping positions.
    pub fn spawn(ability: AbilityKind, rng: &mut dyn RandomSource) -> Self {
        let mut targets: Vec<ReflexTarget> = Vec::with_capacity(TARGET_COUNT);
        for id in 0..TARGET_COUNT as u32 {
            let mut position = Vec2::ZERO;
            for _ in 0..SPAWN_ATTEMPTS {
                position = Vec2::new(rng.range(SPAWN_MIN, SPAWN_MAX), rng.range(SPAWN_MIN, SPAWN_MAX));
                let clear = targets
                    .iter()
                    .all(|t| t.position.distance(position) >= HIT_RADIUS * 2.0);
                if clear {
                    break;
                }
            }
            targets.push(ReflexTarget {
                id,
                position,
                value: TARGET_START_VALUE,
                hit: false,
            });
        }
        Self { targets, ability }
    }

    /// Build a field from explicit positions.
    pub fn with_positions(ability: AbilityKind, positions: [Vec2; TARGET_COUNT]) -> Self {
        let targets = positions
            .iter()
            .enumerate()
            .map(|(id, &position)| ReflexTarget {
                id: id as u32,
                position,
                value: TARGET_START_VALUE,
                hit: false,
            })
            .collect();
        Self { targets, ability }
    }

    pub fn all_hit(&self) -> bool {
        self.targets.iter().all(|t| t.hit)
    }

    pub fn recorded_values(&self) -> Vec<f32> {
        self.targets.iter().filter(|t| t.hit).map(|t| t.value).collect()
    }

    pub fn tint(&self, target: &ReflexTarget) -> TargetTint {
        TargetTint::for_value(self.ability, target.value)
    }

    pub fn tick(&mut self, ctx: &mut StepContext) -> Step {
        if ctx.elapsed >= ctx.config.reflex_timeout_ms {
            log::debug!("reflex timed out with {} of {} hit", self.recorded_values().len(), TARGET_COUNT);
            ctx.cue(Cue::Miss);
            return Step::Resolve(Outcome::single(TIMEOUT_MULTIPLIER));
        }
        for target in self.targets.iter_mut().filter(|t| !t.hit) {
            target.value = (target.value - TARGET_DECAY).max(0.0);
        }
        Step::Continue
    }

    /// Hit the nearest unhit target under the pointer.
    pub fn input(&mut self, input: &RoutedInput, ctx: &mut StepContext) -> Step {
        if !input.is_press() {
            return Step::Continue;
        }
        let reach = HIT_RADIUS * HIT_RADIUS;
        let nearest = self
            .targets
            .iter_mut()
            .filter(|t| !t.hit)
            .map(|t| (t.position.distance_squared(input.point), t))
            .filter(|(d2, _)| *d2 <= reach)
            .min_by(|a, b| a.0.total_cmp(&b.0));

        let Some((_, target)) = nearest else {
            return Step::Continue;
        };
        target.hit = true;
        let value = target.value;
        ctx.cue(Cue::Hit);
        ctx.show(feedback_for(value));

        if self.all_hit() {
            ctx.cue(Cue::Complete);
            return Step::Resolve(Outcome::single(reflex_multiplier(&self.recorded_values())));
        }
        Step::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::SkillCheckConfig;
    use crate::core::rng::Rng;
    use crate::input::router::PointerPhase;

    fn press(x: f32, y: f32) -> RoutedInput {
        RoutedInput {
            phase: PointerPhase::Down,
            point: Vec2::new(x, y),
            raw: Vec2::new(x, y),
        }
    }

    fn run<R>(elapsed: f64, f: impl FnOnce(&mut StepContext) -> R) -> R {
        let config = SkillCheckConfig::default();
        let mut rng = Rng::new(1);
        let mut cues = Vec::new();
        let mut feedback = None;
        let mut ctx = StepContext {
            now: elapsed,
            elapsed,
            config: &config,
            rng: &mut rng,
            cues: &mut cues,
            feedback: &mut feedback,
        };
        f(&mut ctx)
    }

    fn field() -> ReflexField {
        ReflexField::with_positions(
            AbilityKind::Heal,
            [Vec2::new(20.0, 20.0), Vec2::new(50.0, 50.0), Vec2::new(80.0, 80.0)],
        )
    }

    #[test]
    fn multiplier_tiers_from_average() {
        assert_eq!(reflex_multiplier(&[90.0, 80.0, 10.0]), 1.2);
        assert_eq!(reflex_multiplier(&[100.0, 90.0, 80.0]), 1.5);
        assert_eq!(reflex_multiplier(&[75.0, 75.0, 75.0]), 1.2);
        assert_eq!(reflex_multiplier(&[40.0, 40.0, 40.0]), 1.0);
    }

    #[test]
    fn hit_order_does_not_matter() {
        let values = [90.0, 80.0, 10.0];
        let reversed = [10.0, 80.0, 90.0];
        let shuffled = [80.0, 10.0, 90.0];
        let m = reflex_multiplier(&values);
        assert_eq!(m, reflex_multiplier(&reversed));
        assert_eq!(m, reflex_multiplier(&shuffled));
    }

    #[test]
    fn spawn_places_three_targets_in_bounds() {
        let mut rng = Rng::new(5);
        let field = ReflexField::spawn(AbilityKind::Damage, &mut rng);
        assert_eq!(field.targets.len(), TARGET_COUNT);
        for t in &field.targets {
            assert!(t.position.x >= SPAWN_MIN && t.position.x < SPAWN_MAX);
            assert!(t.position.y >= SPAWN_MIN && t.position.y < SPAWN_MAX);
            assert_eq!(t.value, 100.0);
            assert!(!t.hit);
        }
    }

    #[test]
    fn unhit_targets_decay_hit_targets_keep_value() {
        let mut f = field();
        run(0.0, |ctx| f.input(&press(20.0, 20.0), ctx));
        for _ in 0..10 {
            run(100.0, |ctx| f.tick(ctx));
        }
        assert_eq!(f.targets[0].value, 100.0);
        assert!((f.targets[1].value - 92.5).abs() < 1e-4);
        for _ in 0..500 {
            run(100.0, |ctx| f.tick(ctx));
        }
        assert_eq!(f.targets[2].value, 0.0);
    }

    #[test]
    fn taps_off_target_are_ignored() {
        let mut f = field();
        let step = run(0.0, |ctx| f.input(&press(35.0, 35.0), ctx));
        assert_eq!(step, Step::Continue);
        assert!(f.targets.iter().all(|t| !t.hit));
    }

    #[test]
    fn third_hit_resolves_from_recorded_values() {
        let mut f = field();
        f.targets[0].value = 90.0;
        f.targets[1].value = 80.0;
        f.targets[2].value = 10.0;
        run(0.0, |ctx| f.input(&press(81.0, 79.0), ctx));
        run(0.0, |ctx| f.input(&press(20.0, 20.0), ctx));
        let step = run(0.0, |ctx| f.input(&press(50.0, 52.0), ctx));
        assert_eq!(step, Step::Resolve(Outcome::single(1.2)));
    }

    #[test]
    fn double_tap_on_same_target_counts_once() {
        let mut f = field();
        run(0.0, |ctx| f.input(&press(20.0, 20.0), ctx));
        run(0.0, |ctx| f.input(&press(20.0, 20.0), ctx));
        assert_eq!(f.recorded_values().len(), 1);
    }

    #[test]
    fn timeout_resolves_to_fixed_fallback() {
        let mut f = field();
        run(0.0, |ctx| f.input(&press(20.0, 20.0), ctx));
        let step = run(5000.0, |ctx| f.tick(ctx));
        assert_eq!(step, Step::Resolve(Outcome::single(0.5)));
    }

    #[test]
    fn tint_follows_ability_and_value() {
        let heal = TargetTint::for_value(AbilityKind::Heal, 50.0);
        let shield = TargetTint::for_value(AbilityKind::Shield, 50.0);
        assert_ne!(heal.hue, shield.hue);
        assert_eq!(heal.intensity, 0.5);
    }
}
