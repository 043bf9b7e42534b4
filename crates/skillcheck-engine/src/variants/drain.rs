//! DRAIN: particles ("bones") burst outward and fall; the player holds the
//! pointer down to vacuum them up.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::Serialize;

use super::{Step, StepContext};
use crate::api::types::{Cue, Feedback, Outcome};
use crate::core::rng::RandomSource;
use crate::input::router::{PointerPhase, RoutedInput, SESSION_SPACE};

pub const PARTICLE_COUNT: usize = 12;

/// Particles inside this squared distance of the pointer are pulled in.
const CAPTURE_RADIUS_SQ: f32 = 600.0;
/// Particles inside this squared distance of the pointer are collected.
const COLLECT_RADIUS_SQ: f32 = 100.0;
const PULL_FORCE: f32 = 0.95;
const PULL_DAMPING: f32 = 0.85;
const GRAVITY: f32 = 0.12;
const BOUNCE: f32 = -0.85;
const BOUNDS_MIN: f32 = 2.0;
const BOUNDS_MAX: f32 = 98.0;
/// Bounced particles are placed this far inside the wall so they cannot stick.
const EDGE_NUDGE: f32 = 0.5;

const SPAWN_SPEED_MIN: f32 = 1.2;
const SPAWN_SPEED_MAX: f32 = 2.6;
/// Max angular jitter around each evenly spaced spawn direction (radians).
const SPAWN_JITTER: f32 = 0.35;

const BEST_SECS: f64 = 1.3;
const GREAT_SECS: f64 = 2.2;
const SECONDARY: f32 = 1.0;

/// Rating for a completed drain, by time since session start.
pub fn drain_rating(elapsed_secs: f64) -> (f32, Feedback) {
    if elapsed_secs < BEST_SECS {
        (3.0, Feedback::Best)
    } else if elapsed_secs < GREAT_SECS {
        (2.0, Feedback::Great)
    } else {
        (1.2, Feedback::Ok)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrainParticle {
    pub id: u32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub collected: bool,
}

impl DrainParticle {
    /// Advance one step. Returns true if the particle was collected this step.
    fn step(&mut self, pointer: Option<Vec2>) -> bool {
        if let Some(ptr) = pointer {
            let to_ptr = ptr - self.position;
            let d2 = to_ptr.length_squared();
            if d2 < COLLECT_RADIUS_SQ {
                self.collected = true;
                self.velocity = Vec2::ZERO;
                return true;
            }
            if d2 < CAPTURE_RADIUS_SQ {
                self.velocity += to_ptr.normalize_or_zero() * PULL_FORCE;
                self.velocity *= PULL_DAMPING;
            }
        }

        self.velocity.y += GRAVITY;
        self.position += self.velocity;
        self.bounce();
        false
    }

    fn bounce(&mut self) {
        if self.position.x < BOUNDS_MIN {
            self.position.x = BOUNDS_MIN + EDGE_NUDGE;
            self.velocity.x *= BOUNCE;
        } else if self.position.x > BOUNDS_MAX {
            self.position.x = BOUNDS_MAX - EDGE_NUDGE;
            self.velocity.x *= BOUNCE;
        }
        if self.position.y < BOUNDS_MIN {
            self.position.y = BOUNDS_MIN + EDGE_NUDGE;
            self.velocity.y *= BOUNCE;
        } else if self.position.y > BOUNDS_MAX {
            self.position.y = BOUNDS_MAX - EDGE_NUDGE;
            self.velocity.y *= BOUNCE;
        }
    }
}

/// The particle field and the player's capture pointer.
#[derive(Debug, Clone)]
pub struct DrainField {
    pub particles: Vec<DrainParticle>,
    /// Pointer position while the capture gesture is held.
    pub pointer: Option<Vec2>,
}

impl DrainField {
    /// Burst `PARTICLE_COUNT` particles radially out of the surface center.
    pub fn spawn(rng: &mut dyn RandomSource) -> Self {
        let center = Vec2::splat(SESSION_SPACE / 2.0);
        let particles = (0..PARTICLE_COUNT as u32)
            .map(|id| {
                let angle = id as f32 / PARTICLE_COUNT as f32 * TAU
                    + rng.range(-SPAWN_JITTER, SPAWN_JITTER);
                let speed = rng.range(SPAWN_SPEED_MIN, SPAWN_SPEED_MAX);
                DrainParticle {
                    id,
                    position: center,
                    velocity: Vec2::from_angle(angle) * speed,
                    collected: false,
                }
            })
            .collect();
        Self {
            particles,
            pointer: None,
        }
    }

    pub fn collected_count(&self) -> usize {
        self.particles.iter().filter(|p| p.collected).count()
    }

    pub fn all_collected(&self) -> bool {
        self.particles.iter().all(|p| p.collected)
    }

    pub fn is_capturing(&self) -> bool {
        self.pointer.is_some()
    }

    pub fn tick(&mut self, ctx: &mut StepContext) -> Step {
        let pointer = self.pointer;
        for particle in self.particles.iter_mut().filter(|p| !p.collected) {
            if particle.step(pointer) {
                ctx.cue(Cue::Collected { id: particle.id });
            }
        }

        if !self.all_collected() {
            return Step::Continue;
        }

        let secs = ctx.elapsed / 1000.0;
        let (multiplier, feedback) = drain_rating(secs);
        log::debug!("drain cleared in {:.2}s -> x{}", secs, multiplier);
        ctx.cue(Cue::Complete);
        ctx.show(feedback);
        Step::ResolveAfter {
            delay_ms: ctx.config.delays.drain_ms,
            outcome: Outcome::with_secondary(multiplier, SECONDARY),
        }
    }

    /// Press starts the capture field, move drags it, release stops it.
    pub fn input(&mut self, input: &RoutedInput) -> Step {
        match input.phase {
            PointerPhase::Down => self.pointer = Some(input.point),
            PointerPhase::Move => {
                if self.pointer.is_some() {
                    self.pointer = Some(input.point);
                }
            }
            PointerPhase::Up => self.pointer = None,
        }
        Step::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::SkillCheckConfig;
    use crate::core::rng::Rng;

    fn routed(phase: PointerPhase, p: Vec2) -> RoutedInput {
        RoutedInput { phase, point: p, raw: p }
    }

    fn tick_at(field: &mut DrainField, elapsed: f64) -> (Step, Vec<Cue>) {
        let config = SkillCheckConfig::default();
        let mut rng = Rng::new(1);
        let mut cues = Vec::new();
        let mut feedback = None;
        let step = field.tick(&mut StepContext {
            now: elapsed,
            elapsed,
            config: &config,
            rng: &mut rng,
            cues: &mut cues,
            feedback: &mut feedback,
        });
        (step, cues)
    }

    #[test]
    fn spawn_bursts_outward_from_center() {
        let mut rng = Rng::new(3);
        let field = DrainField::spawn(&mut rng);
        assert_eq!(field.particles.len(), PARTICLE_COUNT);
        for p in &field.particles {
            assert_eq!(p.position, Vec2::splat(50.0));
            let speed = p.velocity.length();
            assert!(speed >= SPAWN_SPEED_MIN - 1e-4 && speed <= SPAWN_SPEED_MAX + 1e-4);
        }
    }

    #[test]
    fn particles_stay_inside_bounds() {
        let mut rng = Rng::new(11);
        let mut field = DrainField::spawn(&mut rng);
        for _ in 0..600 {
            tick_at(&mut field, 100.0);
            for p in &field.particles {
                assert!(p.position.x >= BOUNDS_MIN && p.position.x <= BOUNDS_MAX, "{:?}", p);
                assert!(p.position.y >= BOUNDS_MIN && p.position.y <= BOUNDS_MAX, "{:?}", p);
            }
        }
    }

    #[test]
    fn gravity_pulls_free_particles_down() {
        let mut p = DrainParticle {
            id: 0,
            position: Vec2::splat(50.0),
            velocity: Vec2::ZERO,
            collected: false,
        };
        p.step(None);
        assert!(p.position.y > 50.0);
    }

    #[test]
    fn capture_field_pulls_nearby_particles() {
        let mut p = DrainParticle {
            id: 0,
            position: Vec2::new(50.0, 50.0),
            velocity: Vec2::ZERO,
            collected: false,
        };
        // 20 units away: inside capture (400 < 600), outside collect
        p.step(Some(Vec2::new(70.0, 50.0)));
        assert!(p.velocity.x > 0.0);
        assert!(!p.collected);
    }

    #[test]
    fn far_particles_ignore_the_pointer() {
        let mut p = DrainParticle {
            id: 0,
            position: Vec2::new(20.0, 50.0),
            velocity: Vec2::ZERO,
            collected: false,
        };
        p.step(Some(Vec2::new(80.0, 50.0)));
        assert_eq!(p.velocity.x, 0.0);
    }

    #[test]
    fn walls_reflect_velocity() {
        let mut p = DrainParticle {
            id: 0,
            position: Vec2::new(BOUNDS_MIN + 0.1, 50.0),
            velocity: Vec2::new(-2.0, 0.0),
            collected: false,
        };
        p.step(None);
        assert!(p.velocity.x > 0.0);
        assert!((p.velocity.x - 1.7).abs() < 1e-5);
        assert!(p.position.x > BOUNDS_MIN);
    }

    #[test]
    fn release_stops_capture() {
        let mut field = DrainField::spawn(&mut Rng::new(1));
        field.input(&routed(PointerPhase::Move, Vec2::splat(10.0)));
        assert!(!field.is_capturing(), "move without press does not capture");
        field.input(&routed(PointerPhase::Down, Vec2::splat(10.0)));
        field.input(&routed(PointerPhase::Move, Vec2::splat(30.0)));
        assert_eq!(field.pointer, Some(Vec2::splat(30.0)));
        field.input(&routed(PointerPhase::Up, Vec2::splat(30.0)));
        assert!(!field.is_capturing());
    }

    #[test]
    fn sweeping_every_particle_resolves_with_rating() {
        let mut field = DrainField::spawn(&mut Rng::new(2));
        // Let the burst scatter before sweeping
        for _ in 0..30 {
            tick_at(&mut field, 100.0);
        }
        let mut collected = 0;
        let mut last = Step::Continue;
        for _ in 0..(PARTICLE_COUNT * 2) {
            let Some(target) = field.particles.iter().find(|p| !p.collected).map(|p| p.position) else {
                break;
            };
            field.input(&routed(PointerPhase::Down, target));
            let (step, cues) = tick_at(&mut field, 1000.0);
            collected += cues.iter().filter(|c| matches!(c, Cue::Collected { .. })).count();
            last = step;
        }
        assert_eq!(collected, PARTICLE_COUNT);
        assert!(field.all_collected());
        assert_eq!(
            last,
            Step::ResolveAfter {
                delay_ms: 800.0,
                outcome: Outcome::with_secondary(3.0, 1.0)
            }
        );
    }

    #[test]
    fn rating_tiers_by_elapsed_time() {
        assert_eq!(drain_rating(1.29).0, 3.0);
        assert_eq!(drain_rating(1.3).0, 2.0);
        assert_eq!(drain_rating(2.19).0, 2.0);
        assert_eq!(drain_rating(2.2).0, 1.2);
        assert_eq!(drain_rating(30.0).0, 1.2);
    }

    #[test]
    fn collected_particles_freeze_in_place() {
        let mut field = DrainField::spawn(&mut Rng::new(4));
        let spot = field.particles[0].position;
        field.input(&routed(PointerPhase::Down, spot));
        tick_at(&mut field, 0.0);
        assert!(field.particles[0].collected);
        let frozen_at = field.particles[0].position;
        field.input(&routed(PointerPhase::Up, spot));
        tick_at(&mut field, 0.0);
        assert_eq!(field.particles[0].position, frozen_at);
    }
}
