use glam::Vec2;
use serde::Serialize;

use super::state::SkillCheckSession;
use crate::api::types::{AbilityKind, SessionId, Variant};
use crate::variants::timing::COMBO_STAGES;
use crate::variants::{SwipeDirection, TargetTint, TargetZone, VariantState};

/// Read-only snapshot of a session for the rendering layer.
/// Derived state: reflects the session as of the last tick or input.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session: SessionId,
    pub variant: Variant,
    pub ability: AbilityKind,
    pub elapsed_ms: f64,
    pub paused: bool,
    pub done: bool,
    pub feedback: Option<&'static str>,
    pub detail: VariantView,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetView {
    pub id: u32,
    pub position: Vec2,
    pub value: f32,
    pub hit: bool,
    pub tint: TargetTint,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticleView {
    pub id: u32,
    pub position: Vec2,
    pub collected: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VariantView {
    Oscillator {
        position: f32,
        zone: TargetZone,
        stage: u8,
        stages: u8,
        score: f32,
        combo_count: u32,
        frozen: bool,
    },
    Mash {
        level: f32,
        taps: u32,
    },
    Reflex {
        targets: Vec<TargetView>,
    },
    Drain {
        particles: Vec<ParticleView>,
        collected: usize,
        total: usize,
        pointer: Option<Vec2>,
    },
    Flick {
        direction: SwipeDirection,
        vector: Vec2,
        progress: f32,
        start: Option<Vec2>,
        current: Option<Vec2>,
    },
}

impl SessionView {
    pub fn capture(session: &SkillCheckSession, now: f64) -> Self {
        Self {
            session: session.id(),
            variant: session.variant(),
            ability: session.ability().kind,
            elapsed_ms: session.elapsed(now),
            paused: session.is_paused(),
            done: session.is_done(),
            feedback: session.feedback().map(|f| f.label()),
            detail: VariantView::capture(session.state()),
        }
    }
}

impl VariantView {
    fn capture(state: &VariantState) -> Self {
        match state {
            VariantState::Timing(osc) | VariantState::Combo(osc) => VariantView::Oscillator {
                position: osc.position,
                zone: osc.zone,
                stage: osc.stage,
                stages: if matches!(state, VariantState::Combo(_)) { COMBO_STAGES } else { 1 },
                score: osc.accumulated_score,
                combo_count: osc.combo_count,
                frozen: osc.frozen,
            },
            VariantState::Mash(meter) => VariantView::Mash {
                level: meter.level,
                taps: meter.taps,
            },
            VariantState::Reflex(field) => VariantView::Reflex {
                targets: field
                    .targets
                    .iter()
                    .map(|t| TargetView {
                        id: t.id,
                        position: t.position,
                        value: t.value,
                        hit: t.hit,
                        tint: field.tint(t),
                    })
                    .collect(),
            },
            VariantState::Drain(field) => VariantView::Drain {
                particles: field
                    .particles
                    .iter()
                    .map(|p| ParticleView {
                        id: p.id,
                        position: p.position,
                        collected: p.collected,
                    })
                    .collect(),
                collected: field.collected_count(),
                total: field.particles.len(),
                pointer: field.pointer,
            },
            VariantState::Flick(gesture) => VariantView::Flick {
                direction: gesture.direction,
                vector: gesture.direction.vector(),
                progress: gesture.progress,
                start: gesture.start,
                current: gesture.current,
            },
        }
    }
}
