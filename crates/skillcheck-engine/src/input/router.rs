use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Side length of the normalized session space.
pub const SESSION_SPACE: f32 = 100.0;

/// Phase of a pointer-like gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// A pointer event in device units, as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Vec2,
}

impl PointerEvent {
    pub fn down(position: Vec2) -> Self {
        Self { phase: PointerPhase::Down, position }
    }

    pub fn moved(position: Vec2) -> Self {
        Self { phase: PointerPhase::Move, position }
    }

    pub fn up(position: Vec2) -> Self {
        Self { phase: PointerPhase::Up, position }
    }
}

/// Size of the interactive surface in device units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            width: SESSION_SPACE,
            height: SESSION_SPACE,
        }
    }
}

impl Surface {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Map device units into 0–100 session space, clamped to the surface.
    pub fn normalize(&self, device: Vec2) -> Vec2 {
        let scale = Vec2::new(
            SESSION_SPACE / self.width.max(f32::EPSILON),
            SESSION_SPACE / self.height.max(f32::EPSILON),
        );
        (device * scale).clamp(Vec2::ZERO, Vec2::splat(SESSION_SPACE))
    }
}

/// A pointer event after routing: both coordinate systems travel together.
///
/// Most variants read `point`. FLICK measures its reach in gesture units
/// and reads `raw`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutedInput {
    pub phase: PointerPhase,
    /// Position in 0–100 session space.
    pub point: Vec2,
    /// Position in device units.
    pub raw: Vec2,
}

impl RoutedInput {
    pub fn is_press(&self) -> bool {
        self.phase == PointerPhase::Down
    }
}

/// Translates device pointer events into session-space input.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputRouter {
    surface: Surface,
}

impl InputRouter {
    pub fn new(surface: Surface) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn route(&self, event: PointerEvent) -> RoutedInput {
        RoutedInput {
            phase: event.phase,
            point: self.surface.normalize(event.position),
            raw: event.position,
        }
    }
}
