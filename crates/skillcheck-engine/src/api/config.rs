use serde::{Deserialize, Serialize};

use super::error::SkillCheckError;
use crate::input::router::Surface;

/// How long a result stays on display before play continues or the
/// session resolves. All values in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayDelays {
    /// Pause between COMBO stages (and before the final COMBO outcome).
    pub combo_stage_ms: f64,
    /// Pause after the MASH meter fills.
    pub mash_ms: f64,
    /// Pause after the last DRAIN particle is collected.
    pub drain_ms: f64,
    /// Pause after a completed FLICK.
    pub flick_ms: f64,
}

impl Default for DisplayDelays {
    fn default() -> Self {
        Self {
            combo_stage_ms: 600.0,
            mash_ms: 400.0,
            drain_ms: 800.0,
            flick_ms: 400.0,
        }
    }
}

/// Configuration for the engine, provided by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillCheckConfig {
    /// Interactive surface size in device units (default: 100×100).
    pub surface: Surface,
    /// Seed for the default random source.
    pub seed: u64,
    /// Nominal frame period in milliseconds (default: 1000/60).
    pub tick_ms: f64,
    pub delays: DisplayDelays,
    /// MASH falls back to `level / 100` after this long.
    pub mash_timeout_ms: f64,
    /// REFLEX falls back to a fixed multiplier after this long.
    pub reflex_timeout_ms: f64,
}

impl Default for SkillCheckConfig {
    fn default() -> Self {
        Self {
            surface: Surface::default(),
            seed: 42,
            tick_ms: 1000.0 / 60.0,
            delays: DisplayDelays::default(),
            mash_timeout_ms: 3000.0,
            reflex_timeout_ms: 5000.0,
        }
    }
}

impl SkillCheckConfig {
    /// Parse a config from a JSON string. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, SkillCheckError> {
        Ok(serde_json::from_str(json)?)
    }
}
