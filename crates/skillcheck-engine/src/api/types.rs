use std::fmt;
use std::str::FromStr;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::error::SkillCheckError;

/// Unique identifier for a started session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SessionId(pub u32);

/// The closed set of skill-check minigames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Variant {
    /// Single tap against a bouncing marker.
    Timing,
    /// Three timing stages with a shrinking zone.
    Combo,
    /// Rapid taps filling a decaying meter.
    Mash,
    /// Three decaying tap targets.
    Reflex,
    /// Vacuum up scattered particles with the pointer.
    Drain,
    /// Directional swipe gesture.
    Flick,
}

impl Variant {
    pub const ALL: [Variant; 6] = [
        Variant::Timing,
        Variant::Combo,
        Variant::Mash,
        Variant::Reflex,
        Variant::Drain,
        Variant::Flick,
    ];

    /// Numeric code used across the host boundary.
    pub fn code(self) -> u32 {
        match self {
            Variant::Timing => 0,
            Variant::Combo => 1,
            Variant::Mash => 2,
            Variant::Reflex => 3,
            Variant::Drain => 4,
            Variant::Flick => 5,
        }
    }

    pub fn from_code(code: u32) -> Result<Self, SkillCheckError> {
        Self::ALL
            .into_iter()
            .find(|v| v.code() == code)
            .ok_or(SkillCheckError::UnknownVariant(code))
    }

    pub fn name(self) -> &'static str {
        match self {
            Variant::Timing => "TIMING",
            Variant::Combo => "COMBO",
            Variant::Mash => "MASH",
            Variant::Reflex => "REFLEX",
            Variant::Drain => "DRAIN",
            Variant::Flick => "FLICK",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = SkillCheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| SkillCheckError::UnknownVariantName(trimmed.to_string()))
    }
}

/// Classification of the ability that triggered the check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbilityKind {
    #[default]
    Damage,
    Heal,
    Shield,
}

impl AbilityKind {
    pub fn code(self) -> u32 {
        match self {
            AbilityKind::Damage => 0,
            AbilityKind::Heal => 1,
            AbilityKind::Shield => 2,
        }
    }

    pub fn from_code(code: u32) -> Result<Self, SkillCheckError> {
        match code {
            0 => Ok(AbilityKind::Damage),
            1 => Ok(AbilityKind::Heal),
            2 => Ok(AbilityKind::Shield),
            other => Err(SkillCheckError::UnknownAbilityKind(other)),
        }
    }
}

/// The only ability data that crosses into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbilityDescriptor {
    pub kind: AbilityKind,
    /// Sonic abilities get a wider timing zone.
    #[serde(default)]
    pub sonic: bool,
}

impl AbilityDescriptor {
    pub fn new(kind: AbilityKind) -> Self {
        Self { kind, sonic: false }
    }

    pub fn with_sonic(mut self, sonic: bool) -> Self {
        self.sonic = sonic;
        self
    }
}

/// Request from the combat resolver to run a skill check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCheckRequest {
    pub variant: Variant,
    #[serde(default)]
    pub ability: AbilityDescriptor,
}

impl SkillCheckRequest {
    pub fn new(variant: Variant, ability: AbilityDescriptor) -> Self {
        Self { variant, ability }
    }

    /// Decode a request from the numeric codes a host passes across FFI.
    pub fn from_codes(variant: u32, ability_kind: u32, sonic: bool) -> Result<Self, SkillCheckError> {
        Ok(Self {
            variant: Variant::from_code(variant)?,
            ability: AbilityDescriptor::new(AbilityKind::from_code(ability_kind)?).with_sonic(sonic),
        })
    }
}

/// Final result handed back to the combat resolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Outcome {
    pub multiplier: f32,
    pub secondary: Option<f32>,
}

impl Outcome {
    pub fn single(multiplier: f32) -> Self {
        Self { multiplier, secondary: None }
    }

    pub fn with_secondary(multiplier: f32, secondary: f32) -> Self {
        Self { multiplier, secondary: Some(secondary) }
    }
}

/// An outcome packed for reads out of linear memory by the host.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct OutcomeRecord {
    /// Session id as a float. Exact only up to 2^24; hosts that run more
    /// sessions than that should compare ids modulo 2^24.
    pub session: f32,
    pub multiplier: f32,
    pub secondary: f32,
    /// 1.0 when `secondary` carries a value, 0.0 otherwise.
    pub has_secondary: f32,
}

impl OutcomeRecord {
    pub const FLOATS: usize = 4;

    pub fn new(session: SessionId, outcome: &Outcome) -> Self {
        Self {
            session: session.0 as f32,
            multiplier: outcome.multiplier,
            secondary: outcome.secondary.unwrap_or(0.0),
            has_secondary: if outcome.secondary.is_some() { 1.0 } else { 0.0 },
        }
    }
}

/// Short presentation cues emitted by the variants (sounds, haptics, flashes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cue {
    Tap,
    Hit,
    Miss,
    StageCleared { stage: u8 },
    Collected { id: u32 },
    Haptic,
    Complete,
}

impl Cue {
    /// Numeric code for the host's sound/haptic table.
    pub fn code(self) -> u8 {
        match self {
            Cue::Tap => 1,
            Cue::Hit => 2,
            Cue::Miss => 3,
            Cue::StageCleared { .. } => 4,
            Cue::Collected { .. } => 5,
            Cue::Haptic => 6,
            Cue::Complete => 7,
        }
    }
}

/// Feedback label shown while a result is on display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Feedback {
    Perfect,
    Great,
    Good,
    Crit,
    Hit,
    Miss,
    Maxed,
    Best,
    Ok,
    Flick,
}

impl Feedback {
    pub fn label(self) -> &'static str {
        match self {
            Feedback::Perfect => "PERFECT!",
            Feedback::Great => "GREAT",
            Feedback::Good => "GOOD",
            Feedback::Crit => "CRIT!",
            Feedback::Hit => "HIT",
            Feedback::Miss => "MISS",
            Feedback::Maxed => "MAXED!",
            Feedback::Best => "BEST!",
            Feedback::Ok => "OK",
            Feedback::Flick => "FLICK!",
        }
    }
}
