use thiserror::Error;

/// Errors raised while decoding host-supplied requests and configuration.
#[derive(Debug, Error)]
pub enum SkillCheckError {
    /// Variant code outside the closed set.
    #[error("unknown skill-check variant code {0}")]
    UnknownVariant(u32),
    /// Variant name outside the closed set.
    #[error("unknown skill-check variant {0:?}")]
    UnknownVariantName(String),
    /// Ability classification code not known to the engine.
    #[error("unknown ability kind code {0}")]
    UnknownAbilityKind(u32),
    /// Configuration JSON failed to parse.
    #[error("invalid skill-check config: {0}")]
    Config(#[from] serde_json::Error),
}
