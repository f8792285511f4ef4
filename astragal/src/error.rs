use thiserror::Error;

/// Everything that can go wrong while turning a roll argument into a [`RollRecord`].
///
/// All variants are local to a single pool, but a multi-pool roll aborts as a whole
/// on the first one.
///
/// [`RollRecord`]: crate::rules::record::RollRecord
#[derive(Debug, Error)]
pub enum RollError {
    #[error("Invalid notation: {0}")]
    InvalidNotation(String),

    #[error("Invalid roll options: {0}")]
    InvalidOptions(String),

    #[error("Unknown modifier: {0}")]
    UnknownModifier(String),

    #[error("Cannot roll {quantity} unique values on a {sides}-sided die")]
    UniqueUnsatisfiable { quantity: u32, sides: u32 },

    #[error("Modifiers are not supported on dice with custom faces")]
    ModifiersOnCustomFaces,

    #[error("Invalid roll options JSON - {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RollError>;
