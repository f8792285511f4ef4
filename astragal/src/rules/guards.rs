use serde::{Deserialize, Serialize};

use crate::{notation::parse_notation, rules::params::RollParams};

/// Whether `input` parses as notation. Says nothing about whether it can be rolled.
pub fn is_dice_notation(input: &str) -> bool {
    parse_notation(input).is_ok()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotationValidation {
    pub valid: bool,
    /// The canonical notation, when valid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Parses and normalizes `input` without drawing anything.
pub fn validate_notation(input: &str) -> NotationValidation {
    match RollParams::from_notation(input) {
        Ok(params) => NotationValidation {
            valid: true,
            notation: Some(params.notation().to_string()),
            description: params.description().to_vec(),
            error: None,
        },
        Err(err) => NotationValidation {
            valid: false,
            notation: None,
            description: Vec::new(),
            error: Some(err.to_string()),
        },
    }
}
