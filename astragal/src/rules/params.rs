use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, RollError},
    notation,
    rules::options::{Arithmetic, ModifierOptions, RollOptions, Sides},
};

/// The fully resolved description of one pool. Built once from notation or options and
/// never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollParams {
    sides: u32,
    quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    faces: Option<Vec<String>>,
    modifiers: ModifierOptions,
    arithmetic: Arithmetic,
    notation: String,
    description: Vec<String>,
}

impl RollParams {
    pub fn from_options(options: RollOptions) -> Result<Self> {
        options.validate()?;

        let RollOptions {
            sides,
            quantity,
            mut modifiers,
            arithmetic,
        } = options;
        modifiers.resolve_keep(quantity);
        modifiers.split_replace_rules();

        let (sides, faces) = match sides {
            Sides::Numeric(sides) => (sides, None),
            Sides::Custom(faces) => (faces.len() as u32, Some(faces)),
        };

        let mut params = RollParams {
            sides,
            quantity,
            faces,
            modifiers,
            arithmetic,
            notation: String::new(),
            description: Vec::new(),
        };
        params.notation = params.build_notation();
        params.description = params.build_description();

        log::debug!("Resolved pool {}", params.notation);
        Ok(params)
    }

    pub fn from_notation(input: &str) -> Result<Self> {
        Self::from_options(notation::parse_notation(input)?)
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn faces(&self) -> Option<&[String]> {
        self.faces.as_deref()
    }

    pub fn modifiers(&self) -> &ModifierOptions {
        &self.modifiers
    }

    pub fn arithmetic(&self) -> Arithmetic {
        self.arithmetic
    }

    pub fn notation(&self) -> &str {
        &self.notation
    }

    pub fn description(&self) -> &[String] {
        &self.description
    }

    pub fn is_custom(&self) -> bool {
        self.faces.is_some()
    }

    /// Back to the options form this was built from, with `keep` already folded into `drop`.
    pub fn to_options(&self) -> RollOptions {
        let sides = match &self.faces {
            Some(faces) => Sides::Custom(faces.clone()),
            None => Sides::Numeric(self.sides),
        };
        RollOptions {
            sides,
            quantity: self.quantity,
            modifiers: self.modifiers.clone(),
            arithmetic: self.arithmetic,
        }
    }

    /// Faces are written one character each between braces. Faces that cannot be written
    /// that way are listed comma-separated instead, which describes the pool but does not
    /// parse back.
    fn build_notation(&self) -> String {
        let sign = match self.arithmetic {
            Arithmetic::Add => "",
            Arithmetic::Subtract => "-",
        };
        let core = match &self.faces {
            Some(faces) if faces.iter().all(|face| is_single_char_face(face)) => {
                format!("{}d{{{}}}", self.quantity, faces.concat())
            }
            Some(faces) => format!("{}d{{{}}}", self.quantity, faces.join(",")),
            None => format!("{}d{}", self.quantity, self.sides),
        };
        let modifiers: String = self
            .modifiers
            .in_order()
            .iter()
            .map(|modifier| modifier.to_notation())
            .collect();
        format!("{sign}{core}{modifiers}")
    }

    fn build_description(&self) -> Vec<String> {
        let core = match &self.faces {
            Some(faces) => format!(
                "Roll {} {} with the following sides: {}",
                self.quantity,
                if self.quantity == 1 { "die" } else { "dice" },
                faces.join(", ")
            ),
            None => format!(
                "Roll {} {}-sided {}",
                self.quantity,
                self.sides,
                if self.quantity == 1 { "die" } else { "dice" }
            ),
        };

        let mut description = vec![core];
        for modifier in self.modifiers.in_order() {
            description.extend(modifier.describe());
        }
        if self.arithmetic == Arithmetic::Subtract {
            description.push("Subtract the total".to_string());
        }
        description
    }
}

fn is_single_char_face(face: &str) -> bool {
    let mut chars = face.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c != '}' && c != ',')
}

impl TryFrom<RollOptions> for RollParams {
    type Error = RollError;

    fn try_from(options: RollOptions) -> Result<Self> {
        Self::from_options(options)
    }
}

impl FromStr for RollParams {
    type Err = RollError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_notation(s)
    }
}

impl std::fmt::Display for RollParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.notation)
    }
}
