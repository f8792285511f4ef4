use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    error::{Result, RollError},
    modifiers::{
        self, Depth, DropOptions, KeepOptions, MODIFIER_ORDER, Modifier, ModifierKind,
        ReplaceFrom, ReplaceRule, RerollOptions, UniqueOptions,
    },
    rules::comparison::ComparisonOptions,
};

/// Every key the `modifiers` object of the options form accepts.
pub const MODIFIER_KEYS: [&str; 11] = [
    "cap",
    "drop",
    "keep",
    "replace",
    "reroll",
    "explode",
    "compound",
    "penetrate",
    "unique",
    "plus",
    "minus",
];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sides {
    Numeric(u32),
    Custom(Vec<String>),
}

impl From<u32> for Sides {
    fn from(sides: u32) -> Self {
        Sides::Numeric(sides)
    }
}

impl From<Vec<String>> for Sides {
    fn from(faces: Vec<String>) -> Self {
        Sides::Custom(faces)
    }
}

impl From<Vec<&str>> for Sides {
    fn from(faces: Vec<&str>) -> Self {
        Sides::Custom(faces.into_iter().map(str::to_string).collect())
    }
}

/// Largest pool a single options object may ask for.
pub const MAX_QUANTITY: u32 = 10_000;

/// Whether a pool's total is added to or subtracted from the grand total.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arithmetic {
    #[default]
    Add,
    Subtract,
}

impl Arithmetic {
    pub fn apply(&self, total: i64) -> i64 {
        match self {
            Arithmetic::Add => total,
            Arithmetic::Subtract => total.saturating_neg(),
        }
    }
}

/// The options-object form of a single pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollOptions {
    pub sides: Sides,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "ModifierOptions::is_empty")]
    pub modifiers: ModifierOptions,
    #[serde(default)]
    pub arithmetic: Arithmetic,
}

fn default_quantity() -> u32 {
    1
}

impl RollOptions {
    pub fn new(sides: u32) -> Self {
        Self::with_sides(Sides::Numeric(sides))
    }

    pub fn custom<S: Into<String>>(faces: impl IntoIterator<Item = S>) -> Self {
        Self::with_sides(Sides::Custom(faces.into_iter().map(Into::into).collect()))
    }

    pub fn with_sides(sides: Sides) -> Self {
        Self {
            sides,
            quantity: 1,
            modifiers: ModifierOptions::default(),
            arithmetic: Arithmetic::Add,
        }
    }

    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn modifiers(mut self, modifiers: ModifierOptions) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn subtract(mut self) -> Self {
        self.arithmetic = Arithmetic::Subtract;
        self
    }

    /// Parses the options form from JSON, failing fast on modifier keys nobody knows.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        if let Some(modifiers) = value.get("modifiers").and_then(|m| m.as_object()) {
            if let Some(unknown) = modifiers
                .keys()
                .find(|key| !MODIFIER_KEYS.contains(&key.as_str()))
            {
                return Err(RollError::UnknownModifier(unknown.clone()));
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_json(value)
    }

    pub fn is_custom(&self) -> bool {
        matches!(self.sides, Sides::Custom(_))
    }

    /// Checks everything that can be known before a single die is drawn.
    pub fn validate(&self) -> Result<()> {
        match &self.sides {
            Sides::Numeric(0) => {
                return Err(RollError::InvalidOptions(
                    "sides must be a positive integer".to_string(),
                ));
            }
            Sides::Custom(faces) if faces.is_empty() => {
                return Err(RollError::InvalidOptions(
                    "custom dice need at least one face".to_string(),
                ));
            }
            Sides::Custom(_) if !self.modifiers.is_empty() => {
                return Err(RollError::ModifiersOnCustomFaces);
            }
            _ => {}
        }

        if self.quantity > MAX_QUANTITY {
            return Err(RollError::InvalidOptions(format!(
                "quantity must be at most {MAX_QUANTITY}"
            )));
        }

        self.modifiers.validate_entries()?;

        if let Some(cap) = &self.modifiers.cap {
            if !cap.exact.is_empty() {
                return Err(RollError::InvalidOptions(
                    "cap only accepts greaterThan and lessThan".to_string(),
                ));
            }
        }

        if let (Sides::Numeric(sides), Some(unique)) = (&self.sides, &self.modifiers.unique) {
            modifiers::unique::validate(unique, self.quantity, *sides)?;
        }

        Ok(())
    }
}

/// One optional entry per modifier kind. A present entry means the stage runs.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModifierOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap: Option<ComparisonOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop: Option<DropOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep: Option<KeepOptions>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Option::is_none"
    )]
    pub replace: Option<Vec<ReplaceRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reroll: Option<RerollOptions>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub explode: bool,
    #[serde(
        default,
        deserialize_with = "flag_or_depth",
        skip_serializing_if = "Option::is_none"
    )]
    pub compound: Option<Depth>,
    #[serde(
        default,
        deserialize_with = "flag_or_depth",
        skip_serializing_if = "Option::is_none"
    )]
    pub penetrate: Option<Depth>,
    #[serde(
        default,
        deserialize_with = "flag_or_unique",
        skip_serializing_if = "Option::is_none"
    )]
    pub unique: Option<UniqueOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plus: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minus: Option<i64>,
}

impl ModifierOptions {
    pub fn is_empty(&self) -> bool {
        *self == ModifierOptions::default()
    }

    pub fn cap(mut self, cap: ComparisonOptions) -> Self {
        self.cap = Some(cap);
        self
    }

    pub fn drop(mut self, drop: DropOptions) -> Self {
        self.drop = Some(drop);
        self
    }

    pub fn keep(mut self, keep: KeepOptions) -> Self {
        self.keep = Some(keep);
        self
    }

    pub fn replace(mut self, rules: Vec<ReplaceRule>) -> Self {
        self.replace = Some(rules);
        self
    }

    pub fn reroll(mut self, reroll: RerollOptions) -> Self {
        self.reroll = Some(reroll);
        self
    }

    pub fn explode(mut self) -> Self {
        self.explode = true;
        self
    }

    pub fn compound(mut self, depth: Depth) -> Self {
        self.compound = Some(depth);
        self
    }

    pub fn penetrate(mut self, depth: Depth) -> Self {
        self.penetrate = Some(depth);
        self
    }

    pub fn unique(mut self, unique: UniqueOptions) -> Self {
        self.unique = Some(unique);
        self
    }

    pub fn plus(mut self, value: i64) -> Self {
        self.plus = Some(value);
        self
    }

    pub fn minus(mut self, value: i64) -> Self {
        self.minus = Some(value);
        self
    }

    pub fn get(&self, kind: ModifierKind) -> Option<Modifier> {
        match kind {
            ModifierKind::Cap => self.cap.clone().map(Modifier::Cap),
            ModifierKind::Drop => self.drop.clone().map(Modifier::Drop),
            ModifierKind::Replace => self.replace.clone().map(Modifier::Replace),
            ModifierKind::Reroll => self.reroll.clone().map(Modifier::Reroll),
            ModifierKind::Explode => self.explode.then_some(Modifier::Explode),
            ModifierKind::Compound => self.compound.map(Modifier::Compound),
            ModifierKind::Penetrate => self.penetrate.map(Modifier::Penetrate),
            ModifierKind::Unique => self.unique.clone().map(Modifier::Unique),
            ModifierKind::Plus => self.plus.map(Modifier::Plus),
            ModifierKind::Minus => self.minus.map(Modifier::Minus),
        }
    }

    /// Configured modifiers in application order.
    pub fn in_order(&self) -> Vec<Modifier> {
        MODIFIER_ORDER
            .iter()
            .filter_map(|kind| self.get(*kind))
            .collect()
    }

    /// A present entry that matches nothing writes no notation, so it is refused.
    fn validate_entries(&self) -> Result<()> {
        let empty = |key: &str| {
            Err(RollError::InvalidOptions(format!(
                "{key} needs at least one condition"
            )))
        };
        if self.cap.as_ref().is_some_and(ComparisonOptions::is_empty) {
            return empty("cap");
        }
        if self.drop.as_ref().is_some_and(|drop| {
            drop.highest.is_none() && drop.lowest.is_none() && drop.filter.is_empty()
        }) {
            return empty("drop");
        }
        if self
            .keep
            .as_ref()
            .is_some_and(|keep| keep.highest.is_none() && keep.lowest.is_none())
        {
            return empty("keep");
        }
        if self.replace.as_ref().is_some_and(|rules| {
            rules.is_empty()
                || rules.iter().any(|rule| {
                    matches!(&rule.from, ReplaceFrom::Comparison(from) if from.is_empty())
                })
        }) {
            return empty("replace");
        }
        if self
            .reroll
            .as_ref()
            .is_some_and(|reroll| reroll.trigger.is_empty())
        {
            return empty("reroll");
        }
        Ok(())
    }

    /// Folds one more token of the same pool into these options.
    pub fn merge(&mut self, modifier: Modifier) -> Result<()> {
        match modifier {
            Modifier::Cap(cap) => self.cap.get_or_insert_with(Default::default).merge(cap),
            Modifier::Drop(drop) => self.drop.get_or_insert_with(Default::default).merge(drop),
            Modifier::Replace(rules) => self.replace.get_or_insert_with(Vec::new).extend(rules),
            Modifier::Reroll(reroll) => self
                .reroll
                .get_or_insert_with(Default::default)
                .merge(reroll),
            Modifier::Explode => self.explode = true,
            Modifier::Compound(depth) => self.compound = Some(depth),
            Modifier::Penetrate(depth) => self.penetrate = Some(depth),
            Modifier::Unique(unique) => self
                .unique
                .get_or_insert_with(Default::default)
                .merge(unique),
            Modifier::Plus(value) => self.plus = Some(add_term(self.plus, value, "plus")?),
            Modifier::Minus(value) => self.minus = Some(add_term(self.minus, value, "minus")?),
        }
        Ok(())
    }

    pub fn merge_keep(&mut self, keep: KeepOptions) {
        self.keep.get_or_insert_with(Default::default).merge(keep);
    }

    /// One replace rule per notation term, so the notation reads back as the same list.
    pub(crate) fn split_replace_rules(&mut self) {
        if let Some(rules) = self.replace.take() {
            self.replace = Some(rules.into_iter().flat_map(ReplaceRule::split).collect());
        }
    }

    /// Turns `keep` into the equivalent `drop` counts for a pool of `quantity` dice.
    pub(crate) fn resolve_keep(&mut self, quantity: u32) {
        if let Some(keep) = self.keep.take() {
            keep.resolve(quantity, self.drop.get_or_insert_with(Default::default));
        }
    }
}

fn add_term(current: Option<i64>, value: i64, key: &str) -> Result<i64> {
    current
        .unwrap_or(0)
        .checked_add(value)
        .ok_or_else(|| RollError::InvalidOptions(format!("{key} is out of range")))
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<ReplaceRule>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(ReplaceRule),
        Many(Vec<ReplaceRule>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(rule)) => Some(vec![rule]),
        Some(OneOrMany::Many(rules)) => Some(rules),
        None => None,
    })
}

fn flag_or_depth<'de, D>(deserializer: D) -> std::result::Result<Option<Depth>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlagOrDepth {
        Flag(bool),
        Depth(u32),
    }

    Ok(match Option::<FlagOrDepth>::deserialize(deserializer)? {
        Some(FlagOrDepth::Flag(true)) => Some(Depth::UNLIMITED),
        Some(FlagOrDepth::Depth(depth)) => Some(Depth(depth)),
        Some(FlagOrDepth::Flag(false)) | None => None,
    })
}

fn flag_or_unique<'de, D>(deserializer: D) -> std::result::Result<Option<UniqueOptions>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlagOrUnique {
        Flag(bool),
        Options(UniqueOptions),
    }

    Ok(match Option::<FlagOrUnique>::deserialize(deserializer)? {
        Some(FlagOrUnique::Flag(true)) => Some(UniqueOptions::default()),
        Some(FlagOrUnique::Options(options)) => Some(options),
        Some(FlagOrUnique::Flag(false)) | None => None,
    })
}
