//! The modifier set. Each kind lives in its own module and exposes a nom `parse`, an
//! `apply` over a roll multiset, `describe` and `to_notation`. [`Modifier`] ties them
//! together as one tagged union; [`MODIFIER_ORDER`] is the single source of truth for
//! the order they run in and the order they are written out in.

pub mod arithmetic;
pub mod cap;
pub mod compound;
pub mod drop;
pub mod explode;
pub mod penetrate;
pub mod replace;
pub mod reroll;
pub mod unique;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{
    engine::{logging::ModifierLog, pipeline::RollBonus},
    error::Result,
    rules::comparison::ComparisonOptions,
};

pub use compound::Depth;
pub use drop::{DropOptions, KeepOptions};
pub use replace::{ReplaceFrom, ReplaceRule};
pub use reroll::RerollOptions;
pub use unique::UniqueOptions;

/// Per-die draw ceiling for reroll, compound and penetrate.
pub const MAX_REROLL_ATTEMPTS: usize = 99;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKind {
    #[display("cap")]
    Cap,
    #[display("drop")]
    Drop,
    #[display("replace")]
    Replace,
    #[display("reroll")]
    Reroll,
    #[display("explode")]
    Explode,
    #[display("compound")]
    Compound,
    #[display("penetrate")]
    Penetrate,
    #[display("unique")]
    Unique,
    #[display("plus")]
    Plus,
    #[display("minus")]
    Minus,
}

/// The fixed order modifiers are applied, described and written out in.
pub const MODIFIER_ORDER: [ModifierKind; 10] = [
    ModifierKind::Cap,
    ModifierKind::Drop,
    ModifierKind::Replace,
    ModifierKind::Reroll,
    ModifierKind::Explode,
    ModifierKind::Compound,
    ModifierKind::Penetrate,
    ModifierKind::Unique,
    ModifierKind::Plus,
    ModifierKind::Minus,
];

/// A single configured modifier together with its options.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Cap(ComparisonOptions),
    Drop(DropOptions),
    Replace(Vec<ReplaceRule>),
    Reroll(RerollOptions),
    Explode,
    Compound(Depth),
    Penetrate(Depth),
    Unique(UniqueOptions),
    Plus(i64),
    Minus(i64),
}

/// What a modifier may know about the pool besides the rolls themselves.
pub struct ModifierContext<'a> {
    pub sides: u32,
    pub quantity: u32,
    pub roll_one: &'a mut dyn FnMut() -> i64,
}

impl Modifier {
    pub fn kind(&self) -> ModifierKind {
        match self {
            Modifier::Cap(_) => ModifierKind::Cap,
            Modifier::Drop(_) => ModifierKind::Drop,
            Modifier::Replace(_) => ModifierKind::Replace,
            Modifier::Reroll(_) => ModifierKind::Reroll,
            Modifier::Explode => ModifierKind::Explode,
            Modifier::Compound(_) => ModifierKind::Compound,
            Modifier::Penetrate(_) => ModifierKind::Penetrate,
            Modifier::Unique(_) => ModifierKind::Unique,
            Modifier::Plus(_) => ModifierKind::Plus,
            Modifier::Minus(_) => ModifierKind::Minus,
        }
    }

    /// Runs this stage over `bonus` and appends the frequency-diff log for it.
    pub fn apply(&self, bonus: RollBonus, ctx: &mut ModifierContext<'_>) -> Result<RollBonus> {
        let RollBonus {
            rolls,
            mut simple_math_modifier,
            mut logs,
        } = bonus;
        let before = rolls.clone();

        let rolls = match self {
            Modifier::Cap(options) => cap::apply(rolls, options),
            Modifier::Drop(options) => drop::apply(rolls, options),
            Modifier::Replace(rules) => replace::apply(rolls, rules),
            Modifier::Reroll(options) => reroll::apply(rolls, options, &mut *ctx.roll_one),
            Modifier::Explode => explode::apply(rolls, ctx.sides, &mut *ctx.roll_one),
            Modifier::Compound(depth) => {
                compound::apply(rolls, *depth, ctx.sides, &mut *ctx.roll_one)
            }
            Modifier::Penetrate(depth) => {
                penetrate::apply(rolls, *depth, ctx.sides, &mut *ctx.roll_one)
            }
            Modifier::Unique(options) => {
                unique::apply(rolls, options, ctx.quantity, ctx.sides, &mut *ctx.roll_one)?
            }
            Modifier::Plus(value) => {
                simple_math_modifier = simple_math_modifier.saturating_add(*value);
                rolls
            }
            Modifier::Minus(value) => {
                simple_math_modifier = simple_math_modifier.saturating_sub(*value);
                rolls
            }
        };

        log::trace!("{}: {:?} -> {:?}", self.kind(), before, rolls);
        logs.push(ModifierLog::from_diff(self.clone(), &before, &rolls));

        Ok(RollBonus {
            rolls,
            simple_math_modifier,
            logs,
        })
    }

    pub fn describe(&self) -> Vec<String> {
        match self {
            Modifier::Cap(options) => cap::describe(options),
            Modifier::Drop(options) => drop::describe(options),
            Modifier::Replace(rules) => replace::describe(rules),
            Modifier::Reroll(options) => reroll::describe(options),
            Modifier::Explode => explode::describe(),
            Modifier::Compound(depth) => compound::describe(*depth),
            Modifier::Penetrate(depth) => penetrate::describe(*depth),
            Modifier::Unique(options) => unique::describe(options),
            Modifier::Plus(value) => arithmetic::describe_plus(*value),
            Modifier::Minus(value) => arithmetic::describe_minus(*value),
        }
    }

    pub fn to_notation(&self) -> String {
        match self {
            Modifier::Cap(options) => cap::to_notation(options),
            Modifier::Drop(options) => drop::to_notation(options),
            Modifier::Replace(rules) => replace::to_notation(rules),
            Modifier::Reroll(options) => reroll::to_notation(options),
            Modifier::Explode => explode::to_notation(),
            Modifier::Compound(depth) => compound::to_notation(*depth),
            Modifier::Penetrate(depth) => penetrate::to_notation(*depth),
            Modifier::Unique(options) => unique::to_notation(options),
            Modifier::Plus(value) => arithmetic::plus_notation(*value),
            Modifier::Minus(value) => arithmetic::minus_notation(*value),
        }
    }
}
