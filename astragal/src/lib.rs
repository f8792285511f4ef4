//! Dice notation compiler and roll engine.
//!
//! ```no_run
//! use astragal::prelude::*;
//!
//! let result = roll(["4d6L", "-1d4"])?;
//! println!("{}", result.total);
//! # Ok::<(), RollError>(())
//! ```

pub mod engine;
pub mod error;
pub mod modifiers;
pub mod notation;
pub mod roller;
pub mod rules;

#[cfg(test)]
mod test_strategies;

pub mod prelude {
    pub use crate::{
        engine::{RollArgument, roll, roll_custom, roll_with},
        error::RollError,
        notation::parse_notation,
        modifiers::{
            Depth, DropOptions, KeepOptions, Modifier, ModifierKind, ReplaceRule, RerollOptions,
            UniqueOptions,
        },
        roller::Roller,
        rules::{
            comparison::ComparisonOptions,
            guards::{NotationValidation, is_dice_notation, validate_notation},
            options::{Arithmetic, ModifierOptions, RollOptions, Sides},
            params::RollParams,
            record::{ModifierHistory, RollRecord, RollResult},
        },
    };
}

#[cfg(test)]
mod tests {
    use crate::{engine::pipeline::apply_modifiers, prelude::*};

    #[test]
    fn test_scenarios() -> anyhow::Result<()> {
        let mut roller = Roller::from_sequence([0.0, 0.25, 0.5, 0.75]);
        let result = roll_with(&mut roller, [RollOptions::new(4).quantity(4)])?;
        assert_eq!(result.total, 10);

        let drop = DropOptions {
            highest: Some(1),
            lowest: Some(2),
            filter: ComparisonOptions::exact([5])
                .with_greater_than(8)
                .with_less_than(2),
        };
        let bonus = apply_modifiers(
            &ModifierOptions::default().drop(drop),
            (1..=9).collect(),
            6,
            9,
            &mut || -> i64 { unreachable!("drop never draws") },
        )?;
        assert_eq!(bonus.rolls, vec![4, 6, 7]);
        assert_eq!(bonus.total(), 17);

        let mut roller = Roller::from_sequence([0.4]);
        assert_eq!(roll_custom(&["apple", "banana", "cherry"], &mut roller)?, "banana");
        Ok(())
    }
}
