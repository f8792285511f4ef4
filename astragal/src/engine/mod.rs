//! Rolling. [`roll`] and [`roll_with`] take any mix of notation strings, bare side
//! counts and options objects, normalize every pool before drawing a single die, then
//! run one [`pipeline::Pipeline`] per pool.

pub mod logging;
pub mod pipeline;

use derive_more::From;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, RollError},
    roller::Roller,
    rules::{
        options::RollOptions,
        params::RollParams,
        record::{RollRecord, RollResult},
    },
};

use self::pipeline::{Pipeline, face_at};

/// One pool as a caller may hand it over.
#[derive(Debug, Clone, PartialEq, Eq, From, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RollArgument {
    /// Shorthand for `1d<sides>`.
    Sides(u32),
    Notation(String),
    Options(RollOptions),
}

impl From<&str> for RollArgument {
    fn from(notation: &str) -> Self {
        RollArgument::Notation(notation.to_string())
    }
}

impl RollArgument {
    pub fn into_params(self) -> Result<RollParams> {
        match self {
            RollArgument::Sides(sides) => RollParams::from_options(RollOptions::new(sides)),
            RollArgument::Notation(notation) => RollParams::from_notation(&notation),
            RollArgument::Options(options) => RollParams::from_options(options),
        }
    }
}

/// Rolls every pool with a fresh OS-seeded [`Roller`].
pub fn roll<I, A>(args: I) -> Result<RollResult>
where
    I: IntoIterator<Item = A>,
    A: Into<RollArgument>,
{
    let mut roller = Roller::new();
    roll_with(&mut roller, args)
}

/// Rolls every pool from `roller`. Fails without drawing if any pool is invalid.
pub fn roll_with<I, A>(roller: &mut Roller, args: I) -> Result<RollResult>
where
    I: IntoIterator<Item = A>,
    A: Into<RollArgument>,
{
    let params = args
        .into_iter()
        .map(|arg| arg.into().into_params())
        .collect::<Result<Vec<_>>>()?;
    if params.is_empty() {
        return Err(RollError::InvalidOptions(
            "at least one pool is required".to_string(),
        ));
    }

    let records = params
        .into_iter()
        .map(|params| Pipeline::new(params, &mut *roller).run())
        .collect::<Result<Vec<RollRecord>>>()?;

    let result = RollResult::from_records(records);
    log::debug!(
        "Rolled {} pool(s), grand total {}",
        result.rolls.len(),
        result.total
    );
    Ok(result)
}

/// Rolls one die with the given faces and returns the face it landed on.
pub fn roll_custom<S: AsRef<str>>(faces: &[S], roller: &mut Roller) -> Result<String> {
    let faces: Vec<String> = faces.iter().map(|face| face.as_ref().to_string()).collect();
    if faces.is_empty() {
        return Err(RollError::InvalidOptions(
            "custom dice need at least one face".to_string(),
        ));
    }
    let roll = roller.d(faces.len() as u32);
    face_at(&faces, roll).ok_or_else(|| {
        RollError::InvalidOptions(format!("roll {roll} has no matching face"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::options::ModifierOptions;

    #[test]
    fn test_mixed_arguments() -> anyhow::Result<()> {
        let mut roller = Roller::from_sequence([0.5]);
        let result = roll_with(
            &mut roller,
            [
                RollArgument::from("2d6"),
                RollArgument::from(20u32),
                RollArgument::from(RollOptions::new(4).quantity(2).subtract()),
            ],
        )?;
        // 4 + 4, 11, -(3 + 3)
        assert_eq!(result.rolls.len(), 3);
        assert_eq!(result.total, 8 + 11 - 6);
        assert!(result.result.is_empty());
        Ok(())
    }

    #[test]
    fn test_roll_strings() -> anyhow::Result<()> {
        let mut roller = Roller::from_sequence([0.0, 0.25, 0.5, 0.75]);
        let result = roll_with(&mut roller, ["4d4"])?;
        assert_eq!(result.total, 10);
        assert_eq!(result.rolls[0].rolls, vec![1, 2, 3, 4]);
        Ok(())
    }

    #[test]
    fn test_custom_pools_stay_out_of_total() -> anyhow::Result<()> {
        let mut roller = Roller::from_sequence([0.9]);
        let result = roll_with(&mut roller, ["1d{abc}", "1d6"])?;
        assert_eq!(result.result, vec!["c"]);
        assert_eq!(result.total, 6);
        assert_eq!(result.rolls[0].total, 3);
        Ok(())
    }

    #[test]
    fn test_invalid_pool_aborts_everything() {
        let mut roller = Roller::from_fn(|| -> f64 { panic!("nothing may be drawn") });
        let result = roll_with(&mut roller, ["2d6", "3d6X"]);
        assert!(matches!(result, Err(RollError::InvalidNotation(_))));
    }

    #[test]
    fn test_empty_call() {
        let mut roller = Roller::test_rng();
        let result = roll_with(&mut roller, Vec::<RollArgument>::new());
        assert!(matches!(result, Err(RollError::InvalidOptions(_))));
    }

    #[test]
    fn test_custom_faces_with_modifiers_rejected() {
        let options = RollOptions::custom(["a", "b"]).modifiers(ModifierOptions::default().plus(1));
        let result = roll([options]);
        assert!(matches!(result, Err(RollError::ModifiersOnCustomFaces)));
    }

    #[test]
    fn test_roll_custom() -> anyhow::Result<()> {
        let mut roller = Roller::from_sequence([0.4]);
        let face = roll_custom(&["apple", "banana", "cherry"], &mut roller)?;
        assert_eq!(face, "banana");
        Ok(())
    }

    #[test]
    fn test_roll_custom_needs_faces() {
        let mut roller = Roller::test_rng();
        let faces: [&str; 0] = [];
        assert!(roll_custom(&faces, &mut roller).is_err());
    }

    #[test]
    fn test_roll_default_source() -> anyhow::Result<()> {
        let result = roll(["3d6"])?;
        assert!((3..=18).contains(&result.total));
        Ok(())
    }

    #[test]
    fn test_argument_from_json() -> anyhow::Result<()> {
        let args: Vec<RollArgument> =
            serde_json::from_str(r#"[20, "2d6", {"sides": 6, "quantity": 3}]"#)?;
        assert_eq!(args[0], RollArgument::Sides(20));
        assert_eq!(args[1], RollArgument::Notation("2d6".to_string()));
        assert_eq!(args[2], RollArgument::Options(RollOptions::new(6).quantity(3)));
        Ok(())
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;
        use crate::test_strategies::roll_options_strategy;

        proptest! {
            #[test]
            fn plain_pools_stay_in_bounds(sides in 1..=100u32, quantity in 1..=20u32, seed in any::<u64>()) {
                let mut roller = Roller::from_seed(seed);
                let result = roll_with(&mut roller, [RollOptions::new(sides).quantity(quantity)])?;
                let record = &result.rolls[0];
                prop_assert!(record.rolls.iter().all(|r| (1..=sides as i64).contains(r)));
                prop_assert!((quantity as i64) <= result.total);
                prop_assert!(result.total <= (quantity * sides) as i64);
                prop_assert!(record.is_consistent());
            }

            #[test]
            fn same_seed_same_record(options in roll_options_strategy(), seed in any::<u64>()) {
                let Ok(params) = RollParams::from_options(options) else {
                    return Ok(());
                };
                let first = roll_with(&mut Roller::from_seed(seed), [params.to_options()])?;
                let second = roll_with(&mut Roller::from_seed(seed), [params.to_options()])?;
                prop_assert_eq!(first, second);
            }

            #[test]
            fn records_are_consistent(options in roll_options_strategy(), seed in any::<u64>()) {
                let Ok(params) = RollParams::from_options(options) else {
                    return Ok(());
                };
                let result = roll_with(&mut Roller::from_seed(seed), [params.to_options()])?;
                prop_assert!(result.rolls[0].is_consistent());
            }
        }
    }
}
