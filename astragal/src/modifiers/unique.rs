use nom::{
    IResult, Parser,
    bytes::complete::tag_no_case,
    combinator::{map, opt},
    sequence::preceded,
};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, RollError},
    modifiers::Modifier,
    notation::grammar::{braced, signed},
    rules::comparison::format_values,
};

/// Ceiling on redraws for a single duplicate.
pub const MAX_UNIQUE_ATTEMPTS: usize = 1_000;

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueOptions {
    /// Values allowed to repeat.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub not_unique: Vec<i64>,
}

impl UniqueOptions {
    pub fn except(values: impl IntoIterator<Item = i64>) -> Self {
        Self {
            not_unique: values.into_iter().collect(),
        }
    }

    pub fn merge(&mut self, other: UniqueOptions) {
        for value in other.not_unique {
            if !self.not_unique.contains(&value) {
                self.not_unique.push(value);
            }
        }
    }
}

/// `U` or `U{1,2}`
pub(crate) fn parse(input: &str) -> IResult<&str, Modifier> {
    map(preceded(tag_no_case("U"), opt(braced(signed))), |exempt| {
        Modifier::Unique(UniqueOptions::except(exempt.unwrap_or_default()))
    })
    .parse(input)
}

/// A pool larger than the die only works out if some face may repeat.
pub fn validate(options: &UniqueOptions, quantity: u32, sides: u32) -> Result<()> {
    let exempt_face = options
        .not_unique
        .iter()
        .any(|value| (1..=sides as i64).contains(value));
    if quantity <= sides || exempt_face {
        Ok(())
    } else {
        Err(RollError::UniqueUnsatisfiable { quantity, sides })
    }
}

pub fn apply(
    rolls: Vec<i64>,
    options: &UniqueOptions,
    quantity: u32,
    sides: u32,
    roll_one: &mut dyn FnMut() -> i64,
) -> Result<Vec<i64>> {
    validate(options, quantity, sides)?;

    let exempt = |value: i64| options.not_unique.contains(&value);
    let mut seen = FxHashSet::default();
    let mut result = Vec::with_capacity(rolls.len());

    for value in rolls {
        let value = if exempt(value) || !seen.contains(&value) {
            value
        } else {
            let mut candidate = roll_one();
            let mut attempts = 1;
            while !exempt(candidate) && seen.contains(&candidate) && attempts < MAX_UNIQUE_ATTEMPTS {
                candidate = roll_one();
                attempts += 1;
            }
            if !exempt(candidate) && seen.contains(&candidate) {
                log::warn!(
                    "No unique value found after {} attempts, keeping duplicate {}",
                    MAX_UNIQUE_ATTEMPTS,
                    candidate
                );
            }
            candidate
        };
        seen.insert(value);
        result.push(value);
    }

    Ok(result)
}

pub fn describe(options: &UniqueOptions) -> Vec<String> {
    if options.not_unique.is_empty() {
        vec!["No Duplicate Rolls".to_string()]
    } else {
        vec![format!(
            "No Duplicates (except {})",
            format_values(&options.not_unique)
        )]
    }
}

pub fn to_notation(options: &UniqueOptions) -> String {
    if options.not_unique.is_empty() {
        "U".to_string()
    } else {
        let values: Vec<String> = options.not_unique.iter().map(|v| v.to_string()).collect();
        format!("U{{{}}}", values.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            parse("U").unwrap(),
            ("", Modifier::Unique(UniqueOptions::default()))
        );
        assert_eq!(
            parse("u{1,2}L").unwrap(),
            ("L", Modifier::Unique(UniqueOptions::except([1, 2])))
        );
    }

    #[test]
    fn test_unique_replaces_duplicates() -> anyhow::Result<()> {
        let result = apply(vec![1, 1, 2, 3], &UniqueOptions::default(), 4, 6, &mut || 200)?;
        assert_eq!(result, vec![1, 200, 2, 3]);
        assert_eq!(result.iter().sum::<i64>(), 206);
        Ok(())
    }

    #[test]
    fn test_unique_keeps_exempt_duplicates() -> anyhow::Result<()> {
        let result = apply(
            vec![1, 1, 2, 2],
            &UniqueOptions::except([1]),
            4,
            6,
            &mut || 5,
        )?;
        assert_eq!(result, vec![1, 1, 2, 5]);
        Ok(())
    }

    #[test]
    fn test_unique_redraws_past_seen_values() -> anyhow::Result<()> {
        let mut draws = vec![2, 3, 4].into_iter();
        let mut roll_one = || draws.next().unwrap_or(6);
        let result = apply(vec![2, 3, 2], &UniqueOptions::default(), 3, 6, &mut roll_one)?;
        assert_eq!(result, vec![2, 3, 4]);
        Ok(())
    }

    #[test]
    fn test_unique_gives_up_eventually() -> anyhow::Result<()> {
        let result = apply(vec![1, 1], &UniqueOptions::default(), 2, 6, &mut || 1)?;
        assert_eq!(result, vec![1, 1]);
        Ok(())
    }

    #[test]
    fn test_unsatisfiable_fails_before_drawing() {
        let result = apply(
            vec![1, 2, 3, 4, 5, 6, 1],
            &UniqueOptions::default(),
            7,
            6,
            &mut || -> i64 { unreachable!("validation happens first") },
        );
        assert!(matches!(
            result,
            Err(RollError::UniqueUnsatisfiable {
                quantity: 7,
                sides: 6
            })
        ));
    }

    #[test]
    fn test_validate_with_exemptions() {
        assert!(validate(&UniqueOptions::except([2]), 8, 6).is_ok());
        assert!(validate(&UniqueOptions::except([9]), 8, 6).is_err());
        assert!(validate(&UniqueOptions::default(), 6, 6).is_ok());
    }

    #[test]
    fn test_describe_and_notation() {
        assert_eq!(describe(&UniqueOptions::default()), vec!["No Duplicate Rolls"]);
        assert_eq!(
            describe(&UniqueOptions::except([1, 2])),
            vec!["No Duplicates (except [1] and [2])"]
        );
        assert_eq!(to_notation(&UniqueOptions::default()), "U");
        assert_eq!(to_notation(&UniqueOptions::except([1, 2])), "U{1,2}");
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;
        use crate::roller::Roller;

        proptest! {
            #[test]
            fn no_duplicates_without_exemptions(sides in 1..=20u32, seed in any::<u64>(), quantity_seed in any::<u32>()) {
                let quantity = quantity_seed % sides + 1;
                let mut roller = Roller::from_seed(seed);
                let rolls = roller.spread_rolls(quantity, sides);
                let result = apply(rolls, &UniqueOptions::default(), quantity, sides, &mut || roller.d(sides))?;

                prop_assert_eq!(result.len(), quantity as usize);
                let mut deduped = result.clone();
                deduped.sort_unstable();
                deduped.dedup();
                prop_assert_eq!(deduped.len(), result.len());
            }
        }
    }
}
