use derive_more::{From, Into};
use serde::{Deserialize, Serialize};

use crate::modifiers::MAX_REROLL_ATTEMPTS;

/// How many extra draws a compounding or penetrating die may take. `0` means "until it
/// stops rolling the maximum", still bounded by [`MAX_REROLL_ATTEMPTS`].
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, From, Into, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Depth(pub u32);

impl Depth {
    pub const UNLIMITED: Depth = Depth(0);

    pub fn is_unlimited(&self) -> bool {
        self.0 == 0
    }

    pub fn limit(&self) -> usize {
        if self.is_unlimited() {
            MAX_REROLL_ATTEMPTS
        } else {
            (self.0 as usize).min(MAX_REROLL_ATTEMPTS)
        }
    }

    pub(crate) fn suffix(&self) -> String {
        if self.is_unlimited() {
            String::new()
        } else {
            self.0.to_string()
        }
    }
}

/// Adds `contribution(draw)` to `value` for every extra draw while the draws keep
/// landing on `max`, at most `depth.limit()` times.
pub(crate) fn accumulate(
    value: i64,
    max: i64,
    depth: Depth,
    roll_one: &mut dyn FnMut() -> i64,
    contribution: impl Fn(i64) -> i64,
) -> i64 {
    let mut total = value;
    for _ in 0..depth.limit() {
        let draw = roll_one();
        total += contribution(draw);
        if draw != max {
            return total;
        }
    }
    if depth.is_unlimited() {
        log::warn!(
            "Stopped adding to a die after {} maximum rolls in a row",
            MAX_REROLL_ATTEMPTS
        );
    }
    total
}

/// Every die showing the maximum face absorbs further draws into its own value.
pub fn apply(
    rolls: Vec<i64>,
    depth: Depth,
    sides: u32,
    roll_one: &mut dyn FnMut() -> i64,
) -> Vec<i64> {
    let max = sides as i64;
    rolls
        .into_iter()
        .map(|value| {
            if value == max {
                accumulate(value, max, depth, roll_one, |draw| draw)
            } else {
                value
            }
        })
        .collect()
}

pub fn describe(depth: Depth) -> Vec<String> {
    if depth.is_unlimited() {
        vec!["Compounding Dice".to_string()]
    } else {
        vec![format!("Compounding Dice (up to {} times)", depth.0)]
    }
}

pub fn to_notation(depth: Depth) -> String {
    format!("!!{}", depth.suffix())
}
