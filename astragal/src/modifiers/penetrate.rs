use crate::modifiers::compound::{Depth, accumulate};

/// Like compounding, but each extra draw counts one less, never less than 1.
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
                accumulate(value, max, depth, roll_one, |draw| (draw - 1).max(1))
            } else {
                value
            }
        })
        .collect()
}

pub fn describe(depth: Depth) -> Vec<String> {
    if depth.is_unlimited() {
        vec!["Penetrating Dice".to_string()]
    } else {
        vec![format!("Penetrating Dice (up to {} times)", depth.0)]
    }
}

pub fn to_notation(depth: Depth) -> String {
    format!("!p{}", depth.suffix())
}
