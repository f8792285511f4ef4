use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag_no_case,
    combinator::{map, opt},
    sequence::preceded,
};
use serde::{Deserialize, Serialize};

use crate::{
    modifiers::Modifier,
    notation::grammar::{braced, collect_terms, comparison_term, unsigned},
    rules::comparison::ComparisonOptions,
};

/// Value filters plus "drop the n highest / lowest", applied together in one pass.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highest: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lowest: Option<u32>,
    #[serde(flatten)]
    pub filter: ComparisonOptions,
}

impl DropOptions {
    pub fn highest(n: u32) -> Self {
        Self {
            highest: Some(n),
            ..Default::default()
        }
    }

    pub fn lowest(n: u32) -> Self {
        Self {
            lowest: Some(n),
            ..Default::default()
        }
    }

    pub fn filter(filter: ComparisonOptions) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    /// Later counts win, filters accumulate.
    pub fn merge(&mut self, other: DropOptions) {
        if other.highest.is_some() {
            self.highest = other.highest;
        }
        if other.lowest.is_some() {
            self.lowest = other.lowest;
        }
        self.filter.merge(other.filter);
    }
}

/// "Keep the n highest / lowest". Only exists until normalization turns it into a
/// [`DropOptions`] count against the pool's quantity.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeepOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highest: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lowest: Option<u32>,
}

impl KeepOptions {
    pub fn highest(n: u32) -> Self {
        Self {
            highest: Some(n),
            lowest: None,
        }
    }

    pub fn lowest(n: u32) -> Self {
        Self {
            highest: None,
            lowest: Some(n),
        }
    }

    pub fn merge(&mut self, other: KeepOptions) {
        if other.highest.is_some() {
            self.highest = other.highest;
        }
        if other.lowest.is_some() {
            self.lowest = other.lowest;
        }
    }

    /// Keep highest k of n == drop lowest n - k, and the other way round.
    pub fn resolve(&self, quantity: u32, drop: &mut DropOptions) {
        if let Some(k) = self.highest {
            drop.lowest = Some(quantity.saturating_sub(k));
        }
        if let Some(k) = self.lowest {
            drop.highest = Some(quantity.saturating_sub(k));
        }
    }
}

/// `H`, `H<n>`, `L`, `L<n>` or `D{...}`
pub(crate) fn parse(input: &str) -> IResult<&str, Modifier> {
    alt((
        map(preceded(tag_no_case("H"), opt(unsigned)), |n| {
            Modifier::Drop(DropOptions::highest(n.unwrap_or(1)))
        }),
        map(preceded(tag_no_case("L"), opt(unsigned)), |n| {
            Modifier::Drop(DropOptions::lowest(n.unwrap_or(1)))
        }),
        map(preceded(tag_no_case("D"), braced(comparison_term)), |terms| {
            Modifier::Drop(DropOptions::filter(collect_terms(terms)))
        }),
    ))
    .parse(input)
}

/// `KL`, `KL<n>`, `K` or `K<n>`
pub(crate) fn parse_keep(input: &str) -> IResult<&str, KeepOptions> {
    alt((
        map(preceded(tag_no_case("KL"), opt(unsigned)), |n| {
            KeepOptions::lowest(n.unwrap_or(1))
        }),
        map(preceded(tag_no_case("K"), opt(unsigned)), |n| {
            KeepOptions::highest(n.unwrap_or(1))
        }),
    ))
    .parse(input)
}

pub fn apply(rolls: Vec<i64>, options: &DropOptions) -> Vec<i64> {
    let remaining: Vec<i64> = rolls
        .into_iter()
        .filter(|value| !options.filter.matches(*value))
        .collect();

    // ties go to whichever equal value sorts first; only counts and sums are guaranteed
    let mut by_value: Vec<usize> = (0..remaining.len()).collect();
    by_value.sort_by_key(|&i| remaining[i]);

    let mut dropped = vec![false; remaining.len()];
    let highest = options.highest.unwrap_or(0) as usize;
    for &i in by_value.iter().rev().take(highest) {
        dropped[i] = true;
    }
    let lowest = options.lowest.unwrap_or(0) as usize;
    let lowest_indices: Vec<usize> = by_value
        .iter()
        .copied()
        .filter(|&i| !dropped[i])
        .take(lowest)
        .collect();
    for i in lowest_indices {
        dropped[i] = true;
    }

    remaining
        .into_iter()
        .zip(dropped)
        .filter_map(|(value, dropped)| (!dropped).then_some(value))
        .collect()
}

pub fn describe(options: &DropOptions) -> Vec<String> {
    let mut lines = Vec::new();
    match options.highest {
        Some(1) => lines.push("Drop highest".to_string()),
        Some(n) => lines.push(format!("Drop highest {n}")),
        None => {}
    }
    match options.lowest {
        Some(1) => lines.push("Drop lowest".to_string()),
        Some(n) => lines.push(format!("Drop lowest {n}")),
        None => {}
    }
    for part in options.filter.describe() {
        lines.push(format!("Drop {part}"));
    }
    lines
}

pub fn to_notation(options: &DropOptions) -> String {
    let mut notation = String::new();
    match options.highest {
        Some(1) => notation.push('H'),
        Some(n) => notation.push_str(&format!("H{n}")),
        None => {}
    }
    match options.lowest {
        Some(1) => notation.push('L'),
        Some(n) => notation.push_str(&format!("L{n}")),
        None => {}
    }
    let terms = options.filter.notation_terms();
    if !terms.is_empty() {
        notation.push_str(&format!("D{{{}}}", terms.join(",")));
    }
    notation
}
