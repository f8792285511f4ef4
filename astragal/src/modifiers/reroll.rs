use nom::{
    IResult, Parser,
    bytes::complete::tag_no_case,
    combinator::{map, opt},
    sequence::preceded,
};
use serde::{Deserialize, Serialize};

use crate::{
    modifiers::{MAX_REROLL_ATTEMPTS, Modifier},
    notation::grammar::{braced, collect_terms, comparison_term, unsigned},
    rules::comparison::ComparisonOptions,
};

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RerollOptions {
    #[serde(flatten)]
    pub trigger: ComparisonOptions,
    /// How many dice in the pool may be rerolled at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

impl RerollOptions {
    pub fn new(trigger: ComparisonOptions) -> Self {
        Self { trigger, max: None }
    }

    pub fn with_max(mut self, max: u32) -> Self {
        self.max = Some(max);
        self
    }

    pub fn merge(&mut self, other: RerollOptions) {
        self.trigger.merge(other.trigger);
        if other.max.is_some() {
            self.max = other.max;
        }
    }
}

/// `R{1,<3}` optionally followed by a dice limit, e.g. `R{1}2`.
pub(crate) fn parse(input: &str) -> IResult<&str, Modifier> {
    map(
        (preceded(tag_no_case("R"), braced(comparison_term)), opt(unsigned)),
        |(terms, max)| {
            Modifier::Reroll(RerollOptions {
                trigger: collect_terms(terms),
                max,
            })
        },
    )
    .parse(input)
}

pub fn apply(
    rolls: Vec<i64>,
    options: &RerollOptions,
    roll_one: &mut dyn FnMut() -> i64,
) -> Vec<i64> {
    let mut rerolled = 0;
    let mut result = Vec::with_capacity(rolls.len());
    for value in rolls {
        let limit_reached = options.max.is_some_and(|max| rerolled >= max);
        if !options.trigger.matches(value) || limit_reached {
            result.push(value);
            continue;
        }
        rerolled += 1;
        result.push(reroll_die(&options.trigger, roll_one));
    }
    result
}

/// Draws until the value stops matching; the last of [`MAX_REROLL_ATTEMPTS`] draws is
/// kept either way.
fn reroll_die(trigger: &ComparisonOptions, roll_one: &mut dyn FnMut() -> i64) -> i64 {
    let mut value = roll_one();
    for _ in 1..MAX_REROLL_ATTEMPTS {
        if !trigger.matches(value) {
            return value;
        }
        value = roll_one();
    }
    if trigger.matches(value) {
        log::warn!(
            "Reroll gave up after {} attempts, keeping {}",
            MAX_REROLL_ATTEMPTS,
            value
        );
    }
    value
}

pub fn describe(options: &RerollOptions) -> Vec<String> {
    let mut lines: Vec<String> = options
        .trigger
        .describe()
        .into_iter()
        .map(|part| format!("Reroll {part}"))
        .collect();
    if let Some(max) = options.max {
        lines.push(format!("Reroll at most {max} dice"));
    }
    lines
}

pub fn to_notation(options: &RerollOptions) -> String {
    let terms = options.trigger.notation_terms();
    if terms.is_empty() {
        return String::new();
    }
    let max = options.max.map(|max| max.to_string()).unwrap_or_default();
    format!("R{{{}}}{max}", terms.join(","))
}
