use nom::{
    IResult, Parser,
    bytes::complete::tag_no_case,
    character::complete::char,
    combinator::map,
    sequence::{preceded, separated_pair},
};
use serde::{Deserialize, Serialize};

use crate::{
    modifiers::Modifier,
    notation::grammar::{Term, braced, comparison_term, signed},
    rules::comparison::ComparisonOptions,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplaceFrom {
    Exact(i64),
    Comparison(ComparisonOptions),
}

impl ReplaceFrom {
    fn matches(&self, value: i64) -> bool {
        match self {
            ReplaceFrom::Exact(from) => value == *from,
            ReplaceFrom::Comparison(comparison) => comparison.matches(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReplaceRule {
    pub from: ReplaceFrom,
    pub to: i64,
}

impl ReplaceRule {
    pub fn exact(from: i64, to: i64) -> Self {
        Self {
            from: ReplaceFrom::Exact(from),
            to,
        }
    }

    pub fn comparison(from: ComparisonOptions, to: i64) -> Self {
        Self {
            from: ReplaceFrom::Comparison(from),
            to,
        }
    }

    /// One rule per notation term: exact values first, then `>n`, then `<n`. Running
    /// the pieces in sequence replaces exactly what the whole rule replaces.
    pub fn split(self) -> Vec<ReplaceRule> {
        let to = self.to;
        match self.from {
            ReplaceFrom::Exact(_) => vec![self],
            ReplaceFrom::Comparison(from) => {
                let mut rules: Vec<ReplaceRule> = from
                    .exact
                    .into_iter()
                    .map(|value| ReplaceRule::exact(value, to))
                    .collect();
                if let Some(gt) = from.greater_than {
                    rules.push(ReplaceRule::comparison(ComparisonOptions::greater_than(gt), to));
                }
                if let Some(lt) = from.less_than {
                    rules.push(ReplaceRule::comparison(ComparisonOptions::less_than(lt), to));
                }
                rules
            }
        }
    }

    pub fn replace(&self, value: i64) -> i64 {
        if self.from.matches(value) {
            self.to
        } else {
            value
        }
    }
}

fn rule(input: &str) -> IResult<&str, ReplaceRule> {
    map(
        separated_pair(comparison_term, char('='), signed),
        |(term, to)| match term {
            Term::Exact(from) => ReplaceRule::exact(from, to),
            Term::GreaterThan(gt) => ReplaceRule::comparison(ComparisonOptions::greater_than(gt), to),
            Term::LessThan(lt) => ReplaceRule::comparison(ComparisonOptions::less_than(lt), to),
        },
    )
    .parse(input)
}

/// `V{1=2,>5=6,<2=1}`
pub(crate) fn parse(input: &str) -> IResult<&str, Modifier> {
    map(preceded(tag_no_case("V"), braced(rule)), Modifier::Replace).parse(input)
}

/// Rules run in order over the whole pool, so a later rule sees earlier replacements.
pub fn apply(mut rolls: Vec<i64>, rules: &[ReplaceRule]) -> Vec<i64> {
    for rule in rules {
        rolls = rolls.into_iter().map(|value| rule.replace(value)).collect();
    }
    rolls
}

pub fn describe(rules: &[ReplaceRule]) -> Vec<String> {
    rules
        .iter()
        .map(|rule| {
            let from = match &rule.from {
                ReplaceFrom::Exact(from) => format!("[{from}]"),
                ReplaceFrom::Comparison(comparison) => comparison.describe().join(" or "),
            };
            format!("Replace {from} with [{}]", rule.to)
        })
        .collect()
}

pub fn to_notation(rules: &[ReplaceRule]) -> String {
    let terms: Vec<String> = rules
        .iter()
        .flat_map(|rule| match &rule.from {
            ReplaceFrom::Exact(from) => vec![format!("{from}={}", rule.to)],
            ReplaceFrom::Comparison(comparison) => comparison
                .notation_terms()
                .into_iter()
                .map(|term| format!("{term}={}", rule.to))
                .collect(),
        })
        .collect();
    if terms.is_empty() {
        String::new()
    } else {
        format!("V{{{}}}", terms.join(","))
    }
}
