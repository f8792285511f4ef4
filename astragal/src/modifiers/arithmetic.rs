use nom::{
    IResult, Parser, branch::alt, character::complete::char, combinator::map, sequence::preceded,
};

use crate::{modifiers::Modifier, notation::grammar::natural};

/// `+n` or `-n`. Repeats are summed when the tokens are merged.
pub(crate) fn parse(input: &str) -> IResult<&str, Modifier> {
    alt((
        map(preceded(char('+'), natural), Modifier::Plus),
        map(preceded(char('-'), natural), Modifier::Minus),
    ))
    .parse(input)
}

pub fn describe_plus(value: i64) -> Vec<String> {
    vec![format!("Add {value}")]
}

pub fn describe_minus(value: i64) -> Vec<String> {
    vec![format!("Subtract {value}")]
}

pub fn plus_notation(value: i64) -> String {
    format!("+{value}")
}

pub fn minus_notation(value: i64) -> String {
    format!("-{value}")
}
