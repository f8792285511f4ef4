//! Small nom building blocks shared by the core token and every modifier token.

use nom::{
    IResult, Parser,
    branch::alt,
    character::complete::{char, digit1},
    combinator::{map, map_res, opt, recognize},
    error::Error,
    multi::separated_list1,
    sequence::{delimited, preceded},
};

use crate::rules::comparison::ComparisonOptions;

pub(crate) fn unsigned(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |s: &str| s.parse::<u32>()).parse(input)
}

pub(crate) fn natural(input: &str) -> IResult<&str, i64> {
    map_res(digit1, |s: &str| s.parse::<i64>()).parse(input)
}

pub(crate) fn signed(input: &str) -> IResult<&str, i64> {
    map_res(recognize((opt(char('-')), digit1)), |s: &str| {
        s.parse::<i64>()
    })
    .parse(input)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Term {
    Exact(i64),
    GreaterThan(i64),
    LessThan(i64),
}

/// `>n` or `<n`
pub(crate) fn bound_term(input: &str) -> IResult<&str, Term> {
    alt((
        map(preceded(char('>'), signed), Term::GreaterThan),
        map(preceded(char('<'), signed), Term::LessThan),
    ))
    .parse(input)
}

/// `n`, `>n` or `<n`
pub(crate) fn comparison_term(input: &str) -> IResult<&str, Term> {
    alt((bound_term, map(signed, Term::Exact))).parse(input)
}

/// `{item,item,...}` with at least one item.
pub(crate) fn braced<'a, O, F>(item: F) -> impl Parser<&'a str, Output = Vec<O>, Error = Error<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = Error<&'a str>>,
{
    delimited(char('{'), separated_list1(char(','), item), char('}'))
}

pub(crate) fn collect_terms(terms: impl IntoIterator<Item = Term>) -> ComparisonOptions {
    let mut comparison = ComparisonOptions::default();
    for term in terms {
        match term {
            Term::Exact(value) => comparison.merge(ComparisonOptions::exact([value])),
            Term::GreaterThan(value) => comparison.greater_than = Some(value),
            Term::LessThan(value) => comparison.less_than = Some(value),
        }
    }
    comparison
}
