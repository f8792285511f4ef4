use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, one_of},
    combinator::{all_consuming, map, opt},
    multi::many0,
    sequence::delimited,
};

use crate::{
    error::{Result, RollError},
    modifiers::{
        KeepOptions, Modifier, arithmetic, cap, drop, explode, replace, reroll, unique,
    },
    notation::grammar::unsigned,
    rules::options::{Arithmetic, ModifierOptions, RollOptions, Sides},
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Modifier(Modifier),
    Keep(KeepOptions),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Core {
    subtract: bool,
    quantity: u32,
    sides: Sides,
}

/// Parses a full notation string such as `4d6L+2` or `-2d{HT}` into the options form.
pub fn parse_notation(input: &str) -> Result<RollOptions> {
    let trimmed = input.trim();
    let (core, tokens) = match all_consuming((pool_core, many0(tokens))).parse(trimmed) {
        Ok((_, parsed)) => parsed,
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => {
            return Err(invalid(trimmed, e.input));
        }
        Err(nom::Err::Incomplete(_)) => return Err(invalid(trimmed, "")),
    };

    if matches!(core.sides, Sides::Custom(_)) && !tokens.is_empty() {
        return Err(RollError::InvalidNotation(format!(
            "{trimmed} (dice with custom faces take no modifiers)"
        )));
    }

    let mut modifiers = ModifierOptions::default();
    for token in tokens.into_iter().flatten() {
        match token {
            Token::Modifier(modifier) => modifiers.merge(modifier).map_err(|err| match err {
                RollError::InvalidOptions(reason) => {
                    RollError::InvalidNotation(format!("{trimmed} ({reason})"))
                }
                other => other,
            })?,
            Token::Keep(keep) => modifiers.merge_keep(keep),
        }
    }

    Ok(RollOptions {
        sides: core.sides,
        quantity: core.quantity,
        modifiers,
        arithmetic: if core.subtract {
            Arithmetic::Subtract
        } else {
            Arithmetic::Add
        },
    })
}

fn invalid(notation: &str, rest: &str) -> RollError {
    if rest.is_empty() || rest == notation {
        RollError::InvalidNotation(notation.to_string())
    } else {
        RollError::InvalidNotation(format!("{notation} (unexpected \"{rest}\")"))
    }
}

fn pool_core(input: &str) -> IResult<&str, Core> {
    map(
        (opt(char('-')), unsigned, one_of("dD"), sides),
        |(sign, quantity, _, sides)| Core {
            subtract: sign.is_some(),
            quantity,
            sides,
        },
    )
    .parse(input)
}

fn sides(input: &str) -> IResult<&str, Sides> {
    alt((
        map(unsigned, Sides::Numeric),
        map(
            delimited(char('{'), take_while1(|c: char| c != '}' && c != ','), char('}')),
            |faces: &str| Sides::Custom(faces.chars().map(String::from).collect()),
        ),
    ))
    .parse(input)
}

/// One token, or one run of `!` tokens.
fn tokens(input: &str) -> IResult<&str, Vec<Token>> {
    alt((
        map(explode::parse_run, |run: Vec<Modifier>| -> Vec<Token> {
            run.into_iter().map(Token::Modifier).collect()
        }),
        map(token, |token| vec![token]),
    ))
    .parse(input)
}

fn token(input: &str) -> IResult<&str, Token> {
    alt((
        map(
            alt((
                cap::parse,
                reroll::parse,
                replace::parse,
                unique::parse,
                drop::parse,
                arithmetic::parse,
            )),
            Token::Modifier,
        ),
        map(drop::parse_keep, Token::Keep),
    ))
    .parse(input)
}
