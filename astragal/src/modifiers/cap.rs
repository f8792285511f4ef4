use nom::{IResult, Parser, bytes::complete::tag_no_case, combinator::map, sequence::preceded};

use crate::{
    modifiers::Modifier,
    notation::grammar::{bound_term, braced, collect_terms},
    rules::comparison::ComparisonOptions,
};

/// `C{>n,<m}`
pub(crate) fn parse(input: &str) -> IResult<&str, Modifier> {
    map(preceded(tag_no_case("C"), braced(bound_term)), |terms| {
        Modifier::Cap(collect_terms(terms))
    })
    .parse(input)
}

/// Clamps every roll into the configured bounds.
pub fn apply(rolls: Vec<i64>, options: &ComparisonOptions) -> Vec<i64> {
    rolls
        .into_iter()
        .map(|value| match (options.greater_than, options.less_than) {
            (Some(gt), _) if value > gt => gt,
            (_, Some(lt)) if value < lt => lt,
            _ => value,
        })
        .collect()
}

pub fn describe(options: &ComparisonOptions) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(gt) = options.greater_than {
        lines.push(format!("No Rolls greater than [{gt}]"));
    }
    if let Some(lt) = options.less_than {
        lines.push(format!("No Rolls less than [{lt}]"));
    }
    lines
}

pub fn to_notation(options: &ComparisonOptions) -> String {
    let bounds = ComparisonOptions {
        exact: Vec::new(),
        ..options.clone()
    };
    let terms = bounds.notation_terms();
    if terms.is_empty() {
        String::new()
    } else {
        format!("C{{{}}}", terms.join(","))
    }
}
