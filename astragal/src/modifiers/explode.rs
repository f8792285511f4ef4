use nom::{
    IResult, Parser,
    bytes::complete::take_while1,
    character::complete::one_of,
    combinator::{map_opt, opt},
};

use crate::{
    modifiers::{Depth, Modifier},
    notation::grammar::unsigned,
};

/// A run of `!` with an optional `p` and depth, read as a whole so that the explode,
/// compound and penetrate tokens can sit next to each other:
///
/// | run      | modifiers                              |
/// |----------|----------------------------------------|
/// | `!`      | explode                                |
/// | `!!n`    | compound                               |
/// | `!!!n`   | explode, compound                      |
/// | `!pn`    | penetrate                              |
/// | `!!pn`   | explode, penetrate                     |
/// | `!!!pn`  | unlimited compound, penetrate          |
/// | `!!!!pn` | explode, unlimited compound, penetrate |
pub(crate) fn parse_run(input: &str) -> IResult<&str, Vec<Modifier>> {
    map_opt(
        (take_while1(|c: char| c == '!'), opt(one_of("pP")), opt(unsigned)),
        |(bangs, penetrate, depth): (&str, Option<char>, Option<u32>)| {
            run_modifiers(bangs.len(), penetrate.is_some(), depth)
        },
    )
    .parse(input)
}

fn run_modifiers(bangs: usize, penetrate: bool, depth: Option<u32>) -> Option<Vec<Modifier>> {
    if bangs == 1 && !penetrate {
        // plain explode takes no depth
        return depth.is_none().then(|| vec![Modifier::Explode]);
    }
    let depth = Depth(depth.unwrap_or(0));
    let modifiers = match (bangs, penetrate) {
        (2, false) => vec![Modifier::Compound(depth)],
        (3, false) => vec![Modifier::Explode, Modifier::Compound(depth)],
        (1, true) => vec![Modifier::Penetrate(depth)],
        (2, true) => vec![Modifier::Explode, Modifier::Penetrate(depth)],
        (3, true) => vec![Modifier::Compound(Depth::UNLIMITED), Modifier::Penetrate(depth)],
        (4, true) => vec![
            Modifier::Explode,
            Modifier::Compound(Depth::UNLIMITED),
            Modifier::Penetrate(depth),
        ],
        _ => return None,
    };
    Some(modifiers)
}

/// One extra die per roll showing the maximum face. The extra dice are appended and
/// do not explode themselves.
pub fn apply(mut rolls: Vec<i64>, sides: u32, roll_one: &mut dyn FnMut() -> i64) -> Vec<i64> {
    let max = sides as i64;
    let explosions = rolls.iter().filter(|&&value| value == max).count();
    rolls.extend((0..explosions).map(|_| roll_one()));
    rolls
}

pub fn describe() -> Vec<String> {
    vec!["Exploding Dice".to_string()]
}

pub fn to_notation() -> String {
    "!".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_tokens() {
        assert_eq!(parse_run("!+1").unwrap(), ("+1", vec![Modifier::Explode]));
        assert_eq!(parse_run("!!").unwrap(), ("", vec![Modifier::Compound(Depth(0))]));
        assert_eq!(parse_run("!!3+1").unwrap(), ("+1", vec![Modifier::Compound(Depth(3))]));
        assert_eq!(parse_run("!p").unwrap(), ("", vec![Modifier::Penetrate(Depth(0))]));
        assert_eq!(parse_run("!P2").unwrap(), ("", vec![Modifier::Penetrate(Depth(2))]));
        assert!(parse_run("H").is_err());
    }

    #[test]
    fn test_parse_adjacent_tokens() {
        assert_eq!(
            parse_run("!!p").unwrap(),
            ("", vec![Modifier::Explode, Modifier::Penetrate(Depth(0))])
        );
        assert_eq!(
            parse_run("!!!2").unwrap(),
            ("", vec![Modifier::Explode, Modifier::Compound(Depth(2))])
        );
        assert_eq!(
            parse_run("!!!").unwrap(),
            ("", vec![Modifier::Explode, Modifier::Compound(Depth(0))])
        );
        assert_eq!(
            parse_run("!!!p").unwrap(),
            ("", vec![Modifier::Compound(Depth(0)), Modifier::Penetrate(Depth(0))])
        );
        assert_eq!(
            parse_run("!!!!p3").unwrap(),
            (
                "",
                vec![
                    Modifier::Explode,
                    Modifier::Compound(Depth(0)),
                    Modifier::Penetrate(Depth(3)),
                ]
            )
        );
        // `!p!` is two runs
        assert_eq!(
            parse_run("!p!").unwrap(),
            ("!", vec![Modifier::Penetrate(Depth(0))])
        );
    }

    #[test]
    fn test_parse_rejects_odd_runs() {
        assert!(parse_run("!3").is_err());
        assert!(parse_run("!0").is_err());
        assert!(parse_run("!!!!").is_err());
        assert!(parse_run("!!!!!p").is_err());
    }

    #[test]
    fn test_explode_appends() {
        let result = apply(vec![1, 2, 3, 6], 6, &mut || 200);
        assert_eq!(result, vec![1, 2, 3, 6, 200]);
        assert_eq!(result.iter().sum::<i64>(), 212);
    }

    #[test]
    fn test_explode_counts_every_max() {
        let result = apply(vec![6, 6, 2], 6, &mut || 1);
        assert_eq!(result, vec![6, 6, 2, 1, 1]);
    }

    #[test]
    fn test_no_max_no_draws() {
        let result = apply(vec![1, 2], 6, &mut || -> i64 { unreachable!() });
        assert_eq!(result, vec![1, 2]);
    }
}
