//! Dice notation: `<quantity>d<sides>` or `<quantity>d{<faces>}`, an optional leading
//! `-`, then any number of modifier tokens. The per-modifier token grammars live next to
//! their modifiers; this module parses the whole string.

pub(crate) mod grammar;
mod parser;

pub use parser::parse_notation;
