use proptest::prelude::*;

use crate::{
    modifiers::{Depth, DropOptions, KeepOptions, ReplaceRule, RerollOptions, UniqueOptions},
    rules::{
        comparison::ComparisonOptions,
        options::{Arithmetic, ModifierOptions, RollOptions},
    },
};

pub(crate) fn rolls_strategy(sides: u32, max_len: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(1..=sides as i64, 0..=max_len)
}

fn bound_strategy() -> impl Strategy<Value = Option<i64>> {
    prop::option::of(-2..=22i64)
}

fn exact_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::btree_set(-2..=22i64, 0..3).prop_map(|set| set.into_iter().collect())
}

/// Any combination of bounds and exact values, possibly empty.
pub(crate) fn comparison_strategy() -> impl Strategy<Value = ComparisonOptions> {
    (bound_strategy(), bound_strategy(), exact_strategy()).prop_map(
        |(greater_than, less_than, exact)| ComparisonOptions {
            greater_than,
            less_than,
            exact,
        },
    )
}

fn non_empty_comparison_strategy() -> impl Strategy<Value = ComparisonOptions> {
    comparison_strategy().prop_filter("needs at least one term", |c| !c.is_empty())
}

fn cap_strategy() -> impl Strategy<Value = ComparisonOptions> {
    (bound_strategy(), bound_strategy())
        .prop_filter("needs a bound", |(gt, lt)| gt.is_some() || lt.is_some())
        .prop_map(|(greater_than, less_than)| ComparisonOptions {
            greater_than,
            less_than,
            exact: Vec::new(),
        })
}

fn drop_strategy() -> impl Strategy<Value = DropOptions> {
    (
        prop::option::of(0..5u32),
        prop::option::of(0..5u32),
        comparison_strategy(),
    )
        .prop_map(|(highest, lowest, filter)| DropOptions {
            highest,
            lowest,
            filter,
        })
        .prop_filter("needs something to drop", |d| {
            d.highest.is_some() || d.lowest.is_some() || !d.filter.is_empty()
        })
}

fn keep_strategy() -> impl Strategy<Value = KeepOptions> {
    prop_oneof![
        (1..5u32).prop_map(KeepOptions::highest),
        (1..5u32).prop_map(KeepOptions::lowest),
    ]
}

fn replace_rule_strategy() -> impl Strategy<Value = ReplaceRule> {
    prop_oneof![
        (1..=20i64, -2..=22i64).prop_map(|(from, to)| ReplaceRule::exact(from, to)),
        (1..=20i64, -2..=22i64).prop_map(|(gt, to)| {
            ReplaceRule::comparison(ComparisonOptions::greater_than(gt), to)
        }),
        (1..=20i64, -2..=22i64)
            .prop_map(|(lt, to)| ReplaceRule::comparison(ComparisonOptions::less_than(lt), to)),
        (non_empty_comparison_strategy(), -2..=22i64)
            .prop_map(|(from, to)| ReplaceRule::comparison(from, to)),
    ]
}

fn reroll_strategy() -> impl Strategy<Value = RerollOptions> {
    (non_empty_comparison_strategy(), prop::option::of(0..5u32))
        .prop_map(|(trigger, max)| RerollOptions { trigger, max })
}

fn depth_strategy() -> impl Strategy<Value = Option<Depth>> {
    prop::option::of((0..4u32).prop_map(Depth))
}

/// Modifier sets that can be written out as notation and read back unchanged.
pub(crate) fn modifier_options_strategy() -> impl Strategy<Value = ModifierOptions> {
    (
        (
            prop::option::of(cap_strategy()),
            prop::option::of(drop_strategy()),
            prop::option::of(keep_strategy()),
            prop::option::of(prop::collection::vec(replace_rule_strategy(), 1..3)),
            prop::option::of(reroll_strategy()),
        ),
        (
            any::<bool>(),
            depth_strategy(),
            depth_strategy(),
            prop::option::of(exact_strategy().prop_map(UniqueOptions::except)),
            prop::option::of(0..10i64),
            prop::option::of(0..10i64),
        ),
    )
        .prop_map(
            |(
                (cap, drop, keep, replace, reroll),
                (explode, compound, penetrate, unique, plus, minus),
            )| ModifierOptions {
                cap,
                drop,
                keep,
                replace,
                reroll,
                explode,
                compound,
                penetrate,
                unique,
                plus,
                minus,
            },
        )
}

/// Numeric pools with arbitrary modifiers. Some of them fail validation (unique on
/// too small a die); callers decide what to do with those.
pub(crate) fn roll_options_strategy() -> impl Strategy<Value = RollOptions> {
    (1..=20u32, 1..=8u32, modifier_options_strategy(), any::<bool>()).prop_map(
        |(sides, quantity, modifiers, subtract)| RollOptions {
            arithmetic: if subtract {
                Arithmetic::Subtract
            } else {
                Arithmetic::Add
            },
            ..RollOptions::new(sides).quantity(quantity).modifiers(modifiers)
        },
    )
}
