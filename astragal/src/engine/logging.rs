use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::modifiers::{Modifier, ModifierKind};

/// What one modifier stage changed, as a multiset difference of the rolls before and
/// after it ran. Reordering alone never shows up here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierLog {
    pub modifier: ModifierKind,
    pub options: Modifier,
    pub added: Vec<i64>,
    pub removed: Vec<i64>,
}

impl ModifierLog {
    pub fn from_diff(options: Modifier, before: &[i64], after: &[i64]) -> Self {
        let (added, removed) = diff_rolls(before, after);
        Self {
            modifier: options.kind(),
            options,
            added,
            removed,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    pub fn pretty_print(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        write!(f, "{} ({})", self.modifier, self.options.to_notation())?;
        if self.is_noop() {
            return write!(f, ": no change");
        }
        if !self.removed.is_empty() {
            write!(f, ": removed {:?}", self.removed)?;
        }
        if !self.added.is_empty() {
            let sep = if self.removed.is_empty() { ":" } else { "," };
            write!(f, "{sep} added {:?}", self.added)?;
        }
        Ok(())
    }
}

/// Returns `(added, removed)` between two roll multisets, each sorted ascending.
pub fn diff_rolls(before: &[i64], after: &[i64]) -> (Vec<i64>, Vec<i64>) {
    let mut counts: FxHashMap<i64, i64> = FxHashMap::default();
    for value in before {
        *counts.entry(*value).or_default() -= 1;
    }
    for value in after {
        *counts.entry(*value).or_default() += 1;
    }

    let mut added = Vec::new();
    let mut removed = Vec::new();
    for (value, delta) in counts {
        let target = if delta > 0 { &mut added } else { &mut removed };
        for _ in 0..delta.unsigned_abs() {
            target.push(value);
        }
    }
    added.sort_unstable();
    removed.sort_unstable();
    (added, removed)
}
