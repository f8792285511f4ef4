use derive_more::IntoIterator;
use serde::{Deserialize, Serialize};

use crate::{
    engine::{logging::ModifierLog, pipeline::saturating_sum},
    rules::params::RollParams,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierHistory {
    pub logs: Vec<ModifierLog>,
    pub modified_rolls: Vec<i64>,
    pub total: i64,
    pub initial_rolls: Vec<i64>,
    pub simple_math_modifier: i64,
}

/// The immutable outcome of rolling one pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollRecord {
    pub parameters: RollParams,
    pub rolls: Vec<i64>,
    pub modifier_history: ModifierHistory,
    pub applied_total: i64,
    pub total: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_results: Option<Vec<String>>,
}

impl RollRecord {
    pub fn is_custom(&self) -> bool {
        self.custom_results.is_some()
    }

    /// Whether the totals line up with the rolls and the pool's sign.
    pub fn is_consistent(&self) -> bool {
        let history = &self.modifier_history;
        let sum = saturating_sum(&history.modified_rolls);
        history.initial_rolls.len() == self.parameters.quantity() as usize
            && self.rolls == history.modified_rolls
            && self.total == history.total
            && self.total == sum.saturating_add(history.simple_math_modifier)
            && self.applied_total == self.parameters.arithmetic().apply(self.total)
    }

    pub fn pretty_print(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        writeln!(f, "{}", self.parameters.notation())?;
        for line in self.parameters.description() {
            writeln!(f, "  {line}")?;
        }
        writeln!(f, "  Initial rolls: {:?}", self.modifier_history.initial_rolls)?;
        for log in &self.modifier_history.logs {
            write!(f, "  ")?;
            log.pretty_print(f)?;
            writeln!(f)?;
        }
        match &self.custom_results {
            Some(faces) => writeln!(f, "  Faces: [{}]", faces.join(", "))?,
            None => writeln!(f, "  Final rolls: {:?}", self.rolls)?,
        }
        write!(f, "  Total: {}", self.total)?;
        if self.applied_total != self.total {
            write!(f, " (applied as {})", self.applied_total)?;
        }
        Ok(())
    }
}

/// Every pool of one `roll` call plus the grand total over the numeric ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, IntoIterator)]
#[serde(rename_all = "camelCase")]
pub struct RollResult {
    pub total: i64,
    #[into_iterator(owned, ref)]
    pub rolls: Vec<RollRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub result: Vec<String>,
}

impl RollResult {
    pub fn from_records(rolls: Vec<RollRecord>) -> Self {
        let mut total: i64 = 0;
        let mut result = Vec::new();
        for record in &rolls {
            match &record.custom_results {
                Some(faces) => result.extend(faces.iter().cloned()),
                None => total = total.saturating_add(record.applied_total),
            }
        }
        Self {
            total,
            rolls,
            result,
        }
    }

    pub fn pretty_print(&self, f: &mut impl std::fmt::Write) -> std::fmt::Result {
        for record in &self.rolls {
            record.pretty_print(f)?;
            writeln!(f)?;
        }
        write!(f, "Grand total: {}", self.total)?;
        if !self.result.is_empty() {
            write!(f, "\nFaces: [{}]", self.result.join(", "))?;
        }
        Ok(())
    }
}
