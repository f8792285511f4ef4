use derive_more::Display;

use crate::{
    engine::logging::ModifierLog,
    error::Result,
    modifiers::ModifierContext,
    roller::Roller,
    rules::{
        options::ModifierOptions,
        params::RollParams,
        record::{ModifierHistory, RollRecord},
    },
};

/// The pipeline's working state between modifier stages.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RollBonus {
    pub rolls: Vec<i64>,
    pub simple_math_modifier: i64,
    pub logs: Vec<ModifierLog>,
}

impl RollBonus {
    pub fn new(rolls: Vec<i64>) -> Self {
        Self {
            rolls,
            ..Default::default()
        }
    }

    pub fn total(&self) -> i64 {
        saturating_sum(&self.rolls).saturating_add(self.simple_math_modifier)
    }
}

/// Sum that pins at the `i64` bounds instead of wrapping.
pub(crate) fn saturating_sum(values: &[i64]) -> i64 {
    values.iter().fold(0i64, |sum, value| sum.saturating_add(*value))
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Initialized,
    RollsGenerated,
    ModifiersApplied,
    TotalComputed,
    RecordBuilt,
}

/// Runs every configured modifier over `rolls` in canonical order. Unconfigured
/// modifiers are skipped and leave no log entry.
pub fn apply_modifiers(
    modifiers: &ModifierOptions,
    rolls: Vec<i64>,
    sides: u32,
    quantity: u32,
    roll_one: &mut dyn FnMut() -> i64,
) -> Result<RollBonus> {
    let mut ctx = ModifierContext {
        sides,
        quantity,
        roll_one,
    };
    modifiers
        .in_order()
        .iter()
        .try_fold(RollBonus::new(rolls), |bonus, modifier| {
            modifier.apply(bonus, &mut ctx)
        })
}

/// Single-use roll of one pool: draw, modify, total, record.
#[derive(Debug)]
pub struct Pipeline<'a> {
    params: RollParams,
    roller: &'a mut Roller,
    stage: Stage,
    initial_rolls: Vec<i64>,
    bonus: RollBonus,
    total: i64,
}

impl<'a> Pipeline<'a> {
    pub fn new(params: RollParams, roller: &'a mut Roller) -> Self {
        Self {
            params,
            roller,
            stage: Stage::Initialized,
            initial_rolls: Vec::new(),
            bonus: RollBonus::default(),
            total: 0,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn run(mut self) -> Result<RollRecord> {
        self.generate_rolls();
        self.apply_modifiers()?;
        self.compute_total();
        Ok(self.build_record())
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(self.stage < next, "{} cannot follow {}", next, self.stage);
        log::trace!("{}: {} -> {}", self.params.notation(), self.stage, next);
        self.stage = next;
    }

    fn generate_rolls(&mut self) {
        self.initial_rolls = self
            .roller
            .spread_rolls(self.params.quantity(), self.params.sides());
        self.advance(Stage::RollsGenerated);
    }

    fn apply_modifiers(&mut self) -> Result<()> {
        let sides = self.params.sides();
        let roller = &mut *self.roller;
        let mut roll_one = || roller.d(sides);
        self.bonus = apply_modifiers(
            self.params.modifiers(),
            self.initial_rolls.clone(),
            sides,
            self.params.quantity(),
            &mut roll_one,
        )?;
        self.advance(Stage::ModifiersApplied);
        Ok(())
    }

    fn compute_total(&mut self) {
        self.total = self.bonus.total();
        self.advance(Stage::TotalComputed);
    }

    fn build_record(mut self) -> RollRecord {
        self.advance(Stage::RecordBuilt);

        let RollBonus {
            rolls,
            simple_math_modifier,
            logs,
        } = self.bonus;
        let custom_results = self.params.faces().map(|faces| {
            rolls
                .iter()
                .filter_map(|&index| face_at(faces, index))
                .collect()
        });

        let record = RollRecord {
            applied_total: self.params.arithmetic().apply(self.total),
            total: self.total,
            rolls: rolls.clone(),
            modifier_history: ModifierHistory {
                logs,
                modified_rolls: rolls,
                total: self.total,
                initial_rolls: self.initial_rolls,
                simple_math_modifier,
            },
            custom_results,
            parameters: self.params,
        };
        log::debug!(
            "Rolled {}: {:?} = {}",
            record.parameters.notation(),
            record.rolls,
            record.total
        );
        record
    }
}

/// The face for a 1-based roll.
pub(crate) fn face_at(faces: &[String], roll: i64) -> Option<String> {
    usize::try_from(roll - 1)
        .ok()
        .and_then(|index| faces.get(index))
        .cloned()
}
