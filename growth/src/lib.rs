//! Level curves: pure functions mapping a level (1-based) to the EXP required
//! to advance past it.
//!
//! Every curve is deterministic and must stay identical between releases, since
//! stored progress (`level`, `current_exp`) is only meaningful relative to it.

use serde::{Deserialize, Serialize};

pub trait GrowthStrategy {
    /// EXP required to go from `level` to `level + 1`.
    fn exp_required(&self, level: u32) -> u64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearGrowth {
    /// Flat amount required at every level.
    pub base: u64,
    /// The amount added per level
    pub increment: u64,
}

impl LinearGrowth {
    pub fn new(base: u64, increment: u64) -> Self {
        Self { base, increment }
    }
}

impl GrowthStrategy for LinearGrowth {
    fn exp_required(&self, level: u32) -> u64 {
        self.base
            .saturating_add(self.increment.saturating_mul(u64::from(level)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExponentialGrowth {
    /// EXP required at level 1
    pub base: u64,
    /// The multiplier per level (e.g., 1.5 for +50% per level)
    pub factor: f64,
}

impl ExponentialGrowth {
    pub fn new(base: u64, factor: f64) -> Self {
        Self { base, factor }
    }
}

impl GrowthStrategy for ExponentialGrowth {
    fn exp_required(&self, level: u32) -> u64 {
        let exponent = level.saturating_sub(1).min(i32::MAX as u32) as i32;
        let value = (self.base as f64 * self.factor.powi(exponent)).round();
        // `as` saturates for out of range floats
        value as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepGrowth {
    pub base: u64,
    pub step_at: u32,
    pub step_increment: u64,
}

impl StepGrowth {
    pub fn new(base: u64, step_at: u32, step_increment: u64) -> Self {
        Self {
            base,
            step_at,
            step_increment,
        }
    }
}

impl GrowthStrategy for StepGrowth {
    fn exp_required(&self, level: u32) -> u64 {
        let steps = level.checked_div(self.step_at).unwrap_or(0);
        self.base
            .saturating_add(self.step_increment.saturating_mul(u64::from(steps)))
    }
}

/// Hand-tuned thresholds. `thresholds[0]` is the requirement at level 1; levels
/// past the end of the table reuse the last entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableGrowth {
    pub thresholds: Vec<u64>,
}

impl GrowthStrategy for TableGrowth {
    fn exp_required(&self, level: u32) -> u64 {
        let index = level.saturating_sub(1) as usize;
        self.thresholds
            .get(index)
            .or_else(|| self.thresholds.last())
            .copied()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticGrowth {
    pub base: u64,
}

impl GrowthStrategy for StaticGrowth {
    fn exp_required(&self, _: u32) -> u64 {
        self.base
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Growth {
    Linear(LinearGrowth),
    Exponential(ExponentialGrowth),
    Step(StepGrowth),
    Table(TableGrowth),
    Static(StaticGrowth),
}

impl Growth {
    /// Returns the first level in `1..max_level` whose requirement is zero.
    ///
    /// A zero requirement would let a single grant loop through levels for
    /// free, so configurations containing one are rejected at load time.
    pub fn first_zero_requirement(&self, max_level: u32) -> Option<u32> {
        (1..max_level).find(|&level| self.exp_required(level) == 0)
    }
}

impl GrowthStrategy for Growth {
    fn exp_required(&self, level: u32) -> u64 {
        match self {
            Growth::Linear(g) => g.exp_required(level),
            Growth::Exponential(g) => g.exp_required(level),
            Growth::Step(g) => g.exp_required(level),
            Growth::Table(g) => g.exp_required(level),
            Growth::Static(g) => g.exp_required(level),
        }
    }
}

impl Default for Growth {
    /// `100 * level`
    fn default() -> Self {
        Growth::Linear(LinearGrowth::new(0, 100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_growth() {
        let growth = LinearGrowth::new(0, 100);
        assert_eq!(growth.exp_required(1), 100);
        assert_eq!(growth.exp_required(2), 200);
        assert_eq!(growth.exp_required(3), 300);

        let offset = LinearGrowth::new(50, 10);
        assert_eq!(offset.exp_required(1), 60);
        assert_eq!(offset.exp_required(4), 90);
    }

    #[test]
    fn test_exponential_growth() {
        let growth = ExponentialGrowth::new(100, 2.0);
        assert_eq!(growth.exp_required(1), 100);
        assert_eq!(growth.exp_required(2), 200);
        assert_eq!(growth.exp_required(3), 400);

        let huge = ExponentialGrowth::new(u64::MAX / 2, 10.0);
        assert_eq!(huge.exp_required(50), u64::MAX);
    }

    #[test]
    fn test_step_growth() {
        let growth = StepGrowth::new(100, 5, 50); // +50 every 5 levels
        assert_eq!(growth.exp_required(1), 100);
        assert_eq!(growth.exp_required(4), 100);
        assert_eq!(growth.exp_required(5), 150);
        assert_eq!(growth.exp_required(10), 200);

        let degenerate = StepGrowth::new(100, 0, 50);
        assert_eq!(degenerate.exp_required(10), 100);
    }

    #[test]
    fn test_table_growth_reuses_last_entry() {
        let growth = TableGrowth {
            thresholds: vec![10, 20, 40],
        };
        assert_eq!(growth.exp_required(1), 10);
        assert_eq!(growth.exp_required(3), 40);
        assert_eq!(growth.exp_required(9), 40);

        let empty = TableGrowth { thresholds: vec![] };
        assert_eq!(empty.exp_required(1), 0);
    }

    #[test]
    fn test_first_zero_requirement() {
        assert_eq!(Growth::default().first_zero_requirement(50), None);

        let growth = Growth::Table(TableGrowth {
            thresholds: vec![10, 0, 30],
        });
        assert_eq!(growth.first_zero_requirement(5), Some(2));
        // level 2 is the cap, so its requirement is never consulted
        assert_eq!(growth.first_zero_requirement(2), None);
    }

    #[test]
    fn test_serialization() {
        let growth = Growth::Linear(LinearGrowth::new(0, 100));
        let serialized = ron::to_string(&growth).unwrap();
        assert_eq!(serialized, "Linear((base:0,increment:100))");

        let deserialized: Growth = ron::from_str(&serialized).unwrap();
        assert_eq!(deserialized, growth);
    }
}
