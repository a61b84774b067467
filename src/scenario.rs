//! Scenario runner for what-if comparisons
//!
//! Holds one strategy configuration and evaluates it against several budgets
//! or several configurations for the same debts. The engine is pure, so
//! scenarios run in parallel.

use rayon::prelude::*;

use crate::calc::{AvalancheEngine, Strategy, StrategyConfig};
use crate::debt::DebtRecord;

/// Batch runner over a fixed base configuration
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(StrategyConfig::default());
///
/// // Compare monthly budgets
/// for (funds, strategy) in runner.run_funds_sweep(&debts, &[500.0, 750.0, 1000.0]) {
///     println!("{funds}: {}", strategy.total_months_to_debt_free);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    base_config: StrategyConfig,
}

impl ScenarioRunner {
    pub fn new(config: StrategyConfig) -> Self {
        Self { base_config: config }
    }

    /// Run a single strategy with the base config
    pub fn run(&self, debts: &[DebtRecord], available_funds: f64) -> Strategy {
        AvalancheEngine::new(self.base_config).calculate(debts, available_funds)
    }

    /// Run the same debts under several budgets; output order matches `funds`
    pub fn run_funds_sweep(&self, debts: &[DebtRecord], funds: &[f64]) -> Vec<(f64, Strategy)> {
        let engine = AvalancheEngine::new(self.base_config);
        funds
            .par_iter()
            .map(|&amount| (amount, engine.calculate(debts, amount)))
            .collect()
    }

    /// Run several configurations against one budget
    pub fn run_configs(
        &self,
        debts: &[DebtRecord],
        available_funds: f64,
        configs: &[StrategyConfig],
    ) -> Vec<Strategy> {
        configs
            .par_iter()
            .map(|config| AvalancheEngine::new(*config).calculate(debts, available_funds))
            .collect()
    }
}
