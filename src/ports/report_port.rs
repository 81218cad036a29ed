//! Report generation port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::SimError;
use crate::domain::strategy::StrategySpec;

/// Port for persisting backtest output.
pub trait ReportPort {
    fn write(
        &self,
        result: &BacktestResult,
        strategy: &StrategySpec,
        output_path: &str,
    ) -> Result<(), SimError>;
}
