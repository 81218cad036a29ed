//! Parallel parameter sweep over exit thresholds.
//!
//! Each run is independent and pure, so the grid is fanned out with rayon
//! and collected back in grid order.

use crate::domain::backtest::{BacktestConfig, BacktestResult, run_backtest};
use crate::domain::metrics::{PerformanceStats, trade_statistics};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::strategy::StrategySpec;
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    pub config: BacktestConfig,
    pub result: BacktestResult,
    pub stats: PerformanceStats,
}

/// Cartesian product of take-profit and stop-loss fractions, TP-major.
pub fn sweep_grid(take_profits: &[f64], stop_losses: &[f64]) -> Vec<BacktestConfig> {
    take_profits
        .iter()
        .flat_map(|&tp| {
            stop_losses.iter().map(move |&sl| BacktestConfig {
                take_profit_pct: tp,
                stop_loss_pct: sl,
            })
        })
        .collect()
}

pub fn run_sweep(
    series: &PriceSeries,
    strategy: &StrategySpec,
    grid: &[BacktestConfig],
) -> Vec<SweepResult> {
    tracing::info!("Testing {} parameter combinations", grid.len());

    grid.par_iter()
        .map(|config| {
            let result = run_backtest(series, strategy, config);
            let stats = trade_statistics(&result);
            SweepResult {
                config: *config,
                result,
                stats,
            }
        })
        .collect()
}

/// Sort best-first by total pnl, then by Sharpe.
pub fn rank_by_pnl(results: &mut [SweepResult]) {
    results.sort_by(|a, b| {
        b.result
            .total_pnl
            .total_cmp(&a.result.total_pnl)
            .then(b.stats.sharpe_ratio.total_cmp(&a.stats.sharpe_ratio))
    });
}
