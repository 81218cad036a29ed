//! Backtest engine: one deterministic forward pass over a price series.
//!
//! While flat, each bar is offered to the entry evaluator; while long, to the
//! exit rules. Entries resume on the bar after an exit. A position still open
//! after the last bar is closed at that bar's close.

use crate::domain::entry::{EntryContext, evaluate_entry, required_indicators};
use crate::domain::indicator::compute_indicators;
use crate::domain::ledger::TradeLedger;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::position::{Position, SimulatedTrade};
use crate::domain::signal::SignalCategories;
use crate::domain::strategy::StrategySpec;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const DEFAULT_TAKE_PROFIT_PCT: f64 = 0.015;
pub const DEFAULT_STOP_LOSS_PCT: f64 = 0.01;

/// Exit thresholds as fractions of the entry price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub take_profit_pct: f64,
    pub stop_loss_pct: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            take_profit_pct: DEFAULT_TAKE_PROFIT_PCT,
            stop_loss_pct: DEFAULT_STOP_LOSS_PCT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub trades: Vec<SimulatedTrade>,
    /// Percentage of winning trades, 0..=100.
    pub win_rate: f64,
    pub total_pnl: f64,
    pub total_trades: usize,
}

impl BacktestResult {
    pub fn from_ledger(ledger: TradeLedger) -> Self {
        let total_trades = ledger.len();
        let win_rate = if total_trades > 0 {
            100.0 * ledger.wins() as f64 / total_trades as f64
        } else {
            0.0
        };
        let total_pnl = ledger.total_pnl();
        Self {
            trades: ledger.into_trades(),
            win_rate,
            total_pnl,
            total_trades,
        }
    }
}

pub fn run_backtest(
    series: &PriceSeries,
    strategy: &StrategySpec,
    config: &BacktestConfig,
) -> BacktestResult {
    let categories = SignalCategories::interpret(&strategy.rules);
    if categories.is_inert() {
        warn!(strategy = %strategy.title, "strategy has no rules; no entries will trigger");
    }

    let bars = series.bars();
    let indicators = compute_indicators(series, &required_indicators(&categories));
    let ctx = EntryContext {
        bars,
        categories: &categories,
        indicators: &indicators,
    };

    let mut ledger = TradeLedger::new();
    let mut position: Option<Position> = None;
    let last = bars.len().saturating_sub(1);

    for (i, bar) in bars.iter().enumerate() {
        match position.take() {
            Some(open) => match open.evaluate_exit(bar, config) {
                Some(decision) => {
                    debug!(
                        bar = i,
                        price = decision.price,
                        reason = %decision.reason,
                        outcome = %decision.outcome,
                        "exit"
                    );
                    ledger.record(open.close(i, decision));
                }
                None => position = Some(open),
            },
            // An entry on the final bar could never be closed after it.
            None if i < last => {
                if let Some(signal) = evaluate_entry(&ctx, i) {
                    debug!(bar = i, price = bar.close, %signal, "entry");
                    position = Some(Position::open(i, bar.close, signal));
                }
            }
            None => {}
        }
    }

    if let (Some(open), Some(final_bar)) = (position, bars.last()) {
        debug!(bar = last, price = final_bar.close, "force close at end of series");
        ledger.record(open.force_close(last, final_bar.close));
    }

    let result = BacktestResult::from_ledger(ledger);
    info!(
        strategy = %strategy.title,
        bars = bars.len(),
        trades = result.total_trades,
        win_rate = result.win_rate,
        total_pnl = result.total_pnl,
        "backtest complete"
    );
    result
}
