//! Performance metrics over a trade ledger.
//!
//! Everything here is a pure function of the trade list: safe to call
//! repeatedly, in any order, on any result.

use crate::domain::backtest::BacktestResult;
use crate::domain::position::SimulatedTrade;
use serde::{Deserialize, Serialize};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub wins: usize,
    pub losses: usize,
    /// Mean pnl of winning trades, percent.
    pub avg_win: f64,
    /// Mean pnl of losing trades, percent (negative).
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub profit_factor: f64,
    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,
    /// Mean holding period in bars.
    pub avg_trade_duration: f64,
    /// Percent.
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
}

/// Largest peak-to-trough drop of cumulative pnl, in percent.
///
/// Each step's drawdown is `(peak - cumulative) / (1 + peak)`, with the
/// running peak starting at zero.
pub fn max_drawdown(trades: &[SimulatedTrade]) -> f64 {
    let mut cumulative = 0.0_f64;
    let mut peak = 0.0_f64;
    let mut max_dd = 0.0_f64;

    for trade in trades {
        cumulative += trade.pnl;
        if cumulative > peak {
            peak = cumulative;
        }
        let dd = (peak - cumulative) / (1.0 + peak);
        if dd > max_dd {
            max_dd = dd;
        }
    }

    max_dd * 100.0
}

/// Per-trade Sharpe ratio with population standard deviation.
///
/// Both mean and deviation carry the annualisation factor, so it cancels;
/// the scaling is kept to reproduce reference figures to the last bit.
pub fn sharpe_ratio(trades: &[SimulatedTrade]) -> f64 {
    if trades.len() < 2 {
        return 0.0;
    }

    let n = trades.len() as f64;
    let mean = trades.iter().map(|t| t.pnl).sum::<f64>() / n;
    let variance = trades.iter().map(|t| (t.pnl - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    if stddev == 0.0 {
        return 0.0;
    }

    let annualize = TRADING_DAYS_PER_YEAR.sqrt();
    (mean * annualize) / (stddev * annualize)
}

pub fn trade_statistics(result: &BacktestResult) -> PerformanceStats {
    let trades = &result.trades;

    let mut wins = 0usize;
    let mut losses = 0usize;
    let mut total_win_pnl = 0.0_f64;
    let mut total_loss_pnl = 0.0_f64;
    let mut largest_win = 0.0_f64;
    let mut largest_loss = 0.0_f64;
    let mut total_duration = 0usize;

    let mut win_streak = 0usize;
    let mut loss_streak = 0usize;
    let mut max_consecutive_wins = 0usize;
    let mut max_consecutive_losses = 0usize;

    for trade in trades {
        total_duration += trade.duration();
        if trade.is_win() {
            wins += 1;
            total_win_pnl += trade.pnl;
            largest_win = largest_win.max(trade.pnl);
            win_streak += 1;
            loss_streak = 0;
            max_consecutive_wins = max_consecutive_wins.max(win_streak);
        } else {
            losses += 1;
            total_loss_pnl += trade.pnl;
            largest_loss = largest_loss.min(trade.pnl);
            loss_streak += 1;
            win_streak = 0;
            max_consecutive_losses = max_consecutive_losses.max(loss_streak);
        }
    }

    let avg_win = if wins > 0 {
        total_win_pnl / wins as f64 * 100.0
    } else {
        0.0
    };

    let avg_loss = if losses > 0 {
        total_loss_pnl / losses as f64 * 100.0
    } else {
        0.0
    };

    let loss_magnitude = total_loss_pnl.abs();
    let profit_factor = if loss_magnitude > 0.0 {
        total_win_pnl / loss_magnitude
    } else if wins > 0 {
        f64::INFINITY
    } else {
        0.0
    };

    let avg_trade_duration = if trades.is_empty() {
        0.0
    } else {
        total_duration as f64 / trades.len() as f64
    };

    PerformanceStats {
        wins,
        losses,
        avg_win,
        avg_loss,
        largest_win: largest_win * 100.0,
        largest_loss: largest_loss * 100.0,
        profit_factor,
        max_consecutive_wins,
        max_consecutive_losses,
        avg_trade_duration,
        max_drawdown: max_drawdown(trades),
        sharpe_ratio: sharpe_ratio(trades),
    }
}
