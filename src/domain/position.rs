//! Open position lifecycle and the closed-trade record.
//!
//! Exit checks run once per bar in this order:
//! 1. close at or beyond take-profit
//! 2. close at or beyond stop-loss
//! 3. low touched stop-loss (fills at the stop price)
//! 4. high touched take-profit (fills at the target price)
//!
//! A bar that touches both intrabar levels resolves to the stop.

use crate::domain::backtest::BacktestConfig;
use crate::domain::entry::EntrySignal;
use crate::domain::ohlcv::Bar;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExitReason {
    TakeProfit,
    StopLoss,
    IntrabarStopLoss,
    IntrabarTakeProfit,
    EndOfData,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win => f.write_str("win"),
            Outcome::Loss => f.write_str("loss"),
        }
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExitReason::TakeProfit => "take-profit",
            ExitReason::StopLoss => "stop-loss",
            ExitReason::IntrabarStopLoss => "intrabar-stop-loss",
            ExitReason::IntrabarTakeProfit => "intrabar-take-profit",
            ExitReason::EndOfData => "end-of-data",
        };
        f.write_str(name)
    }
}

/// A long position. At most one is open at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub entry_index: usize,
    pub entry_price: f64,
    pub signal: EntrySignal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitDecision {
    pub price: f64,
    pub outcome: Outcome,
    pub reason: ExitReason,
}

impl Position {
    pub fn open(entry_index: usize, entry_price: f64, signal: EntrySignal) -> Self {
        Self {
            entry_index,
            entry_price,
            signal,
        }
    }

    /// Fractional return of `price` against the entry.
    pub fn return_at(&self, price: f64) -> f64 {
        (price - self.entry_price) / self.entry_price
    }

    pub fn evaluate_exit(&self, bar: &Bar, config: &BacktestConfig) -> Option<ExitDecision> {
        // Compared as prices so a bar that trades exactly at a level always hits it.
        let target = self.entry_price * (1.0 + config.take_profit_pct);
        let stop = self.entry_price * (1.0 - config.stop_loss_pct);

        if bar.close >= target {
            return Some(ExitDecision {
                price: bar.close,
                outcome: Outcome::Win,
                reason: ExitReason::TakeProfit,
            });
        }
        if bar.close <= stop {
            return Some(ExitDecision {
                price: bar.close,
                outcome: Outcome::Loss,
                reason: ExitReason::StopLoss,
            });
        }
        if bar.low <= stop {
            return Some(ExitDecision {
                price: stop,
                outcome: Outcome::Loss,
                reason: ExitReason::IntrabarStopLoss,
            });
        }
        if bar.high >= target {
            return Some(ExitDecision {
                price: target,
                outcome: Outcome::Win,
                reason: ExitReason::IntrabarTakeProfit,
            });
        }
        None
    }

    /// Close at `index` for the given decision.
    pub fn close(self, index: usize, decision: ExitDecision) -> SimulatedTrade {
        SimulatedTrade::new(
            self.entry_index,
            index,
            self.entry_price,
            decision.price,
            decision.outcome,
            self.signal,
            decision.reason,
        )
    }

    /// Close at the last bar of the series. Classified by sign, not thresholds:
    /// a flat result counts as a win.
    pub fn force_close(self, index: usize, close: f64) -> SimulatedTrade {
        let outcome = if self.return_at(close) >= 0.0 {
            Outcome::Win
        } else {
            Outcome::Loss
        };
        self.close(
            index,
            ExitDecision {
                price: close,
                outcome,
                reason: ExitReason::EndOfData,
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedTrade {
    pub entry_index: usize,
    pub exit_index: usize,
    pub entry_price: f64,
    pub exit_price: f64,
    /// Fractional return: (exit - entry) / entry.
    pub pnl: f64,
    pub outcome: Outcome,
    pub entry_signal: EntrySignal,
    pub exit_reason: ExitReason,
}

impl SimulatedTrade {
    pub fn new(
        entry_index: usize,
        exit_index: usize,
        entry_price: f64,
        exit_price: f64,
        outcome: Outcome,
        entry_signal: EntrySignal,
        exit_reason: ExitReason,
    ) -> Self {
        Self {
            entry_index,
            exit_index,
            entry_price,
            exit_price,
            pnl: (exit_price - entry_price) / entry_price,
            outcome,
            entry_signal,
            exit_reason,
        }
    }

    pub fn is_win(&self) -> bool {
        self.outcome == Outcome::Win
    }

    /// Holding period in bars.
    pub fn duration(&self) -> usize {
        self.exit_index - self.entry_index
    }
}
