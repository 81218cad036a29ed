//! CSV trade-log adapter implementing ReportPort.
//!
//! Writes one row per simulated trade, in ledger order.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::SimError;
use crate::domain::position::SimulatedTrade;
use crate::domain::strategy::StrategySpec;
use crate::ports::report_port::ReportPort;
use serde::Serialize;
use std::io;
use tracing::info;

#[derive(Debug, Serialize)]
struct TradeRow<'a> {
    strategy: &'a str,
    entry_index: usize,
    exit_index: usize,
    entry_price: f64,
    exit_price: f64,
    pnl_pct: f64,
    outcome: String,
    entry_signal: String,
    exit_reason: String,
}

impl<'a> TradeRow<'a> {
    fn new(strategy: &'a str, trade: &SimulatedTrade) -> Self {
        Self {
            strategy,
            entry_index: trade.entry_index,
            exit_index: trade.exit_index,
            entry_price: trade.entry_price,
            exit_price: trade.exit_price,
            pnl_pct: trade.pnl * 100.0,
            outcome: trade.outcome.to_string(),
            entry_signal: trade.entry_signal.to_string(),
            exit_reason: trade.exit_reason.to_string(),
        }
    }
}

pub struct CsvTradeLogAdapter;

impl CsvTradeLogAdapter {
    /// Write the trade log to any writer.
    pub fn write_to<W: io::Write>(
        writer: W,
        result: &BacktestResult,
        strategy: &StrategySpec,
    ) -> Result<(), SimError> {
        let mut wtr = csv::Writer::from_writer(writer);
        for trade in &result.trades {
            wtr.serialize(TradeRow::new(&strategy.title, trade))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl ReportPort for CsvTradeLogAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        strategy: &StrategySpec,
        output_path: &str,
    ) -> Result<(), SimError> {
        let file = std::fs::File::create(output_path)?;
        Self::write_to(file, result, strategy)?;
        info!(path = output_path, trades = result.total_trades, "trade log written");
        Ok(())
    }
}
