//! Append-only record of closed trades for one pass over a series.

use crate::domain::position::SimulatedTrade;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeLedger {
    trades: Vec<SimulatedTrade>,
}

impl TradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a trade. Trades arrive in entry order and never overlap.
    pub fn record(&mut self, trade: SimulatedTrade) {
        debug_assert!(trade.exit_index > trade.entry_index);
        debug_assert!(
            self.trades
                .last()
                .is_none_or(|prev| prev.exit_index <= trade.entry_index)
        );
        self.trades.push(trade);
    }

    pub fn trades(&self) -> &[SimulatedTrade] {
        &self.trades
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn wins(&self) -> usize {
        self.trades.iter().filter(|t| t.is_win()).count()
    }

    pub fn total_pnl(&self) -> f64 {
        self.trades.iter().map(|t| t.pnl).sum()
    }

    pub fn into_trades(self) -> Vec<SimulatedTrade> {
        self.trades
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entry::EntrySignal;
    use crate::domain::position::{ExitReason, Outcome};

    fn trade(entry: usize, exit: usize, exit_price: f64) -> SimulatedTrade {
        let outcome = if exit_price >= 100.0 {
            Outcome::Win
        } else {
            Outcome::Loss
        };
        SimulatedTrade::new(
            entry,
            exit,
            100.0,
            exit_price,
            outcome,
            EntrySignal::Fallback,
            ExitReason::EndOfData,
        )
    }

    #[test]
    fn new_ledger_is_empty() {
        let ledger = TradeLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.wins(), 0);
        assert_eq!(ledger.total_pnl(), 0.0);
    }

    #[test]
    fn record_keeps_order() {
        let mut ledger = TradeLedger::new();
        ledger.record(trade(1, 3, 102.0));
        ledger.record(trade(3, 5, 99.0));
        ledger.record(trade(6, 9, 101.0));
        let entries: Vec<usize> = ledger.trades().iter().map(|t| t.entry_index).collect();
        assert_eq!(entries, vec![1, 3, 6]);
        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.wins(), 2);
    }

    #[test]
    fn total_pnl_sums_in_order() {
        let mut ledger = TradeLedger::new();
        ledger.record(trade(1, 2, 102.0));
        ledger.record(trade(2, 4, 99.0));
        let expected = ledger.trades()[0].pnl + ledger.trades()[1].pnl;
        assert_eq!(ledger.total_pnl(), expected);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn overlapping_trade_panics_in_debug() {
        let mut ledger = TradeLedger::new();
        ledger.record(trade(1, 5, 102.0));
        ledger.record(trade(4, 6, 102.0));
    }
}
