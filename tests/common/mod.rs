#![allow(dead_code)]

use replaylab::domain::error::SimError;
pub use replaylab::domain::ohlcv::{Bar, PriceSeries};
use replaylab::domain::strategy::StrategySpec;
use replaylab::ports::data_port::DataPort;
use std::collections::HashMap;

pub const DAY: i64 = 86_400;
pub const START: i64 = 1_704_067_200;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(&self, symbol: &str) -> Result<PriceSeries, SimError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(SimError::Data {
                reason: reason.clone(),
            });
        }
        PriceSeries::new(self.data.get(symbol).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, SimError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn make_bar(index: usize, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Bar {
    Bar {
        time: START + index as i64 * DAY,
        open,
        high,
        low,
        close,
        volume,
    }
}

pub fn flat_bar(index: usize, price: f64) -> Bar {
    make_bar(index, price, price, price, price, 1_000.0)
}

/// Close compounds by `drift` per bar; high is the close and low the open.
pub fn drifting_bars(n: usize, start: f64, drift: f64) -> Vec<Bar> {
    let mut bars = Vec::with_capacity(n);
    let mut prev_close = start;
    for i in 0..n {
        let close = start * (1.0 + drift).powi(i as i32);
        let open = if i == 0 { close } else { prev_close };
        bars.push(make_bar(
            i,
            open,
            open.max(close),
            open.min(close),
            close,
            1_000.0,
        ));
        prev_close = close;
    }
    bars
}

pub fn series(bars: Vec<Bar>) -> PriceSeries {
    PriceSeries::new(bars).unwrap()
}

pub fn strategy(rules: &[&str]) -> StrategySpec {
    StrategySpec::new(
        "Test Strategy",
        rules.iter().map(|r| r.to_string()).collect(),
    )
}

pub const BAR_CSV_HEADER: &str = "time,open,high,low,close,volume\n";

pub fn bars_to_csv(bars: &[Bar]) -> String {
    let mut out = BAR_CSV_HEADER.to_string();
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.time, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    out
}
