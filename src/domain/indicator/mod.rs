//! Rolling-window indicators used by the entry evaluator.
//!
//! Every series is computed once per run, one value per bar. Each value is a
//! full rescan of its window so results match a per-bar recomputation exactly.

pub mod roc;
pub mod sma;
pub mod volume;

use crate::domain::ohlcv::PriceSeries;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorPoint {
    pub valid: bool,
    pub value: f64,
}

impl IndicatorPoint {
    pub fn valid(value: f64) -> Self {
        Self { valid: true, value }
    }

    pub fn warmup() -> Self {
        Self {
            valid: false,
            value: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    /// Simple moving average of closes ending at the bar.
    Sma(usize),
    /// Fractional rate of change of closes; lookback clamps to bar 0.
    Roc(usize),
    /// Mean volume of the bars strictly before the current one.
    VolumeMean(usize),
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Value at `index`, or `None` during warmup or past the end.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values
            .get(index)
            .filter(|p| p.valid)
            .map(|p| p.value)
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Roc(period) => write!(f, "ROC({})", period),
            IndicatorType::VolumeMean(period) => write!(f, "VOLUME_MEAN({})", period),
        }
    }
}

pub fn calculate(series: &PriceSeries, indicator_type: IndicatorType) -> IndicatorSeries {
    match indicator_type {
        IndicatorType::Sma(period) => sma::calculate_sma(&series.closes(), period),
        IndicatorType::Roc(period) => roc::calculate_roc(&series.closes(), period),
        IndicatorType::VolumeMean(period) => {
            volume::calculate_volume_mean(&series.volumes(), period)
        }
    }
}

pub fn compute_indicators(
    series: &PriceSeries,
    types: &[IndicatorType],
) -> HashMap<IndicatorType, IndicatorSeries> {
    types
        .iter()
        .map(|&t| (t, calculate(series, t)))
        .collect()
}
