//! Simple moving average of closes.
//!
//! SMA(n)[i] = sum(C[i-n+1..=i]) / n
//! Warmup: first (n-1) bars invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};

pub fn calculate_sma(closes: &[f64], period: usize) -> IndicatorSeries {
    let values = (0..closes.len())
        .map(|i| {
            if period == 0 || i + 1 < period {
                return IndicatorPoint::warmup();
            }
            let window = &closes[i + 1 - period..=i];
            IndicatorPoint::valid(window.iter().sum::<f64>() / period as f64)
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}
