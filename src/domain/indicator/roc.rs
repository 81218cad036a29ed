//! Rate of change of closes, as a fraction.
//!
//! ROC(n)[i] = (C[i] - C[j]) / C[j] with j = max(i - n, 0)
//! No warmup: early bars measure against the first close.
//! If C[j] == 0: ROC = 0

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};

pub fn calculate_roc(closes: &[f64], period: usize) -> IndicatorSeries {
    let values = (0..closes.len())
        .map(|i| {
            let base = closes[i.saturating_sub(period)];
            if base == 0.0 {
                IndicatorPoint::valid(0.0)
            } else {
                IndicatorPoint::valid((closes[i] - base) / base)
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Roc(period),
        values,
    }
}
