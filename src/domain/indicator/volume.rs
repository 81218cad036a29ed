//! Trailing mean volume, excluding the current bar.
//!
//! VOLUME_MEAN(n)[i] = sum(V[i-n..i]) / n
//! Warmup: first n bars invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};

pub fn calculate_volume_mean(volumes: &[f64], period: usize) -> IndicatorSeries {
    let values = (0..volumes.len())
        .map(|i| {
            if period == 0 || i < period {
                return IndicatorPoint::warmup();
            }
            let window = &volumes[i - period..i];
            IndicatorPoint::valid(window.iter().sum::<f64>() / period as f64)
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::VolumeMean(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn volume_mean_needs_full_prior_window() {
        let series = calculate_volume_mean(&[10.0, 20.0, 30.0, 40.0], 3);
        assert_eq!(series.get(2), None);
        assert_relative_eq!(series.get(3).unwrap(), 20.0);
    }

    #[test]
    fn volume_mean_excludes_current_bar() {
        let series = calculate_volume_mean(&[10.0, 10.0, 1_000.0], 2);
        assert_relative_eq!(series.get(2).unwrap(), 10.0);
    }
}
