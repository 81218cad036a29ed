//! OHLCV bars and the validated price series the simulator replays.

use crate::domain::error::SimError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Check the single-bar invariants. `index` is only used for the error.
    pub fn validate(&self, index: usize) -> Result<(), SimError> {
        let invalid = |reason: &str| SimError::InvalidBar {
            index,
            reason: reason.to_string(),
        };

        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite()) || !self.volume.is_finite() {
            return Err(invalid("non-finite field"));
        }
        if prices.iter().any(|&p| p <= 0.0) {
            return Err(invalid("prices must be positive"));
        }
        if self.volume < 0.0 {
            return Err(invalid("volume must be non-negative"));
        }
        if self.high < self.open.max(self.close) {
            return Err(invalid("high below open/close"));
        }
        if self.low > self.open.min(self.close) {
            return Err(invalid("low above open/close"));
        }
        Ok(())
    }
}

/// A time-ordered sequence of bars whose invariants were checked on construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<Bar>) -> Result<Self, SimError> {
        for (i, bar) in bars.iter().enumerate() {
            bar.validate(i)?;
            if i > 0 && bar.time < bars[i - 1].time {
                return Err(SimError::OutOfOrder {
                    index: i,
                    previous: bars[i - 1].time,
                    time: bar.time,
                });
            }
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}

impl TryFrom<Vec<Bar>> for PriceSeries {
    type Error = SimError;

    fn try_from(bars: Vec<Bar>) -> Result<Self, Self::Error> {
        Self::new(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar(time: i64) -> Bar {
        Bar {
            time,
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: 50_000.0,
        }
    }

    #[test]
    fn valid_bar_passes() {
        assert!(sample_bar(0).validate(0).is_ok());
    }

    #[test]
    fn flat_bar_passes() {
        let bar = Bar {
            time: 0,
            open: 10.0,
            high: 10.0,
            low: 10.0,
            close: 10.0,
            volume: 0.0,
        };
        assert!(bar.validate(0).is_ok());
    }

    #[test]
    fn high_below_close_rejected() {
        let bar = Bar {
            high: 104.0,
            ..sample_bar(0)
        };
        assert!(matches!(
            bar.validate(7),
            Err(SimError::InvalidBar { index: 7, .. })
        ));
    }

    #[test]
    fn low_above_open_rejected() {
        let bar = Bar {
            low: 101.0,
            ..sample_bar(0)
        };
        assert!(bar.validate(0).is_err());
    }

    #[test]
    fn non_positive_price_rejected() {
        let bar = Bar {
            low: 0.0,
            ..sample_bar(0)
        };
        assert!(bar.validate(0).is_err());
    }

    #[test]
    fn negative_volume_rejected() {
        let bar = Bar {
            volume: -1.0,
            ..sample_bar(0)
        };
        assert!(bar.validate(0).is_err());
    }

    #[test]
    fn nan_rejected() {
        let bar = Bar {
            close: f64::NAN,
            ..sample_bar(0)
        };
        assert!(bar.validate(0).is_err());
    }

    #[test]
    fn series_accepts_equal_timestamps() {
        let series = PriceSeries::new(vec![sample_bar(1), sample_bar(1), sample_bar(2)]).unwrap();
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn series_rejects_decreasing_time() {
        let err = PriceSeries::new(vec![sample_bar(5), sample_bar(3)]).unwrap_err();
        assert!(matches!(
            err,
            SimError::OutOfOrder {
                index: 1,
                previous: 5,
                time: 3
            }
        ));
    }

    #[test]
    fn empty_series_is_valid() {
        let series = PriceSeries::new(vec![]).unwrap();
        assert!(series.is_empty());
        assert!(series.closes().is_empty());
    }

    #[test]
    fn column_accessors() {
        let series = PriceSeries::try_from(vec![sample_bar(0), sample_bar(1)]).unwrap();
        assert_eq!(series.closes(), vec![105.0, 105.0]);
        assert_eq!(series.volumes(), vec![50_000.0, 50_000.0]);
    }
}
