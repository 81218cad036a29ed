//! Data access port trait.

use crate::domain::error::SimError;
use crate::domain::ohlcv::PriceSeries;

pub trait DataPort {
    /// Load the full, validated bar series for `symbol`.
    fn fetch_series(&self, symbol: &str) -> Result<PriceSeries, SimError>;

    fn list_symbols(&self) -> Result<Vec<String>, SimError>;
}
