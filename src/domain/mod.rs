//! Core simulation types and logic. No I/O happens below this module.

pub mod ohlcv;
pub mod strategy;
pub mod signal;
pub mod highlight;
pub mod indicator;
pub mod entry;
pub mod position;
pub mod ledger;
pub mod backtest;
pub mod metrics;
pub mod sweep;
pub mod config_validation;
pub mod error;
