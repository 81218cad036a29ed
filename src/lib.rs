//! replaylab: deterministic strategy backtesting over OHLCV bars.
//!
//! Hexagonal architecture: simulation logic in [`domain`], port traits in
//! [`ports`], file-backed implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
