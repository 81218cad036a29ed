//! Configuration validation.
//!
//! Validates all config fields before a backtest runs. Thresholds are written
//! in percent in config files and must lie strictly between 0 and 100.

use crate::domain::error::SimError;
use crate::ports::config_port::ConfigPort;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), SimError> {
    read_percent(config, "backtest", "take_profit", 1.5)?;
    read_percent(config, "backtest", "stop_loss", 1.0)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), SimError> {
    match config.get_string("strategy", "title") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(SimError::ConfigMissing {
            section: "strategy".to_string(),
            key: "title".to_string(),
        }),
    }
}

pub fn validate_sweep_config(config: &dyn ConfigPort) -> Result<(), SimError> {
    for key in ["take_profit", "stop_loss"] {
        let values = read_percent_list(config, "sweep", key)?;
        if values.is_empty() {
            return Err(SimError::ConfigMissing {
                section: "sweep".to_string(),
                key: key.to_string(),
            });
        }
    }
    Ok(())
}

/// Read a percent value and return it as a fraction. Missing keys take the
/// default; present keys must parse.
pub fn read_percent(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default_pct: f64,
) -> Result<f64, SimError> {
    let pct = match config.get_string(section, key) {
        Some(raw) => parse_percent(section, key, &raw)?,
        None => default_pct,
    };
    Ok(pct / 100.0)
}

/// Read a comma-separated percent list as fractions. A missing key yields an
/// empty list.
pub fn read_percent_list(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Vec<f64>, SimError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse_percent(section, key, s).map(|pct| pct / 100.0))
        .collect()
}

fn parse_percent(section: &str, key: &str, raw: &str) -> Result<f64, SimError> {
    let invalid = |reason: String| SimError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    };
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid(format!("'{}' is not a number", raw.trim())))?;
    if !value.is_finite() || value <= 0.0 || value >= 100.0 {
        return Err(invalid(format!(
            "{} must be between 0 and 100 percent",
            key
        )));
    }
    Ok(value)
}
