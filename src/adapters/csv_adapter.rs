//! CSV file data adapter.
//!
//! Expects `time,open,high,low,close,volume` with a header row. `time` is
//! either integer epoch seconds or a `YYYY-MM-DD` date (midnight UTC).

use crate::domain::error::SimError;
use crate::domain::ohlcv::{Bar, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Adapter rooted at the directory of `path`, plus the symbol naming it.
    pub fn for_file(path: &Path) -> Result<(Self, String), SimError> {
        let symbol = match (path.extension(), path.file_stem()) {
            (Some(ext), Some(stem)) if ext == "csv" => stem.to_string_lossy().into_owned(),
            _ => {
                return Err(SimError::Data {
                    reason: format!("{} is not a .csv file", path.display()),
                });
            }
        };
        let base_path = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok((Self::new(base_path), symbol))
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    /// Load a single CSV file, sorted by time and validated.
    pub fn load_file(path: &Path) -> Result<PriceSeries, SimError> {
        let content = fs::read_to_string(path).map_err(|e| SimError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        parse_series(&content)
    }
}

pub fn parse_series(content: &str) -> Result<PriceSeries, SimError> {
    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let mut bars = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let field = |idx: usize, name: &str| {
            record.get(idx).map(str::trim).ok_or_else(|| SimError::Data {
                reason: format!("row {}: missing {} column", row + 1, name),
            })
        };
        let number = |idx: usize, name: &str| -> Result<f64, SimError> {
            let raw = field(idx, name)?;
            raw.parse().map_err(|_| SimError::Data {
                reason: format!("row {}: invalid {} value '{}'", row + 1, name, raw),
            })
        };

        bars.push(Bar {
            time: parse_time(field(0, "time")?).ok_or_else(|| SimError::Data {
                reason: format!("row {}: invalid time", row + 1),
            })?,
            open: number(1, "open")?,
            high: number(2, "high")?,
            low: number(3, "low")?,
            close: number(4, "close")?,
            volume: number(5, "volume")?,
        });
    }

    bars.sort_by_key(|b| b.time);
    PriceSeries::new(bars)
}

fn parse_time(raw: &str) -> Option<i64> {
    if let Ok(epoch) = raw.parse::<i64>() {
        return Some(epoch);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
}

impl DataPort for CsvAdapter {
    fn fetch_series(&self, symbol: &str) -> Result<PriceSeries, SimError> {
        Self::load_file(&self.csv_path(symbol))
    }

    fn list_symbols(&self) -> Result<Vec<String>, SimError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| SimError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "csv") {
                if let Some(stem) = path.file_stem() {
                    symbols.push(stem.to_string_lossy().into_owned());
                }
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
