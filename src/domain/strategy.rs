//! Strategy description consumed by a backtest run.

use serde::{Deserialize, Serialize};

/// Free-text strategy as authored by the user.
///
/// Only `rules` drive the simulation. `checklist` is carried along for
/// reporting and never consulted by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategySpec {
    pub title: String,
    pub rules: Vec<String>,
    pub checklist: Vec<String>,
}

impl StrategySpec {
    pub fn new(title: impl Into<String>, rules: Vec<String>) -> Self {
        Self {
            title: title.into(),
            rules,
            checklist: Vec::new(),
        }
    }

    pub fn with_checklist(mut self, checklist: Vec<String>) -> Self {
        self.checklist = checklist;
        self
    }
}
