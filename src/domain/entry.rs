//! Entry signal evaluator.
//!
//! Triggers are tried in a fixed order and the first one satisfied wins:
//! breakout, momentum proxy, moving-average crossover, then the generic
//! fallback. Bar 0 is never a decision point.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::Bar;
use crate::domain::signal::SignalCategories;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub const VOLUME_WINDOW: usize = 20;
pub const VOLUME_SPIKE_MULTIPLIER: f64 = 1.5;
pub const ROC_PERIOD: usize = 14;
pub const ROC_THRESHOLD: f64 = 0.05;
pub const FAST_SMA_PERIOD: usize = 20;
pub const SLOW_SMA_PERIOD: usize = 50;
pub const FALLBACK_VOLUME_MULTIPLIER: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntrySignal {
    Breakout,
    MomentumOverbought,
    MomentumOversold,
    Crossover,
    Fallback,
}

impl fmt::Display for EntrySignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntrySignal::Breakout => "breakout",
            EntrySignal::MomentumOverbought => "momentum-overbought",
            EntrySignal::MomentumOversold => "momentum-oversold",
            EntrySignal::Crossover => "ma-crossover",
            EntrySignal::Fallback => "fallback",
        };
        f.write_str(name)
    }
}

/// Indicators the enabled categories will read.
pub fn required_indicators(categories: &SignalCategories) -> Vec<IndicatorType> {
    let mut types = Vec::new();
    if categories.breakout && categories.volume_confirmation {
        types.push(IndicatorType::VolumeMean(VOLUME_WINDOW));
    }
    if categories.momentum {
        types.push(IndicatorType::Roc(ROC_PERIOD));
    }
    if categories.crossover {
        types.push(IndicatorType::Sma(FAST_SMA_PERIOD));
        types.push(IndicatorType::Sma(SLOW_SMA_PERIOD));
    }
    types
}

/// Read-only view of everything the evaluator needs for one run.
pub struct EntryContext<'a> {
    pub bars: &'a [Bar],
    pub categories: &'a SignalCategories,
    pub indicators: &'a HashMap<IndicatorType, IndicatorSeries>,
}

impl EntryContext<'_> {
    fn indicator(&self, indicator_type: IndicatorType, index: usize) -> Option<f64> {
        self.indicators
            .get(&indicator_type)
            .and_then(|s| s.get(index))
    }

    fn closes_above_prior_high(&self, index: usize) -> bool {
        self.bars[index].close > self.bars[index - 1].high
    }

    fn breakout(&self, index: usize) -> bool {
        if !self.categories.breakout || !self.closes_above_prior_high(index) {
            return false;
        }
        if !self.categories.volume_confirmation {
            return true;
        }
        // Without a full window the spike check is not applied.
        match self.indicator(IndicatorType::VolumeMean(VOLUME_WINDOW), index) {
            Some(avg) => self.bars[index].volume > VOLUME_SPIKE_MULTIPLIER * avg,
            None => true,
        }
    }

    fn momentum(&self, index: usize) -> Option<EntrySignal> {
        if !self.categories.momentum {
            return None;
        }
        let roc = self.indicator(IndicatorType::Roc(ROC_PERIOD), index)?;
        if self.categories.momentum_overbought && roc > ROC_THRESHOLD {
            Some(EntrySignal::MomentumOverbought)
        } else if self.categories.momentum_oversold && roc < -ROC_THRESHOLD {
            Some(EntrySignal::MomentumOversold)
        } else {
            None
        }
    }

    fn crossover(&self, index: usize) -> bool {
        if !self.categories.crossover || index < SLOW_SMA_PERIOD {
            return false;
        }
        let fast = IndicatorType::Sma(FAST_SMA_PERIOD);
        let slow = IndicatorType::Sma(SLOW_SMA_PERIOD);
        match (
            self.indicator(fast, index - 1),
            self.indicator(slow, index - 1),
            self.indicator(fast, index),
            self.indicator(slow, index),
        ) {
            (Some(fast_prev), Some(slow_prev), Some(fast_now), Some(slow_now)) => {
                fast_prev <= slow_prev && fast_now > slow_now
            }
            _ => false,
        }
    }

    fn fallback(&self, index: usize) -> bool {
        self.closes_above_prior_high(index)
            && self.bars[index].volume > self.bars[index - 1].volume * FALLBACK_VOLUME_MULTIPLIER
    }
}

/// Decide whether to open a position at `index`.
pub fn evaluate_entry(ctx: &EntryContext<'_>, index: usize) -> Option<EntrySignal> {
    if index == 0 || index >= ctx.bars.len() || ctx.categories.is_inert() {
        return None;
    }
    if ctx.breakout(index) {
        return Some(EntrySignal::Breakout);
    }
    if let Some(signal) = ctx.momentum(index) {
        return Some(signal);
    }
    if ctx.crossover(index) {
        return Some(EntrySignal::Crossover);
    }
    if ctx.fallback(index) {
        return Some(EntrySignal::Fallback);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::compute_indicators;
    use crate::domain::ohlcv::PriceSeries;

    fn bar(close: f64, high: f64, volume: f64) -> Bar {
        Bar {
            time: 0,
            open: close,
            high: high.max(close),
            low: close * 0.99,
            close,
            volume,
        }
    }

    fn evaluate(bars: &[Bar], rules: &[&str], index: usize) -> Option<EntrySignal> {
        let categories = SignalCategories::interpret(rules);
        let series = PriceSeries::new(bars.to_vec()).unwrap();
        let indicators = compute_indicators(&series, &required_indicators(&categories));
        let ctx = EntryContext {
            bars,
            categories: &categories,
            indicators: &indicators,
        };
        evaluate_entry(&ctx, index)
    }

    #[test]
    fn bar_zero_is_never_a_decision_point() {
        let bars = vec![bar(100.0, 100.0, 1.0), bar(110.0, 110.0, 10.0)];
        assert_eq!(evaluate(&bars, &["breakout"], 0), None);
    }

    #[test]
    fn empty_rules_never_trigger() {
        let bars = vec![bar(100.0, 100.0, 1.0), bar(110.0, 110.0, 10.0)];
        assert_eq!(evaluate(&bars, &[], 1), None);
    }

    #[test]
    fn breakout_ungated() {
        let bars = vec![bar(100.0, 101.0, 1000.0), bar(102.0, 102.0, 500.0)];
        assert_eq!(evaluate(&bars, &["breakout"], 1), Some(EntrySignal::Breakout));
    }

    #[test]
    fn breakout_requires_strict_close_over_prior_high() {
        let bars = vec![bar(100.0, 102.0, 1000.0), bar(102.0, 102.0, 5000.0)];
        assert_eq!(evaluate(&bars, &["breakout"], 1), None);
    }

    #[test]
    fn volume_gate_not_applied_before_window() {
        let bars = vec![bar(100.0, 101.0, 1000.0), bar(102.0, 102.0, 10.0)];
        assert_eq!(
            evaluate(&bars, &["breakout on volume"], 1),
            Some(EntrySignal::Breakout)
        );
    }

    #[test]
    fn volume_gate_blocks_weak_breakout() {
        let mut bars: Vec<Bar> = (0..20).map(|_| bar(100.0, 100.0, 1000.0)).collect();
        bars.push(bar(101.0, 101.0, 1400.0));
        // breakout gated out, fallback still sees close > prior high and 1.4x volume
        assert_eq!(
            evaluate(&bars, &["breakout on volume"], 20),
            Some(EntrySignal::Fallback)
        );
    }

    #[test]
    fn volume_gate_passes_on_spike() {
        let mut bars: Vec<Bar> = (0..20).map(|_| bar(100.0, 100.0, 1000.0)).collect();
        bars.push(bar(101.0, 101.0, 1600.0));
        assert_eq!(
            evaluate(&bars, &["breakout on volume"], 20),
            Some(EntrySignal::Breakout)
        );
    }

    #[test]
    fn momentum_overbought_uses_clamped_lookback() {
        // high never exceeded so breakout and fallback stay quiet
        let bars = vec![
            bar(100.0, 200.0, 1.0),
            bar(103.0, 200.0, 1.0),
            bar(106.0, 200.0, 1.0),
        ];
        assert_eq!(evaluate(&bars, &["rsi > 60"], 1), None);
        assert_eq!(
            evaluate(&bars, &["rsi > 60"], 2),
            Some(EntrySignal::MomentumOverbought)
        );
    }

    #[test]
    fn momentum_oversold() {
        let bars = vec![bar(100.0, 100.0, 1.0), bar(94.0, 94.0, 1.0)];
        assert_eq!(
            evaluate(&bars, &["rsi < 30"], 1),
            Some(EntrySignal::MomentumOversold)
        );
        assert_eq!(evaluate(&bars, &["rsi > 60"], 1), None);
    }

    #[test]
    fn momentum_threshold_is_strict() {
        let bars = vec![bar(100.0, 200.0, 1.0), bar(105.0, 200.0, 1.0)];
        assert_eq!(evaluate(&bars, &["rsi > 60"], 1), None);
    }

    #[test]
    fn breakout_outranks_momentum() {
        let bars = vec![bar(100.0, 100.0, 1.0), bar(110.0, 110.0, 1.0)];
        assert_eq!(
            evaluate(&bars, &["breakout", "rsi > 60"], 1),
            Some(EntrySignal::Breakout)
        );
    }

    fn crossover_bars() -> Vec<Bar> {
        // 50 falling bars then a sharp jump pushes SMA20 through SMA50 at 50
        let mut bars: Vec<Bar> = (0..50)
            .map(|i| {
                let c = 200.0 - i as f64;
                bar(c, 300.0, 1.0)
            })
            .collect();
        bars.push(bar(1000.0, 1000.0, 1.0));
        bars
    }

    #[test]
    fn crossover_fires_on_cross() {
        let bars = crossover_bars();
        assert_eq!(
            evaluate(&bars, &["ema cross"], 50),
            Some(EntrySignal::Crossover)
        );
    }

    #[test]
    fn crossover_needs_previous_slow_window() {
        let bars = crossover_bars();
        assert_eq!(evaluate(&bars, &["ema cross"], 49), None);
    }

    #[test]
    fn fallback_for_unrecognised_rules() {
        let bars = vec![bar(100.0, 100.0, 1000.0), bar(101.0, 101.0, 1300.0)];
        assert_eq!(
            evaluate(&bars, &["buy the dip"], 1),
            Some(EntrySignal::Fallback)
        );
    }

    #[test]
    fn fallback_needs_volume_expansion() {
        let bars = vec![bar(100.0, 100.0, 1000.0), bar(101.0, 101.0, 1100.0)];
        assert_eq!(evaluate(&bars, &["buy the dip"], 1), None);
    }

    #[test]
    fn required_indicators_follow_categories() {
        let cats = SignalCategories::interpret(&["breakout"]);
        assert!(required_indicators(&cats).is_empty());

        let cats = SignalCategories::interpret(&["breakout on volume", "rsi > 60", "ema"]);
        let types = required_indicators(&cats);
        assert!(types.contains(&IndicatorType::VolumeMean(VOLUME_WINDOW)));
        assert!(types.contains(&IndicatorType::Roc(ROC_PERIOD)));
        assert!(types.contains(&IndicatorType::Sma(FAST_SMA_PERIOD)));
        assert!(types.contains(&IndicatorType::Sma(SLOW_SMA_PERIOD)));
    }
}
