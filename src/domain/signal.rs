//! Rule interpreter.
//!
//! Maps free-text rules onto a fixed set of signal categories by
//! case-insensitive substring search. This is a lexical matcher and nothing
//! more: "cross" also matches "across", and negations are not understood.

use std::fmt;

/// What a vocabulary entry contributes when it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Breakout,
    Volume,
    Momentum,
    Overbought,
    Oversold,
    Crossover,
}

/// The full vocabulary, lowercase. Shared with [`crate::domain::highlight`].
pub const VOCABULARY: &[(&str, Keyword)] = &[
    ("breakout", Keyword::Breakout),
    ("close above", Keyword::Breakout),
    ("volume", Keyword::Volume),
    ("rsi", Keyword::Momentum),
    ("> 60", Keyword::Overbought),
    ("< 30", Keyword::Oversold),
    ("ema", Keyword::Crossover),
    ("cross", Keyword::Crossover),
];

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Keyword::Breakout => "breakout",
            Keyword::Volume => "volume",
            Keyword::Momentum => "momentum",
            Keyword::Overbought => "overbought",
            Keyword::Oversold => "oversold",
            Keyword::Crossover => "crossover",
        };
        f.write_str(name)
    }
}

/// Signal categories recognised in a rule set. Computed once per run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalCategories {
    /// At least one rule with non-blank text. Gates the fallback trigger.
    /// Rules that are all blank count as no rules.
    pub has_rules: bool,
    pub breakout: bool,
    pub volume_confirmation: bool,
    pub momentum: bool,
    pub momentum_overbought: bool,
    pub momentum_oversold: bool,
    pub crossover: bool,
}

impl SignalCategories {
    pub fn interpret<S: AsRef<str>>(rules: &[S]) -> Self {
        let text = rules
            .iter()
            .map(|r| r.as_ref())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        let matched = |kw: Keyword| {
            VOCABULARY
                .iter()
                .any(|(word, k)| *k == kw && text.contains(word))
        };

        let momentum = matched(Keyword::Momentum);
        Self {
            has_rules: rules.iter().any(|r| !r.as_ref().trim().is_empty()),
            breakout: matched(Keyword::Breakout),
            volume_confirmation: matched(Keyword::Volume),
            momentum,
            momentum_overbought: momentum && matched(Keyword::Overbought),
            momentum_oversold: momentum && matched(Keyword::Oversold),
            crossover: matched(Keyword::Crossover),
        }
    }

    /// True when no entry trigger can ever fire.
    pub fn is_inert(&self) -> bool {
        !self.has_rules
    }

    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.breakout {
            labels.push("breakout");
        }
        if self.volume_confirmation {
            labels.push("volume-confirmation");
        }
        if self.momentum_overbought {
            labels.push("momentum-overbought");
        }
        if self.momentum_oversold {
            labels.push("momentum-oversold");
        }
        if self.momentum && !self.momentum_overbought && !self.momentum_oversold {
            labels.push("momentum (no direction)");
        }
        if self.crossover {
            labels.push("ma-crossover");
        }
        labels
    }
}
