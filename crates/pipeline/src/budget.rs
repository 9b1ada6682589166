//! Chunk size budgets: parsing size modes, resolving them against a model,
//! and checking explicit budgets against the model's optimum.

use proofread_core::{AppError, AppResult};
use proofread_llm::ModelInfo;
use std::fmt;
use std::str::FromStr;

/// How the user asked for chunks to be sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizingMode {
    Words(u64),
    Chars(u64),
    Auto,
}

impl SizingMode {
    /// Parse `auto`, `<N>w` or `<N>c` (case-insensitive).
    pub fn parse(input: &str) -> AppResult<Self> {
        let lowered = input.to_lowercase();
        if lowered == "auto" {
            return Ok(Self::Auto);
        }

        let format_error = || {
            AppError::Config(format!(
                "Invalid chunk size '{}'. Use 'auto', '<N>w' for words or '<N>c' for characters (e.g. 5000w, 30000c)",
                input
            ))
        };

        let (digits, unit) = match lowered.char_indices().last() {
            Some((at, unit @ ('w' | 'c'))) => (&lowered[..at], unit),
            _ => return Err(format_error()),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format_error());
        }
        let count: u64 = digits.parse().map_err(|_| format_error())?;

        Ok(if unit == 'w' {
            Self::Words(count)
        } else {
            Self::Chars(count)
        })
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl FromStr for SizingMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SizingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Words(n) => write!(f, "{}w", n),
            Self::Chars(n) => write!(f, "{}c", n),
            Self::Auto => write!(f, "auto"),
        }
    }
}

/// Sizing factors. The defaults are tuned for English prose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetPolicy {
    /// Average characters per word, spaces included
    pub chars_per_word: f64,

    /// Share of the context window a chunk may occupy
    pub context_fraction: f64,

    /// Average characters per token
    pub chars_per_token: f64,

    /// Explicit budgets at or below this are rejected
    pub min_chars: usize,

    /// Explicit budgets above `optimal * max_ratio` are rejected
    pub max_ratio: f64,

    /// Budget used when no sizing mode is given (about 5000 words)
    pub default_chars: usize,
}

impl Default for BudgetPolicy {
    fn default() -> Self {
        Self {
            chars_per_word: 5.5,
            context_fraction: 0.3,
            chars_per_token: 4.0,
            min_chars: 1000,
            max_ratio: 1.5,
            default_chars: 27_500,
        }
    }
}

/// Outcome of checking an explicit budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetCheck {
    Accepted,
    Warning(String),
    Rejected(String),
}

impl BudgetCheck {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Accepted => None,
            Self::Warning(msg) | Self::Rejected(msg) => Some(msg),
        }
    }
}

/// Where a resolved budget came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetSource {
    Default,
    Auto,
    Explicit(SizingMode),
}

/// A resolved, usable chunk budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeBudget {
    pub chars: usize,
    pub source: BudgetSource,
    pub optimal: usize,
    pub check: BudgetCheck,
}

/// A named sizing preset for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub name: &'static str,
    pub value: String,
    pub description: String,
}

impl BudgetPolicy {
    /// Best chunk size for a model: a fraction of its context window,
    /// capped by its empirical ceiling.
    pub fn optimal_chars(&self, model: &ModelInfo) -> usize {
        let usable_tokens = (model.context_window as f64 * self.context_fraction).floor();
        let calculated = (usable_tokens * self.chars_per_token) as usize;
        calculated.min(model.max_chunk_chars)
    }

    /// Convert a sizing mode to characters. Zero is a configuration error.
    pub fn resolve(&self, mode: SizingMode, model: &ModelInfo) -> AppResult<usize> {
        let chars = match mode {
            SizingMode::Words(n) => (n as f64 * self.chars_per_word).round() as usize,
            SizingMode::Chars(n) => n as usize,
            SizingMode::Auto => self.optimal_chars(model),
        };

        if chars == 0 {
            return Err(AppError::Config(format!(
                "Chunk size '{}' resolves to zero characters",
                mode
            )));
        }
        Ok(chars)
    }

    /// Check an explicit budget against the model's optimum.
    pub fn validate(&self, budget: usize, optimal: usize, model_name: &str) -> BudgetCheck {
        if budget <= self.min_chars {
            return BudgetCheck::Rejected(format!(
                "Chunk size too small ({} chars). Minimum: more than {} characters",
                budget, self.min_chars
            ));
        }

        if budget as f64 > optimal as f64 * self.max_ratio {
            return BudgetCheck::Rejected(format!(
                "Chunk size too large ({} chars). Maximum for {}: {}c",
                budget,
                model_name,
                (optimal as f64 * self.max_ratio) as usize
            ));
        }

        if budget > optimal {
            return BudgetCheck::Warning(format!(
                "Large chunk size ({} chars). Optimal for {}: {}c",
                budget, model_name, optimal
            ));
        }

        BudgetCheck::Accepted
    }

    /// Sizing presets for a model.
    pub fn recommendations(&self, model: &ModelInfo) -> Vec<Recommendation> {
        let optimal = self.optimal_chars(model);
        let optimal_words = (optimal as f64 / self.chars_per_word) as usize;

        vec![
            Recommendation {
                name: "auto",
                value: "auto".to_string(),
                description: format!("{}c, optimized for {}", optimal, model.name),
            },
            Recommendation {
                name: "small",
                value: "15000c".to_string(),
                description: "short chunks, most thorough".to_string(),
            },
            Recommendation {
                name: "medium",
                value: format!("{}c", optimal.min(55_000)),
                description: "balanced".to_string(),
            },
            Recommendation {
                name: "large",
                value: format!("{}c", optimal),
                description: "fewest calls".to_string(),
            },
            Recommendation {
                name: "words-small",
                value: "3000w".to_string(),
                description: format!("about {} characters", (3000.0 * self.chars_per_word) as usize),
            },
            Recommendation {
                name: "words-medium",
                value: "10000w".to_string(),
                description: format!("about {} characters", (10_000.0 * self.chars_per_word) as usize),
            },
            Recommendation {
                name: "words-large",
                value: format!("{}w", optimal_words),
                description: "model maximum in words".to_string(),
            },
        ]
    }

    /// Resolve an optional size mode string into a budget.
    ///
    /// No mode yields the default budget and `auto` the model optimum, both
    /// unchecked. Explicit budgets are validated: a rejection is an error,
    /// a warning is logged and carried in the result.
    pub fn resolve_budget(&self, mode: Option<&str>, model: &ModelInfo) -> AppResult<SizeBudget> {
        let optimal = self.optimal_chars(model);

        let Some(raw) = mode.filter(|m| !m.trim().is_empty()) else {
            tracing::debug!(chars = self.default_chars, "Using default chunk size");
            return Ok(SizeBudget {
                chars: self.default_chars,
                source: BudgetSource::Default,
                optimal,
                check: BudgetCheck::Accepted,
            });
        };

        let mode = SizingMode::parse(raw)?;
        let chars = self.resolve(mode, model)?;

        if mode.is_auto() {
            tracing::info!(chars, model = %model.name, "Auto chunk size");
            return Ok(SizeBudget {
                chars,
                source: BudgetSource::Auto,
                optimal,
                check: BudgetCheck::Accepted,
            });
        }

        let check = self.validate(chars, optimal, &model.name);
        match &check {
            BudgetCheck::Rejected(msg) => return Err(AppError::BudgetRejected(msg.clone())),
            BudgetCheck::Warning(msg) => tracing::warn!(chars, optimal, "{}", msg),
            BudgetCheck::Accepted => tracing::debug!(chars, optimal, "Chunk size accepted"),
        }

        Ok(SizeBudget {
            chars,
            source: BudgetSource::Explicit(mode),
            optimal,
            check,
        })
    }
}
