//! Context-overhead recommendations.
//!
//! Rules are evaluated in a fixed order and every rule that applies fires:
//!
//! 1. no embedded index → High / Index Presence
//! 2. no retrieval instruction → High / Retrieval Instruction
//! 3. oversized CLAUDE.md → Medium / Token Budget, or lean-but-ok → Low / Token Budget
//! 4. no CLAUDE.md at all → High / Configuration Missing
//!
//! The output keeps rule order; it is not sorted by priority.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::debug;

use ctxindex_core::{ScanTotals, format_number};

use crate::config_md::ConfigAnalysis;

/// How urgent a recommendation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Priority {
    /// CLAUDE.md, its index or its retrieval guidance is missing.
    High,
    /// CLAUDE.md is over the token budget.
    Medium,
    /// CLAUDE.md is lean enough to absorb more docs.
    Low,
}

/// What a recommendation is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Category {
    /// CLAUDE.md has no embedded docs index.
    #[strum(to_string = "Index Presence")]
    IndexPresence,
    /// CLAUDE.md does not ask for retrieval-led reasoning.
    #[strum(to_string = "Retrieval Instruction")]
    RetrievalInstruction,
    /// CLAUDE.md size against the token thresholds.
    #[strum(to_string = "Token Budget")]
    TokenBudget,
    /// No CLAUDE.md was found.
    #[strum(to_string = "Configuration Missing")]
    ConfigurationMissing,
}

/// One piece of advice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// How urgent it is.
    pub priority: Priority,
    /// Which rule produced it.
    pub category: Category,
    /// What is wrong.
    pub issue: String,
    /// What to do about it.
    pub action: String,
    /// Why it matters.
    pub rationale: String,
}

impl Recommendation {
    fn new(
        priority: Priority,
        category: Category,
        issue: impl Into<String>,
        action: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            priority,
            category,
            issue: issue.into(),
            action: action.into(),
            rationale: rationale.into(),
        }
    }
}

/// Thresholds for the token budget rule.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct RecommendConfig {
    /// Above this many tokens CLAUDE.md is oversized.
    #[builder(default = "5000")]
    pub oversized_tokens: u64,

    /// Above this many tokens CLAUDE.md could be leaner.
    #[builder(default = "2500")]
    pub lean_tokens: u64,
}

impl RecommendConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        let oversized = self.oversized_tokens.unwrap_or(5000);
        let lean = self.lean_tokens.unwrap_or(2500);
        if lean >= oversized {
            return Err(format!(
                "lean_tokens ({lean}) must be below oversized_tokens ({oversized})"
            ));
        }
        Ok(())
    }
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            oversized_tokens: 5000,
            lean_tokens: 2500,
        }
    }
}

impl RecommendConfig {
    /// Create a new config builder.
    pub fn builder() -> RecommendConfigBuilder {
        RecommendConfigBuilder::default()
    }
}

/// Applies the recommendation rules.
pub struct Recommender {
    config: RecommendConfig,
}

impl Recommender {
    /// Create a new recommender with default thresholds.
    pub fn new() -> Self {
        Self {
            config: RecommendConfig::default(),
        }
    }

    /// Create a new recommender with custom thresholds.
    pub fn with_config(config: RecommendConfig) -> Self {
        Self { config }
    }

    /// Produce recommendations for a scanned tree and its configuration file.
    ///
    /// `totals` is not consulted by the current rules.
    pub fn recommend(&self, totals: &ScanTotals, analysis: &ConfigAnalysis) -> Vec<Recommendation> {
        debug!(
            files = totals.files,
            tokens = totals.tokens,
            config_tokens = analysis.tokens,
            "evaluating recommendation rules"
        );

        let mut recommendations = Vec::new();

        if !analysis.has_index {
            recommendations.push(Recommendation::new(
                Priority::High,
                Category::IndexPresence,
                "CLAUDE.md does not contain a compressed documentation index",
                "Add the generated compressed index to the top of CLAUDE.md",
                "Passive context with an index achieves 100% task pass rate vs 53% without",
            ));
        }

        if !analysis.has_retrieval_instruction {
            recommendations.push(Recommendation::new(
                Priority::High,
                Category::RetrievalInstruction,
                "Missing \"prefer retrieval-led reasoning\" instruction",
                "Add: \"IMPORTANT: Prefer retrieval-led reasoning over pre-training-led reasoning\"",
                "This instruction shifts the agent from outdated training data to current docs",
            ));
        }

        if analysis.tokens > self.config.oversized_tokens {
            recommendations.push(Recommendation::new(
                Priority::Medium,
                Category::TokenBudget,
                format!(
                    "CLAUDE.md is ~{} tokens (recommended: <{})",
                    format_number(analysis.tokens),
                    format_number(self.config.oversized_tokens)
                ),
                "Move detailed content to reference files, keep only index and key instructions",
                "Smaller CLAUDE.md leaves more context for actual work",
            ));
        } else if analysis.tokens > self.config.lean_tokens {
            recommendations.push(Recommendation::new(
                Priority::Low,
                Category::TokenBudget,
                format!(
                    "CLAUDE.md is ~{} tokens (good, but could be leaner)",
                    format_number(analysis.tokens)
                ),
                "Review for any content that could move to reference files",
                "Every token saved in CLAUDE.md is available for conversation",
            ));
        }

        if !analysis.exists {
            recommendations.push(Recommendation::new(
                Priority::High,
                Category::ConfigurationMissing,
                "No CLAUDE.md file found",
                "Create CLAUDE.md with compressed index and retrieval instruction",
                "CLAUDE.md provides persistent context that dramatically improves agent performance",
            ));
        }

        recommendations
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new()
    }
}
