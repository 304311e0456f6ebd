//! Types for the risk scorer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Risk bucket derived from the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    /// Scoring was never attempted (no input). Not reachable from
    /// `from_score`; see `RiskAssessment::unscored`.
    Unknown,
}

impl RiskLevel {
    /// Bucket mapping: `< 40` low, `> 70` high, medium otherwise.
    pub fn from_score(score: u8) -> Self {
        if score < 40 {
            RiskLevel::Low
        } else if score > 70 {
            RiskLevel::High
        } else {
            RiskLevel::Medium
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Deterministic risk verdict for one mint. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub mint: String,
    /// Risk score in 0..=100; higher means riskier
    pub score: u8,
    pub level: RiskLevel,
    /// De-duplicated rule tags
    pub tags: BTreeSet<String>,
    /// Human-readable explanations, in rule evaluation order
    pub reasons: Vec<String>,
}

impl RiskAssessment {
    /// Placeholder verdict for a launch whose mint was never resolved, so
    /// no scoring was attempted at all. The only producer of
    /// [`RiskLevel::Unknown`].
    pub fn unscored(mint: impl Into<String>) -> Self {
        Self {
            mint: mint.into(),
            score: 0,
            level: RiskLevel::Unknown,
            tags: BTreeSet::new(),
            reasons: vec!["Mint never resolved; scoring not attempted".to_string()],
        }
    }
}
