//! Risk scoring module - deterministic heuristics over mint state.

pub mod scorer;
pub mod types;

// Re-export main types
pub use scorer::{score, ChainData};
pub use types::{RiskAssessment, RiskLevel};
