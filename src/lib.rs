//! mintsniff - token-launch ingestion pipeline for Solana
//!
//! This crate watches a launch program's transactions, resolves each one to
//! the minted token through a rate-limited worker, persists the enriched
//! records, and computes a deterministic risk score per mint.

pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod types;

// Re-export main types for convenience
pub use pipeline::{LaunchLog, LaunchQueue, MintResolver, PipelineConfig, PipelineController};
pub use scoring::{score, ChainData, RiskAssessment, RiskLevel};
pub use types::{MintInfo, PendingEvent, ResolvedLaunch};
