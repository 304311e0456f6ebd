//! Core types and data structures for the mintsniff launch pipeline.

use serde::{Deserialize, Serialize};

/// Canonical wrapped-SOL mint address.
pub const WRAPPED_SOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// A token-launch transaction observed by the feed, waiting for mint resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEvent {
    /// Unix timestamp in milliseconds when the feed observed the event
    pub timestamp_ms: u64,
    /// Slot the transaction landed in
    pub slot: u64,
    /// Base58 transaction signature
    pub signature: String,
}

impl PendingEvent {
    /// Stamp a freshly observed event with the current wall-clock time.
    pub fn now(signature: impl Into<String>, slot: u64) -> Self {
        Self {
            timestamp_ms: chrono::Utc::now().timestamp_millis() as u64,
            slot,
            signature: signature.into(),
        }
    }
}

/// A launch event after mint resolution. Append-only: never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLaunch {
    pub timestamp_ms: u64,
    pub slot: u64,
    pub signature: String,
    /// Resolved mint address, or `None` when the lookup failed or found nothing
    pub mint: Option<String>,
    /// Explorer URL for the transaction
    pub url: String,
}

impl ResolvedLaunch {
    pub fn new(event: PendingEvent, mint: Option<String>) -> Self {
        let url = format!("https://solscan.io/tx/{}", event.signature);
        Self {
            timestamp_ms: event.timestamp_ms,
            slot: event.slot,
            signature: event.signature,
            mint,
            url,
        }
    }
}

/// Parsed SPL mint account state, as returned by the chain metadata lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintInfo {
    pub decimals: u8,
    /// Raw token supply as a decimal string (u64 range)
    pub supply: String,
    pub mint_authority_set: bool,
    pub freeze_authority_set: bool,
    pub is_initialized: bool,
}
