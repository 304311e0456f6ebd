//! Mint resolution - maps a transaction signature to the launched mint.
//!
//! The two external lookups (transaction meta and parsed mint state) sit
//! behind object-safe traits so the worker can be exercised with in-process
//! fakes. The production implementations call Solana RPC.

use crate::types::{MintInfo, WRAPPED_SOL_MINT};
use anyhow::{Context, Result};
use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcTransactionConfig;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_transaction_status::option_serializer::OptionSerializer;
use solana_transaction_status::UiTransactionEncoding;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Transaction metadata lookup: mints listed in post-token balances.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    async fn transaction_mints(&self, signature: &str) -> Result<Vec<String>>;
}

/// Parsed mint account lookup. `Ok(None)` means the account does not exist
/// or is not an SPL mint.
#[async_trait]
pub trait MintInfoSource: Send + Sync {
    async fn mint_info(&self, mint: &str) -> Result<Option<MintInfo>>;
}

/// Wrapper over the transaction lookup that degrades every failure to
/// `None`. Resolution misses are steady-state behavior for fresh launches,
/// not errors.
pub struct MintResolver {
    source: Arc<dyn TransactionSource>,
}

impl MintResolver {
    pub fn new(source: Arc<dyn TransactionSource>) -> Self {
        Self { source }
    }

    /// Resolve a signature to the launched mint. Performs exactly one
    /// lookup call per invocation - no internal retry.
    #[instrument(skip(self))]
    pub async fn resolve(&self, signature: &str) -> Option<String> {
        let mints = match self.source.transaction_mints(signature).await {
            Ok(mints) => mints,
            Err(e) => {
                warn!("Mint lookup failed for {}: {:#}", signature, e);
                return None;
            }
        };
        if mints.is_empty() {
            debug!("No token balances in transaction {}", signature);
            return None;
        }
        // Launch transactions usually carry a wrapped-SOL balance next to
        // the new token; prefer the non-SOL side.
        mints
            .iter()
            .find(|m| m.as_str() != WRAPPED_SOL_MINT)
            .or_else(|| mints.first())
            .cloned()
    }
}

/// RPC-backed transaction lookup.
pub struct RpcTransactionSource {
    rpc: Arc<RpcClient>,
}

impl RpcTransactionSource {
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl TransactionSource for RpcTransactionSource {
    async fn transaction_mints(&self, signature: &str) -> Result<Vec<String>> {
        let signature =
            Signature::from_str(signature).context("Invalid transaction signature")?;
        let config = RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::Json),
            commitment: Some(CommitmentConfig::confirmed()),
            max_supported_transaction_version: Some(0),
        };
        let tx = self
            .rpc
            .get_transaction_with_config(&signature, config)
            .await
            .context("Failed to fetch transaction")?;
        let meta = tx
            .transaction
            .meta
            .context("Transaction has no metadata")?;
        let mints = match meta.post_token_balances {
            OptionSerializer::Some(balances) => {
                balances.into_iter().map(|b| b.mint).collect()
            }
            _ => Vec::new(),
        };
        Ok(mints)
    }
}

/// RPC-backed mint account lookup, decoding the raw SPL mint layout.
pub struct RpcMintInfoSource {
    rpc: Arc<RpcClient>,
}

impl RpcMintInfoSource {
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl MintInfoSource for RpcMintInfoSource {
    #[instrument(skip(self))]
    async fn mint_info(&self, mint: &str) -> Result<Option<MintInfo>> {
        let pubkey = Pubkey::from_str(mint).context("Invalid mint address")?;
        let account = match self.rpc.get_account(&pubkey).await {
            Ok(account) => account,
            Err(e) => {
                // get_account reports a missing account as an error; either
                // way there is no mint state to score against.
                debug!("Mint account fetch failed for {}: {}", mint, e);
                return Ok(None);
            }
        };
        Ok(decode_spl_mint(&account.data))
    }
}

/// SPL Token mint account layout (82 bytes):
/// mint authority COption at 0..36, supply at 36..44, decimals at 44,
/// is_initialized at 45, freeze authority COption at 46..82.
pub fn decode_spl_mint(data: &[u8]) -> Option<MintInfo> {
    if data.len() < 82 {
        return None;
    }
    let mint_authority_set = u32::from_le_bytes(data[0..4].try_into().ok()?) == 1;
    let supply = u64::from_le_bytes(data[36..44].try_into().ok()?);
    let decimals = data[44];
    let is_initialized = data[45] != 0;
    let freeze_authority_set = u32::from_le_bytes(data[46..50].try_into().ok()?) == 1;
    Some(MintInfo {
        decimals,
        supply: supply.to_string(),
        mint_authority_set,
        freeze_authority_set,
        is_initialized,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    struct StaticSource(Vec<String>);

    #[async_trait]
    impl TransactionSource for StaticSource {
        async fn transaction_mints(&self, _signature: &str) -> Result<Vec<String>> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl TransactionSource for FailingSource {
        async fn transaction_mints(&self, _signature: &str) -> Result<Vec<String>> {
            bail!("connection reset")
        }
    }

    #[tokio::test]
    async fn test_resolve_prefers_non_sol_mint() {
        let resolver = MintResolver::new(Arc::new(StaticSource(vec![
            WRAPPED_SOL_MINT.to_string(),
            "TokenMintAddress".to_string(),
        ])));
        assert_eq!(
            resolver.resolve("sig").await.as_deref(),
            Some("TokenMintAddress")
        );
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_first_mint() {
        let resolver =
            MintResolver::new(Arc::new(StaticSource(vec![WRAPPED_SOL_MINT.to_string()])));
        assert_eq!(resolver.resolve("sig").await.as_deref(), Some(WRAPPED_SOL_MINT));
    }

    #[tokio::test]
    async fn test_resolve_empty_balances_is_none() {
        let resolver = MintResolver::new(Arc::new(StaticSource(vec![])));
        assert!(resolver.resolve("sig").await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_swallows_lookup_errors() {
        let resolver = MintResolver::new(Arc::new(FailingSource));
        assert!(resolver.resolve("sig").await.is_none());
    }

    fn mint_account_bytes(
        mint_authority: bool,
        supply: u64,
        decimals: u8,
        initialized: bool,
        freeze_authority: bool,
    ) -> Vec<u8> {
        let mut data = vec![0u8; 82];
        data[0..4].copy_from_slice(&u32::to_le_bytes(mint_authority as u32));
        data[36..44].copy_from_slice(&supply.to_le_bytes());
        data[44] = decimals;
        data[45] = initialized as u8;
        data[46..50].copy_from_slice(&u32::to_le_bytes(freeze_authority as u32));
        data
    }

    #[test]
    fn test_decode_spl_mint() {
        let data = mint_account_bytes(true, 1_000_000_000, 6, true, false);
        let info = decode_spl_mint(&data).unwrap();
        assert!(info.mint_authority_set);
        assert!(!info.freeze_authority_set);
        assert!(info.is_initialized);
        assert_eq!(info.decimals, 6);
        assert_eq!(info.supply, "1000000000");
    }

    #[test]
    fn test_decode_spl_mint_rejects_short_data() {
        assert!(decode_spl_mint(&[0u8; 40]).is_none());
    }
}
