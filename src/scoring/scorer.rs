//! Deterministic risk scorer.
//!
//! An ordered list of independent additive rules over a baseline of 50.
//! Each rule contributes a delta, a tag and a reason. Rules stay
//! independent so new heuristics can be inserted without reordering the
//! existing ones. No I/O, no clocks: identical inputs always produce an
//! identical assessment.

use crate::scoring::types::{RiskAssessment, RiskLevel};
use crate::types::{MintInfo, WRAPPED_SOL_MINT};
use std::collections::BTreeSet;

/// Score every rule starts from.
pub const BASELINE_SCORE: i32 = 50;
/// Fixed verdict for the canonical wrapped-SOL mint.
pub const NATIVE_ASSET_SCORE: u8 = 10;
/// Vanity suffix pump.fun grinds into its mint addresses.
pub const PLATFORM_SUFFIX: &str = "pump";
pub const PLATFORM_SUFFIX_BONUS: i32 = -5;
pub const UNKNOWN_MINT_PENALTY: i32 = 25;
pub const UNINITIALIZED_PENALTY: i32 = 20;
pub const RENOUNCED_BONUS: i32 = -20;
pub const MINT_AUTHORITY_PENALTY: i32 = 20;
pub const FREEZE_AUTHORITY_PENALTY: i32 = 15;
/// Decimals value pump.fun-style launches use.
pub const STANDARD_DECIMALS: u8 = 6;
pub const UNUSUAL_DECIMALS_PENALTY: i32 = 10;
pub const ZERO_SUPPLY_PENALTY: i32 = 15;

/// Chain metadata availability for one scoring call.
///
/// `Unavailable` means no metadata source was consulted at all (identifier
/// heuristics only); `NotFound` means the source was consulted but had
/// nothing for this mint.
#[derive(Debug, Clone, Copy)]
pub enum ChainData<'a> {
    Unavailable,
    NotFound,
    Present(&'a MintInfo),
}

impl<'a> From<Option<&'a MintInfo>> for ChainData<'a> {
    fn from(info: Option<&'a MintInfo>) -> Self {
        match info {
            Some(info) => ChainData::Present(info),
            None => ChainData::NotFound,
        }
    }
}

/// Accumulates rule contributions in evaluation order.
struct RuleAccumulator {
    score: i32,
    tags: BTreeSet<String>,
    reasons: Vec<String>,
}

impl RuleAccumulator {
    fn new() -> Self {
        Self {
            score: BASELINE_SCORE,
            tags: BTreeSet::new(),
            reasons: Vec::new(),
        }
    }

    fn apply(&mut self, delta: i32, tag: &str, reason: impl Into<String>) {
        self.score += delta;
        self.tags.insert(tag.to_string());
        self.reasons.push(reason.into());
    }

    /// Tag-only rule with no score contribution.
    fn note(&mut self, tag: &str, reason: impl Into<String>) {
        self.apply(0, tag, reason);
    }

    fn into_assessment(self, mint: &str) -> RiskAssessment {
        let score = self.score.clamp(0, 100) as u8;
        RiskAssessment {
            mint: mint.to_string(),
            score,
            level: RiskLevel::from_score(score),
            tags: self.tags,
            reasons: self.reasons,
        }
    }
}

/// Score one mint. Pure and total: always returns a numeric assessment,
/// clamped to 0..=100.
pub fn score(mint: &str, chain: ChainData<'_>) -> RiskAssessment {
    let mut acc = RuleAccumulator::new();

    // Wrapped SOL is never a fresh launch; fixed verdict, no further rules.
    if mint == WRAPPED_SOL_MINT {
        acc.score = NATIVE_ASSET_SCORE as i32;
        acc.tags.insert("NATIVE_ASSET".to_string());
        acc.reasons
            .push("Canonical wrapped-SOL mint".to_string());
        return acc.into_assessment(mint);
    }

    let info = match chain {
        ChainData::Unavailable => {
            if mint.ends_with(PLATFORM_SUFFIX) {
                acc.apply(
                    PLATFORM_SUFFIX_BONUS,
                    "PLATFORM_STYLE",
                    format!("Mint carries the '{}' launch-platform suffix", PLATFORM_SUFFIX),
                );
            }
            acc.note(
                "NO_CHAIN_DATA",
                "No chain metadata source available; identifier heuristics only",
            );
            return acc.into_assessment(mint);
        }
        ChainData::NotFound => {
            acc.apply(
                UNKNOWN_MINT_PENALTY,
                "MINT_UNKNOWN",
                "Mint account not found on chain",
            );
            return acc.into_assessment(mint);
        }
        ChainData::Present(info) => info,
    };

    if !info.is_initialized {
        acc.apply(
            UNINITIALIZED_PENALTY,
            "UNINITIALIZED",
            "Mint account is not initialized",
        );
    }

    if !info.mint_authority_set && !info.freeze_authority_set {
        acc.apply(
            RENOUNCED_BONUS,
            "RENOUNCED",
            "Mint and freeze authority both renounced",
        );
    } else {
        if info.mint_authority_set {
            acc.apply(
                MINT_AUTHORITY_PENALTY,
                "MINT_AUTHORITY_SET",
                "Mint authority can inflate supply",
            );
        }
        if info.freeze_authority_set {
            acc.apply(
                FREEZE_AUTHORITY_PENALTY,
                "FREEZE_AUTHORITY_SET",
                "Freeze authority can lock holder accounts",
            );
        }
    }

    if info.decimals == STANDARD_DECIMALS {
        acc.note("STANDARD_DECIMALS", "Standard launch decimals");
    } else if info.decimals > STANDARD_DECIMALS {
        acc.apply(
            UNUSUAL_DECIMALS_PENALTY,
            "UNUSUAL_DECIMALS",
            format!("Non-standard decimals {}", info.decimals),
        );
    }

    if info.supply.parse::<u64>().ok() == Some(0) {
        acc.apply(ZERO_SUPPLY_PENALTY, "ZERO_SUPPLY", "Token supply is zero");
    }

    acc.into_assessment(mint)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(
        mint_authority: bool,
        freeze_authority: bool,
        decimals: u8,
        supply: &str,
        initialized: bool,
    ) -> MintInfo {
        MintInfo {
            decimals,
            supply: supply.to_string(),
            mint_authority_set: mint_authority,
            freeze_authority_set: freeze_authority,
            is_initialized: initialized,
        }
    }

    #[test]
    fn test_native_asset_short_circuit() {
        let full = info(true, true, 9, "0", false);
        let assessment = score(WRAPPED_SOL_MINT, ChainData::Present(&full));
        assert_eq!(assessment.score, NATIVE_ASSET_SCORE);
        assert_eq!(assessment.level, RiskLevel::Low);
        // No other rule may have run
        assert_eq!(
            assessment.tags.iter().collect::<Vec<_>>(),
            vec!["NATIVE_ASSET"]
        );
        assert_eq!(assessment.reasons.len(), 1);
    }

    #[test]
    fn test_platform_suffix_without_chain_data() {
        let assessment = score("AbcDefpump", ChainData::Unavailable);
        assert_eq!(
            assessment.score,
            (BASELINE_SCORE + PLATFORM_SUFFIX_BONUS) as u8
        );
        assert!(assessment.tags.contains("PLATFORM_STYLE"));
        assert!(assessment.tags.contains("NO_CHAIN_DATA"));
        assert_eq!(assessment.tags.len(), 2);
    }

    #[test]
    fn test_no_chain_data_without_suffix() {
        let assessment = score("PlainMintAddress", ChainData::Unavailable);
        assert_eq!(assessment.score, BASELINE_SCORE as u8);
        assert!(assessment.tags.contains("NO_CHAIN_DATA"));
        assert!(!assessment.tags.contains("PLATFORM_STYLE"));
    }

    #[test]
    fn test_unknown_mint_penalty() {
        let assessment = score("SomeMintAddress", ChainData::NotFound);
        assert_eq!(
            assessment.score,
            (BASELINE_SCORE + UNKNOWN_MINT_PENALTY) as u8
        );
        assert!(assessment.tags.contains("MINT_UNKNOWN"));
        // Chain-based rules never ran
        assert!(!assessment.tags.contains("RENOUNCED"));
    }

    #[test]
    fn test_renounced_and_zero_supply_compose_additively() {
        let data = info(false, false, 6, "0", true);
        let assessment = score("SomeMintAddress", ChainData::Present(&data));
        let expected = BASELINE_SCORE + RENOUNCED_BONUS + ZERO_SUPPLY_PENALTY;
        assert_eq!(assessment.score, expected.clamp(0, 100) as u8);
        assert!(assessment.tags.contains("RENOUNCED"));
        assert!(assessment.tags.contains("ZERO_SUPPLY"));
    }

    #[test]
    fn test_both_authorities_penalized_independently() {
        let data = info(true, true, 6, "1000000", true);
        let assessment = score("SomeMintAddress", ChainData::Present(&data));
        let expected = BASELINE_SCORE + MINT_AUTHORITY_PENALTY + FREEZE_AUTHORITY_PENALTY;
        assert_eq!(assessment.score, expected.clamp(0, 100) as u8);
        assert!(assessment.tags.contains("MINT_AUTHORITY_SET"));
        assert!(assessment.tags.contains("FREEZE_AUTHORITY_SET"));
        assert!(!assessment.tags.contains("RENOUNCED"));
        assert_eq!(assessment.level, RiskLevel::High);
    }

    #[test]
    fn test_unusual_decimals_penalized() {
        let data = info(false, false, 9, "1000000", true);
        let assessment = score("SomeMintAddress", ChainData::Present(&data));
        assert!(assessment.tags.contains("UNUSUAL_DECIMALS"));
        assert!(!assessment.tags.contains("STANDARD_DECIMALS"));
        let expected = BASELINE_SCORE + RENOUNCED_BONUS + UNUSUAL_DECIMALS_PENALTY;
        assert_eq!(assessment.score, expected.clamp(0, 100) as u8);
    }

    #[test]
    fn test_uninitialized_penalized() {
        let data = info(true, true, 6, "1000000", false);
        let assessment = score("SomeMintAddress", ChainData::Present(&data));
        assert!(assessment.tags.contains("UNINITIALIZED"));
        // 50 + 20 + 20 + 15 clamps at 100
        assert_eq!(assessment.score, 100);
        assert_eq!(assessment.level, RiskLevel::High);
    }

    #[test]
    fn test_reasons_follow_evaluation_order() {
        let data = info(true, true, 9, "0", false);
        let assessment = score("SomeMintAddress", ChainData::Present(&data));
        let reasons = &assessment.reasons;
        assert_eq!(reasons.len(), 5);
        assert!(reasons[0].contains("not initialized"));
        assert!(reasons[1].contains("Mint authority"));
        assert!(reasons[2].contains("Freeze authority"));
        assert!(reasons[3].contains("decimals"));
        assert!(reasons[4].contains("supply"));
    }

    #[test]
    fn test_score_is_deterministic() {
        let data = info(true, false, 6, "42", true);
        let first = score("AbcDefpump", ChainData::Present(&data));
        let second = score("AbcDefpump", ChainData::Present(&data));
        assert_eq!(first, second);
        // Byte-identical when serialized
        let a = serde_json::to_vec(&first).unwrap();
        let b = serde_json::to_vec(&second).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_score_range_and_level_for_randomized_inputs() {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let data = info(
                rng.gen(),
                rng.gen(),
                rng.gen_range(0..=12),
                &rng.gen_range(0u64..=u64::MAX / 2).to_string(),
                rng.gen(),
            );
            let chain = match rng.gen_range(0..3) {
                0 => ChainData::Unavailable,
                1 => ChainData::NotFound,
                _ => ChainData::Present(&data),
            };
            let assessment = score("RandMintpump", chain);
            assert!(assessment.score <= 100);
            assert_eq!(assessment.level, RiskLevel::from_score(assessment.score));
            assert_ne!(assessment.level, RiskLevel::Unknown);
        }
    }
}
