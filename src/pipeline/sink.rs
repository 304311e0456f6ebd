//! Flat-file persistence for resolved launches.
//!
//! One delimited line per record, append-only, single writer. The log can
//! be read back for reporting; malformed lines are skipped individually and
//! never abort the read.

use crate::types::ResolvedLaunch;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// Field delimiter for the launch log. Base58 signatures and mint
/// addresses can never contain it.
pub const FIELD_DELIMITER: char = '|';

/// Destination for completed launch records.
#[async_trait]
pub trait LaunchSink: Send + Sync {
    async fn append(&self, record: &ResolvedLaunch) -> Result<()>;
}

/// Append-only launch log backed by a flat file.
pub struct LaunchLog {
    path: PathBuf,
}

impl LaunchLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the whole log. Lines that fail to parse are skipped with a
    /// warning rather than failing the read.
    pub async fn read_all(&self) -> Result<Vec<ResolvedLaunch>> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read launch log {}", self.path.display()))?;
        let mut records = Vec::new();
        for (idx, line) in contents.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            match parse_line(line) {
                Some(record) => records.push(record),
                None => warn!("Skipping malformed launch log line {}", idx + 1),
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl LaunchSink for LaunchLog {
    async fn append(&self, record: &ResolvedLaunch) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open launch log {}", self.path.display()))?;
        file.write_all(format_line(record).as_bytes())
            .await
            .context("Failed to append launch record")?;
        Ok(())
    }
}

/// Render one record as a single log line, newline-terminated. Fields in
/// order: timestamp, slot, signature, mint (empty when unresolved), URL.
pub fn format_line(record: &ResolvedLaunch) -> String {
    format!(
        "{ts}{d}{slot}{d}{sig}{d}{mint}{d}{url}\n",
        ts = record.timestamp_ms,
        slot = record.slot,
        sig = record.signature,
        mint = record.mint.as_deref().unwrap_or(""),
        url = record.url,
        d = FIELD_DELIMITER,
    )
}

/// Inverse of [`format_line`]. `None` for any line that does not have
/// exactly five fields with numeric timestamp and slot.
pub fn parse_line(line: &str) -> Option<ResolvedLaunch> {
    let mut fields = line.trim_end_matches('\n').split(FIELD_DELIMITER);
    let timestamp_ms = fields.next()?.parse().ok()?;
    let slot = fields.next()?.parse().ok()?;
    let signature = fields.next()?.to_string();
    let mint = match fields.next()? {
        "" => None,
        mint => Some(mint.to_string()),
    };
    let url = fields.next()?.to_string();
    if fields.next().is_some() {
        return None;
    }
    Some(ResolvedLaunch {
        timestamp_ms,
        slot,
        signature,
        mint,
        url,
    })
}
