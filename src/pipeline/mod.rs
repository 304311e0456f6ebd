//! Pipeline module - bounded ingestion queue, rate-limited resolution worker
//! and the controller that owns their shared lifecycle.

pub mod config;
pub mod controller;
pub mod queue;
pub mod resolver;
pub mod sink;
pub mod worker;

// Re-export main types
pub use config::PipelineConfig;
pub use controller::PipelineController;
pub use queue::{LaunchQueue, SharedQueue};
pub use resolver::{
    MintInfoSource, MintResolver, RpcMintInfoSource, RpcTransactionSource, TransactionSource,
};
pub use sink::{LaunchLog, LaunchSink};
pub use worker::{tick_interval, ResolveWorker, WorkerGuard};
