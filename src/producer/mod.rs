//! Producers run a file operation and report per-file progress into a
//! status channel.

pub mod annex;
pub mod git;

pub use annex::{AnnexOp, AnnexProducer};
pub use git::Git;

use async_trait::async_trait;

use crate::pipeline::StatusSender;

#[async_trait]
pub trait Producer: Send + Sync + 'static {
    /// Emit events for `paths`, or for every file under the working
    /// directory when `paths` is empty.
    ///
    /// The channel closes when `status` (and any clone of it) is dropped,
    /// which happens when this returns, whatever the per-file results.
    async fn produce(&self, paths: Vec<String>, status: StatusSender);
}
