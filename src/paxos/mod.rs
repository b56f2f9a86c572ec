mod acceptor;
mod committer;
mod election;
mod learner;
mod network;
mod proposer;

pub use acceptor::*;
pub use committer::*;
pub use election::*;
pub use learner::*;
pub use network::*;
pub use proposer::*;

use async_trait::async_trait;

/// Seam between the KV service and the replication machinery.
#[async_trait]
pub trait Consensus: Send + Sync {
    /// Whether a leader proposer is currently known.
    fn has_leader(&self) -> bool;

    /// Stage `value` on the leader proposer and run one consensus round.
    /// An `Ok` return means the submission was delivered, not that the
    /// round succeeded; round outcomes are not surfaced to clients.
    async fn submit(&self, client_id: &str, value: String) -> anyhow::Result<()>;
}
