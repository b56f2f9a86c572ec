use crate::context::{ClusterContext, LeaderSlot};
use crate::paxos::network::PeerClient;
use crate::paxos::Consensus;
use anyhow::{Context as _, Result};
use async_trait::async_trait;

/// Production [`Consensus`] implementation: stages the value on the current
/// leader proposer and asks it to run a round. The leader URL is re-read
/// from the cluster context on every submission.
pub struct PaxosCommitter {
    leader: LeaderSlot,
    client: PeerClient,
}

impl PaxosCommitter {
    pub fn new(context: &ClusterContext) -> Self {
        Self {
            leader: context.leader_proposer.clone(),
            client: context.client.clone(),
        }
    }
}

#[async_trait]
impl Consensus for PaxosCommitter {
    fn has_leader(&self) -> bool {
        self.leader.get().is_some()
    }

    async fn submit(&self, client_id: &str, value: String) -> Result<()> {
        let url = self.leader.get().context("no leader proposer elected")?;
        self.client.proposer_set_value(&url, &value).await?;
        self.client.propose(&url, client_id).await?;
        Ok(())
    }
}
