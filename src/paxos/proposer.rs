use crate::context::ClusterContext;
use crate::logging::ActivityLog;
use crate::paxos::network::PeerClient;
use crate::types::{ProposalNumber, Vote};
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Default)]
struct ProposeState {
    round: u64,
    value: Option<String>,
}

/// One peer's proposer. Only the elected leader drives rounds; every other
/// proposer refuses with an error log. Rounds are serialized: the state lock
/// is held from proposal numbering through the learn broadcast.
pub struct Proposer {
    state: Mutex<ProposeState>,
    node: u32,
    is_leader: AtomicBool,
    leader_alive: AtomicBool,
    acceptor_urls: Vec<String>,
    client: PeerClient,
    log: ActivityLog,
}

impl Proposer {
    pub fn new(context: &ClusterContext, node: u32) -> Self {
        Self {
            state: Mutex::new(ProposeState::default()),
            node,
            is_leader: AtomicBool::new(false),
            leader_alive: AtomicBool::new(true),
            acceptor_urls: context.acceptor_urls.clone(),
            client: context.client.clone(),
            log: context.log.clone(),
        }
    }

    /// Stage the value for the next round.
    pub async fn set_value(&self, value: String) {
        self.state.lock().await.value = Some(value);
    }

    pub fn set_leader(&self, leader: bool) {
        self.is_leader.store(leader, Ordering::SeqCst);
    }

    pub fn is_leader(&self) -> bool {
        self.is_leader.load(Ordering::SeqCst)
    }

    pub fn receive_heartbeat(&self) {
        self.leader_alive.store(true, Ordering::SeqCst);
    }

    /// Run one consensus round for the staged value. Failures end the round
    /// silently; the submitting client is expected to re-issue its command.
    pub async fn propose(&self, client_id: &str) {
        let mut state = self.state.lock().await;
        if !self.is_leader() {
            self.log
                .error("This proposer is not the leader, cannot propose");
            return;
        }
        state.round += 1;
        let proposal = ProposalNumber {
            round: state.round,
            node: self.node,
        };
        self.log
            .activity(&format!("Proposal received from {client_id}"));
        let Some(value) = state.value.clone() else {
            self.log.error("No value staged, dropping proposal");
            return;
        };

        // The leader acceptor drives both phases; find it by scanning the
        // acceptor list. Unreachable acceptors are skipped.
        let mut driver = None;
        for url in &self.acceptor_urls {
            match self.client.acceptor_is_leader(url).await {
                Ok(true) => {
                    driver = Some(url.clone());
                    break;
                }
                Ok(false) => {}
                Err(e) => debug!("leadership lookup on {url} failed: {e}"),
            }
        }
        let Some(driver) = driver else {
            self.log.error("No leader found among acceptors");
            return;
        };

        if let Err(e) = self.run_round(&driver, proposal, &value).await {
            self.log
                .error(&format!("Round for proposal {proposal} aborted: {e}"));
        }
    }

    async fn run_round(&self, driver: &str, proposal: ProposalNumber, value: &str) -> Result<()> {
        self.log
            .activity(&format!("Requesting prepare for proposal {proposal}"));
        if self.client.handle_prepare(driver, proposal).await? != Vote::Promise {
            return Ok(());
        }
        self.log
            .activity(&format!("Promise received for proposal {proposal}"));
        let accepted = self.client.handle_accept(driver, proposal, value).await?;
        self.log.activity(&format!(
            "Leader acceptor answered {accepted} for command {value}"
        ));
        if accepted != Vote::Accept {
            return Ok(());
        }
        let message = self.client.acceptor_learn(driver, value).await?;
        self.log.activity(&message);
        Ok(())
    }
}
