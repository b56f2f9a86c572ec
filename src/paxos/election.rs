use crate::context::{ClusterContext, LeaderSlot};
use crate::logging::ActivityLog;
use crate::paxos::network::PeerClient;
use rand::Rng;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::info;

/// Cluster-wide leader election over the shared URL lists.
///
/// The proposer and acceptor routines are independent: each picks a leader
/// uniformly at random, fans out `set_leader` to every peer of that role,
/// and is debounced against being re-run within the minimum interval.
pub struct LeaderElection {
    proposer_urls: Vec<String>,
    acceptor_urls: Vec<String>,
    client: PeerClient,
    log: ActivityLog,
    leader_proposer: LeaderSlot,
    min_interval: Duration,
    last_proposer_call: Mutex<Option<Instant>>,
    last_acceptor_call: Mutex<Option<Instant>>,
}

impl LeaderElection {
    pub fn new(context: &ClusterContext) -> Self {
        Self {
            proposer_urls: context.proposer_urls.clone(),
            acceptor_urls: context.acceptor_urls.clone(),
            client: context.client.clone(),
            log: context.log.clone(),
            leader_proposer: context.leader_proposer.clone(),
            min_interval: context.config.timing.election_min_interval(),
            last_proposer_call: Mutex::new(None),
            last_acceptor_call: Mutex::new(None),
        }
    }

    /// Elect a leader proposer, record it as the cluster-wide commit target,
    /// and return its URL. Returns `None` when debounced.
    pub async fn assign_leadership_proposer(&self) -> Option<String> {
        if !self.claim(&self.last_proposer_call) {
            return None;
        }
        let chosen = self.pick(&self.proposer_urls);
        for url in &self.proposer_urls {
            if let Err(e) = self.client.proposer_set_leader(url, *url == chosen).await {
                self.log
                    .error(&format!("Failed to update leadership on proposer {url}: {e}"));
            }
        }
        info!("proposer leader elected: {chosen}");
        self.log
            .activity(&format!("Proposer leader elected: {chosen}"));
        self.leader_proposer.set(Some(chosen.clone()));
        Some(chosen)
    }

    /// Elect a leader acceptor. Returns `true` unless debounced.
    pub async fn assign_leadership_acceptor(&self) -> bool {
        if !self.claim(&self.last_acceptor_call) {
            return false;
        }
        let chosen = self.pick(&self.acceptor_urls);
        for url in &self.acceptor_urls {
            if let Err(e) = self.client.acceptor_set_leader(url, *url == chosen).await {
                self.log
                    .error(&format!("Failed to update leadership on acceptor {url}: {e}"));
            }
        }
        info!("acceptor leader elected: {chosen}");
        self.log
            .activity(&format!("Acceptor leader elected: {chosen}"));
        true
    }

    fn claim(&self, last_call: &Mutex<Option<Instant>>) -> bool {
        let mut last = last_call.lock().unwrap();
        if last.is_some_and(|at| at.elapsed() < self.min_interval) {
            return false;
        }
        *last = Some(Instant::now());
        true
    }

    fn pick(&self, urls: &[String]) -> String {
        let index = rand::rng().random_range(0..urls.len());
        urls[index].clone()
    }
}
