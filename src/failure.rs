use crate::context::ClusterContext;
use crate::paxos::{Acceptor, LeaderElection};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Background chaos loop: at random intervals, take one acceptor offline,
/// then bring a fresh instance up at the same URL and go again. Only
/// acceptors are ever targeted.
pub struct FailureInjector {
    context: Arc<ClusterContext>,
    election: Arc<LeaderElection>,
}

impl FailureInjector {
    pub fn new(context: Arc<ClusterContext>, election: Arc<LeaderElection>) -> Self {
        Self { context, election }
    }

    pub async fn run(&self) {
        loop {
            tokio::time::sleep(self.random_delay()).await;

            let Some(index) = self.pick_bound_slot() else {
                continue;
            };
            let url = &self.context.acceptor_urls[index];
            warn!("failure injector taking down acceptor {url}");
            self.context.log.error(&format!("Acceptor {url} is failing..."));
            self.context.acceptor_slots[index].unbind();
            self.context
                .log
                .activity(&format!("Acceptor {url} has been shut down."));

            tokio::time::sleep(self.random_delay()).await;

            let acceptor = Acceptor::new(&self.context, self.election.clone());
            self.context.acceptor_slots[index].bind(acceptor);
            info!("failure injector restarted acceptor {url}");
            self.context.log.activity("Acceptor has restarted.");
        }
    }

    fn random_delay(&self) -> Duration {
        let timing = &self.context.config.timing;
        let secs =
            rand::rng().random_range(timing.failure_delay_min_secs..=timing.failure_delay_max_secs);
        Duration::from_secs(secs)
    }

    /// Pick a random slot, retrying selection when the chosen slot is
    /// currently empty.
    fn pick_bound_slot(&self) -> Option<usize> {
        let slots = &self.context.acceptor_slots;
        for _ in 0..slots.len() * 4 {
            let index = rand::rng().random_range(0..slots.len());
            if slots[index].is_bound() {
                return Some(index);
            }
        }
        None
    }
}
