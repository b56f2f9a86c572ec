use crate::config::ClusterConfig;
use crate::logging::ActivityLog;
use crate::paxos::{Acceptor, PeerClient};
use anyhow::Result;
use std::sync::{Arc, RwLock};

/// Everything the roles share, built once at startup: the derived URL
/// lists, the HTTP client, the activity log, the leader-proposer slot and
/// the acceptor dispatch slots.
pub struct ClusterContext {
    pub config: ClusterConfig,
    pub peer_urls: Vec<String>,
    pub proposer_urls: Vec<String>,
    pub acceptor_urls: Vec<String>,
    pub learner_urls: Vec<String>,
    pub client: PeerClient,
    pub log: ActivityLog,
    pub leader_proposer: LeaderSlot,
    pub acceptor_slots: Vec<AcceptorSlot>,
}

impl ClusterContext {
    pub fn new(config: ClusterConfig, log: ActivityLog) -> Result<Self> {
        let peer_urls = config.peer_urls();
        let proposer_urls = peer_urls.iter().map(|url| format!("{url}/proposer")).collect();
        let acceptor_urls: Vec<String> =
            peer_urls.iter().map(|url| format!("{url}/acceptor")).collect();
        let learner_urls = peer_urls.iter().map(|url| format!("{url}/learner")).collect();
        let client = PeerClient::new(config.timing.rpc_timeout())?;
        let acceptor_slots = acceptor_urls.iter().map(|_| AcceptorSlot::default()).collect();
        Ok(Self {
            config,
            peer_urls,
            proposer_urls,
            acceptor_urls,
            learner_urls,
            client,
            log,
            leader_proposer: LeaderSlot::default(),
            acceptor_slots,
        })
    }
}

/// The cluster-wide handle to the current leader proposer's URL, written by
/// the election routine and read on every write submission.
#[derive(Clone, Default)]
pub struct LeaderSlot(Arc<RwLock<Option<String>>>);

impl LeaderSlot {
    pub fn get(&self) -> Option<String> {
        self.0.read().unwrap().clone()
    }

    pub fn set(&self, url: Option<String>) {
        *self.0.write().unwrap() = url;
    }
}

/// Dispatch point for one peer's acceptor. Handlers resolve the slot on
/// every request, so an unbound slot answers unavailable and a rebound slot
/// transparently serves the new instance at the same URL.
#[derive(Clone, Default)]
pub struct AcceptorSlot {
    inner: Arc<RwLock<Option<Arc<Acceptor>>>>,
}

impl AcceptorSlot {
    /// Install an acceptor, shutting down any previous occupant.
    pub fn bind(&self, acceptor: Arc<Acceptor>) {
        let previous = self.inner.write().unwrap().replace(acceptor);
        if let Some(previous) = previous {
            previous.shutdown();
        }
    }

    /// Remove the current acceptor and cancel its background loop. In-flight
    /// requests on the detached instance run to completion.
    pub fn unbind(&self) {
        if let Some(acceptor) = self.inner.write().unwrap().take() {
            acceptor.shutdown();
        }
    }

    pub fn get(&self) -> Option<Arc<Acceptor>> {
        self.inner.read().unwrap().clone()
    }

    pub fn is_bound(&self) -> bool {
        self.inner.read().unwrap().is_some()
    }
}
