use crate::api;
use crate::config::ClusterConfig;
use crate::context::{AcceptorSlot, ClusterContext};
use crate::failure::FailureInjector;
use crate::logging::ActivityLog;
use crate::paxos::{Acceptor, Learner, LeaderElection, PaxosCommitter, Proposer};
use crate::paxos_api;
use crate::service::KeyValueService;
use crate::store::KvStore;
use anyhow::Result;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// One peer's co-located objects: the store, its KV service, and the three
/// replication roles published next to it.
pub struct PeerNode {
    pub base_url: String,
    pub port: u16,
    pub store: KvStore,
    pub service: Arc<KeyValueService>,
    pub proposer: Arc<Proposer>,
    pub learner: Arc<Learner>,
    pub slot: AcceptorSlot,
}

/// The full cluster: every peer plus the shared context, election facility
/// and server tasks. The launcher builds one of these; integration tests
/// drive it in-process.
pub struct Cluster {
    context: Arc<ClusterContext>,
    election: Arc<LeaderElection>,
    pub peers: Vec<PeerNode>,
    servers: Vec<JoinHandle<()>>,
}

impl Cluster {
    pub fn new(config: ClusterConfig, log: ActivityLog) -> Result<Self> {
        let context = Arc::new(ClusterContext::new(config, log)?);
        let election = Arc::new(LeaderElection::new(&context));

        let mut peers = Vec::new();
        for (index, base_url) in context.peer_urls.iter().enumerate() {
            let store = KvStore::new();
            let learner = Arc::new(Learner::new(store.clone(), context.log.clone()));
            let acceptor = Acceptor::new(&context, election.clone());
            context.acceptor_slots[index].bind(acceptor);
            let proposer = Arc::new(Proposer::new(&context, index as u32));
            let consensus = Arc::new(PaxosCommitter::new(&context));
            let service = Arc::new(KeyValueService::new(
                store.clone(),
                consensus,
                context.log.clone(),
                base_url.clone(),
            ));
            peers.push(PeerNode {
                base_url: base_url.clone(),
                port: context.config.ports[index],
                store,
                service,
                proposer,
                learner,
                slot: context.acceptor_slots[index].clone(),
            });
        }

        Ok(Self {
            context,
            election,
            peers,
            servers: Vec::new(),
        })
    }

    /// Bind one listener per peer and start serving. Listeners are bound
    /// before this returns, so the cluster is reachable immediately after.
    pub async fn start(&mut self) -> Result<()> {
        for peer in &self.peers {
            let router = api::router(peer.service.clone()).merge(paxos_api::role_router(
                peer.proposer.clone(),
                peer.slot.clone(),
                peer.learner.clone(),
            ));
            let addr = format!("{}:{}", self.context.config.host, peer.port);
            let listener = TcpListener::bind(&addr).await?;
            info!("peer listening on {addr}");
            self.context
                .log
                .activity(&format!("Server is running at {}", peer.base_url));
            self.servers.push(tokio::spawn(async move {
                if let Err(e) = axum::serve(listener, router).await {
                    error!("peer server error: {e}");
                }
            }));
        }
        Ok(())
    }

    /// Run both election routines, as at startup.
    pub async fn elect_leaders(&self) {
        self.election.assign_leadership_proposer().await;
        self.election.assign_leadership_acceptor().await;
    }

    pub fn spawn_failure_injector(&self) -> JoinHandle<()> {
        let injector = FailureInjector::new(self.context.clone(), self.election.clone());
        tokio::spawn(async move { injector.run().await })
    }

    pub fn context(&self) -> &Arc<ClusterContext> {
        &self.context
    }

    pub fn election(&self) -> &Arc<LeaderElection> {
        &self.election
    }

    /// Stop serving and cancel every acceptor's background loop.
    pub fn shutdown(&mut self) {
        for server in self.servers.drain(..) {
            server.abort();
        }
        for slot in &self.context.acceptor_slots {
            slot.unbind();
        }
    }
}
