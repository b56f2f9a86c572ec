pub mod api;
pub mod config;
pub mod context;
pub mod failure;
pub mod logging;
pub mod node;
pub mod paxos;
pub mod paxos_api;
pub mod service;
pub mod store;
pub mod types;

pub use config::{ClusterConfig, TimingConfig};
pub use context::{AcceptorSlot, ClusterContext, LeaderSlot};
pub use failure::FailureInjector;
pub use logging::ActivityLog;
pub use node::{Cluster, PeerNode};
pub use paxos::{
    Acceptor, Consensus, Learner, LeaderElection, PaxosCommitter, PeerClient, Proposer, VoteState,
};
pub use service::KeyValueService;
pub use store::KvStore;
pub use types::{Command, ParseError, ProposalNumber, Vote};
