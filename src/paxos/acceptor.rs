use crate::config::TimingConfig;
use crate::context::ClusterContext;
use crate::logging::ActivityLog;
use crate::paxos::election::LeaderElection;
use crate::paxos::network::PeerClient;
use crate::types::{ProposalNumber, Vote};
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Pure voting state of one acceptor. Decision rules:
///
/// - `prepare(n)` promises iff `n` is strictly greater than the highest
///   proposal seen so far.
/// - `accept(n, v)` accepts iff `n` is greater than *or equal to* the
///   highest proposal seen so far.
///
/// The highest proposal never decreases.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoteState {
    highest_proposal: Option<ProposalNumber>,
    accepted_value: Option<String>,
}

impl VoteState {
    pub fn prepare(&mut self, proposal: ProposalNumber) -> Vote {
        if self.highest_proposal.is_none_or(|highest| proposal > highest) {
            self.highest_proposal = Some(proposal);
            Vote::Promise
        } else {
            Vote::Reject
        }
    }

    pub fn accept(&mut self, proposal: ProposalNumber, value: String) -> Vote {
        if self.highest_proposal.is_none_or(|highest| proposal >= highest) {
            self.highest_proposal = Some(proposal);
            self.accepted_value = Some(value);
            Vote::Accept
        } else {
            Vote::Reject
        }
    }

    pub fn highest_proposal(&self) -> Option<ProposalNumber> {
        self.highest_proposal
    }

    pub fn accepted_value(&self) -> Option<&str> {
        self.accepted_value.as_deref()
    }
}

/// One peer's acceptor. Votes on proposals, and while flagged leader it
/// additionally coordinates the quorum fan-outs for both phases and the
/// learn broadcast.
pub struct Acceptor {
    votes: Mutex<VoteState>,
    is_leader: AtomicBool,
    leader_alive: AtomicBool,
    acceptor_urls: Vec<String>,
    learner_urls: Vec<String>,
    client: PeerClient,
    log: ActivityLog,
    timing: TimingConfig,
    election: Arc<LeaderElection>,
    // Guard for whichever heartbeat/monitor loop is currently running;
    // dropping the sender cancels the loop.
    loop_guard: Mutex<Option<watch::Sender<bool>>>,
}

impl Acceptor {
    pub fn new(context: &ClusterContext, election: Arc<LeaderElection>) -> Arc<Self> {
        Arc::new(Self {
            votes: Mutex::new(VoteState::default()),
            is_leader: AtomicBool::new(false),
            leader_alive: AtomicBool::new(true),
            acceptor_urls: context.acceptor_urls.clone(),
            learner_urls: context.learner_urls.clone(),
            client: context.client.clone(),
            log: context.log.clone(),
            timing: context.config.timing.clone(),
            election,
            loop_guard: Mutex::new(None),
        })
    }

    pub fn prepare(&self, proposal: ProposalNumber) -> Vote {
        self.votes.lock().unwrap().prepare(proposal)
    }

    pub fn accept(&self, proposal: ProposalNumber, value: String) -> Vote {
        self.votes.lock().unwrap().accept(proposal, value)
    }

    pub fn vote_state(&self) -> VoteState {
        self.votes.lock().unwrap().clone()
    }

    pub fn is_leader(&self) -> bool {
        self.is_leader.load(Ordering::SeqCst)
    }

    pub fn receive_heartbeat(&self) {
        self.leader_alive.store(true, Ordering::SeqCst);
    }

    /// Phase 1 coordinator: collect promises from every acceptor, one at a
    /// time. Unreachable peers count as rejections.
    pub async fn handle_prepare_request(&self, proposal: ProposalNumber) -> Vote {
        self.log
            .activity(&format!("Prepare request received for proposal {proposal}"));
        let mut promises = 0;
        for url in &self.acceptor_urls {
            let vote = match self.client.prepare(url, proposal).await {
                Ok(vote) => vote,
                Err(_) => Vote::Reject,
            };
            if vote == Vote::Promise {
                promises += 1;
            }
        }
        let outcome = if promises > self.acceptor_urls.len() / 2 {
            Vote::Promise
        } else {
            Vote::Reject
        };
        self.log
            .activity(&format!("Prepare outcome for proposal {proposal}: {outcome}"));
        outcome
    }

    /// Phase 2 coordinator: collect accepts for the value, symmetrically to
    /// the prepare fan-out.
    pub async fn handle_accept_request(&self, proposal: ProposalNumber, value: &str) -> Vote {
        self.log.activity(&format!(
            "Accept request received for proposal {proposal} with command {value}"
        ));
        let mut accepts = 0;
        for url in &self.acceptor_urls {
            let vote = match self.client.accept(url, proposal, value).await {
                Ok(vote) => vote,
                Err(_) => Vote::Reject,
            };
            self.log
                .activity(&format!("Acceptor {url} gave response {vote}"));
            if vote == Vote::Accept {
                accepts += 1;
            }
        }
        let outcome = if accepts > self.acceptor_urls.len() / 2 {
            Vote::Accept
        } else {
            Vote::Reject
        };
        self.log
            .activity(&format!("Accept outcome for proposal {proposal}: {outcome}"));
        outcome
    }

    /// Broadcast a decided value to every learner. Unlike the vote fan-outs,
    /// a failure here propagates to the caller.
    pub async fn learn(&self, value: &str) -> Result<String> {
        self.log
            .activity(&format!("Asking learners to learn the command: {value}"));
        for url in &self.learner_urls {
            self.log.activity(&format!("Learner {url} learning value"));
            self.client.learner_learn(url, value).await?;
        }
        self.log.activity("All learners applied the command");
        Ok(format!("Learned: {value}"))
    }

    /// Flip leadership and swap the background loop accordingly: leaders
    /// emit heartbeats, everyone else monitors for leader silence. The
    /// previous loop, if any, is cancelled first.
    pub fn set_leader(self: &Arc<Self>, leader: bool) {
        self.is_leader.store(leader, Ordering::SeqCst);
        let (tx, rx) = watch::channel(false);
        let previous = self.loop_guard.lock().unwrap().replace(tx);
        drop(previous);
        if leader {
            self.start_heartbeat(rx);
        } else {
            self.start_monitor(rx);
        }
    }

    /// Cancel whatever background loop is running. Called when this instance
    /// is unbound from its slot.
    pub fn shutdown(&self) {
        self.loop_guard.lock().unwrap().take();
    }

    fn start_heartbeat(self: &Arc<Self>, mut cancel: watch::Receiver<bool>) {
        let acceptor = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(acceptor.timing.heartbeat_interval());
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        for url in &acceptor.acceptor_urls {
                            if let Err(e) = acceptor.client.acceptor_heartbeat(url).await {
                                debug!("heartbeat to {url} failed: {e}");
                            }
                        }
                    }
                    _ = cancel.changed() => break,
                }
            }
        });
    }

    fn start_monitor(self: &Arc<Self>, mut cancel: watch::Receiver<bool>) {
        let acceptor = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(acceptor.timing.monitor_interval());
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if !acceptor.leader_alive.load(Ordering::SeqCst) {
                            warn!("leader acceptor went silent, triggering re-election");
                            acceptor
                                .log
                                .error("Leader acceptor silent beyond heartbeat timeout");
                            acceptor.election.assign_leadership_acceptor().await;
                            break;
                        }
                        acceptor.leader_alive.store(false, Ordering::SeqCst);
                    }
                    _ = cancel.changed() => break,
                }
            }
        });
    }
}
