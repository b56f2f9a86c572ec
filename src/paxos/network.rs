use crate::types::{ProposalNumber, Vote};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize)]
pub struct ExecuteRequest {
    pub client_id: String,
    pub command: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExecuteReply {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PrepareRequest {
    pub proposal: ProposalNumber,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AcceptRequest {
    pub proposal: ProposalNumber,
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoteReply {
    pub vote: Vote,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LearnRequest {
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LearnReply {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetValueRequest {
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetLeaderRequest {
    pub leader: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProposeRequest {
    pub client_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IsLeaderReply {
    pub leader: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Ack {}

/// HTTP client for every remote operation the roles expose.
///
/// Endpoints are resolved by URL on every call; nothing is cached across
/// calls, so a restarted peer is picked up transparently.
#[derive(Clone)]
pub struct PeerClient {
    http: reqwest::Client,
}

impl PeerClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    async fn post_json<Req, Resp>(&self, url: &str, req: &Req) -> Result<Resp>
    where
        Req: Serialize,
        Resp: serde::de::DeserializeOwned,
    {
        let response = self.http.post(url).json(req).send().await?;
        if !response.status().is_success() {
            bail!("{url} answered {}", response.status());
        }
        Ok(response.json().await?)
    }

    async fn post_empty(&self, url: &str) -> Result<()> {
        let response = self.http.post(url).send().await?;
        if !response.status().is_success() {
            bail!("{url} answered {}", response.status());
        }
        Ok(())
    }

    // KV service

    pub async fn execute(&self, base_url: &str, client_id: &str, command: &str) -> Result<String> {
        let reply: ExecuteReply = self
            .post_json(
                &format!("{base_url}/execute"),
                &ExecuteRequest {
                    client_id: client_id.to_string(),
                    command: command.to_string(),
                },
            )
            .await?;
        Ok(reply.response)
    }

    pub async fn health(&self, base_url: &str) -> Result<()> {
        let response = self.http.get(format!("{base_url}/health")).send().await?;
        if !response.status().is_success() {
            bail!("{base_url} answered {}", response.status());
        }
        Ok(())
    }

    // Proposer

    pub async fn proposer_set_value(&self, proposer_url: &str, value: &str) -> Result<()> {
        let _: Ack = self
            .post_json(
                &format!("{proposer_url}/set-value"),
                &SetValueRequest {
                    value: value.to_string(),
                },
            )
            .await?;
        Ok(())
    }

    pub async fn proposer_set_leader(&self, proposer_url: &str, leader: bool) -> Result<()> {
        let _: Ack = self
            .post_json(
                &format!("{proposer_url}/set-leader"),
                &SetLeaderRequest { leader },
            )
            .await?;
        Ok(())
    }

    pub async fn propose(&self, proposer_url: &str, client_id: &str) -> Result<()> {
        let _: Ack = self
            .post_json(
                &format!("{proposer_url}/propose"),
                &ProposeRequest {
                    client_id: client_id.to_string(),
                },
            )
            .await?;
        Ok(())
    }

    pub async fn proposer_heartbeat(&self, proposer_url: &str) -> Result<()> {
        self.post_empty(&format!("{proposer_url}/heartbeat")).await
    }

    // Acceptor

    pub async fn acceptor_is_leader(&self, acceptor_url: &str) -> Result<bool> {
        let response = self
            .http
            .get(format!("{acceptor_url}/is-leader"))
            .send()
            .await?;
        if !response.status().is_success() {
            bail!("{acceptor_url} answered {}", response.status());
        }
        let reply: IsLeaderReply = response.json().await?;
        Ok(reply.leader)
    }

    pub async fn acceptor_set_leader(&self, acceptor_url: &str, leader: bool) -> Result<()> {
        let _: Ack = self
            .post_json(
                &format!("{acceptor_url}/set-leader"),
                &SetLeaderRequest { leader },
            )
            .await?;
        Ok(())
    }

    pub async fn acceptor_heartbeat(&self, acceptor_url: &str) -> Result<()> {
        self.post_empty(&format!("{acceptor_url}/heartbeat")).await
    }

    pub async fn prepare(&self, acceptor_url: &str, proposal: ProposalNumber) -> Result<Vote> {
        let reply: VoteReply = self
            .post_json(&format!("{acceptor_url}/prepare"), &PrepareRequest { proposal })
            .await?;
        Ok(reply.vote)
    }

    pub async fn accept(
        &self,
        acceptor_url: &str,
        proposal: ProposalNumber,
        value: &str,
    ) -> Result<Vote> {
        let reply: VoteReply = self
            .post_json(
                &format!("{acceptor_url}/accept"),
                &AcceptRequest {
                    proposal,
                    value: value.to_string(),
                },
            )
            .await?;
        Ok(reply.vote)
    }

    pub async fn handle_prepare(
        &self,
        acceptor_url: &str,
        proposal: ProposalNumber,
    ) -> Result<Vote> {
        let reply: VoteReply = self
            .post_json(
                &format!("{acceptor_url}/handle-prepare"),
                &PrepareRequest { proposal },
            )
            .await?;
        Ok(reply.vote)
    }

    pub async fn handle_accept(
        &self,
        acceptor_url: &str,
        proposal: ProposalNumber,
        value: &str,
    ) -> Result<Vote> {
        let reply: VoteReply = self
            .post_json(
                &format!("{acceptor_url}/handle-accept"),
                &AcceptRequest {
                    proposal,
                    value: value.to_string(),
                },
            )
            .await?;
        Ok(reply.vote)
    }

    pub async fn acceptor_learn(&self, acceptor_url: &str, value: &str) -> Result<String> {
        let reply: LearnReply = self
            .post_json(
                &format!("{acceptor_url}/learn"),
                &LearnRequest {
                    value: value.to_string(),
                },
            )
            .await?;
        Ok(reply.message)
    }

    // Learner

    pub async fn learner_learn(&self, learner_url: &str, value: &str) -> Result<()> {
        let _: Ack = self
            .post_json(
                &format!("{learner_url}/learn"),
                &LearnRequest {
                    value: value.to_string(),
                },
            )
            .await?;
        Ok(())
    }
}
