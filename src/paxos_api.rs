use crate::context::AcceptorSlot;
use crate::paxos::{
    AcceptRequest, Ack, IsLeaderReply, Learner, LearnReply, LearnRequest, PrepareRequest,
    ProposeRequest, Proposer, SetLeaderRequest, SetValueRequest, VoteReply,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

/// Routers for the three role objects a peer publishes next to its KV
/// service, nested under `/proposer`, `/acceptor` and `/learner`.
pub fn role_router(proposer: Arc<Proposer>, slot: AcceptorSlot, learner: Arc<Learner>) -> Router {
    Router::new()
        .nest("/proposer", proposer_router(proposer))
        .nest("/acceptor", acceptor_router(slot))
        .nest("/learner", learner_router(learner))
}

pub fn proposer_router(proposer: Arc<Proposer>) -> Router {
    Router::new()
        .route("/set-value", post(proposer_set_value))
        .route("/set-leader", post(proposer_set_leader))
        .route("/propose", post(propose))
        .route("/heartbeat", post(proposer_heartbeat))
        .with_state(proposer)
}

pub fn acceptor_router(slot: AcceptorSlot) -> Router {
    Router::new()
        .route("/prepare", post(prepare))
        .route("/accept", post(accept))
        .route("/handle-prepare", post(handle_prepare))
        .route("/handle-accept", post(handle_accept))
        .route("/learn", post(acceptor_learn))
        .route("/is-leader", get(is_leader))
        .route("/set-leader", post(acceptor_set_leader))
        .route("/heartbeat", post(acceptor_heartbeat))
        .with_state(slot)
}

pub fn learner_router(learner: Arc<Learner>) -> Router {
    Router::new()
        .route("/learn", post(learner_learn))
        .with_state(learner)
}

// Proposer handlers

async fn proposer_set_value(
    State(proposer): State<Arc<Proposer>>,
    Json(req): Json<SetValueRequest>,
) -> Json<Ack> {
    proposer.set_value(req.value).await;
    Json(Ack {})
}

async fn proposer_set_leader(
    State(proposer): State<Arc<Proposer>>,
    Json(req): Json<SetLeaderRequest>,
) -> Json<Ack> {
    proposer.set_leader(req.leader);
    Json(Ack {})
}

async fn propose(
    State(proposer): State<Arc<Proposer>>,
    Json(req): Json<ProposeRequest>,
) -> Json<Ack> {
    proposer.propose(&req.client_id).await;
    Json(Ack {})
}

async fn proposer_heartbeat(State(proposer): State<Arc<Proposer>>) -> Json<Ack> {
    proposer.receive_heartbeat();
    Json(Ack {})
}

// Acceptor handlers. An unbound slot answers 503, which callers already
// treat as a rejection or a skippable peer.

fn offline() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(serde_json::json!({ "error": "acceptor offline" })),
    )
        .into_response()
}

async fn prepare(State(slot): State<AcceptorSlot>, Json(req): Json<PrepareRequest>) -> Response {
    let Some(acceptor) = slot.get() else {
        return offline();
    };
    Json(VoteReply {
        vote: acceptor.prepare(req.proposal),
    })
    .into_response()
}

async fn accept(State(slot): State<AcceptorSlot>, Json(req): Json<AcceptRequest>) -> Response {
    let Some(acceptor) = slot.get() else {
        return offline();
    };
    Json(VoteReply {
        vote: acceptor.accept(req.proposal, req.value),
    })
    .into_response()
}

async fn handle_prepare(
    State(slot): State<AcceptorSlot>,
    Json(req): Json<PrepareRequest>,
) -> Response {
    let Some(acceptor) = slot.get() else {
        return offline();
    };
    Json(VoteReply {
        vote: acceptor.handle_prepare_request(req.proposal).await,
    })
    .into_response()
}

async fn handle_accept(
    State(slot): State<AcceptorSlot>,
    Json(req): Json<AcceptRequest>,
) -> Response {
    let Some(acceptor) = slot.get() else {
        return offline();
    };
    Json(VoteReply {
        vote: acceptor.handle_accept_request(req.proposal, &req.value).await,
    })
    .into_response()
}

async fn acceptor_learn(
    State(slot): State<AcceptorSlot>,
    Json(req): Json<LearnRequest>,
) -> Response {
    let Some(acceptor) = slot.get() else {
        return offline();
    };
    match acceptor.learn(&req.value).await {
        Ok(message) => Json(LearnReply { message }).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

async fn is_leader(State(slot): State<AcceptorSlot>) -> Response {
    let Some(acceptor) = slot.get() else {
        return offline();
    };
    Json(IsLeaderReply {
        leader: acceptor.is_leader(),
    })
    .into_response()
}

async fn acceptor_set_leader(
    State(slot): State<AcceptorSlot>,
    Json(req): Json<SetLeaderRequest>,
) -> Response {
    let Some(acceptor) = slot.get() else {
        return offline();
    };
    acceptor.set_leader(req.leader);
    Json(Ack {}).into_response()
}

async fn acceptor_heartbeat(State(slot): State<AcceptorSlot>) -> Response {
    let Some(acceptor) = slot.get() else {
        return offline();
    };
    acceptor.receive_heartbeat();
    Json(Ack {}).into_response()
}

// Learner handler

async fn learner_learn(
    State(learner): State<Arc<Learner>>,
    Json(req): Json<LearnRequest>,
) -> Json<Ack> {
    learner.learn(&req.value);
    Json(Ack {})
}
