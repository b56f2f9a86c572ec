use async_trait::async_trait;
use paxkv::{ActivityLog, Consensus, KeyValueService, KvStore};
use std::sync::{Arc, Mutex};

struct StubConsensus {
    leader: bool,
    fail: bool,
    submitted: Mutex<Vec<String>>,
}

impl StubConsensus {
    fn new(leader: bool, fail: bool) -> Arc<Self> {
        Arc::new(Self {
            leader,
            fail,
            submitted: Mutex::new(Vec::new()),
        })
    }

    fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Consensus for StubConsensus {
    fn has_leader(&self) -> bool {
        self.leader
    }

    async fn submit(&self, _client_id: &str, value: String) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("proposer unreachable");
        }
        self.submitted.lock().unwrap().push(value);
        Ok(())
    }
}

fn service(consensus: Arc<StubConsensus>, store: KvStore) -> KeyValueService {
    KeyValueService::new(
        store,
        consensus,
        ActivityLog::disabled(),
        "http://127.0.0.1:9000".to_string(),
    )
}

#[tokio::test]
async fn test_get_returns_stored_value() {
    let store = KvStore::new();
    store.put("player", "Kohli");
    let svc = service(StubConsensus::new(true, false), store);
    assert_eq!(svc.execute_command("client", "GET player").await, "Kohli");
}

#[tokio::test]
async fn test_get_miss_returns_null() {
    let svc = service(StubConsensus::new(true, false), KvStore::new());
    assert_eq!(svc.execute_command("client", "GET missing").await, "NULL");
}

#[tokio::test]
async fn test_get_is_served_locally() {
    let consensus = StubConsensus::new(true, false);
    let svc = service(consensus.clone(), KvStore::new());
    svc.execute_command("client", "GET anything").await;
    assert!(consensus.submitted().is_empty());
}

#[tokio::test]
async fn test_put_submits_to_consensus_and_returns_key() {
    let consensus = StubConsensus::new(true, false);
    let svc = service(consensus.clone(), KvStore::new());
    assert_eq!(svc.execute_command("client", "PUT color red").await, "color");
    assert_eq!(consensus.submitted(), vec!["PUT color red".to_string()]);
}

#[tokio::test]
async fn test_put_value_with_spaces_survives() {
    let consensus = StubConsensus::new(true, false);
    let svc = service(consensus.clone(), KvStore::new());
    assert_eq!(
        svc.execute_command("client", "put weakness leg spin").await,
        "weakness"
    );
    assert_eq!(consensus.submitted(), vec!["PUT weakness leg spin".to_string()]);
}

#[tokio::test]
async fn test_delete_submits_two_token_value() {
    let consensus = StubConsensus::new(true, false);
    let svc = service(consensus.clone(), KvStore::new());
    assert_eq!(svc.execute_command("client", "DELETE color").await, "color");
    assert_eq!(consensus.submitted(), vec!["DELETE color".to_string()]);
}

#[tokio::test]
async fn test_write_without_leader() {
    let consensus = StubConsensus::new(false, false);
    let svc = service(consensus.clone(), KvStore::new());
    assert_eq!(
        svc.execute_command("client", "PUT color red").await,
        "ERROR: No leader Here"
    );
    assert!(consensus.submitted().is_empty());
}

#[tokio::test]
async fn test_write_failure_during_submission() {
    let svc = service(StubConsensus::new(true, true), KvStore::new());
    assert_eq!(svc.execute_command("client", "PUT color red").await, "ERROR");
}

#[tokio::test]
async fn test_unknown_operation() {
    let svc = service(StubConsensus::new(true, false), KvStore::new());
    assert_eq!(
        svc.execute_command("client", "FOO bar baz").await,
        "Invalid command"
    );
}

#[tokio::test]
async fn test_malformed_commands_return_null_without_consensus() {
    let consensus = StubConsensus::new(true, false);
    let svc = service(consensus.clone(), KvStore::new());
    assert_eq!(svc.execute_command("client", "GET").await, "NULL");
    assert_eq!(svc.execute_command("client", "PUT key").await, "NULL");
    assert_eq!(svc.execute_command("client", "DELETE a b").await, "NULL");
    assert!(consensus.submitted().is_empty());
}
