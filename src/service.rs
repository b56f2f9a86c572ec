use crate::logging::ActivityLog;
use crate::paxos::Consensus;
use crate::store::KvStore;
use crate::types::{Command, ParseError};
use std::sync::Arc;

/// Client entry point on one peer. Writes are routed through consensus and
/// applied by the learn broadcast; reads are served from the local map
/// without coordination.
pub struct KeyValueService {
    store: KvStore,
    consensus: Arc<dyn Consensus>,
    log: ActivityLog,
    address: String,
}

impl KeyValueService {
    pub fn new(
        store: KvStore,
        consensus: Arc<dyn Consensus>,
        log: ActivityLog,
        address: String,
    ) -> Self {
        Self {
            store,
            consensus,
            log,
            address,
        }
    }

    /// Execute one raw command line. Reply strings are part of the client
    /// protocol and must stay literal.
    pub async fn execute_command(&self, client_id: &str, command: &str) -> String {
        match Command::parse(command) {
            Ok(Command::Get { key }) => {
                self.log.activity(&format!(
                    "{client_id} GET command: key '{key}' at server {}",
                    self.address
                ));
                self.store.get(&key).unwrap_or_else(|| "NULL".to_string())
            }
            Ok(Command::Put { key, value }) => {
                let decided = format!("PUT {key} {value}");
                self.commit(client_id, decided, key).await
            }
            Ok(Command::Delete { key }) => {
                let decided = format!("DELETE {key}");
                self.commit(client_id, decided, key).await
            }
            Err(ParseError::UnknownOperation) => {
                self.log.error(&format!(
                    "{client_id} Invalid command: {command} at server {}",
                    self.address
                ));
                "Invalid command".to_string()
            }
            Err(ParseError::Malformed) => {
                self.log.error(&format!(
                    "{client_id} Malformed command: {command} at server {}",
                    self.address
                ));
                "NULL".to_string()
            }
        }
    }

    async fn commit(&self, client_id: &str, value: String, key: String) -> String {
        if !self.consensus.has_leader() {
            self.log.error(&format!(
                "{client_id} No leader available for commit at server {}",
                self.address
            ));
            return "ERROR: No leader Here".to_string();
        }
        match self.consensus.submit(client_id, value).await {
            Ok(()) => key,
            Err(e) => {
                self.log.error(&format!(
                    "{client_id} Error during commit: {e} at server {}",
                    self.address
                ));
                "ERROR".to_string()
            }
        }
    }
}
