use crate::logging::ActivityLog;
use crate::store::KvStore;

/// One peer's learner. Applies decided values to the co-located store; the
/// store handle is handed over at construction.
pub struct Learner {
    store: KvStore,
    log: ActivityLog,
}

impl Learner {
    pub fn new(store: KvStore, log: ActivityLog) -> Self {
        Self { store, log }
    }

    /// Apply a decided value of the form `PUT <key> <value>` or
    /// `DELETE <key>`. Anything else is logged and dropped; a DELETE of an
    /// absent key logs an error but is not fatal.
    pub fn learn(&self, value: &str) {
        self.log.activity(&format!("Learning value: {value}"));
        let parts: Vec<&str> = value.splitn(3, ' ').collect();
        match parts[0].to_uppercase().as_str() {
            "PUT" => {
                if parts.len() == 3 && parts.iter().all(|part| !part.trim().is_empty()) {
                    self.store.put(parts[1], parts[2]);
                    self.log.activity(&format!(
                        "PUT applied for key {} with value {}",
                        parts[1], parts[2]
                    ));
                } else {
                    self.log.error(&format!("Invalid PUT format: {value}"));
                }
            }
            "DELETE" => {
                if parts.len() >= 2 && !parts[1].trim().is_empty() {
                    if self.store.remove(parts[1]).is_some() {
                        self.log
                            .activity(&format!("DELETE applied for key {}", parts[1]));
                    } else {
                        self.log
                            .error(&format!("DELETE failed: key {} not found", parts[1]));
                    }
                } else {
                    self.log.error(&format!("Invalid DELETE format: {value}"));
                }
            }
            _ => {
                self.log
                    .error(&format!("Unknown operation in value: {value}"));
            }
        }
    }
}
