use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ClusterConfig {
    pub host: String,
    pub ports: Vec<u16>,
    pub timing: TimingConfig,
}

impl ClusterConfig {
    pub fn new(host: String, ports: Vec<u16>) -> Self {
        Self {
            host,
            ports,
            timing: TimingConfig::default(),
        }
    }

    /// Base URL of every peer, in cluster order.
    pub fn peer_urls(&self) -> Vec<String> {
        self.ports
            .iter()
            .map(|port| format!("http://{}:{}", self.host, port))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    pub heartbeat_interval_ms: u64,
    pub monitor_interval_ms: u64,
    pub election_min_interval_ms: u64,
    pub failure_delay_min_secs: u64,
    pub failure_delay_max_secs: u64,
    pub rpc_timeout_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_ms: 5_000,
            monitor_interval_ms: 7_000,
            election_min_interval_ms: 1_000,
            failure_delay_min_secs: 10,
            failure_delay_max_secs: 20,
            rpc_timeout_ms: 10_000,
        }
    }
}

impl TimingConfig {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }

    pub fn monitor_interval(&self) -> Duration {
        Duration::from_millis(self.monitor_interval_ms)
    }

    pub fn election_min_interval(&self) -> Duration {
        Duration::from_millis(self.election_min_interval_ms)
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout_ms)
    }
}
