use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Quiescence window: delay after the last mutation before the snapshot
    /// is written out, coalescing bursts of edits into one write.
    #[serde(default = "default_quiescence_ms")]
    pub quiescence_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            quiescence_ms: default_quiescence_ms(),
        }
    }
}

impl SyncConfig {
    pub fn quiescence(&self) -> Duration {
        Duration::from_millis(self.quiescence_ms)
    }
}

fn default_base_url() -> String {
    "https://api.jsonstorage.net/v1/json".to_string()
}

fn default_quiescence_ms() -> u64 {
    3000
}
