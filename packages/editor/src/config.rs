//! Engine tuning knobs, deserializable from the `engine` block of
//! `casework.config.json`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What happens to an optimistic change when its remote write fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RollbackPolicy {
    /// Undo the local change exactly and report the failure
    #[default]
    Revert,
    /// Keep the local change, report the failure and schedule a reconcile
    KeepOptimistic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Quiet period after the last local change before a reconcile
    pub debounce_ms: u64,

    /// Window after a completed write during which refreshes are refused
    pub cooldown_ms: u64,

    pub rollback: RollbackPolicy,

    /// Prefix for every session cache key
    pub cache_namespace: String,

    /// Disclosure state of sections the author never toggled
    pub open_by_default: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            cooldown_ms: 250,
            rollback: RollbackPolicy::Revert,
            cache_namespace: "casework".to_string(),
            open_by_default: false,
        }
    }
}

impl EngineConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn with_rollback(mut self, rollback: RollbackPolicy) -> Self {
        self.rollback = rollback;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "debounceMs": 50, "rollback": "keepOptimistic" }"#).unwrap();

        assert_eq!(config.debounce(), Duration::from_millis(50));
        assert_eq!(config.cooldown_ms, 250);
        assert_eq!(config.rollback, RollbackPolicy::KeepOptimistic);
        assert_eq!(config.cache_namespace, "casework");
        assert!(!config.open_by_default);
    }

    #[test]
    fn test_unknown_rollback_policy_is_rejected() {
        let result: Result<EngineConfig, _> = serde_json::from_str(r#"{ "rollback": "retry" }"#);
        assert!(result.is_err());
    }
}
