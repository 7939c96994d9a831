//! # Global controller configuration.
//!
//! [`ControllerConfig`] centralizes the tunables of the process controller
//! and the domain connection: the reserved host-controller process name,
//! respawn limits, observer write bounds, and the liveness-probe timings.
//!
//! Environment overrides are read **once** at startup via
//! [`ControllerConfig::from_env`]:
//!
//! | Variable                        | Field             | Default |
//! |---------------------------------|-------------------|---------|
//! | `HOSTVISOR_PING_INTERVAL_MS`    | `ping_interval`   | 15000   |
//! | `HOSTVISOR_PING_TIMEOUT_MS`     | `ping_timeout`    | 30000   |
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use hostvisor::ControllerConfig;
//!
//! let mut cfg = ControllerConfig::default();
//! cfg.max_respawns = 5;
//!
//! assert_eq!(cfg.ping_interval, Duration::from_millis(15_000));
//! ```

use std::time::Duration;

use crate::policies::BackoffPolicy;

/// Well-known name of the supervised host-controller process.
///
/// On global shutdown this process is always stopped and removed from the
/// registry before any other still-running process is touched, because it
/// may itself be coordinating graceful shutdown of the managed servers.
pub const HOST_CONTROLLER_PROCESS_NAME: &str = "Host Controller";

/// Length of a raw process authentication key, in bytes (128 bits).
pub const AUTH_BYTES_LENGTH: usize = 16;

/// Length of a base64-encoded authentication key, in bytes.
pub const AUTH_BYTES_ENCODED_LENGTH: usize = 24;

/// Global configuration for the process controller and domain connection.
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    /// Name of the reserved host-controller process.
    pub host_controller_name: String,
    /// Maximum automatic respawns of a crashed process before giving up.
    pub max_respawns: u32,
    /// Delay policy between respawns of a crashing process.
    pub respawn_backoff: BackoffPolicy,
    /// Delay policy between reconnect passes of the domain connection.
    pub reconnect_backoff: BackoffPolicy,
    /// Upper bound for a single observer event write; slower observers are
    /// treated as failed and pruned.
    pub observer_write_timeout: Duration,
    /// Interval between liveness probes of the coordinator.
    pub ping_interval: Duration,
    /// Bounded wait for a single ping response.
    pub ping_timeout: Duration,
    /// Whether the liveness probe is armed after registration.
    pub ping_enabled: bool,
}

impl Default for ControllerConfig {
    /// Provides a default configuration:
    /// - `host_controller_name = "Host Controller"`
    /// - `max_respawns = 10`
    /// - `observer_write_timeout = 10s`
    /// - `ping_interval = 15s`, `ping_timeout = 30s`, `ping_enabled = true`
    fn default() -> Self {
        Self {
            host_controller_name: HOST_CONTROLLER_PROCESS_NAME.to_string(),
            max_respawns: 10,
            respawn_backoff: BackoffPolicy::default(),
            reconnect_backoff: BackoffPolicy::default(),
            observer_write_timeout: Duration::from_secs(10),
            ping_interval: Duration::from_millis(15_000),
            ping_timeout: Duration::from_millis(30_000),
            ping_enabled: true,
        }
    }
}

impl ControllerConfig {
    /// Builds a configuration with environment overrides applied.
    ///
    /// Unparseable or non-positive values fall back to the defaults, same as
    /// every other misconfiguration in the registry: logged and ignored.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(interval) = read_millis("HOSTVISOR_PING_INTERVAL_MS") {
            cfg.ping_interval = interval;
        }
        if let Some(timeout) = read_millis("HOSTVISOR_PING_TIMEOUT_MS") {
            cfg.ping_timeout = timeout;
        }
        cfg
    }
}

fn read_millis(var: &str) -> Option<Duration> {
    let raw = std::env::var(var).ok()?;
    match raw.parse::<u64>() {
        Ok(ms) if ms > 0 => Some(Duration::from_millis(ms)),
        _ => {
            tracing::warn!(var, value = %raw, "ignoring invalid duration override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = ControllerConfig::default();
        assert_eq!(cfg.ping_interval, Duration::from_millis(15_000));
        assert_eq!(cfg.ping_timeout, Duration::from_millis(30_000));
        assert_eq!(cfg.host_controller_name, HOST_CONTROLLER_PROCESS_NAME);
        assert!(cfg.ping_enabled);
    }
}
