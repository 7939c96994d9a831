//! # ProcessRegistry: supervisor core.
//!
//! ## Architecture
//! ```text
//! ProcessRegistry (Arc)
//!     │
//!     ├── Mutex<Inner> ── processes: name ─► ManagedProcess
//!     │                └─ by_key:    auth ─► name
//!     ├── ObserverSet ──► broadcast(ProcessEvent) to every observer
//!     ├── AtomicBool ───► shutdown latch (sticky)
//!     └── Notify ───────► wakes shutdown() when a process drains out
//!
//! start_process ──► spawn child ──► monitor task ── child.wait() ──┐
//!                                                                  ▼
//!                                                        on_process_exit
//!                                      stop requested / shutdown: remove
//!                                      crashed + respawn budget: respawn
//!                                      otherwise: rests as Stopped
//! ```
//!
//! ## Rules
//! - Both identity maps mutate together, under the same lock acquisition.
//! - Operations never return errors for per-process failures; they log via
//!   `tracing` and broadcast [`ProcessEvent::OperationFailed`].
//! - Once the shutdown latch is set it never clears; `add_process` and
//!   `start_process` refuse, `ongoing_process_count` reports zero.
//! - On shutdown the reserved host-controller process is stopped and fully
//!   removed before any other process is signaled.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::AsyncRead;
use tokio::process::Child;
use tokio::sync::{Mutex, MutexGuard, Notify};

use crate::config::{ControllerConfig, AUTH_BYTES_LENGTH};
use crate::events::{FailedOperation, InventoryRecord, ObserverConnection, ObserverSet, ProcessEvent};
use crate::process::{AuthKey, ManagedProcess};

/// Registry state behind the coarse lock.
struct Inner {
    processes: HashMap<String, ManagedProcess>,
    by_key: HashMap<AuthKey, String>,
}

/// Owner of all managed processes and the only mutator of their state.
pub struct ProcessRegistry {
    cfg: ControllerConfig,
    inner: Mutex<Inner>,
    observers: ObserverSet,
    shutdown: AtomicBool,
    drained: Notify,
}

impl ProcessRegistry {
    /// Creates an empty registry.
    pub fn new(cfg: ControllerConfig) -> Arc<Self> {
        let observers = ObserverSet::new(cfg.observer_write_timeout);
        Arc::new(Self {
            cfg,
            inner: Mutex::new(Inner {
                processes: HashMap::new(),
                by_key: HashMap::new(),
            }),
            observers,
            shutdown: AtomicBool::new(false),
            drained: Notify::new(),
        })
    }

    /// Attaches an observer connection. Refused after shutdown was requested.
    pub fn attach_observer(&self, observer: Arc<dyn ObserverConnection>) {
        if self.is_shutdown() {
            tracing::warn!(observer = observer.name(), "refusing observer attach after shutdown");
            return;
        }
        self.observers.attach(observer);
    }

    /// Detaches an observer connection (pointer identity).
    pub fn detach_observer(&self, observer: &Arc<dyn ObserverConnection>) {
        self.observers.detach(observer);
    }

    /// Returns `true` once shutdown has been requested.
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Number of registered processes; always 0 once shutdown was requested.
    pub async fn ongoing_process_count(&self) -> usize {
        if self.is_shutdown() {
            return 0;
        }
        self.inner.lock().await.processes.len()
    }

    /// Resolves a process name from raw authentication-key bytes.
    pub async fn server_by_auth_code(&self, code: &[u8]) -> Option<String> {
        let key = AuthKey::from_raw(code.to_vec());
        self.inner.lock().await.by_key.get(&key).cloned()
    }

    /// Registers a new process with a freshly generated authentication key.
    ///
    /// Returns the key so the caller can pass it to the child (command line,
    /// environment). `None` means the registration was refused; the reason is
    /// logged and broadcast as a failed `Add`.
    #[allow(clippy::too_many_arguments)]
    pub async fn add_process(
        &self,
        name: &str,
        command: Vec<String>,
        env: HashMap<String, String>,
        working_dir: PathBuf,
        privileged: bool,
        respawn: bool,
    ) -> Option<AuthKey> {
        let key = AuthKey::generate();
        self.register(name, None, key.clone(), command, env, working_dir, privileged, respawn)
            .await
            .then_some(key)
    }

    /// Registers a process under a caller-supplied key.
    ///
    /// Used when re-registering processes after a controller restart, where
    /// the key was minted by a previous incarnation.
    #[allow(clippy::too_many_arguments)]
    pub async fn add_reconnected_process(
        &self,
        name: &str,
        id: Option<i64>,
        auth_key: AuthKey,
        command: Vec<String>,
        env: HashMap<String, String>,
        working_dir: PathBuf,
        privileged: bool,
        respawn: bool,
    ) -> bool {
        self.register(name, id, auth_key, command, env, working_dir, privileged, respawn)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn register(
        &self,
        name: &str,
        id: Option<i64>,
        auth_key: AuthKey,
        command: Vec<String>,
        env: HashMap<String, String>,
        working_dir: PathBuf,
        privileged: bool,
        respawn: bool,
    ) -> bool {
        if self.is_shutdown() {
            tracing::warn!(process = name, "refusing to add process after shutdown");
            return false;
        }
        if auth_key.as_bytes().len() != AUTH_BYTES_LENGTH {
            tracing::warn!(process = name, "rejecting process with malformed auth key");
            self.fail(FailedOperation::Add, name).await;
            return false;
        }
        // Validated before any map mutation.
        if command.is_empty() || command.iter().any(|element| element.is_empty()) {
            tracing::warn!(process = name, "rejecting process with empty command element");
            self.fail(FailedOperation::Add, name).await;
            return false;
        }

        let mut inner = self.inner.lock().await;
        if inner.processes.contains_key(name) || inner.by_key.contains_key(&auth_key) {
            tracing::warn!(process = name, "duplicate process registration ignored");
            self.fail(FailedOperation::Add, name).await;
            return false;
        }

        let process = ManagedProcess::new(
            name.to_string(),
            id,
            auth_key.clone(),
            command,
            env,
            working_dir,
            privileged,
            respawn,
        );
        inner.by_key.insert(auth_key, name.to_string());
        inner.processes.insert(name.to_string(), process);
        tracing::debug!(process = name, "process added");
        self.observers
            .broadcast(&ProcessEvent::Added { name: name.to_string() })
            .await;
        true
    }

    /// Starts a registered process and arms its exit monitor.
    pub async fn start_process(self: &Arc<Self>, name: &str) {
        if self.is_shutdown() {
            tracing::warn!(process = name, "refusing to start process after shutdown");
            return;
        }
        let mut inner = self.inner.lock().await;
        let Some(process) = inner.processes.get_mut(name) else {
            tracing::warn!(process = name, "start requested for unknown process");
            return;
        };
        if !process.state().can_start() {
            tracing::warn!(process = name, state = ?process.state(), "process cannot start");
            self.fail(FailedOperation::Start, name).await;
            return;
        }
        match process.spawn() {
            Ok(child) => {
                tracing::debug!(process = name, "process started");
                self.observers
                    .broadcast(&ProcessEvent::Started { name: name.to_string() })
                    .await;
                self.spawn_monitor(name.to_string(), child);
            }
            Err(err) => {
                tracing::warn!(process = name, %err, "failed to spawn process");
                self.fail(FailedOperation::Start, name).await;
            }
        }
    }

    /// Requests a graceful stop (SIGTERM). The exit is observed by the
    /// monitor task; removal follows there.
    pub async fn stop_process(&self, name: &str) {
        let mut inner = self.inner.lock().await;
        let Some(process) = inner.processes.get_mut(name) else {
            tracing::warn!(process = name, "stop requested for unknown process");
            return;
        };
        if !process.state().is_alive() {
            tracing::warn!(process = name, state = ?process.state(), "stop on a process that is not alive");
            self.fail(FailedOperation::Stop, name).await;
            return;
        }
        process.initiate_stop();
    }

    /// Forcefully terminates a process (SIGKILL).
    pub async fn destroy_process(&self, name: &str) {
        let mut inner = self.inner.lock().await;
        let Some(process) = inner.processes.get_mut(name) else {
            tracing::warn!(process = name, "destroy requested for unknown process");
            return;
        };
        if !process.destroy() {
            self.fail(FailedOperation::Destroy, name).await;
        }
    }

    /// Immediate kill (SIGKILL), no stopping courtesy.
    pub async fn kill_process(&self, name: &str) {
        let mut inner = self.inner.lock().await;
        let Some(process) = inner.processes.get_mut(name) else {
            tracing::warn!(process = name, "kill requested for unknown process");
            return;
        };
        if !process.kill_hard() {
            self.fail(FailedOperation::Kill, name).await;
        }
    }

    /// Removes a process that is not alive. Alive processes must be stopped
    /// (or destroyed) first; their exit monitor performs the removal when a
    /// stop was requested.
    pub async fn remove_process(&self, name: &str) {
        let mut inner = self.inner.lock().await;
        match inner.processes.get(name) {
            None => {
                tracing::warn!(process = name, "remove requested for unknown process");
            }
            Some(process) if process.state().is_alive() => {
                tracing::warn!(process = name, state = ?process.state(), "cannot remove a live process");
                self.fail(FailedOperation::Remove, name).await;
            }
            Some(_) => {
                self.remove_locked(&mut inner, name).await;
            }
        }
    }

    /// Pipes bytes from `source` into the process's standard input.
    pub async fn send_stdin(&self, name: &str, source: &mut (dyn AsyncRead + Send + Unpin)) {
        let mut inner = self.inner.lock().await;
        let Some(process) = inner.processes.get_mut(name) else {
            tracing::warn!(process = name, "stdin requested for unknown process");
            return;
        };
        if let Err(err) = process.send_stdin(source).await {
            tracing::warn!(process = name, %err, "failed to pipe stdin");
            self.fail(FailedOperation::SendStdin, name).await;
        }
    }

    /// Instructs a running process to reconnect its management channel to a
    /// new endpoint, without respawning it.
    pub async fn reconnect_process(
        &self,
        name: &str,
        scheme: &str,
        host: &str,
        port: u16,
        use_management_endpoint: bool,
        auth_key: &AuthKey,
    ) {
        let mut inner = self.inner.lock().await;
        let Some(process) = inner.processes.get_mut(name) else {
            tracing::warn!(process = name, "reconnect requested for unknown process");
            return;
        };
        if let Err(err) = process
            .reconnect(scheme, host, port, use_management_endpoint, auth_key)
            .await
        {
            tracing::warn!(process = name, %err, "failed to send reconnect command");
            self.fail(FailedOperation::Reconnect, name).await;
        }
    }

    /// Broadcasts a full inventory snapshot to every observer.
    pub async fn send_inventory(&self) {
        let inner = self.inner.lock().await;
        let records: Vec<InventoryRecord> = inner
            .processes
            .values()
            .map(|p| InventoryRecord {
                name: p.name().to_string(),
                auth_key: p.auth_key().clone(),
                running: p.is_running(),
                stopping: p.is_stopping(),
            })
            .collect();
        self.observers
            .broadcast(&ProcessEvent::Inventory { records })
            .await;
    }

    /// Shuts the registry down: the reserved host-controller process is
    /// stopped and fully removed first, then every remaining process, and the
    /// call returns only once the registry is empty.
    ///
    /// Idempotent; a second call returns immediately.
    pub async fn shutdown(&self) {
        if self.shutdown.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::debug!("process registry shutting down");

        let hc_name = self.cfg.host_controller_name.clone();
        {
            let mut inner = self.inner.lock().await;
            self.stop_or_drop_locked(&mut inner, &hc_name).await;
        }
        self.wait_absent(&hc_name).await;

        {
            let mut inner = self.inner.lock().await;
            let names: Vec<String> = inner.processes.keys().cloned().collect();
            for name in names {
                self.stop_or_drop_locked(&mut inner, &name).await;
            }
        }
        self.wait_empty().await;
        tracing::debug!("process registry drained");
    }

    // ---------------------------
    // Internals
    // ---------------------------

    /// Stops a live process or, when it is not alive, removes it outright.
    async fn stop_or_drop_locked(&self, inner: &mut MutexGuard<'_, Inner>, name: &str) {
        let alive = match inner.processes.get_mut(name) {
            Some(process) if process.state().is_alive() => {
                process.initiate_stop();
                true
            }
            Some(_) => false,
            None => return,
        };
        if !alive {
            self.remove_locked(inner, name).await;
        }
    }

    /// Removes the process from both maps, broadcasts the removal, and wakes
    /// shutdown waiters. Caller holds the lock.
    async fn remove_locked(&self, inner: &mut MutexGuard<'_, Inner>, name: &str) {
        let Some(mut process) = inner.processes.remove(name) else {
            return;
        };
        inner.by_key.remove(process.auth_key());
        process.mark_removed();
        tracing::debug!(process = name, "process removed");
        self.observers
            .broadcast(&ProcessEvent::Removed { name: name.to_string() })
            .await;
        self.drained.notify_one();
    }

    /// Blocks until the named process is gone from the registry.
    async fn wait_absent(&self, name: &str) {
        loop {
            let notified = self.drained.notified();
            {
                let inner = self.inner.lock().await;
                if !inner.processes.contains_key(name) {
                    return;
                }
            }
            notified.await;
        }
    }

    /// Blocks until the registry holds no processes.
    async fn wait_empty(&self) {
        loop {
            let notified = self.drained.notified();
            {
                let inner = self.inner.lock().await;
                if inner.processes.is_empty() {
                    return;
                }
            }
            notified.await;
        }
    }

    async fn fail(&self, operation: FailedOperation, name: &str) {
        self.observers
            .broadcast(&ProcessEvent::OperationFailed {
                operation,
                name: name.to_string(),
            })
            .await;
    }

    /// Arms the exit monitor: one task per spawned child, awaiting the OS
    /// exit and driving the stop/respawn/removal transition.
    fn spawn_monitor(self: &Arc<Self>, name: String, mut child: Child) {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => {
                    tracing::debug!(process = %name, %status, "process exited");
                }
                Err(err) => {
                    tracing::warn!(process = %name, %err, "failed to await process exit");
                }
            }
            registry.on_process_exit(&name).await;
        });
    }

    async fn on_process_exit(self: &Arc<Self>, name: &str) {
        let mut inner = self.inner.lock().await;
        let Some(process) = inner.processes.get_mut(name) else {
            return;
        };
        let uptime = process.note_exited();
        let expected = process.stop_requested();
        let respawning = !expected && process.should_respawn(self.cfg.max_respawns);
        if respawning {
            process.mark_respawning();
        }
        let attempt = process.respawn_count();

        self.observers
            .broadcast(&ProcessEvent::Stopped {
                name: name.to_string(),
                uptime,
            })
            .await;

        if expected || self.is_shutdown() {
            self.remove_locked(&mut inner, name).await;
            return;
        }
        if respawning {
            let delay = self.cfg.respawn_backoff.next(attempt.saturating_sub(1));
            tracing::warn!(process = name, attempt, ?delay, "process crashed; scheduling respawn");
            let registry = Arc::clone(self);
            let name = name.to_string();
            drop(inner);
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                registry.respawn(&name).await;
            });
            return;
        }
        tracing::warn!(process = name, ?uptime, "process stopped and will not respawn");
    }

    /// Delayed respawn of a crashed process.
    async fn respawn(self: &Arc<Self>, name: &str) {
        let mut inner = self.inner.lock().await;
        if self.is_shutdown() {
            self.remove_locked(&mut inner, name).await;
            return;
        }
        let Some(process) = inner.processes.get_mut(name) else {
            return;
        };
        if process.stop_requested() {
            self.remove_locked(&mut inner, name).await;
            return;
        }
        match process.spawn() {
            Ok(child) => {
                tracing::debug!(process = name, "process respawned");
                self.observers
                    .broadcast(&ProcessEvent::Started { name: name.to_string() })
                    .await;
                self.spawn_monitor(name.to_string(), child);
            }
            Err(err) => {
                tracing::warn!(process = name, %err, "respawn failed");
                self.fail(FailedOperation::Start, name).await;
            }
        }
    }

    #[cfg(test)]
    async fn map_cardinalities(&self) -> (usize, usize) {
        let inner = self.inner.lock().await;
        (inner.processes.len(), inner.by_key.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::{BackoffPolicy, JitterPolicy};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::time::Duration;

    /// Observer that decodes and records every event it receives.
    struct TraceObserver {
        events: std::sync::Mutex<Vec<ProcessEvent>>,
    }

    impl TraceObserver {
        fn arc() -> Arc<Self> {
            Arc::new(Self {
                events: std::sync::Mutex::new(Vec::new()),
            })
        }

        fn events(&self) -> Vec<ProcessEvent> {
            self.events.lock().unwrap().clone()
        }

        fn position(&self, wanted: &ProcessEvent) -> Option<usize> {
            self.events().iter().position(|e| e == wanted)
        }
    }

    #[async_trait]
    impl ObserverConnection for TraceObserver {
        async fn send(&self, frame: Bytes) -> std::io::Result<()> {
            let event = crate::events::codec::decode(&frame)
                .map_err(|e| std::io::Error::other(e.to_string()))?;
            self.events.lock().unwrap().push(event);
            Ok(())
        }

        fn name(&self) -> &'static str {
            "trace"
        }
    }

    fn test_config() -> ControllerConfig {
        let mut cfg = ControllerConfig::default();
        cfg.respawn_backoff = BackoffPolicy {
            first: Duration::from_millis(10),
            max: Duration::from_millis(50),
            factor: 2.0,
            jitter: JitterPolicy::None,
        };
        cfg
    }

    fn sh(script: &str) -> Vec<String> {
        vec!["/bin/sh".into(), "-c".into(), script.into()]
    }

    async fn add(registry: &Arc<ProcessRegistry>, name: &str, command: Vec<String>) -> Option<AuthKey> {
        registry
            .add_process(
                name,
                command,
                HashMap::new(),
                std::env::temp_dir(),
                false,
                false,
            )
            .await
    }

    #[tokio::test]
    async fn both_maps_stay_in_sync() {
        let registry = ProcessRegistry::new(test_config());
        let key_one = add(&registry, "server-one", sh("exit 0")).await.unwrap();
        add(&registry, "server-two", sh("exit 0")).await.unwrap();

        assert_eq!(registry.map_cardinalities().await, (2, 2));
        assert_eq!(
            registry.server_by_auth_code(key_one.as_bytes()).await,
            Some("server-one".to_string())
        );

        registry.remove_process("server-one").await;
        assert_eq!(registry.map_cardinalities().await, (1, 1));
        assert_eq!(registry.server_by_auth_code(key_one.as_bytes()).await, None);
    }

    #[tokio::test]
    async fn empty_command_element_is_rejected_before_any_mutation() {
        let registry = ProcessRegistry::new(test_config());
        let trace = TraceObserver::arc();
        registry.attach_observer(trace.clone());

        assert!(add(&registry, "bad", vec!["/bin/sh".into(), String::new()]).await.is_none());
        assert!(add(&registry, "worse", vec![]).await.is_none());

        assert_eq!(registry.map_cardinalities().await, (0, 0));
        let failed: Vec<_> = trace
            .events()
            .into_iter()
            .filter(|e| matches!(e, ProcessEvent::OperationFailed { operation: FailedOperation::Add, .. }))
            .collect();
        assert_eq!(failed.len(), 2);
    }

    #[tokio::test]
    async fn duplicate_add_is_refused() {
        let registry = ProcessRegistry::new(test_config());
        assert!(add(&registry, "server-one", sh("exit 0")).await.is_some());
        assert!(add(&registry, "server-one", sh("exit 0")).await.is_none());
        assert_eq!(registry.map_cardinalities().await, (1, 1));
    }

    #[tokio::test]
    async fn live_process_cannot_be_removed() {
        let registry = ProcessRegistry::new(test_config());
        let trace = TraceObserver::arc();
        registry.attach_observer(trace.clone());

        add(&registry, "server-one", sh("sleep 30")).await.unwrap();
        registry.start_process("server-one").await;
        registry.remove_process("server-one").await;

        assert_eq!(registry.map_cardinalities().await, (1, 1));
        assert!(trace
            .position(&ProcessEvent::OperationFailed {
                operation: FailedOperation::Remove,
                name: "server-one".into(),
            })
            .is_some());

        registry.kill_process("server-one").await;
        registry.shutdown().await;
    }

    #[tokio::test]
    async fn stop_flows_through_exit_monitor_to_removal() {
        let registry = ProcessRegistry::new(test_config());
        let trace = TraceObserver::arc();
        registry.attach_observer(trace.clone());

        add(&registry, "server-one", sh("sleep 30")).await.unwrap();
        registry.start_process("server-one").await;
        registry.stop_process("server-one").await;

        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if registry.ongoing_process_count().await == 0 {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        })
        .await
        .expect("stopped process was not removed");

        let events = trace.events();
        let stopped = events
            .iter()
            .position(|e| matches!(e, ProcessEvent::Stopped { name, .. } if name == "server-one"))
            .expect("no stopped event");
        let removed = trace
            .position(&ProcessEvent::Removed { name: "server-one".into() })
            .expect("no removed event");
        assert!(stopped < removed);
    }

    #[tokio::test]
    async fn crashed_process_respawns_within_budget() {
        let registry = ProcessRegistry::new(test_config());
        let trace = TraceObserver::arc();
        registry.attach_observer(trace.clone());

        registry
            .add_process(
                "crasher",
                sh("exit 1"),
                HashMap::new(),
                std::env::temp_dir(),
                false,
                true,
            )
            .await
            .unwrap();
        registry.start_process("crasher").await;

        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let starts = trace
                    .events()
                    .iter()
                    .filter(|e| matches!(e, ProcessEvent::Started { name } if name == "crasher"))
                    .count();
                if starts >= 2 {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        })
        .await
        .expect("crashed process was not respawned");
    }

    #[tokio::test]
    async fn shutdown_removes_host_controller_before_stopping_others() {
        let registry = ProcessRegistry::new(test_config());
        let trace = TraceObserver::arc();
        registry.attach_observer(trace.clone());

        add(&registry, "Host Controller", sh("sleep 30")).await.unwrap();
        add(&registry, "server-one", sh("sleep 30")).await.unwrap();
        registry.start_process("Host Controller").await;
        registry.start_process("server-one").await;

        tokio::time::timeout(Duration::from_secs(10), registry.shutdown())
            .await
            .expect("shutdown did not drain");

        let hc_removed = trace
            .position(&ProcessEvent::Removed { name: "Host Controller".into() })
            .expect("host controller was not removed");
        let events = trace.events();
        let server_stopped = events
            .iter()
            .position(|e| matches!(e, ProcessEvent::Stopped { name, .. } if name == "server-one"))
            .expect("server was not stopped");
        assert!(
            hc_removed < server_stopped,
            "host controller removal (index {hc_removed}) must precede server stop (index {server_stopped})"
        );
        assert_eq!(registry.map_cardinalities().await, (0, 0));
    }

    #[tokio::test]
    async fn ongoing_count_is_zero_once_shutdown_is_requested() {
        let registry = ProcessRegistry::new(test_config());
        add(&registry, "server-one", sh("exit 0")).await.unwrap();
        assert_eq!(registry.ongoing_process_count().await, 1);

        registry.shutdown().await;
        assert_eq!(registry.ongoing_process_count().await, 0);
        assert!(add(&registry, "late", sh("exit 0")).await.is_none());
    }

    #[tokio::test]
    async fn inventory_snapshot_covers_every_process() {
        let registry = ProcessRegistry::new(test_config());
        let trace = TraceObserver::arc();
        registry.attach_observer(trace.clone());

        add(&registry, "server-one", sh("sleep 30")).await.unwrap();
        add(&registry, "server-two", sh("exit 0")).await.unwrap();
        registry.start_process("server-one").await;
        registry.send_inventory().await;

        let inventory = trace
            .events()
            .into_iter()
            .find_map(|e| match e {
                ProcessEvent::Inventory { records } => Some(records),
                _ => None,
            })
            .expect("no inventory event");
        assert_eq!(inventory.len(), 2);
        let one = inventory.iter().find(|r| r.name == "server-one").unwrap();
        assert!(one.running);
        let two = inventory.iter().find(|r| r.name == "server-two").unwrap();
        assert!(!two.running);

        registry.kill_process("server-one").await;
        registry.shutdown().await;
    }
}
