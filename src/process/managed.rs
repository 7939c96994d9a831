//! # One managed OS child process.
//!
//! [`ManagedProcess`] bundles the spawn parameters (command vector,
//! environment, working directory, flags) with the live runtime handle (pid,
//! stdin pipe, start instant). Every method is invoked only while the caller
//! holds the registry lock; none blocks on I/O that depends on another
//! locked operation completing.
//!
//! The registry owns the exit-monitor task: [`ManagedProcess::spawn`] hands
//! the [`Child`] back so the registry can await its exit and drive the
//! crash/respawn/removal transitions.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};

use crate::process::auth::AuthKey;
use crate::process::state::ProcessState;
use crate::wire;

/// Leading tag of a reconnect command written to the child's stdin.
const STDIN_RECONNECT: u8 = 0x30;

/// Runtime handle of a live child process.
struct RuntimeHandle {
    pid: Option<u32>,
    stdin: Option<ChildStdin>,
    started_at: Instant,
}

/// Spawn parameters and runtime state of one supervised OS process.
pub struct ManagedProcess {
    name: String,
    id: Option<i64>,
    auth_key: AuthKey,
    command: Vec<String>,
    env: HashMap<String, String>,
    working_dir: PathBuf,
    privileged: bool,
    respawn: bool,
    state: ProcessState,
    stop_requested: bool,
    respawn_count: u32,
    handle: Option<RuntimeHandle>,
}

impl ManagedProcess {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: String,
        id: Option<i64>,
        auth_key: AuthKey,
        command: Vec<String>,
        env: HashMap<String, String>,
        working_dir: PathBuf,
        privileged: bool,
        respawn: bool,
    ) -> Self {
        Self {
            name,
            id,
            auth_key,
            command,
            env,
            working_dir,
            privileged,
            respawn,
            state: ProcessState::Defined,
            stop_requested: false,
            respawn_count: 0,
            handle: None,
        }
    }

    /// Spawns the OS process and returns the child for the registry's
    /// exit-monitor task.
    ///
    /// Stdin is piped (for [`send_stdin`](Self::send_stdin) and
    /// [`reconnect`](Self::reconnect)); stdout/stderr are inherited so child
    /// output lands in the controller's own streams.
    pub(crate) fn spawn(&mut self) -> std::io::Result<Child> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| std::io::Error::other("empty command"))?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .envs(&self.env)
            .current_dir(&self.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(false);

        self.state = ProcessState::Starting;
        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => {
                self.state = ProcessState::Stopped;
                return Err(err);
            }
        };
        self.handle = Some(RuntimeHandle {
            pid: child.id(),
            stdin: child.stdin.take(),
            started_at: Instant::now(),
        });
        self.stop_requested = false;
        self.state = ProcessState::Running;
        Ok(child)
    }

    /// Requests a graceful stop (SIGTERM).
    ///
    /// Returns `false` if the process was not alive.
    pub(crate) fn initiate_stop(&mut self) -> bool {
        if !self.state.is_alive() {
            return false;
        }
        self.stop_requested = true;
        self.state = ProcessState::Stopping;
        self.signal(TermSignal::Term)
    }

    /// Forced termination (SIGKILL), still waiting for the monitor to
    /// observe the exit.
    pub(crate) fn destroy(&mut self) -> bool {
        if !self.state.is_alive() {
            return false;
        }
        self.stop_requested = true;
        self.state = ProcessState::Stopping;
        self.signal(TermSignal::Kill)
    }

    /// Immediate kill (SIGKILL), no stopping courtesy.
    pub(crate) fn kill_hard(&mut self) -> bool {
        if !self.state.is_alive() {
            return false;
        }
        self.stop_requested = true;
        self.state = ProcessState::Stopping;
        self.signal(TermSignal::Kill)
    }

    /// Records an observed OS exit and returns the wall-clock uptime.
    pub(crate) fn note_exited(&mut self) -> Duration {
        let uptime = self
            .handle
            .take()
            .map(|h| h.started_at.elapsed())
            .unwrap_or_default();
        self.state = ProcessState::Stopped;
        uptime
    }

    /// Marks the process as pending a respawn after a crash.
    pub(crate) fn mark_respawning(&mut self) {
        self.respawn_count += 1;
        self.state = ProcessState::Starting;
    }

    /// Marks removal from the registry.
    pub(crate) fn mark_removed(&mut self) {
        self.state = ProcessState::Removed;
    }

    /// Pipes externally supplied bytes into the child's standard input.
    pub(crate) async fn send_stdin(
        &mut self,
        source: &mut (dyn AsyncRead + Send + Unpin),
    ) -> std::io::Result<u64> {
        let stdin = self.stdin_mut()?;
        let copied = tokio::io::copy(source, stdin).await?;
        stdin.flush().await?;
        Ok(copied)
    }

    /// Re-establishes the management channel of an already-running process
    /// after a controller restart, without respawning it.
    ///
    /// The new endpoint is handed to the child as a framed command on its
    /// stdin: `[0x30][scheme][host][port:u16][use_management_endpoint:bool]
    /// [auth_key:base64 string]`.
    pub(crate) async fn reconnect(
        &mut self,
        scheme: &str,
        host: &str,
        port: u16,
        use_management_endpoint: bool,
        auth_key: &AuthKey,
    ) -> std::io::Result<()> {
        let mut frame = BytesMut::new();
        frame.put_u8(STDIN_RECONNECT);
        wire::put_str(&mut frame, scheme);
        wire::put_str(&mut frame, host);
        frame.put_u16(port);
        wire::put_bool(&mut frame, use_management_endpoint);
        wire::put_str(&mut frame, &auth_key.to_base64());

        let stdin = self.stdin_mut()?;
        stdin.write_all(&frame).await?;
        stdin.flush().await
    }

    fn stdin_mut(&mut self) -> std::io::Result<&mut ChildStdin> {
        self.handle
            .as_mut()
            .and_then(|h| h.stdin.as_mut())
            .ok_or_else(|| std::io::Error::other("process has no stdin pipe"))
    }

    #[cfg(unix)]
    fn signal(&self, sig: TermSignal) -> bool {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        let Some(pid) = self.handle.as_ref().and_then(|h| h.pid) else {
            return false;
        };
        let signal = match sig {
            TermSignal::Term => Signal::SIGTERM,
            TermSignal::Kill => Signal::SIGKILL,
        };
        match kill(Pid::from_raw(pid as i32), signal) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(process = %self.name, pid, %err, "failed to signal process");
                false
            }
        }
    }

    #[cfg(not(unix))]
    fn signal(&self, _sig: TermSignal) -> bool {
        tracing::warn!(process = %self.name, "process signaling unsupported on this platform");
        false
    }

    // ---------------------------
    // Accessors
    // ---------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn auth_key(&self) -> &AuthKey {
        &self.auth_key
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_alive() && !self.stop_requested
    }

    pub fn is_stopping(&self) -> bool {
        self.state == ProcessState::Stopping
    }

    pub(crate) fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    pub(crate) fn should_respawn(&self, max_respawns: u32) -> bool {
        self.respawn && !self.stop_requested && self.respawn_count < max_respawns
    }

    pub(crate) fn respawn_count(&self) -> u32 {
        self.respawn_count
    }

    pub fn is_privileged(&self) -> bool {
        self.privileged
    }
}

#[derive(Clone, Copy)]
enum TermSignal {
    Term,
    Kill,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proc_with_command(command: Vec<String>) -> ManagedProcess {
        ManagedProcess::new(
            "demo".into(),
            None,
            AuthKey::generate(),
            command,
            HashMap::new(),
            std::env::temp_dir(),
            false,
            false,
        )
    }

    #[test]
    fn new_process_starts_defined() {
        let p = proc_with_command(vec!["/bin/true".into()]);
        assert_eq!(p.state(), ProcessState::Defined);
        assert!(!p.is_running());
        assert!(!p.is_stopping());
    }

    #[tokio::test]
    async fn spawn_and_observe_exit() {
        let mut p = proc_with_command(vec!["/bin/sh".into(), "-c".into(), "exit 0".into()]);
        let mut child = p.spawn().expect("spawn");
        assert_eq!(p.state(), ProcessState::Running);
        assert!(p.is_running());

        child.wait().await.expect("wait");
        let uptime = p.note_exited();
        assert_eq!(p.state(), ProcessState::Stopped);
        assert!(uptime > Duration::ZERO);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stop_terminates_a_sleeping_child() {
        let mut p = proc_with_command(vec!["/bin/sh".into(), "-c".into(), "sleep 30".into()]);
        let mut child = p.spawn().expect("spawn");
        assert!(p.initiate_stop());
        assert!(p.is_stopping());

        let status = tokio::time::timeout(Duration::from_secs(5), child.wait())
            .await
            .expect("child did not exit after SIGTERM")
            .expect("wait");
        assert!(!status.success());
    }

    #[test]
    fn respawn_budget_is_bounded() {
        let mut p = ManagedProcess::new(
            "crasher".into(),
            None,
            AuthKey::generate(),
            vec!["/bin/false".into()],
            HashMap::new(),
            std::env::temp_dir(),
            false,
            true,
        );
        assert!(p.should_respawn(2));
        p.mark_respawning();
        assert!(p.should_respawn(2));
        p.mark_respawning();
        assert!(!p.should_respawn(2));
    }

    #[test]
    fn stop_request_disables_respawn() {
        let mut p = ManagedProcess::new(
            "svc".into(),
            None,
            AuthKey::generate(),
            vec!["/bin/true".into()],
            HashMap::new(),
            std::env::temp_dir(),
            false,
            true,
        );
        p.stop_requested = true;
        assert!(!p.should_respawn(10));
    }
}
