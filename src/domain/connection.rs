//! # Domain connection: registration handshake + reconnect loop.
//!
//! ## Architecture
//! ```text
//! DomainConnection
//!     │ connect()
//!     ▼
//! pass loop ── backoff.next(pass) ──► DiscoveryOption 1..N
//!                                          │ endpoints
//!                                          ▼
//!                                  CoordinatorTransport.connect
//!                                          │ channel
//!                                          ▼
//!               RegisterHost / FetchDomainConfiguration (fresh host info)
//!                       │ extension list          │ [code][message]
//!                       ▼                         ▼
//!               SubsystemVersions          RegistrationError
//!                       │ domain model       irrecoverable? give up
//!                       ▼                    otherwise: next candidate
//!               apply_domain_model
//!                       │
//!               CompleteRegistration ── OK ──► Registered
//!                                               │
//!                                               ├─ registration_complete (once)
//!                                               └─ liveness probe armed
//! ```
//!
//! ## Rules
//! - The host-info snapshot is computed fresh for every attempt; a stale
//!   snapshot from a previous attempt is never reused.
//! - The session is `Registered` only after the completion acknowledgment
//!   round-trip; `registration_complete` fires exactly once per
//!   registration.
//! - Authentication and version rejections abort the reconnect loop; every
//!   other failure logs and moves on to the next candidate.
//! - The backoff pass counter increments once per full sweep over all
//!   discovery options, not per endpoint.

use std::sync::Arc;

use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::config::ControllerConfig;
use crate::domain::callback::HostRegistrationCallback;
use crate::domain::channel::{CoordinatorEndpoint, CoordinatorTransport, ManagementChannel};
use crate::domain::discovery::DiscoveryOption;
use crate::domain::ping;
use crate::domain::protocol::{self, ManagementRequest};
use crate::domain::session::{RunningMode, SessionState};
use crate::error::{ChannelError, RegistrationError, RegistrationErrorCode};

/// Connection of the local host to the domain coordinator.
pub struct DomainConnection {
    host_name: String,
    running_mode: RunningMode,
    cfg: ControllerConfig,
    discovery: Vec<Arc<dyn DiscoveryOption>>,
    transport: Arc<dyn CoordinatorTransport>,
    callback: Arc<dyn HostRegistrationCallback>,
    state: std::sync::Mutex<SessionState>,
    channel: tokio::sync::Mutex<Option<Arc<dyn ManagementChannel>>>,
    shutdown: CancellationToken,
}

impl DomainConnection {
    /// Creates a disconnected domain connection.
    pub fn new(
        host_name: impl Into<String>,
        running_mode: RunningMode,
        cfg: ControllerConfig,
        discovery: Vec<Arc<dyn DiscoveryOption>>,
        transport: Arc<dyn CoordinatorTransport>,
        callback: Arc<dyn HostRegistrationCallback>,
    ) -> Arc<Self> {
        Arc::new(Self {
            host_name: host_name.into(),
            running_mode,
            cfg,
            discovery,
            transport,
            callback,
            state: std::sync::Mutex::new(SessionState::Disconnected),
            channel: tokio::sync::Mutex::new(None),
            shutdown: CancellationToken::new(),
        })
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        *self.state.lock().expect("session state poisoned")
    }

    /// Runs the reconnect loop until the session is registered.
    ///
    /// Returns an error only for irrecoverable rejections or when the
    /// connection was closed; every other failure backs off and retries.
    pub async fn connect(self: &Arc<Self>) -> Result<(), ChannelError> {
        let mut pass: u32 = 0;
        loop {
            if self.shutdown.is_cancelled() {
                return Err(ChannelError::Closed);
            }
            if pass > 0 {
                let delay = self.cfg.reconnect_backoff.next(pass - 1);
                tracing::debug!(pass, ?delay, "waiting before next reconnect pass");
                tokio::select! {
                    _ = self.shutdown.cancelled() => return Err(ChannelError::Closed),
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            self.set_state(SessionState::Connecting);

            for option in &self.discovery {
                let endpoints = match option.discover().await {
                    Ok(endpoints) => endpoints,
                    Err(err) => {
                        tracing::warn!(discovery = option.name(), %err, "discovery failed");
                        continue;
                    }
                };
                for endpoint in &endpoints {
                    match self.try_endpoint(endpoint).await {
                        Ok(()) => return Ok(()),
                        Err(err) if err.is_irrecoverable() => {
                            tracing::error!(%endpoint, error = err.as_label(), %err, "registration rejected; giving up");
                            self.set_state(SessionState::Disconnected);
                            return Err(err);
                        }
                        Err(err) => {
                            tracing::warn!(%endpoint, error = err.as_label(), %err, "connection attempt failed");
                        }
                    }
                }
            }
            self.set_state(SessionState::Reconnecting);
            pass += 1;
        }
    }

    /// Keeps the session registered until closed: reconnects whenever the
    /// channel is lost, returns on close or irrecoverable rejection.
    pub async fn run(self: Arc<Self>) -> Result<(), ChannelError> {
        loop {
            match self.connect().await {
                Ok(()) => {}
                Err(ChannelError::Closed) if self.shutdown.is_cancelled() => return Ok(()),
                Err(err) => return Err(err),
            }
            let closed = {
                let channel = self.channel.lock().await;
                match channel.as_ref() {
                    Some(channel) => channel.closed(),
                    None => continue,
                }
            };
            tokio::select! {
                _ = self.shutdown.cancelled() => return Ok(()),
                _ = closed.cancelled() => {
                    tracing::warn!("management channel lost; reconnecting");
                    *self.channel.lock().await = None;
                    self.set_state(SessionState::Reconnecting);
                }
            }
        }
    }

    /// Unregisters (when connected) and tears the session down. Terminal.
    pub async fn close(&self) {
        self.shutdown.cancel();
        let channel = self.channel.lock().await.take();
        if let Some(channel) = channel {
            if let Err(err) = channel.execute(ManagementRequest::Unregister).await {
                tracing::debug!(error = err.as_label(), %err, "unregister request failed");
            }
            channel.close().await;
        }
        self.set_state(SessionState::Closed);
    }

    async fn try_endpoint(self: &Arc<Self>, endpoint: &CoordinatorEndpoint) -> Result<(), ChannelError> {
        tracing::debug!(%endpoint, "connecting to coordinator");
        let channel = self.transport.connect(endpoint).await?;
        match self.handshake(&channel).await {
            Ok(()) => Ok(()),
            Err(err) => {
                channel.close().await;
                Err(err)
            }
        }
    }

    async fn handshake(self: &Arc<Self>, channel: &Arc<dyn ManagementChannel>) -> Result<(), ChannelError> {
        let connection_id: u64 = rand::rng().random();
        // Computed per attempt, never cached.
        let host_info = self.callback.create_host_info();
        let request = match self.running_mode {
            RunningMode::Normal => {
                self.set_state(SessionState::Registering);
                ManagementRequest::RegisterHost {
                    host_name: self.host_name.clone(),
                    connection_id,
                    host_info,
                }
            }
            RunningMode::AdminOnly => {
                self.set_state(SessionState::FetchingConfig);
                ManagementRequest::FetchDomainConfiguration {
                    host_name: self.host_name.clone(),
                    connection_id,
                    host_info,
                }
            }
        };

        let reply = channel.execute(request).await?;
        let extensions = protocol::decode_registration_reply(&reply.payload)?;

        self.set_state(SessionState::AwaitingSubsystemVersions);
        let versions = self.callback.resolve_subsystem_versions(extensions).await;
        let reply = channel
            .execute(ManagementRequest::SubsystemVersions { versions })
            .await?;
        let model = protocol::decode_domain_model_reply(&reply.payload)?;

        self.set_state(SessionState::ApplyingModel);
        let applied = self.callback.apply_domain_model(model).await;
        let completion = ManagementRequest::CompleteRegistration {
            ok: applied,
            message: if applied {
                String::new()
            } else {
                "domain model could not be applied".to_string()
            },
        };
        let reply = channel.execute(completion).await?;
        protocol::decode_completion_reply(&reply.payload)?;
        if !applied {
            return Err(RegistrationError::new(
                RegistrationErrorCode::ModelApplyFailed,
                "domain model could not be applied",
            )
            .into());
        }

        *self.channel.lock().await = Some(channel.clone());
        self.set_state(SessionState::Registered);
        tracing::debug!(host = %self.host_name, "registered with domain coordinator");
        self.callback.registration_complete(channel.clone()).await;

        if self.cfg.ping_enabled {
            tokio::spawn(ping::run(
                channel.clone(),
                self.cfg.ping_interval,
                self.cfg.ping_timeout,
                self.shutdown.child_token(),
            ));
        }
        Ok(())
    }

    fn set_state(&self, next: SessionState) {
        let mut state = self.state.lock().expect("session state poisoned");
        if state.is_terminal() {
            return;
        }
        if *state != next {
            tracing::debug!(from = state.as_label(), to = next.as_label(), "session state change");
            *state = next;
        }
    }
}
