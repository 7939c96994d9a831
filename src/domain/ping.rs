//! # Coordinator liveness probe.
//!
//! One task per registered channel. Every interval it checks whether the
//! channel saw traffic recently; if so the probe is skipped, otherwise a
//! ping with a bounded timeout goes out. The reply carries the coordinator
//! instance id: a changed id means the coordinator restarted behind the
//! still-open connection, and the stale channel must be torn down so the
//! reconnect loop can re-register.
//!
//! ## Rules
//! - Any ping failure (timeout, I/O, protocol) closes the channel and ends
//!   the task; reconnection is the reconnect loop's job.
//! - The task also ends when the channel closes on its own or the session
//!   shuts down.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::domain::channel::ManagementChannel;

/// Probes the channel until it fails, closes, or the session shuts down.
pub(crate) async fn run(
    channel: Arc<dyn ManagementChannel>,
    interval: Duration,
    timeout: Duration,
    shutdown: CancellationToken,
) {
    let closed = channel.closed();
    let mut known_instance: Option<u64> = None;
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => return,
            _ = closed.cancelled() => return,
            _ = tokio::time::sleep(interval) => {}
        }
        // Recent traffic already proves liveness.
        if channel.last_message_at().elapsed() < interval {
            continue;
        }
        match channel.ping(timeout).await {
            Ok(instance_id) => match known_instance {
                None => known_instance = Some(instance_id),
                Some(known) if known != instance_id => {
                    tracing::warn!(
                        known_instance = known,
                        instance_id,
                        "coordinator instance changed; closing stale channel"
                    );
                    channel.close().await;
                    return;
                }
                Some(_) => {}
            },
            Err(err) => {
                tracing::warn!(error = err.as_label(), %err, "liveness probe failed; closing channel");
                channel.close().await;
                return;
            }
        }
    }
}
