// src/exec/heartbeat.rs

use std::time::Duration;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace};

use crate::types::TaskEvent;

/// Emit `TaskEvent::Progress` immediately and then every `interval` until
/// `stop` fires or its sender is dropped. Returns the number of beats sent.
///
/// Beats are sent with `try_send`: a full channel drops the beat instead of
/// stalling the loop.
pub async fn run(
    interval: Duration,
    events: mpsc::Sender<TaskEvent>,
    mut stop: oneshot::Receiver<()>,
) -> u64 {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut beats = 0u64;

    loop {
        tokio::select! {
            biased;

            _ = &mut stop => break,

            _ = ticker.tick() => {
                match events.try_send(TaskEvent::Progress) {
                    Ok(()) => {
                        beats += 1;
                        trace!(beats, "task-progress");
                    }
                    Err(TrySendError::Full(_)) => {
                        debug!("progress channel full; dropping heartbeat");
                    }
                    Err(TrySendError::Closed(_)) => {
                        trace!("progress channel closed; heartbeat not delivered");
                    }
                }
            }
        }
    }

    beats
}
