//! Background inventory loop.
//!
//! One task per scanning session polls the module, turns every returned tag
//! into an [`InventoryEvent::TagRead`], and sleeps between polls.
//!
//! ```text
//!            ┌──────────── cancelled? ───────────┐
//!            ▼                                   │
//! ┌─────────────────┐   ┌─────────────────┐   ┌──┴──────────────┐
//! │ lock driver,    │──►│ deliver tags or │──►│ sleep interval  │
//! │ poll once       │   │ one error event │   │ (interruptible) │
//! └─────────────────┘   └─────────────────┘   └─────────────────┘
//! ```
//!
//! A poll already in flight when the token is cancelled runs to completion
//! (the module cannot abort a command), but its result is discarded. Stopping
//! waits for the task to finish, so no event is sent after
//! [`InventoryHandle::stop`] returns.

use crate::events::InventoryEvent;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};
use uhf_core::{Error, InventoryMode};
use uhf_hardware::{RawTag, UhfDriver};

/// Polling parameters for one loop instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSettings {
    pub mode: InventoryMode,
    pub poll_interval: Duration,
    pub timed_poll_timeout_ms: u16,
}

/// Handle to a running inventory loop.
#[derive(Debug)]
pub struct InventoryHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl InventoryHandle {
    /// Spawn a loop polling `driver` and sending to `events`.
    pub fn spawn<D>(
        driver: Arc<Mutex<D>>,
        settings: LoopSettings,
        events: mpsc::Sender<InventoryEvent>,
    ) -> Self
    where
        D: UhfDriver + 'static,
    {
        let token = CancellationToken::new();
        let inventory = InventoryLoop {
            driver,
            settings,
            events,
            token: token.clone(),
        };
        let task = tokio::spawn(inventory.run());
        Self { token, task }
    }

    /// Signal the loop to exit without waiting for it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancel the loop and wait until it has exited.
    pub async fn stop(self) {
        self.token.cancel();
        if let Err(e) = self.task.await {
            if e.is_panic() {
                error!("Inventory loop panicked: {}", e);
            } else {
                debug!("Inventory loop aborted: {}", e);
            }
        }
    }
}

struct InventoryLoop<D> {
    driver: Arc<Mutex<D>>,
    settings: LoopSettings,
    events: mpsc::Sender<InventoryEvent>,
    token: CancellationToken,
}

impl<D: UhfDriver + 'static> InventoryLoop<D> {
    async fn run(self) {
        info!("Inventory loop started ({:?} polls)", self.settings.mode);
        let mut polls: u64 = 0;

        while !self.token.is_cancelled() {
            let mut driver = tokio::select! {
                biased;
                _ = self.token.cancelled() => break,
                driver = self.driver.lock() => driver,
            };
            let result = self.poll(&mut driver).await;
            drop(driver);
            polls += 1;

            // Result of a poll that straddled cancellation.
            if self.token.is_cancelled() {
                trace!("Discarding poll result after cancellation");
                break;
            }

            let delivered = match result {
                Ok(tags) => {
                    if !tags.is_empty() {
                        debug!("Poll {} found {} tags", polls, tags.len());
                    }
                    self.deliver_tags(tags).await
                }
                Err(e) => {
                    error!("Inventory poll failed: {}", e);
                    self.deliver(InventoryEvent::error(&e)).await
                }
            };
            if !delivered {
                break;
            }

            tokio::select! {
                biased;
                _ = self.token.cancelled() => break,
                _ = tokio::time::sleep(self.settings.poll_interval) => {}
            }
        }

        info!("Inventory loop stopped after {} polls", polls);
    }

    async fn poll(&self, driver: &mut D) -> Result<Vec<RawTag>, Error> {
        let tags = match self.settings.mode {
            InventoryMode::RealTime => driver.inventory_realtime().await?,
            InventoryMode::Timed => {
                driver
                    .inventory_by_timer(self.settings.timed_poll_timeout_ms)
                    .await?
            }
        };
        Ok(tags)
    }

    async fn deliver_tags(&self, tags: Vec<RawTag>) -> bool {
        for tag in tags {
            if !self.deliver(InventoryEvent::TagRead(tag.to_tag_read())).await {
                return false;
            }
        }
        true
    }

    /// Send one event; `false` when the loop should exit.
    async fn deliver(&self, event: InventoryEvent) -> bool {
        if self.token.is_cancelled() {
            return false;
        }

        match self.events.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(event)) => {
                // Consumer is behind; wait for room unless stopped first.
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => false,
                    sent = self.events.send(event) => sent.is_ok(),
                }
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("Inventory event receiver dropped");
                false
            }
        }
    }
}
