//! Mock system signal bus.

use crate::{
    HardwareError, Result,
    traits::{SignalBus, SystemSignal},
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::trace;

#[derive(Debug, Default)]
struct BusState {
    sent: Vec<SystemSignal>,
    refuse_key_set: bool,
}

/// Signal bus that records every signal it is handed.
///
/// Clones share the same record, so a test can keep one clone and give the
/// other to the code under test.
#[derive(Debug, Clone, Default)]
pub struct MockSignalBus {
    state: Arc<Mutex<BusState>>,
}

impl MockSignalBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, BusState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Signals sent so far, oldest first.
    #[must_use]
    pub fn sent(&self) -> Vec<SystemSignal> {
        self.state().sent.clone()
    }

    /// Broadcast actions sent so far, oldest first.
    #[must_use]
    pub fn actions(&self) -> Vec<&'static str> {
        self.state().sent.iter().map(SystemSignal::action).collect()
    }

    /// Make key suppression signals fail, as on firmware without the
    /// key-set service.
    pub fn refuse_key_set(&self, refuse: bool) {
        self.state().refuse_key_set = refuse;
    }

    pub fn clear(&self) {
        self.state().sent.clear();
    }
}

impl SignalBus for MockSignalBus {
    fn send(&self, signal: SystemSignal) -> Result<()> {
        let mut state = self.state();
        if state.refuse_key_set && matches!(signal, SystemSignal::KeySet { .. }) {
            return Err(HardwareError::unsupported("com.rfid.KEY_SET"));
        }
        trace!("Mock signal: {}", signal.action());
        state.sent.push(signal);
        Ok(())
    }
}
