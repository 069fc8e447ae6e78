//! Mock device implementations for testing and development.
//!
//! This module provides simulated collaborators that can be controlled
//! programmatically without requiring a handheld.

pub mod notifier;
pub mod signal;
pub mod uhf;

// Re-export commonly used types
pub use notifier::{MockBarcodeSource, MockKeySource, MockNotifier, MockNotifierHandle};
pub use signal::MockSignalBus;
pub use uhf::{MockCall, MockUhf, MockUhfDriver, MockUhfHandle};
