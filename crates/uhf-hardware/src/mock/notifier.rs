//! Mock notification sources for key and barcode events.
//!
//! A [`MockNotifier`] stands in for a platform broadcast source. Its handle
//! delivers events synchronously to whatever callback is registered, on the
//! calling thread, the same way a platform receiver would fire.

use crate::{
    HardwareError, Result,
    traits::{Callback, NotificationSource},
    types::{BarcodeScan, KeyEvent},
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Mock source of physical key events.
pub type MockKeySource = MockNotifier<KeyEvent>;

/// Mock source of barcode decoder results.
pub type MockBarcodeSource = MockNotifier<BarcodeScan>;

struct Registration<E> {
    callback: Option<Callback<E>>,
    refuse_subscribe: bool,
    subscribe_count: usize,
}

impl<E> std::fmt::Debug for Registration<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("subscribed", &self.callback.is_some())
            .field("subscribe_count", &self.subscribe_count)
            .finish()
    }
}

fn lock<E>(inner: &Mutex<Registration<E>>) -> MutexGuard<'_, Registration<E>> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Notification source with a single callback slot.
///
/// # Examples
///
/// ```
/// use uhf_hardware::mock::MockKeySource;
/// use uhf_hardware::traits::NotificationSource;
/// use uhf_hardware::types::KeyEvent;
/// use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
///
/// let (source, handle) = MockKeySource::new();
/// let seen = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&seen);
/// source
///     .subscribe(Box::new(move |_event| {
///         counter.fetch_add(1, Ordering::SeqCst);
///     }))
///     .unwrap();
///
/// assert!(handle.emit(KeyEvent::down(134)));
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
/// ```
#[derive(Debug)]
pub struct MockNotifier<E> {
    inner: Arc<Mutex<Registration<E>>>,
}

impl<E> MockNotifier<E> {
    pub fn new() -> (Self, MockNotifierHandle<E>) {
        let inner = Arc::new(Mutex::new(Registration {
            callback: None,
            refuse_subscribe: false,
            subscribe_count: 0,
        }));
        let handle = MockNotifierHandle {
            inner: Arc::clone(&inner),
        };
        (Self { inner }, handle)
    }
}

impl<E: Send + 'static> NotificationSource<E> for MockNotifier<E> {
    fn subscribe(&self, callback: Callback<E>) -> Result<()> {
        let mut registration = lock(&self.inner);
        if registration.refuse_subscribe {
            return Err(HardwareError::subscription("receiver registration refused"));
        }
        registration.callback = Some(callback);
        registration.subscribe_count += 1;
        Ok(())
    }

    fn unsubscribe(&self) -> Result<()> {
        lock(&self.inner).callback = None;
        Ok(())
    }
}

/// Handle for firing events into a [`MockNotifier`].
#[derive(Debug)]
pub struct MockNotifierHandle<E> {
    inner: Arc<Mutex<Registration<E>>>,
}

impl<E> Clone for MockNotifierHandle<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E> MockNotifierHandle<E> {
    /// Deliver `event` to the registered callback.
    ///
    /// Returns `false` if nothing is subscribed.
    pub fn emit(&self, event: E) -> bool {
        let registration = lock(&self.inner);
        match registration.callback.as_ref() {
            Some(callback) => {
                callback(event);
                true
            }
            None => false,
        }
    }

    /// Make subsequent `subscribe` calls fail.
    pub fn refuse_subscribe(&self, refuse: bool) {
        lock(&self.inner).refuse_subscribe = refuse;
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        lock(&self.inner).callback.is_some()
    }

    /// Number of successful registrations so far.
    #[must_use]
    pub fn subscribe_count(&self) -> usize {
        lock(&self.inner).subscribe_count
    }
}

impl MockNotifierHandle<KeyEvent> {
    /// Deliver a full press (down then up) of `code`.
    pub fn press(&self, code: u16) -> bool {
        self.emit(KeyEvent::down(code)) && self.emit(KeyEvent::up(code))
    }
}

impl MockNotifierHandle<BarcodeScan> {
    /// Deliver a decoded barcode.
    pub fn scan(&self, data: impl Into<Vec<u8>>) -> bool {
        self.emit(BarcodeScan { data: data.into() })
    }
}
