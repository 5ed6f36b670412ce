//! Request lifecycle interceptors.
//!
//! Observers subscribe to three channels: request-about-to-send,
//! response-received, and transport-error. Notification is synchronous and
//! runs in subscription order; a panicking observer is isolated and logged
//! so later observers still run. Typical uses are logging, auditing and
//! metrics.

use crate::client::RawResponse;
use crate::Error;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

/// An external listener notified of request lifecycle events.
///
/// All methods default to no-ops; implement only the channels of interest.
///
/// # Examples
///
/// ```
/// use restbound::{Interceptor, RawResponse};
///
/// struct LoggingInterceptor;
///
/// impl Interceptor for LoggingInterceptor {
///     fn on_before_send(&self, request: &reqwest::Request) {
///         println!("{} {}", request.method(), request.url());
///     }
///
///     fn on_response(&self, response: &RawResponse) {
///         println!("<- {}", response.status);
///     }
/// }
/// ```
pub trait Interceptor: Send + Sync {
    /// Called once a request is constructed, before it is sent.
    fn on_before_send(&self, request: &reqwest::Request) {
        let _ = request;
    }

    /// Called once a response has been received from the server.
    fn on_response(&self, response: &RawResponse) {
        let _ = response;
    }

    /// Called when a transport-level fault is about to be raised.
    fn on_error(&self, error: &Error) {
        let _ = error;
    }
}

/// Fan-out dispatcher for [`Interceptor`] notifications.
///
/// Cloning a bus shares its observer list. The list supports concurrent
/// add/remove/notify: notification iterates over a snapshot, so an
/// observer unsubscribing (or subscribing) mid-notification never
/// invalidates the iteration.
#[derive(Clone, Default)]
pub struct InterceptorBus {
    observers: Arc<Mutex<Vec<Arc<dyn Interceptor>>>>,
}

impl InterceptorBus {
    /// Creates a bus with no observers; the empty list is a valid state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer and returns a guard that unsubscribes it when
    /// dropped.
    ///
    /// Re-subscribing an already-registered observer first removes the
    /// prior registration, so one logical observer is never notified twice.
    pub fn subscribe(&self, interceptor: Arc<dyn Interceptor>) -> Subscription {
        self.register(interceptor.clone());
        Subscription {
            bus: self.clone(),
            interceptor,
        }
    }

    /// Registers an observer for the lifetime of the bus, with the same
    /// de-duplication as [`InterceptorBus::subscribe`] but no guard.
    pub(crate) fn register(&self, interceptor: Arc<dyn Interceptor>) {
        let mut observers = self.lock();
        observers.retain(|existing| !Arc::ptr_eq(existing, &interceptor));
        observers.push(interceptor);
    }

    /// Removes an observer. Removing one that is not registered is a no-op.
    pub fn unsubscribe(&self, interceptor: &Arc<dyn Interceptor>) {
        self.lock()
            .retain(|existing| !Arc::ptr_eq(existing, interceptor));
    }

    /// Returns the number of registered observers.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if no observers are registered.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub(crate) fn notify_before_send(&self, request: &reqwest::Request) {
        self.for_each(|observer| observer.on_before_send(request));
    }

    pub(crate) fn notify_response(&self, response: &RawResponse) {
        self.for_each(|observer| observer.on_response(response));
    }

    pub(crate) fn notify_error(&self, error: &Error) {
        self.for_each(|observer| observer.on_error(error));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Arc<dyn Interceptor>>> {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn for_each(&self, notify: impl Fn(&dyn Interceptor)) {
        let snapshot: Vec<Arc<dyn Interceptor>> = self.lock().clone();
        for observer in snapshot {
            if catch_unwind(AssertUnwindSafe(|| notify(observer.as_ref()))).is_err() {
                tracing::warn!("Interceptor panicked during notification; continuing");
            }
        }
    }
}

/// Unsubscribes its interceptor from the bus when dropped.
///
/// Dropping the guard is equivalent to calling
/// [`InterceptorBus::unsubscribe`]; doing both is harmless.
pub struct Subscription {
    bus: InterceptorBus,
    interceptor: Arc<dyn Interceptor>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(&self.interceptor);
    }
}
