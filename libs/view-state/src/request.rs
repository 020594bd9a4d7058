//! Request state cells
//!
//! [`RequestState`] turns one asynchronous request function into observable
//! `{ result, error, is_loading, is_success }` state. Settled requests only
//! write to the cell while it is mounted; once unmounted (or dropped) the
//! state is frozen even if a pending call settles later.
//!
//! Concurrent `request` calls on one cell are not cancelled: both run and the
//! one that settles last wins. Callers avoid double-firing instead.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::trace;

type RequestFn<A, T, E> = Arc<dyn Fn(A) -> BoxFuture<'static, Result<T, E>> + Send + Sync>;

/// Observable state of a [`RequestState`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSnapshot<T, E> {
    /// Last successful result, or the default
    pub result: T,
    /// Error of the last settled request
    pub error: Option<E>,
    /// A request is in flight
    pub is_loading: bool,
    /// The last settled request succeeded
    pub is_success: bool,
    /// Number of requests settled while mounted
    pub settled: u64,
}

impl<T, E> RequestSnapshot<T, E> {
    fn initial(result: T) -> Self {
        Self {
            result,
            error: None,
            is_loading: false,
            is_success: false,
            settled: 0,
        }
    }
}

/// State cell around one request function
pub struct RequestState<A, T, E> {
    make_request: RequestFn<A, T, E>,
    initial_value: T,
    state: Arc<watch::Sender<RequestSnapshot<T, E>>>,
    mounted: Arc<AtomicBool>,
}

impl<A, T, E> RequestState<A, T, E>
where
    A: Send + 'static,
    T: Clone + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Wrap `make_request`; `initial_value` is the result until a request succeeds
    #[must_use]
    pub fn new<F, Fut>(make_request: F, initial_value: T) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let make_request: RequestFn<A, T, E> = Arc::new(move |args| make_request(args).boxed());
        let (state, _) = watch::channel(RequestSnapshot::initial(initial_value.clone()));
        Self {
            make_request,
            initial_value,
            state: Arc::new(state),
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Start a request
    ///
    /// Marks the cell as loading before returning. The returned future owns
    /// everything it needs; await it in place or spawn it.
    pub fn request(&self, args: A) -> impl Future<Output = ()> + Send + 'static {
        if self.is_mounted() {
            self.state.send_modify(|s| {
                s.is_success = false;
                s.is_loading = true;
            });
        }

        let pending = (self.make_request)(args);
        let state = Arc::clone(&self.state);
        let mounted = Arc::clone(&self.mounted);
        let initial_value = self.initial_value.clone();

        async move {
            let outcome = pending.await;
            if !mounted.load(Ordering::Acquire) {
                trace!("Request settled after unmount, outcome dropped");
                return;
            }
            state.send_modify(|s| {
                match outcome {
                    Ok(result) => {
                        s.result = result;
                        s.error = None;
                        s.is_success = true;
                    }
                    Err(error) => {
                        s.result = initial_value;
                        s.error = Some(error);
                        s.is_success = false;
                    }
                }
                s.is_loading = false;
                s.settled += 1;
            });
        }
    }

    /// Overwrite the result without touching the other fields
    pub fn set_value(&self, value: T) {
        if self.is_mounted() {
            self.state.send_modify(|s| s.result = value);
        }
    }

    /// Current result
    #[must_use]
    pub fn result(&self) -> T {
        self.state.borrow().result.clone()
    }

    /// A request is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    /// The last settled request succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.state.borrow().is_success
    }

    /// Receiver observing every transition
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RequestSnapshot<T, E>> {
        self.state.subscribe()
    }

    /// Detach the cell from its owner; later settles are ignored
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    /// Whether settles are still applied
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }
}

impl<A, T, E> RequestState<A, T, E>
where
    A: Send + 'static,
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Copy of the whole state
    #[must_use]
    pub fn snapshot(&self) -> RequestSnapshot<T, E> {
        self.state.borrow().clone()
    }

    /// Error of the last settled request
    #[must_use]
    pub fn error(&self) -> Option<E> {
        self.state.borrow().error.clone()
    }
}

impl<A, T, E> Drop for RequestState<A, T, E> {
    fn drop(&mut self) {
        self.mounted.store(false, Ordering::Release);
    }
}

impl<A, T, E> std::fmt::Debug for RequestState<A, T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("RequestState")
            .field("is_loading", &state.is_loading)
            .field("is_success", &state.is_success)
            .field("has_error", &state.error.is_some())
            .field("mounted", &self.mounted.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

/// Error display with one-way dismissal
///
/// Once a non-null error is observed it stays visible until [`dismiss`] is
/// called, even if the raw error is nulled in the meantime. A dismissed error
/// comes back when a new error arrives: one from a later settle, even if it
/// is equal to the dismissed one.
///
/// [`dismiss`]: DismissableError::dismiss
#[derive(Debug, Clone)]
pub struct DismissableError<E> {
    last_settle: Option<u64>,
    shown: Option<E>,
}

impl<E> Default for DismissableError<E> {
    fn default() -> Self {
        Self {
            last_settle: None,
            shown: None,
        }
    }
}

impl<E: Clone> DismissableError<E> {
    /// Create an empty tracker
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current raw error together with the settle it came from
    ///
    /// `settle` is [`RequestSnapshot::settled`] of the request cell; an error
    /// seen under a settle not observed before counts as a new arrival.
    pub fn observe(&mut self, settle: u64, error: Option<&E>) {
        if let Some(error) = error
            && self.last_settle != Some(settle)
        {
            self.shown = Some(error.clone());
        }
        self.last_settle = error.map(|_| settle);
    }

    /// Error to display
    #[must_use]
    pub const fn error(&self) -> Option<&E> {
        self.shown.as_ref()
    }

    /// Hide the current error until the next failed settle
    pub fn dismiss(&mut self) {
        self.shown = None;
    }
}

/// Deletion helper: a request cell plus a dismissable error
pub struct DeleteItems<E> {
    request: RequestState<(), (), E>,
    error: Mutex<DismissableError<E>>,
}

impl<E> DeleteItems<E>
where
    E: Clone + Send + Sync + 'static,
{
    /// Wrap the deletion call
    #[must_use]
    pub fn new<F, Fut>(make_request: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
    {
        Self {
            request: RequestState::new(move |()| make_request(), ()),
            error: Mutex::new(DismissableError::new()),
        }
    }

    /// Run the deletion
    pub fn delete_items(&self) -> impl Future<Output = ()> + Send + 'static {
        self.request.request(())
    }

    /// A deletion is in flight
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.request.is_loading()
    }

    /// Deletion error to display, if not dismissed
    #[must_use]
    pub fn deletion_error(&self) -> Option<E> {
        let mut error = self.error.lock();
        self.observe_into(&mut error);
        error.error().cloned()
    }

    /// Dismiss the displayed deletion error
    pub fn clear_deletion_error(&self) {
        let mut error = self.error.lock();
        self.observe_into(&mut error);
        error.dismiss();
    }

    /// Detach from the owner; later settles are ignored
    pub fn unmount(&self) {
        self.request.unmount();
    }

    fn observe_into(&self, error: &mut DismissableError<E>) {
        let snapshot = self.request.snapshot();
        error.observe(snapshot.settled, snapshot.error.as_ref());
    }
}

impl<E> std::fmt::Debug for DeleteItems<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeleteItems")
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}
