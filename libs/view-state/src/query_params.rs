//! URL-bound filter and pagination state of one view
//!
//! The address bar is the source of truth. [`QueryParams`] derives its
//! [`FilterState`] from the current [`Location`](crate::Location) and, on
//! every toolbar or pager change, pushes a new URL and adopts the state
//! parsed back from it.
//! Subscribers are only woken when the state changes by value, which is what
//! drives refetching.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::debug;

use crate::history::{History, Location};
use crate::qs::{
    self, FilterState, LIMIT, OFFSET, ParamValue, QsConfig, SORT_BY, encode_non_default_query_string,
    foreign_params, parse_query_string,
};

/// A change request against a view's filter state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryAction {
    /// Set one filter; resets the page offset
    SetFilter {
        /// Filter key
        key: String,
        /// New value
        value: ParamValue,
    },
    /// Merge several filters at once; resets the page offset
    MergeFilters(FilterState),
    /// Reset one filter to its default; resets the page offset
    RemoveFilter(String),
    /// Change the sort expression; resets the page offset
    SetSort(String),
    /// Move to another page, optionally changing the page size
    SetPagination {
        /// New offset
        offset: i64,
        /// New page size, `None` keeps the current one
        limit: Option<i64>,
    },
    /// Back to the configured defaults
    Reset,
}

/// Apply `action` to `state` under `config`
#[must_use]
pub fn reduce(config: &QsConfig, mut state: FilterState, action: QueryAction) -> FilterState {
    match action {
        QueryAction::SetFilter { key, value } => {
            state.insert(key, value);
            reset_offset(config, &mut state);
        }
        QueryAction::MergeFilters(partial) => {
            state.extend(partial);
            reset_offset(config, &mut state);
        }
        QueryAction::RemoveFilter(key) => {
            match config.default_for(&key) {
                Some(default) => {
                    state.insert(key, default.clone());
                }
                None => {
                    state.remove(&key);
                }
            }
            reset_offset(config, &mut state);
        }
        QueryAction::SetSort(sort_by) => {
            state.insert(SORT_BY.to_owned(), ParamValue::Str(sort_by));
            reset_offset(config, &mut state);
        }
        QueryAction::SetPagination { offset, limit } => {
            state.insert(OFFSET.to_owned(), ParamValue::Int(offset));
            if let Some(limit) = limit {
                state.insert(LIMIT.to_owned(), ParamValue::Int(limit));
            }
        }
        QueryAction::Reset => {
            state = config.default_params().clone();
        }
    }
    state
}

fn reset_offset(config: &QsConfig, state: &mut FilterState) {
    match config.default_for(OFFSET) {
        Some(default) => {
            state.insert(OFFSET.to_owned(), default.clone());
        }
        None => {
            state.remove(OFFSET);
        }
    }
}

/// Handle returned by [`QueryParams::on_change`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&FilterState) + Send + Sync>;

/// Filter state of one view, bound to the address bar
pub struct QueryParams {
    config: QsConfig,
    history: Arc<dyn History>,
    state: watch::Sender<FilterState>,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    next_listener: AtomicU64,
}

impl QueryParams {
    /// Bind `config` to `history`, deriving the initial state from the current URL
    #[must_use]
    pub fn new(config: QsConfig, history: Arc<dyn History>) -> Self {
        let initial = parse_query_string(&config, &history.location().search);
        debug!(
            namespace = config.namespace(),
            params = ?initial,
            "Derived initial view state from URL"
        );
        let (state, _) = watch::channel(initial);
        Self {
            config,
            history,
            state,
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
        }
    }

    /// The view's querystring configuration
    #[must_use]
    pub const fn config(&self) -> &QsConfig {
        &self.config
    }

    /// Current filter state
    #[must_use]
    pub fn query_params(&self) -> FilterState {
        self.state.borrow().clone()
    }

    /// Receiver that wakes whenever the filter state changes by value
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FilterState> {
        self.state.subscribe()
    }

    /// Register a callback invoked with the new state after each change by value
    ///
    /// Callbacks run synchronously on the thread that caused the change and may
    /// call back into this `QueryParams`.
    #[must_use]
    pub fn on_change<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(&FilterState) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, Arc::new(callback)));
        id
    }

    /// Unregister a callback; returns false if it was not registered
    #[must_use]
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Re-derive the state after the address bar changed (navigation, back button)
    ///
    /// Returns whether the state changed.
    #[must_use]
    pub fn sync_from_location(&self) -> bool {
        let next = parse_query_string(&self.config, &self.history.location().search);
        self.apply(next)
    }

    /// Merge toolbar filter changes, reset the page offset and push the URL
    pub fn set_from_toolbar(&self, partial: FilterState) {
        self.dispatch(QueryAction::MergeFilters(partial));
    }

    /// Reset one toolbar filter to its default, reset the page offset and push the URL
    pub fn remove_from_toolbar(&self, key: impl Into<String>) {
        self.dispatch(QueryAction::RemoveFilter(key.into()));
    }

    /// Update pagination keys only and push the URL
    pub fn set_from_pagination(&self, offset: i64, limit: Option<i64>) {
        self.dispatch(QueryAction::SetPagination { offset, limit });
    }

    /// Apply an action, push the resulting URL and adopt the state parsed back from it
    pub fn dispatch(&self, action: QueryAction) {
        let next = reduce(&self.config, self.query_params(), action);
        let url = self.url_for(&next);
        debug!(namespace = self.config.namespace(), url = %url, "Pushing view state");
        self.history.push(&url);
        self.apply(parse_query_string(&self.config, &Location::parse(&url).search));
    }

    /// URL for `params` on the current page, keeping every foreign pair
    #[must_use]
    pub fn url_for(&self, params: &FilterState) -> String {
        let location = self.history.location();
        let foreign = foreign_params(&self.config, &location.search);
        let query = encode_non_default_query_string(&self.config, params, &foreign);
        qs::url_with_query(&location.pathname, &query)
    }

    fn apply(&self, next: FilterState) -> bool {
        let changed = self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
        if changed {
            let snapshot = self.query_params();
            let listeners: Vec<Listener> = self
                .listeners
                .lock()
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect();
            for listener in listeners {
                listener(&snapshot);
            }
        }
        changed
    }
}

impl std::fmt::Debug for QueryParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryParams")
            .field("config", &self.config)
            .field("state", &*self.state.borrow())
            .field("listeners", &self.listeners.lock().len())
            .finish_non_exhaustive()
    }
}
