//! Navigation collaborator
//!
//! [`QueryParams`](crate::QueryParams) never talks to a router directly; it
//! reads and pushes locations through [`History`]. A browser shell backs this
//! with the real address bar, the console host and tests use
//! [`MemoryHistory`].

use parking_lot::Mutex;
use tracing::trace;

/// Pathname and raw search string of the current entry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    /// Path without querystring, e.g. `/job-explorer`
    pub pathname: String,
    /// Raw querystring without the leading `?`
    pub search: String,
}

impl Location {
    /// Split a relative URL into pathname and search, dropping any fragment
    #[must_use]
    pub fn parse(url: &str) -> Self {
        let url = url.split_once('#').map_or(url, |(before, _)| before);
        match url.split_once('?') {
            Some((pathname, search)) => Self {
                pathname: pathname.to_owned(),
                search: search.to_owned(),
            },
            None => Self {
                pathname: url.to_owned(),
                search: String::new(),
            },
        }
    }

    /// Relative URL of this location
    #[must_use]
    pub fn href(&self) -> String {
        crate::qs::url_with_query(&self.pathname, &self.search)
    }
}

/// Access to the address bar
pub trait History: Send + Sync {
    /// Current location
    fn location(&self) -> Location;

    /// Navigate to a relative URL, adding a history entry
    fn push(&self, url: &str);
}

/// In-memory history stack
#[derive(Debug)]
pub struct MemoryHistory {
    entries: Mutex<Vec<Location>>,
}

impl MemoryHistory {
    /// Create a history whose only entry is `initial_url`
    #[must_use]
    pub fn new(initial_url: &str) -> Self {
        Self {
            entries: Mutex::new(vec![Location::parse(initial_url)]),
        }
    }

    /// Go back one entry, like the browser back button
    ///
    /// Returns the new current location, or `None` when already at the first
    /// entry.
    #[must_use]
    pub fn back(&self) -> Option<Location> {
        let mut entries = self.entries.lock();
        if entries.len() < 2 {
            return None;
        }
        entries.pop();
        entries.last().cloned()
    }

    /// Number of entries on the stack
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Always false: a history has at least its initial entry
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl History for MemoryHistory {
    fn location(&self) -> Location {
        self.entries.lock().last().cloned().unwrap_or_default()
    }

    fn push(&self, url: &str) {
        trace!(url, "history push");
        self.entries.lock().push(Location::parse(url));
    }
}
