//! Per-document state shared by all occurrences of a directive kind.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Named counters that live for one document parse.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tracker {
    counters: HashMap<String, usize>,
}

impl Tracker {
    /// Current value of a counter (0 if never incremented).
    #[must_use]
    pub fn get(&self, name: &str) -> usize {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// Increment a counter and return its new value.
    pub fn increment(&mut self, name: &str) -> usize {
        let counter = self.counters.entry(name.to_owned()).or_insert(0);
        *counter += 1;
        *counter
    }
}

/// Tracker handle shared by every instance of one directive kind.
pub type SharedTracker = Rc<RefCell<Tracker>>;
