use crate::utils::error::Result;
use crate::domain::model::MAX_HISTORY_SIZE;
use crate::utils::validation::validate_range;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// History shared by every request the process serves.
pub type SharedHistory = Arc<Mutex<HistoryBuffer>>;

/// Bounded FIFO of recently emitted terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryBuffer {
    terms: VecDeque<String>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        validate_range("history.capacity", capacity, 1, MAX_HISTORY_SIZE)?;
        Ok(Self {
            terms: VecDeque::new(),
            capacity,
        })
    }

    pub fn shared(capacity: usize) -> Result<SharedHistory> {
        Ok(Arc::new(Mutex::new(Self::with_capacity(capacity)?)))
    }

    /// Appends one term, evicting the oldest once over capacity.
    pub fn append(&mut self, term: impl Into<String>) {
        self.terms.push_back(term.into());
        while self.terms.len() > self.capacity {
            self.terms.pop_front();
        }
    }

    /// Oldest first.
    pub fn snapshot(&self) -> Vec<String> {
        self.terms.iter().cloned().collect()
    }

    /// The newest `n` terms, still oldest first.
    pub fn recent(&self, n: usize) -> Vec<String> {
        let skip = self.terms.len().saturating_sub(n);
        self.terms.iter().skip(skip).cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
