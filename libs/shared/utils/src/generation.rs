use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Ownership check for in-flight fetches: only the latest ticket may apply
/// its result, and `invalidate` drops everything outstanding.
#[derive(Debug, Clone, Default)]
pub struct Generation(Arc<AtomicU64>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Ticket {
        Ticket(self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.0.load(Ordering::SeqCst) == ticket.0
    }

    pub fn invalidate(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_ticket_wins() {
        let generation = Generation::new();
        let first = generation.begin();
        let second = generation.begin();

        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[test]
    fn test_invalidate_drops_outstanding() {
        let generation = Generation::new();
        let ticket = generation.begin();
        generation.invalidate();

        assert!(!generation.is_current(ticket));
    }

    #[test]
    fn test_clones_share_counter() {
        let generation = Generation::new();
        let clone = generation.clone();
        let ticket = generation.begin();
        clone.begin();

        assert!(!generation.is_current(ticket));
    }
}
