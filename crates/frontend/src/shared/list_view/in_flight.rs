use contracts::domain::common::EntityId;
use std::collections::HashSet;
use std::hash::Hash;

/// Per-entity markers of mutating requests currently in flight.
///
/// At most one request per `(id, operation)` pair; independent ids or
/// operations do not block each other.
#[derive(Debug, Clone)]
pub struct InFlight<Op: Copy + Eq + Hash> {
    pending: HashSet<(EntityId, Op)>,
}

impl<Op: Copy + Eq + Hash> Default for InFlight<Op> {
    fn default() -> Self {
        Self {
            pending: HashSet::new(),
        }
    }
}

impl<Op: Copy + Eq + Hash> InFlight<Op> {
    /// Mark the operation as started. `false` if it is already running.
    pub fn try_begin(&mut self, id: EntityId, op: Op) -> bool {
        self.pending.insert((id, op))
    }

    pub fn finish(&mut self, id: EntityId, op: Op) {
        self.pending.remove(&(id, op));
    }

    pub fn is_pending(&self, id: EntityId, op: Op) -> bool {
        self.pending.contains(&(id, op))
    }

    pub fn is_busy(&self, id: EntityId) -> bool {
        self.pending.iter().any(|(pending_id, _)| *pending_id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Op {
        Delete,
        Reactivate,
    }

    #[test]
    fn test_duplicate_is_rejected() {
        let mut markers = InFlight::default();
        assert!(markers.try_begin(1, Op::Delete));
        assert!(!markers.try_begin(1, Op::Delete));
        assert!(markers.try_begin(1, Op::Reactivate));
        assert!(markers.try_begin(2, Op::Delete));
        assert!(markers.is_pending(1, Op::Delete));

        markers.finish(1, Op::Delete);
        assert!(!markers.is_pending(1, Op::Delete));
        assert!(markers.is_busy(1));
        markers.finish(1, Op::Reactivate);
        markers.finish(2, Op::Delete);
        assert!(markers.is_empty());
    }
}
