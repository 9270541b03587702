use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    DefaultLocation,
    Places,
    Categories,
    Regions,
}

/// Generation number handed out when a request starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub kind: RequestKind,
    pub generation: u64,
}

/// Makes the last request of each kind win: responses carrying an older
/// ticket are rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestTracker {
    next_generation: u64,
    latest: HashMap<RequestKind, u64>,
    pending: HashSet<RequestKind>,
}

impl RequestTracker {
    pub fn begin(&mut self, kind: RequestKind) -> RequestTicket {
        self.next_generation += 1;
        self.latest.insert(kind, self.next_generation);
        self.pending.insert(kind);
        RequestTicket {
            kind,
            generation: self.next_generation,
        }
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.latest.get(&ticket.kind) == Some(&ticket.generation)
    }

    /// Marks the request finished. Returns `false` for superseded tickets,
    /// whose kind stays pending until the newest request lands.
    pub fn complete(&mut self, ticket: &RequestTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.pending.remove(&ticket.kind);
        true
    }

    pub fn in_flight(&self, kind: RequestKind) -> bool {
        self.pending.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older_of_same_kind() {
        let mut tracker = RequestTracker::default();
        let first = tracker.begin(RequestKind::Places);
        let second = tracker.begin(RequestKind::Places);
        assert!(!tracker.is_current(&first));
        assert!(tracker.is_current(&second));
    }

    #[test]
    fn stale_completion_leaves_kind_pending() {
        let mut tracker = RequestTracker::default();
        let first = tracker.begin(RequestKind::Places);
        let second = tracker.begin(RequestKind::Places);
        assert!(!tracker.complete(&first));
        assert!(tracker.in_flight(RequestKind::Places));
        assert!(tracker.complete(&second));
        assert!(!tracker.in_flight(RequestKind::Places));
    }

    #[test]
    fn kinds_are_tracked_independently() {
        let mut tracker = RequestTracker::default();
        let places = tracker.begin(RequestKind::Places);
        let regions = tracker.begin(RequestKind::Regions);
        assert!(tracker.is_current(&places));
        assert!(tracker.is_current(&regions));
    }

    #[test]
    fn unknown_ticket_is_not_current() {
        let tracker = RequestTracker::default();
        let ticket = RequestTicket {
            kind: RequestKind::Categories,
            generation: 1,
        };
        assert!(!tracker.is_current(&ticket));
    }
}
