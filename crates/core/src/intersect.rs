//! Registry of inbound crossings: the places where output rings can start.

use crate::geom::Point;

/// An inbound crossing, addressed in both rings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub point: Point,
    /// Node index in the subject ring.
    pub subject: usize,
    /// Node index in the region ring.
    pub region: usize,
}

/// Inbound crossings in discovery order, each consumed at most once.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<Crossing>,
    consumed: Vec<bool>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an inbound crossing.
    ///
    /// Returns `false` if a crossing at the same subject node is already recorded.
    pub fn push_inbound(&mut self, crossing: Crossing) -> bool {
        if self.position(crossing.subject).is_some() {
            return false;
        }
        self.entries.push(crossing);
        self.consumed.push(false);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, subject: usize) -> Option<usize> {
        self.entries.iter().position(|c| c.subject == subject)
    }

    /// Mark the crossing at subject node `subject` as emitted.
    ///
    /// Nodes that are not recorded inbound crossings are ignored.
    pub fn consume(&mut self, subject: usize) {
        if let Some(i) = self.position(subject) {
            self.consumed[i] = true;
        }
    }

    /// A cursor over unconsumed crossings in discovery order.
    pub fn starts(&self) -> Starts {
        Starts { position: 0 }
    }
}

/// Cursor yielding registry entries not yet consumed.
///
/// Holds no borrow, so the registry can be consumed between calls; each
/// call re-checks the flags and never revisits an earlier entry.
#[derive(Debug, Clone)]
pub struct Starts {
    position: usize,
}

impl Starts {
    pub fn next_unconsumed(&mut self, registry: &Registry) -> Option<Crossing> {
        while self.position < registry.entries.len() {
            let i = self.position;
            self.position += 1;
            if !registry.consumed[i] {
                return Some(registry.entries[i]);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    fn crossing(subject: usize, region: usize) -> Crossing {
        Crossing {
            point: coord! { x: subject as f64, y: 0.0 },
            subject,
            region,
        }
    }

    #[test]
    fn test_push_inbound_deduplicates_by_subject_node() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());
        assert!(registry.push_inbound(crossing(4, 5)));
        assert!(!registry.push_inbound(crossing(4, 9)));
        assert!(registry.push_inbound(crossing(6, 7)));
        assert_eq!(registry.len(), 2);
        let first = registry.starts().next_unconsumed(&registry);
        assert_eq!(first.map(|c| c.region), Some(5));
    }

    #[test]
    fn test_starts_skip_consumed() {
        let mut registry = Registry::new();
        registry.push_inbound(crossing(4, 5));
        registry.push_inbound(crossing(6, 7));
        registry.push_inbound(crossing(8, 9));

        let mut starts = registry.starts();
        let first = starts.next_unconsumed(&registry).unwrap();
        assert_eq!(first.subject, 4);
        registry.consume(4);
        // Consumed while walking from the first start.
        registry.consume(6);

        let second = starts.next_unconsumed(&registry).unwrap();
        assert_eq!(second.subject, 8);
        assert!(starts.next_unconsumed(&registry).is_none());
    }

    #[test]
    fn test_consume_ignores_unknown_nodes() {
        let mut registry = Registry::new();
        registry.push_inbound(crossing(4, 5));
        registry.consume(99);
        let first = registry.starts().next_unconsumed(&registry);
        assert_eq!(first.map(|c| c.subject), Some(4));
    }
}
