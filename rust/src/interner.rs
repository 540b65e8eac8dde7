//! Signal name interning for the netlist builder.
//!
//! Maps signal names to arena indices so fan-in lists can be resolved by name
//! without scanning the node list.

use rustc_hash::FxHashMap;

use crate::graph::NodeId;

/// String interner that maps signal names to node arena indices.
#[derive(Debug, Clone)]
pub struct SignalInterner {
    to_id: FxHashMap<String, NodeId>,
}

impl SignalInterner {
    /// Create a new interner with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_id: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Intern a signal name, returning `(id, newly_added)`.
    pub fn intern(&mut self, name: &str) -> (NodeId, bool) {
        if let Some(&id) = self.to_id.get(name) {
            return (id, false);
        }
        let id = self.to_id.len() as NodeId;
        self.to_id.insert(name.to_string(), id);
        (id, true)
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.to_id.get(name).copied()
    }
}

impl Default for SignalInterner {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_assigns_dense_ids() {
        let mut interner = SignalInterner::with_capacity(4);

        let (a, added_a) = interner.intern("n1");
        let (b, added_b) = interner.intern("n2");
        let (a_again, added_again) = interner.intern("n1");

        assert!(added_a && added_b);
        assert!(!added_again);
        assert_eq!(a, a_again);
        assert_ne!(a, b);

        assert_eq!((a, b), (0, 1));
        assert_eq!(interner.get("n2"), Some(b));
        assert_eq!(interner.get("missing"), None);
    }
}
