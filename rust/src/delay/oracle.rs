//! On-demand longest path between two nodes.

use crate::graph::{NodeId, OrderedGraph};

/// Answers single `max_delay` queries without a precomputed table.
#[derive(Clone, Copy, Debug)]
pub struct LongestPathOracle<'g> {
    graph: &'g OrderedGraph,
}

impl<'g> LongestPathOracle<'g> {
    pub fn new(graph: &'g OrderedGraph) -> Self {
        Self { graph }
    }

    /// Longest path delay from `src` to `dst`, 0 if `src >= dst` or unreachable.
    ///
    /// Relaxes successors over the id window `[src, dst]` only, using a table
    /// indexed by offset from `src`.
    pub fn max_delay(&self, src: NodeId, dst: NodeId) -> u32 {
        if src >= dst {
            return 0;
        }
        let offset = src as usize;
        let span = (dst - src) as usize + 1;
        let mut delays: Vec<Option<u32>> = vec![None; span];
        delays[0] = Some(0);

        for i in 0..span - 1 {
            let Some(current) = delays[i] else {
                continue;
            };
            for &succ in &self.graph.node((i + offset) as NodeId).next {
                if succ > dst {
                    continue;
                }
                let candidate = current + self.graph.node(succ).delay;
                let slot = &mut delays[succ as usize - offset];
                if slot.map_or(true, |d| d < candidate) {
                    *slot = Some(candidate);
                }
            }
        }
        delays[span - 1].unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{fixtures, NetlistBuilder};
    use crate::topo::topological_order;

    #[test]
    fn test_lecture_example() {
        let graph = topological_order(&fixtures::lecture_example());
        let oracle = LongestPathOracle::new(&graph);
        // a, b, g1, c, g2, y
        assert_eq!(oracle.max_delay(0, 5), 2);
        assert_eq!(oracle.max_delay(3, 5), 2);
        assert_eq!(oracle.max_delay(0, 4), 0);
        assert_eq!(oracle.max_delay(5, 0), 0);
        assert_eq!(oracle.max_delay(2, 2), 0);
    }

    #[test]
    fn test_picks_longest_of_reconvergent_paths() {
        let mut b = NetlistBuilder::new(0, 1, 1);
        b.add_input("a").unwrap();
        b.add_output("y").unwrap();
        b.add_node("slow", 10, false, false, &["a"]).unwrap();
        b.add_node("fast", 2, false, false, &["a"]).unwrap();
        b.add_gate("y", &["slow", "fast"]).unwrap();
        let graph = topological_order(&b.build().unwrap());

        let oracle = LongestPathOracle::new(&graph);
        let a = 0;
        let y = graph.len() as NodeId - 1;
        assert_eq!(oracle.max_delay(a, y), 11);
    }
}
