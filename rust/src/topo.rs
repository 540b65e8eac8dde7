//! Topological ordering of a netlist.

use crate::graph::{Netlist, NodeId, OrderedGraph};

/// Order every node reachable from a primary output so that predecessors
/// precede successors, and re-index the circuit by that order.
///
/// Post-order DFS over predecessor links, starting from each primary output in
/// declaration order. Nodes that reach no primary output are dropped, as are
/// successor links pointing at them. On a cyclic netlist this still
/// terminates, but the result fails [`OrderedGraph::check_topological`].
pub fn topological_order(netlist: &Netlist) -> OrderedGraph {
    let n = netlist.len();
    let mut seen = vec![false; n];
    let mut order: Vec<NodeId> = Vec::with_capacity(n);

    for po in netlist.primary_outputs() {
        if seen[po as usize] {
            continue;
        }
        seen[po as usize] = true;
        // (node, index of the next predecessor to visit)
        let mut stack: Vec<(NodeId, usize)> = vec![(po, 0)];
        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            let prev = &netlist.node(node).prev;
            if cursor < prev.len() {
                frame.1 += 1;
                let p = prev[cursor];
                if !seen[p as usize] {
                    seen[p as usize] = true;
                    stack.push((p, 0));
                }
            } else {
                order.push(node);
                stack.pop();
            }
        }
    }

    let mut topo_id: Vec<Option<NodeId>> = vec![None; n];
    for (id, &arena) in order.iter().enumerate() {
        topo_id[arena as usize] = Some(id as NodeId);
    }

    let nodes = order
        .iter()
        .map(|&arena| {
            let mut node = netlist.node(arena).clone();
            node.prev = node.prev.iter().filter_map(|&p| topo_id[p as usize]).collect();
            node.next = node.next.iter().filter_map(|&s| topo_id[s as usize]).collect();
            node
        })
        .collect();

    let outputs = netlist
        .primary_outputs()
        .into_iter()
        .filter_map(|po| topo_id[po as usize])
        .collect();

    OrderedGraph::from_parts(nodes, order, outputs)
}
