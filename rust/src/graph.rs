//! Netlist graph model.
//!
//! Nodes live in a single arena (`Vec<Node>`) and refer to each other by index.
//! A [`Netlist`] is indexed by construction order; an [`OrderedGraph`] is the
//! same circuit re-indexed so that the index of a node is its topological id.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::config::ClusteringConfig;
use crate::interner::SignalInterner;

/// Index of a node in its arena.
pub type NodeId = u32;

/// Suffix appended to a latch input signal to name the primary output that
/// terminates it.
pub const LATCH_SINK_SUFFIX: &str = "$latch";

/// Errors raised while building or validating a netlist.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Driver '{signal}' of '{sink}' is not declared")]
    UnknownSignal { signal: String, sink: String },
    #[error("Signal '{0}' is declared more than once")]
    DuplicateSignal(String),
    #[error("Signal '{0}' already has a driver")]
    DuplicateDriver(String),
    #[error("Edge {from} -> {to} violates topological order (cycle in netlist?)")]
    NotTopological { from: NodeId, to: NodeId },
}

/// A gate, primary input or primary output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    pub delay: u32,
    pub is_pi: bool,
    pub is_po: bool,
    pub prev: Vec<NodeId>,
    pub next: Vec<NodeId>,
}

impl Node {
    pub fn new(name: impl Into<String>, delay: u32, is_pi: bool, is_po: bool) -> Self {
        Self {
            name: name.into(),
            delay,
            is_pi,
            is_po,
            prev: Vec::new(),
            next: Vec::new(),
        }
    }
}

/// A finite circuit as produced by the builder, indexed by declaration order.
#[derive(Clone, Debug, Default)]
pub struct Netlist {
    nodes: Vec<Node>,
    signals: SignalInterner,
}

impl Netlist {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Arena index of the node driving `name`.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.signals.get(name)
    }

    /// Primary outputs in declaration order.
    pub fn primary_outputs(&self) -> Vec<NodeId> {
        (0..self.nodes.len() as NodeId)
            .filter(|&id| self.nodes[id as usize].is_po)
            .collect()
    }

    pub fn primary_inputs(&self) -> Vec<NodeId> {
        (0..self.nodes.len() as NodeId)
            .filter(|&id| self.nodes[id as usize].is_pi)
            .collect()
    }
}

/// Incremental netlist construction by signal name.
///
/// Fan-in lists are resolved in [`NetlistBuilder::build`], so a gate may name
/// drivers that are declared after it.
#[derive(Debug, Clone)]
pub struct NetlistBuilder {
    pi_delay: u32,
    po_delay: u32,
    node_delay: u32,
    signals: SignalInterner,
    nodes: Vec<Node>,
    fanin: Vec<Option<Vec<String>>>,
}

impl NetlistBuilder {
    pub fn new(pi_delay: u32, po_delay: u32, node_delay: u32) -> Self {
        Self {
            pi_delay,
            po_delay,
            node_delay,
            signals: SignalInterner::default(),
            nodes: Vec::new(),
            fanin: Vec::new(),
        }
    }

    pub fn from_config(config: &ClusteringConfig) -> Self {
        Self::new(config.pi_delay, config.po_delay, config.node_delay)
    }

    /// Delay given to a node of this kind when none is specified.
    pub fn default_delay(&self, is_pi: bool, is_po: bool) -> u32 {
        if is_pi {
            self.pi_delay
        } else if is_po {
            self.po_delay
        } else {
            self.node_delay
        }
    }

    fn declare(&mut self, node: Node) -> Result<NodeId, GraphError> {
        let (id, added) = self.signals.intern(&node.name);
        if !added {
            return Err(GraphError::DuplicateSignal(node.name));
        }
        self.nodes.push(node);
        self.fanin.push(None);
        Ok(id)
    }

    fn attach_fanin(&mut self, id: NodeId, fanin: &[&str]) -> Result<(), GraphError> {
        let idx = id as usize;
        if self.fanin[idx].is_some() || self.nodes[idx].is_pi {
            return Err(GraphError::DuplicateDriver(self.nodes[idx].name.clone()));
        }
        self.fanin[idx] = Some(fanin.iter().map(|s| s.to_string()).collect());
        Ok(())
    }

    pub fn add_input(&mut self, name: &str) -> Result<NodeId, GraphError> {
        self.declare(Node::new(name, self.pi_delay, true, false))
    }

    pub fn add_output(&mut self, name: &str) -> Result<NodeId, GraphError> {
        self.declare(Node::new(name, self.po_delay, false, true))
    }

    /// Declare the gate driving `name`.
    ///
    /// If `name` was already declared as an output, the fan-in is attached to
    /// that output and its delay is kept.
    pub fn add_gate(&mut self, name: &str, fanin: &[&str]) -> Result<NodeId, GraphError> {
        let id = match self.signals.get(name) {
            Some(id) => id,
            None => self.declare(Node::new(name, self.node_delay, false, false))?,
        };
        self.attach_fanin(id, fanin)?;
        Ok(id)
    }

    /// Declare a node with explicit delay and port flags.
    pub fn add_node(
        &mut self,
        name: &str,
        delay: u32,
        is_pi: bool,
        is_po: bool,
        fanin: &[&str],
    ) -> Result<NodeId, GraphError> {
        let id = self.declare(Node::new(name, delay, is_pi, is_po))?;
        if !fanin.is_empty() {
            self.attach_fanin(id, fanin)?;
        }
        Ok(id)
    }

    /// Split a latch into a primary output sink for `d` and a primary input `q`.
    ///
    /// Returns `(sink, source)`.
    pub fn add_latch(&mut self, d: &str, q: &str) -> Result<(NodeId, NodeId), GraphError> {
        let sink_name = format!("{d}{LATCH_SINK_SUFFIX}");
        let sink = self.declare(Node::new(sink_name, self.po_delay, false, true))?;
        self.attach_fanin(sink, &[d])?;
        let source = self.add_input(q)?;
        Ok((sink, source))
    }

    /// Resolve all fan-in names and link predecessors/successors.
    pub fn build(self) -> Result<Netlist, GraphError> {
        let mut nodes = self.nodes;
        for (idx, fanin) in self.fanin.into_iter().enumerate() {
            let Some(fanin) = fanin else {
                continue;
            };
            for signal in fanin {
                let driver = self.signals.get(&signal).ok_or_else(|| {
                    GraphError::UnknownSignal {
                        signal: signal.clone(),
                        sink: nodes[idx].name.clone(),
                    }
                })?;
                nodes[idx].prev.push(driver);
                nodes[driver as usize].next.push(idx as NodeId);
            }
        }
        Ok(Netlist {
            nodes,
            signals: self.signals,
        })
    }
}

/// A netlist restricted to the nodes reachable from a primary output and
/// re-indexed in topological order.
///
/// `prev`/`next` of every node hold topological ids.
#[derive(Clone, Debug, Default)]
pub struct OrderedGraph {
    nodes: Vec<Node>,
    arena_ids: Vec<NodeId>,
    outputs: Vec<NodeId>,
}

impl OrderedGraph {
    pub(crate) fn from_parts(nodes: Vec<Node>, arena_ids: Vec<NodeId>, outputs: Vec<NodeId>) -> Self {
        Self {
            nodes,
            arena_ids,
            outputs,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Index of the node in the source [`Netlist`].
    pub fn arena_id(&self, id: NodeId) -> NodeId {
        self.arena_ids[id as usize]
    }

    /// Primary outputs (topological ids) in netlist declaration order.
    pub fn outputs(&self) -> &[NodeId] {
        &self.outputs
    }

    /// Check that every edge goes from a lower to a higher id.
    pub fn check_topological(&self) -> Result<(), GraphError> {
        for (to, node) in self.nodes.iter().enumerate() {
            if let Some(&from) = node.prev.iter().find(|&&p| p as usize >= to) {
                return Err(GraphError::NotTopological {
                    from,
                    to: to as NodeId,
                });
            }
        }
        Ok(())
    }

    /// All transitive predecessors of `v`, excluding `v`, in discovery order.
    pub fn ancestors(&self, v: NodeId) -> Vec<NodeId> {
        let mut seen: FxHashSet<NodeId> = FxHashSet::default();
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.node(v).prev.iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            if n == v || !seen.insert(n) {
                continue;
            }
            result.push(n);
            stack.extend(self.node(n).prev.iter().rev().copied());
        }
        result
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// 3 inputs, two 2-input gates, one output.
    pub fn lecture_example() -> Netlist {
        let mut b = NetlistBuilder::new(0, 1, 1);
        b.add_input("a").unwrap();
        b.add_input("b").unwrap();
        b.add_input("c").unwrap();
        b.add_output("y").unwrap();
        b.add_gate("g1", &["a", "b"]).unwrap();
        b.add_gate("g2", &["b", "c"]).unwrap();
        b.add_gate("y", &["g1", "g2"]).unwrap();
        b.build().unwrap()
    }

    /// A chain in -> n0 -> n1 -> ... -> out.
    pub fn chain(len: usize) -> Netlist {
        let mut b = NetlistBuilder::new(0, 1, 1);
        b.add_input("in").unwrap();
        b.add_output("out").unwrap();
        let mut driver = "in".to_string();
        for i in 0..len {
            let name = format!("n{i}");
            b.add_gate(&name, &[driver.as_str()]).unwrap();
            driver = name;
        }
        b.add_gate("out", &[driver.as_str()]).unwrap();
        b.build().unwrap()
    }

    /// Two outputs sharing logic, a latch and reconvergent paths.
    pub fn sequential_circuit() -> Netlist {
        let mut b = NetlistBuilder::new(0, 1, 1);
        for name in ["a", "b", "c", "d"] {
            b.add_input(name).unwrap();
        }
        b.add_output("x").unwrap();
        b.add_output("y").unwrap();
        b.add_gate("g1", &["a", "b"]).unwrap();
        b.add_gate("g2", &["b", "c"]).unwrap();
        b.add_gate("g3", &["g1", "g2"]).unwrap();
        b.add_gate("g4", &["g3", "d", "q"]).unwrap();
        b.add_gate("g5", &["g4", "g2"]).unwrap();
        b.add_gate("g6", &["g5", "g1"]).unwrap();
        b.add_gate("g7", &["g6", "g3"]).unwrap();
        b.add_gate("x", &["g7"]).unwrap();
        b.add_gate("y", &["g5", "c"]).unwrap();
        b.add_latch("g6", "q").unwrap();
        b.build().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_links_both_directions() {
        let netlist = fixtures::lecture_example();
        assert_eq!(netlist.len(), 6);

        let g1 = netlist.find("g1").unwrap();
        let a = netlist.find("a").unwrap();
        let y = netlist.find("y").unwrap();

        assert_eq!(netlist.node(g1).prev, vec![a, netlist.find("b").unwrap()]);
        assert!(netlist.node(a).next.contains(&g1));
        assert!(netlist.node(g1).next.contains(&y));
        assert_eq!(netlist.primary_outputs(), vec![y]);
        assert_eq!(netlist.primary_inputs().len(), 3);
    }

    #[test]
    fn test_gate_on_output_keeps_output_delay() {
        let mut b = NetlistBuilder::new(0, 5, 1);
        b.add_input("a").unwrap();
        let y = b.add_output("y").unwrap();
        assert_eq!(b.add_gate("y", &["a"]).unwrap(), y);
        let netlist = b.build().unwrap();

        let node = netlist.node(y);
        assert!(node.is_po);
        assert_eq!(node.delay, 5);
        assert_eq!(node.prev.len(), 1);
    }

    #[test]
    fn test_unknown_driver_is_error() {
        let mut b = NetlistBuilder::new(0, 1, 1);
        b.add_output("y").unwrap();
        b.add_gate("y", &["ghost"]).unwrap();
        assert_eq!(
            b.build().unwrap_err(),
            GraphError::UnknownSignal {
                signal: "ghost".to_string(),
                sink: "y".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_declarations() {
        let mut b = NetlistBuilder::new(0, 1, 1);
        b.add_input("a").unwrap();
        assert_eq!(
            b.add_input("a"),
            Err(GraphError::DuplicateSignal("a".to_string()))
        );
        b.add_gate("g", &["a"]).unwrap();
        assert_eq!(
            b.add_gate("g", &["a"]),
            Err(GraphError::DuplicateDriver("g".to_string()))
        );
        assert_eq!(
            b.add_gate("a", &["g"]),
            Err(GraphError::DuplicateDriver("a".to_string()))
        );
    }

    #[test]
    fn test_latch_split() {
        let netlist = fixtures::sequential_circuit();
        let q = netlist.find("q").unwrap();
        let sink = netlist.find(&format!("g6{LATCH_SINK_SUFFIX}")).unwrap();

        assert!(netlist.node(q).is_pi);
        assert!(netlist.node(sink).is_po);
        assert_eq!(netlist.node(sink).prev, vec![netlist.find("g6").unwrap()]);
        assert_eq!(netlist.primary_outputs().len(), 3);
    }

    #[test]
    fn test_add_node_explicit() {
        let mut b = NetlistBuilder::new(0, 1, 1);
        b.add_node("src", 2, true, false, &[]).unwrap();
        let sink = b.add_node("dst", 7, false, true, &["src"]).unwrap();
        let netlist = b.build().unwrap();
        assert_eq!(netlist.node(sink).delay, 7);
        assert_eq!(netlist.node(sink).prev.len(), 1);
    }
}
