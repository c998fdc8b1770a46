//! Differential-coefficient computation over the node graph.

use super::node::NodePtr;
use crate::scalar::Scalar;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Map key with pointer identity.
///
/// Two keys compare equal only when they refer to the same node allocation.
/// Holding the `Rc` keeps every reached node alive while results are
/// queried, even if the caller drops its own handles.
struct NodeKey<T: Scalar>(NodePtr<T>);

impl<T: Scalar> PartialEq for NodeKey<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: Scalar> Eq for NodeKey<T> {}

impl<T: Scalar> Hash for NodeKey<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as usize).hash(state);
    }
}

/// Per-node bookkeeping during a computation.
#[derive(Debug, Clone, Copy, Default)]
struct NodeInfo<T: Scalar> {
    /// Accumulated differential coefficient (adjoint).
    diff: T,
    /// Remaining references from reachable parent nodes.
    ref_count: usize,
}

/// Computes differential coefficients of a top node with respect to every
/// node reachable from it, by reverse-mode accumulation.
///
/// The computation runs two breadth-first passes over the graph: the first
/// enumerates the subgraph reachable from the top node and counts the
/// in-graph references of each node, the second propagates adjoints from the
/// top node downwards. A node forwards its adjoint to its children only once
/// its reference count has dropped to zero, i.e. after every parent has
/// contributed, which yields a valid reverse topological order and sums the
/// contributions of all paths in diamond-shaped graphs.
#[derive(Default)]
pub struct NodeDifferentiator<T: Scalar> {
    info: HashMap<NodeKey<T>, NodeInfo<T>>,
    queue: VecDeque<NodePtr<T>>,
}

impl<T: Scalar> NodeDifferentiator<T> {
    /// Create an empty differentiator.
    pub fn new() -> Self {
        Self {
            info: HashMap::new(),
            queue: VecDeque::new(),
        }
    }

    /// Compute differential coefficients of `top_node` with respect to all
    /// nodes reachable from it.
    ///
    /// Results of a previous call are discarded.
    pub fn compute(&mut self, top_node: &NodePtr<T>) {
        self.list_nodes(top_node);
        self.compute_coeffs(top_node);
    }

    /// Get the differential coefficient of a node.
    ///
    /// Returns zero for any node that was not reached from the top node of
    /// the last `compute` call.
    pub fn coeff(&self, node: &NodePtr<T>) -> T {
        self.info
            .get(&NodeKey(Rc::clone(node)))
            .map_or_else(T::zero, |info| info.diff)
    }

    /// List nodes reachable from `top_node` and count in-graph references.
    fn list_nodes(&mut self, top_node: &NodePtr<T>) {
        self.info.clear();
        self.queue.clear();

        self.info
            .insert(NodeKey(Rc::clone(top_node)), NodeInfo::default());
        self.queue.push_back(Rc::clone(top_node));
        while let Some(node) = self.queue.pop_front() {
            for child in node.children() {
                let info = match self.info.entry(NodeKey(Rc::clone(child.node()))) {
                    Entry::Occupied(entry) => entry.into_mut(),
                    Entry::Vacant(entry) => {
                        self.queue.push_back(Rc::clone(child.node()));
                        entry.insert(NodeInfo::default())
                    }
                };
                info.ref_count += 1;
            }
        }
    }

    /// Propagate adjoints using the reference counts from `list_nodes`.
    fn compute_coeffs(&mut self, top_node: &NodePtr<T>) {
        if let Some(info) = self.info.get_mut(&NodeKey(Rc::clone(top_node))) {
            info.diff = T::one();
        }
        self.queue.push_back(Rc::clone(top_node));
        while let Some(node) = self.queue.pop_front() {
            let Some(node_diff) = self
                .info
                .get(&NodeKey(Rc::clone(&node)))
                .map(|info| info.diff)
            else {
                continue;
            };
            for child in node.children() {
                let Some(child_info) = self.info.get_mut(&NodeKey(Rc::clone(child.node())))
                else {
                    continue;
                };
                child_info.diff = child_info.diff + node_diff * child.sensitivity();
                child_info.ref_count -= 1;
                if child_info.ref_count == 0 {
                    self.queue.push_back(Rc::clone(child.node()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::node::{create_leaf, create_node, ChildNode, NodePtr};
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_compute_one_node() {
        let n1: NodePtr<f64> = create_leaf();

        let mut diff = NodeDifferentiator::new();
        diff.compute(&n1);
        assert_relative_eq!(diff.coeff(&n1), 1.0);
    }

    #[test]
    fn test_compute_two_nodes() {
        let n1: NodePtr<f64> = create_leaf();
        let c12 = 1.234;
        let n2 = create_node([ChildNode::new(Rc::clone(&n1), c12)]);

        let mut diff = NodeDifferentiator::new();
        diff.compute(&n2);
        assert_relative_eq!(diff.coeff(&n1), c12);
        assert_relative_eq!(diff.coeff(&n2), 1.0);
    }

    #[test]
    fn test_compute_three_parallel_nodes() {
        let n1: NodePtr<f64> = create_leaf();
        let n2: NodePtr<f64> = create_leaf();
        let c13 = 1.234;
        let c23 = 2.468;
        let n3 = create_node([
            ChildNode::new(Rc::clone(&n1), c13),
            ChildNode::new(Rc::clone(&n2), c23),
        ]);

        let mut diff = NodeDifferentiator::new();
        diff.compute(&n3);
        assert_relative_eq!(diff.coeff(&n1), c13);
        assert_relative_eq!(diff.coeff(&n2), c23);
    }

    #[test]
    fn test_compute_three_series_nodes() {
        let n1: NodePtr<f64> = create_leaf();
        let c12 = 1.234;
        let n2 = create_node([ChildNode::new(Rc::clone(&n1), c12)]);
        let c23 = 2.468;
        let n3 = create_node([ChildNode::new(Rc::clone(&n2), c23)]);

        let mut diff = NodeDifferentiator::new();
        diff.compute(&n3);
        assert_relative_eq!(diff.coeff(&n1), c12 * c23);
        assert_relative_eq!(diff.coeff(&n2), c23);
    }

    #[test]
    fn test_compute_four_nodes_in_a_diamond() {
        let n1: NodePtr<f64> = create_leaf();
        let c12 = 1.234;
        let n2 = create_node([ChildNode::new(Rc::clone(&n1), c12)]);
        let c13 = 2.345;
        let n3 = create_node([ChildNode::new(Rc::clone(&n1), c13)]);
        let c24 = 3.456;
        let c34 = 4.567;
        let n4 = create_node([
            ChildNode::new(Rc::clone(&n2), c24),
            ChildNode::new(Rc::clone(&n3), c34),
        ]);

        let mut diff = NodeDifferentiator::new();
        diff.compute(&n4);
        assert_relative_eq!(diff.coeff(&n1), c12 * c24 + c13 * c34);
        assert_relative_eq!(diff.coeff(&n2), c24);
        assert_relative_eq!(diff.coeff(&n3), c34);
        assert_relative_eq!(diff.coeff(&n4), 1.0);
    }

    #[test]
    fn test_compute_two_nodes_separated() {
        let n1: NodePtr<f64> = create_leaf();
        let n2: NodePtr<f64> = create_leaf();

        let mut diff = NodeDifferentiator::new();
        diff.compute(&n2);
        assert_relative_eq!(diff.coeff(&n1), 0.0);
        assert_relative_eq!(diff.coeff(&n2), 1.0);
    }

    #[test]
    fn test_recompute_overwrites_previous_results() {
        let n1: NodePtr<f64> = create_leaf();
        let n2 = create_node([ChildNode::new(Rc::clone(&n1), 2.0)]);
        let n3 = create_node([ChildNode::new(Rc::clone(&n1), 3.0)]);

        let mut diff = NodeDifferentiator::new();
        diff.compute(&n2);
        assert_relative_eq!(diff.coeff(&n1), 2.0);

        diff.compute(&n3);
        assert_relative_eq!(diff.coeff(&n1), 3.0);
        assert_relative_eq!(diff.coeff(&n2), 0.0);
    }
}
