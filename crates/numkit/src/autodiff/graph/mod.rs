//! Computation graph for reverse-mode automatic differentiation.
//!
//! The graph is a directed acyclic graph of immutable, reference-counted
//! nodes. Each node records edges to the child quantities it was computed
//! from, weighted by local partial derivatives; a node without children is a
//! leaf, anchoring an independent variable. [`NodeDifferentiator`] walks the
//! graph from a designated top node and accumulates the adjoint of every
//! reachable node.

mod differentiator;
mod node;

pub use differentiator::NodeDifferentiator;
pub use node::{create_leaf, create_node, ChildNode, Node, NodePtr};
