//! Nodes of the computation graph for reverse-mode automatic differentiation.

use crate::scalar::Scalar;
use smallvec::SmallVec;
use std::rc::Rc;

/// Shared pointer to an immutable graph node.
///
/// A node is shared between the variable that produced it and every parent
/// node referencing it, so a subgraph is reclaimed only when the last
/// referencing expression is dropped.
pub type NodePtr<T> = Rc<Node<T>>;

/// Edge to a child node.
///
/// Carries the partial differential coefficient of the parent node's output
/// with respect to the child node's output.
#[derive(Debug, Clone)]
pub struct ChildNode<T: Scalar> {
    node: NodePtr<T>,
    sensitivity: T,
}

impl<T: Scalar> ChildNode<T> {
    /// Create an edge to `node` with the given sensitivity.
    pub fn new(node: NodePtr<T>, sensitivity: T) -> Self {
        Self { node, sensitivity }
    }

    /// Get the child node.
    pub fn node(&self) -> &NodePtr<T> {
        &self.node
    }

    /// Get the partial differential coefficient of the parent node by the
    /// child node.
    pub fn sensitivity(&self) -> T {
        self.sensitivity
    }
}

/// A node in the computation graph.
///
/// A node with no children is a leaf and represents an independent variable.
/// Nodes are immutable once created: edges are never added or modified, so
/// shared subgraphs can be referenced from any number of parents.
#[derive(Debug)]
pub struct Node<T: Scalar> {
    // Arithmetic produces nodes with at most two children, so the edge list
    // stays inline in the common case.
    children: SmallVec<[ChildNode<T>; 2]>,
}

impl<T: Scalar> Node<T> {
    /// Get the child nodes, in the order they were given at construction.
    pub fn children(&self) -> &[ChildNode<T>] {
        &self.children
    }
}

/// Create a leaf node with no children.
pub fn create_leaf<T: Scalar>() -> NodePtr<T> {
    Rc::new(Node {
        children: SmallVec::new(),
    })
}

/// Create a node owning the given child edges.
pub fn create_node<T: Scalar>(children: impl IntoIterator<Item = ChildNode<T>>) -> NodePtr<T> {
    Rc::new(Node {
        children: children.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_leaf() {
        let node: NodePtr<f64> = create_leaf();
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_create_node_with_one_child() {
        let child: NodePtr<f64> = create_leaf();
        let node = create_node([ChildNode::new(Rc::clone(&child), 1.234)]);

        assert_eq!(node.children().len(), 1);
        assert!(Rc::ptr_eq(node.children()[0].node(), &child));
        assert_eq!(node.children()[0].sensitivity(), 1.234);
    }

    #[test]
    fn test_create_node_preserves_order() {
        let child1: NodePtr<f64> = create_leaf();
        let child2: NodePtr<f64> = create_leaf();
        let node = create_node([
            ChildNode::new(Rc::clone(&child1), 1.0),
            ChildNode::new(Rc::clone(&child2), 2.0),
        ]);

        assert_eq!(node.children().len(), 2);
        assert!(Rc::ptr_eq(node.children()[0].node(), &child1));
        assert!(Rc::ptr_eq(node.children()[1].node(), &child2));
    }

    #[test]
    fn test_child_outlives_variable_handle() {
        let node = {
            let child: NodePtr<f64> = create_leaf();
            create_node([ChildNode::new(child, 2.0)])
        };
        // The edge keeps the child alive after the original handle is gone.
        assert_eq!(node.children()[0].node().children().len(), 0);
    }
}
