use std::borrow::Borrow;
use std::cmp::Ordering;
use std::ptr;

use log::trace;

use crate::iter::{IntoIter, Iter};
use crate::node::{self, Link, Node};

#[derive(Clone)]
pub(crate) struct Tree<T> {
    root: Link<T>,
    num_nodes: usize,
}

impl<T> Tree<T> {
    pub(crate) fn new() -> Self {
        Self {
            root: None,
            num_nodes: 0,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn len(&self) -> usize {
        self.num_nodes
    }

    pub(crate) fn height(&self) -> usize {
        node::height(&self.root)
    }

    pub(crate) fn clear(&mut self) {
        self.root = None;
        self.num_nodes = 0;
    }

    pub(crate) fn first(&self) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some(&node.value)
    }

    pub(crate) fn last(&self) -> Option<&T> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(&node.value)
    }

    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.root.as_deref(), self.num_nodes)
    }

    pub(crate) fn into_values(self) -> IntoIter<T> {
        IntoIter::new(self.root, self.num_nodes)
    }
}

impl<T: Ord> Tree<T> {
    /// Returns the node holding `value`, or the node below which `value` would be inserted.
    /// Returns `None` only if the tree is empty.
    pub(crate) fn find_nearest<Q>(&self, value: &Q) -> Option<&Node<T>>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref()?;
        loop {
            let next = match value.cmp(current.value.borrow()) {
                Ordering::Equal => return Some(current),
                Ordering::Less => current.left.as_deref(),
                Ordering::Greater => current.right.as_deref(),
            };
            match next {
                Some(node) => current = node,
                None => return Some(current),
            }
        }
    }

    pub(crate) fn find_exact<Q>(&self, value: &Q) -> Option<&Node<T>>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match value.cmp(node.value.borrow()) {
                Ordering::Equal => return Some(node),
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        None
    }

    /// Returns the structural parent of `child`, which must be a node of this tree.
    /// Returns `None` if `child` is the root.
    pub(crate) fn find_parent(&self, child: &Node<T>) -> Option<&Node<T>> {
        let mut parent = None;
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match child.value.cmp(&node.value) {
                Ordering::Equal => {
                    debug_assert!(ptr::eq(node, child));
                    return parent;
                }
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
            parent = Some(node);
        }
        None
    }

    pub(crate) fn insert(&mut self, value: T) -> bool {
        if self.root.is_none() {
            self.root = Some(Node::leaf(value));
            self.num_nodes = 1;
            return true;
        }
        if let Some(nearest) = self.find_nearest(&value) {
            if nearest.value.cmp(&value) == Ordering::Equal {
                return false;
            }
        }
        let root = self.root.take();
        self.root = Some(insert_below(root, value));
        self.num_nodes += 1;
        true
    }

    pub(crate) fn remove<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_exact(value)?;
        debug_assert!(self.num_nodes >= 1);
        let removed = remove_below(&mut self.root, value);
        debug_assert!(removed.is_some());
        if removed.is_some() {
            self.num_nodes -= 1;
        }
        removed
    }

    /// Checks that the heights of the two subtrees of every node differ by at most one.
    /// Heights are recomputed, cached heights are not trusted.
    pub(crate) fn is_height_balanced(&self) -> bool {
        fn balanced_height<T>(link: &Link<T>) -> Option<usize> {
            match link {
                None => Some(0),
                Some(node) => {
                    let left = balanced_height(&node.left)?;
                    let right = balanced_height(&node.right)?;
                    if left.abs_diff(right) > 1 {
                        return None;
                    }
                    Some(left.max(right) + 1)
                }
            }
        }
        balanced_height(&self.root).is_some()
    }

    /// Checks that every left subtree holds strictly smaller and every right subtree
    /// strictly greater values than their node.
    pub(crate) fn is_ordered(&self) -> bool {
        fn ordered<T: Ord>(link: &Link<T>, lower: Option<&T>, upper: Option<&T>) -> bool {
            match link {
                None => true,
                Some(node) => {
                    lower.map_or(true, |lower| *lower < node.value)
                        && upper.map_or(true, |upper| node.value < *upper)
                        && ordered(&node.left, lower, Some(&node.value))
                        && ordered(&node.right, Some(&node.value), upper)
                }
            }
        }
        ordered(&self.root, None, None)
    }

    #[cfg(any(test, feature = "consistency_check"))]
    pub(crate) fn check_consistency(&self) {
        fn check<T: Ord>(node: &Node<T>, num_nodes: &mut usize) {
            let mut left_height = 0;
            let mut right_height = 0;

            if let Some(left) = node.left.as_deref() {
                assert!(left.value < node.value);
                check(left, num_nodes);
                left_height = left.height;
            }

            if let Some(right) = node.right.as_deref() {
                assert!(right.value > node.value);
                check(right, num_nodes);
                right_height = right.height;
            }

            // Check height
            assert_eq!(node.height, left_height.max(right_height) + 1);

            // Check AVL condition (nearly balance)
            assert!(left_height <= right_height + 1);
            assert!(right_height <= left_height + 1);

            *num_nodes += 1;
        }

        let mut num_nodes = 0;
        if let Some(root) = self.root.as_deref() {
            check(root, &mut num_nodes);
        }
        assert_eq!(num_nodes, self.num_nodes);
        assert!(self.is_ordered());
        assert!(self.is_height_balanced());
    }
}

// Descends to the empty slot for `value`, then rebalances every node on the way back up.
// Duplicates are rejected by the caller before descending.
fn insert_below<T: Ord>(link: Link<T>, value: T) -> Box<Node<T>> {
    let mut node = match link {
        None => return Node::leaf(value),
        Some(node) => node,
    };
    match value.cmp(&node.value) {
        Ordering::Less => node.left = Some(insert_below(node.left.take(), value)),
        Ordering::Greater => node.right = Some(insert_below(node.right.take(), value)),
        Ordering::Equal => return node,
    }
    node::rebalance(node)
}

// Removes `value` from the subtree at `link` and rebalances every ancestor of the
// removed node up to `link`.
fn remove_below<T, Q>(link: &mut Link<T>, value: &Q) -> Option<T>
where
    T: Borrow<Q>,
    Q: Ord + ?Sized,
{
    let mut node = link.take()?;
    let removed = match value.cmp(node.value.borrow()) {
        Ordering::Less => remove_below(&mut node.left, value),
        Ordering::Greater => remove_below(&mut node.right, value),
        Ordering::Equal => {
            let Node {
                value, left, right, ..
            } = *node;
            *link = splice_out(left, right);
            return Some(value);
        }
    };
    *link = Some(node::rebalance(node));
    removed
}

// Joins the subtrees of a removed node into one balanced subtree.
fn splice_out<T>(left: Link<T>, right: Link<T>) -> Link<T> {
    match (left, right) {
        (left, None) => left,
        (None, right) => right,
        (Some(left), Some(right)) => {
            let (mut successor, rest) = remove_min(right);
            trace!("promote in-order successor");
            successor.left = Some(left);
            successor.right = rest;
            Some(node::rebalance(successor))
        }
    }
}

// Detaches the leftmost node of the subtree at `node`.
// Returns the detached node and the rebalanced remainder of the subtree.
fn remove_min<T>(mut node: Box<Node<T>>) -> (Box<Node<T>>, Link<T>) {
    match node.left.take() {
        None => {
            let rest = node.right.take();
            (node, rest)
        }
        Some(left) => {
            let (min, rest) = remove_min(left);
            node.left = rest;
            (min, Some(node::rebalance(node)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Tree;

    fn tree_of(values: &[i32]) -> Tree<i32> {
        let mut tree = Tree::new();
        for value in values {
            tree.insert(*value);
        }
        tree
    }

    #[test]
    fn test_find_nearest() {
        let tree = Tree::<i32>::new();
        assert!(tree.find_nearest(&1).is_none());

        //     4
        //    / \
        //   2   6
        //  / \
        // 1   3
        let tree = tree_of(&[4, 2, 6, 1, 3]);
        assert_eq!(tree.find_nearest(&2).map(|n| n.value), Some(2));
        assert_eq!(tree.find_nearest(&5).map(|n| n.value), Some(6));
        assert_eq!(tree.find_nearest(&7).map(|n| n.value), Some(6));
        assert_eq!(tree.find_nearest(&0).map(|n| n.value), Some(1));
    }

    #[test]
    fn test_find_exact() {
        let tree = tree_of(&[4, 2, 6, 1, 3]);
        for value in [1, 2, 3, 4, 6] {
            assert_eq!(tree.find_exact(&value).map(|n| n.value), Some(value));
        }
        assert!(tree.find_exact(&5).is_none());
        assert!(Tree::<i32>::new().find_exact(&5).is_none());
    }

    #[test]
    fn test_find_parent() {
        let tree = tree_of(&[4, 2, 6, 1, 3]);
        let parent_of = |value| {
            let node = tree.find_exact(&value).unwrap();
            tree.find_parent(node).map(|n| n.value)
        };
        assert_eq!(parent_of(4), None);
        assert_eq!(parent_of(2), Some(4));
        assert_eq!(parent_of(6), Some(4));
        assert_eq!(parent_of(1), Some(2));
        assert_eq!(parent_of(3), Some(2));
    }

    #[test]
    fn test_remove_leaves_count_untouched_when_absent() {
        let mut tree = tree_of(&[4, 2, 6]);
        assert!(tree.remove(&5).is_none());
        assert_eq!(tree.len(), 3);
        tree.check_consistency();
    }

    #[test]
    fn test_first_last() {
        let tree = Tree::<i32>::new();
        assert!(tree.first().is_none());
        assert!(tree.last().is_none());

        let tree = tree_of(&[10, 3, 15, 5, 7, 2]);
        assert_eq!(tree.first(), Some(&2));
        assert_eq!(tree.last(), Some(&15));
    }
}
