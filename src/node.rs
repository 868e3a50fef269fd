use std::cmp;

use log::trace;

pub(crate) type Link<T> = Option<Box<Node<T>>>;

#[derive(Clone)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
    pub(crate) height: usize,
}

impl<T> Node<T> {
    pub(crate) fn leaf(value: T) -> Box<Self> {
        Box::new(Node {
            value,
            left: None,
            right: None,
            height: 1,
        })
    }

    pub(crate) fn left_height(&self) -> usize {
        height(&self.left)
    }

    pub(crate) fn right_height(&self) -> usize {
        height(&self.right)
    }

    /// Height of the right subtree minus height of the left subtree.
    pub(crate) fn balance_factor(&self) -> isize {
        self.right_height() as isize - self.left_height() as isize
    }

    pub(crate) fn fix_height(&mut self) {
        self.height = cmp::max(self.left_height(), self.right_height()) + 1;
    }
}

/// Height of a subtree, an absent subtree has height 0.
pub(crate) fn height<T>(link: &Link<T>) -> usize {
    match link {
        None => 0,
        Some(node) => node.height,
    }
}

/// Promotes the left child of `node` to subtree root.
/// A node without left child is returned unchanged.
pub(crate) fn rotate_right<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let mut left = match node.left.take() {
        Some(left) => left,
        None => return node,
    };
    node.left = left.right.take();
    node.fix_height();
    left.right = Some(node);
    left.fix_height();
    left
}

/// Promotes the right child of `node` to subtree root.
/// A node without right child is returned unchanged.
pub(crate) fn rotate_left<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let mut right = match node.right.take() {
        Some(right) => right,
        None => return node,
    };
    node.right = right.left.take();
    node.fix_height();
    right.left = Some(node);
    right.fix_height();
    right
}

/// Restores AVL condition (balance) at given node if necessary and adjusts height.
/// Both subtrees must already be balanced and their heights must differ by at most 2,
/// which always holds after a single insertion or removal below `node`.
/// Returns the new subtree root.
pub(crate) fn rebalance<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    node.fix_height();
    let balance = node.balance_factor();
    debug_assert!((-2..=2).contains(&balance), "impossible balance factor {balance}");

    if balance > 1 {
        // Right heavy
        if let Some(right) = node.right.take() {
            if right.balance_factor() < 0 {
                trace!("rebalance right-left at height {}", node.height);
                node.right = Some(rotate_right(right));
            } else {
                trace!("rebalance right-right at height {}", node.height);
                node.right = Some(right);
            }
        }
        rotate_left(node)
    } else if balance < -1 {
        // Left heavy
        if let Some(left) = node.left.take() {
            if left.balance_factor() > 0 {
                trace!("rebalance left-right at height {}", node.height);
                node.left = Some(rotate_left(left));
            } else {
                trace!("rebalance left-left at height {}", node.height);
                node.left = Some(left);
            }
        }
        rotate_right(node)
    } else {
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_children(value: i32, left: Link<i32>, right: Link<i32>) -> Box<Node<i32>> {
        let mut node = Node::leaf(value);
        node.left = left;
        node.right = right;
        node.fix_height();
        node
    }

    #[test]
    fn test_leaf() {
        let node = Node::leaf(7);
        assert_eq!(node.height, 1);
        assert_eq!(node.balance_factor(), 0);
        assert_eq!(height::<i32>(&None), 0);
    }

    #[test]
    fn test_rotate_right() {
        //       4       2
        //      / \     / \
        //     2   5 ->1   4
        //    / \         / \
        //   1   3       3   5
        let left = with_children(2, Some(Node::leaf(1)), Some(Node::leaf(3)));
        let root = with_children(4, Some(left), Some(Node::leaf(5)));
        assert_eq!(root.height, 3);

        let root = rotate_right(root);
        assert_eq!(root.value, 2);
        assert_eq!(root.height, 3);
        assert_eq!(root.left.as_ref().map(|n| n.value), Some(1));
        let right = root.right.as_ref().unwrap();
        assert_eq!(right.value, 4);
        assert_eq!(right.height, 2);
        assert_eq!(right.left.as_ref().map(|n| n.value), Some(3));
        assert_eq!(right.right.as_ref().map(|n| n.value), Some(5));
    }

    #[test]
    fn test_rotate_left() {
        //   1           2
        //    \         / \
        //     2   ->  1   3
        //      \
        //       3
        let right = with_children(2, None, Some(Node::leaf(3)));
        let root = with_children(1, None, Some(right));

        let root = rotate_left(root);
        assert_eq!(root.value, 2);
        assert_eq!(root.height, 2);
        assert_eq!(root.left.as_ref().map(|n| (n.value, n.height)), Some((1, 1)));
        assert_eq!(root.right.as_ref().map(|n| (n.value, n.height)), Some((3, 1)));
    }

    #[test]
    fn test_rotate_without_child() {
        let root = rotate_left(Node::leaf(1));
        assert_eq!(root.value, 1);
        let root = rotate_right(root);
        assert_eq!(root.value, 1);
    }

    #[test]
    fn test_rebalance_double_rotation() {
        //   3       2
        //  /       / \
        // 1   ->  1   3
        //  \
        //   2
        let left = with_children(1, None, Some(Node::leaf(2)));
        let mut root = Node::leaf(3);
        root.left = Some(left);

        let root = rebalance(root);
        assert_eq!(root.value, 2);
        assert_eq!(root.height, 2);
        assert_eq!(root.balance_factor(), 0);
        assert_eq!(root.left.as_ref().map(|n| n.value), Some(1));
        assert_eq!(root.right.as_ref().map(|n| n.value), Some(3));
    }

    #[test]
    fn test_rebalance_balanced_node_unchanged() {
        let mut root = Node::leaf(2);
        root.left = Some(Node::leaf(1));
        let root = rebalance(root);
        assert_eq!(root.value, 2);
        assert_eq!(root.height, 2);
        assert_eq!(root.balance_factor(), -1);
    }
}
