//! An ordered set implemented with an AVL tree.
//!
//! [`AvlTreeSet`] keeps its elements in a binary search tree in which the heights of the
//! two subtrees of every node differ by at most one. Insertion, removal and lookup take
//! O(log n) time and iteration yields the elements in ascending order.
//!
//! ```
//! use avl_set::AvlTreeSet;
//!
//! let mut set: AvlTreeSet<_> = [10, 3, 15, 5, 7, 2].into_iter().collect();
//! assert!(!set.insert(15));
//! assert!(set.remove(&3));
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), [2, 5, 7, 10, 15]);
//! assert!(set.is_height_balanced());
//! assert!(set.is_ordered());
//! ```

mod iter;
mod node;
pub mod set;
mod tree;

pub use iter::{IntoIter, Iter};
pub use set::AvlTreeSet;
