//! Owned AVL tree keyed by a single matrix index
//!
//! Every node exclusively owns its children, so the tree has no cycles and
//! needs no reference counting. Insert and remove are recursive and rebalance
//! each node on the way back up the search path. The scalar and structural
//! index trees are both instances of [`AvlTree`] with different payloads.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::mem;

use crate::MatrixError;

pub(crate) type Link<V> = Option<Box<Node<V>>>;

#[derive(Debug, Clone)]
pub(crate) struct Node<V> {
    pub(crate) key: usize,
    pub(crate) value: V,
    pub(crate) left: Link<V>,
    pub(crate) right: Link<V>,
    pub(crate) height: i32,
}

impl<V> Node<V> {
    fn leaf(key: usize, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            left: None,
            right: None,
            height: 1,
        })
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    fn balance_factor(&self) -> i32 {
        height(&self.left) - height(&self.right)
    }
}

fn height<V>(link: &Link<V>) -> i32 {
    link.as_ref().map_or(0, |node| node.height)
}

fn rotate_left<V>(mut node: Box<Node<V>>) -> Box<Node<V>> {
    let Some(mut right) = node.right.take() else {
        return node;
    };
    node.right = right.left.take();
    node.update_height();
    right.left = Some(node);
    right.update_height();
    right
}

fn rotate_right<V>(mut node: Box<Node<V>>) -> Box<Node<V>> {
    let Some(mut left) = node.left.take() else {
        return node;
    };
    node.left = left.right.take();
    node.update_height();
    left.right = Some(node);
    left.update_height();
    left
}

/// Recompute the height of `node` and restore its balance factor
///
/// Left-heavy: a non-negative left child takes a single right rotation,
/// a negative one takes left-then-right. Right-heavy is the mirror image.
fn rebalance<V>(mut node: Box<Node<V>>) -> Box<Node<V>> {
    node.update_height();
    let bf = node.balance_factor();

    if bf > 1 {
        let child_bf = node.left.as_ref().map_or(0, |left| left.balance_factor());
        if child_bf < 0 {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }
    if bf < -1 {
        let child_bf = node.right.as_ref().map_or(0, |right| right.balance_factor());
        if child_bf > 0 {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }
    node
}

fn insert_node<V>(link: Link<V>, key: usize, value: V) -> (Box<Node<V>>, Option<V>) {
    let Some(mut node) = link else {
        return (Node::leaf(key, value), None);
    };

    let replaced = match key.cmp(&node.key) {
        Ordering::Equal => {
            let old = mem::replace(&mut node.value, value);
            return (node, Some(old));
        }
        Ordering::Less => {
            let (child, replaced) = insert_node(node.left.take(), key, value);
            node.left = Some(child);
            replaced
        }
        Ordering::Greater => {
            let (child, replaced) = insert_node(node.right.take(), key, value);
            node.right = Some(child);
            replaced
        }
    };

    (rebalance(node), replaced)
}

fn max_key<V>(node: &Node<V>) -> usize {
    let mut current = node;
    while let Some(right) = current.right.as_deref() {
        current = right;
    }
    current.key
}

fn remove_node<V>(link: Link<V>, key: usize) -> (Link<V>, Option<V>) {
    let Some(mut node) = link else {
        return (None, None);
    };

    let removed = match key.cmp(&node.key) {
        Ordering::Less => {
            let (child, removed) = remove_node(node.left.take(), key);
            node.left = child;
            removed
        }
        Ordering::Greater => {
            let (child, removed) = remove_node(node.right.take(), key);
            node.right = child;
            removed
        }
        Ordering::Equal => match (node.left.take(), node.right.take()) {
            (None, right) => return (right, Some(node.value)),
            (left, None) => return (left, Some(node.value)),
            (Some(left), Some(right)) => {
                // Two children: pull up the in-order predecessor, never the successor.
                let predecessor = max_key(&left);
                let (new_left, predecessor_value) = remove_node(Some(left), predecessor);
                node.left = new_left;
                node.right = Some(right);
                node.key = predecessor;
                predecessor_value.map(|value| mem::replace(&mut node.value, value))
            }
        },
    };

    (Some(rebalance(node)), removed)
}

fn for_each_value_mut<V, F: FnMut(&mut V)>(link: &mut Link<V>, f: &mut F) {
    if let Some(node) = link.as_deref_mut() {
        for_each_value_mut(&mut node.left, f);
        f(&mut node.value);
        for_each_value_mut(&mut node.right, f);
    }
}

/// Verify heights, balance factors and key order; returns the subtree height
/// and node count
fn validate_link<V>(
    link: &Link<V>,
    lower: Option<usize>,
    upper: Option<usize>,
) -> Result<(i32, usize), MatrixError> {
    let Some(node) = link.as_deref() else {
        return Ok((0, 0));
    };

    if lower.is_some_and(|lower| node.key <= lower) || upper.is_some_and(|upper| node.key >= upper)
    {
        return Err(MatrixError::InvalidArgument);
    }

    let (left_height, left_count) = validate_link(&node.left, lower, Some(node.key))?;
    let (right_height, right_count) = validate_link(&node.right, Some(node.key), upper)?;

    let expected = 1 + left_height.max(right_height);
    if node.height != expected || (left_height - right_height).abs() > 1 {
        return Err(MatrixError::InvalidArgument);
    }

    Ok((expected, left_count + right_count + 1))
}

/// Balanced map from a matrix index to a payload
#[derive(Debug, Clone)]
pub struct AvlTree<V> {
    root: Link<V>,
    len: usize,
}

impl<V> Default for AvlTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> AvlTree<V> {
    /// Create an empty tree
    pub const fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Number of keys stored
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the root (0 for an empty tree)
    pub fn height(&self) -> usize {
        height(&self.root) as usize
    }

    /// Look up the payload stored under `key`
    pub fn get(&self, key: usize) -> Option<&V> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match key.cmp(&node.key) {
                Ordering::Equal => return Some(&node.value),
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => current = node.right.as_deref(),
            }
        }
        None
    }

    /// Look up the payload stored under `key` for mutation
    ///
    /// Mutating through this reference never changes the shape of the tree.
    pub fn get_mut(&mut self, key: usize) -> Option<&mut V> {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            match key.cmp(&node.key) {
                Ordering::Equal => return Some(&mut node.value),
                Ordering::Less => current = node.left.as_deref_mut(),
                Ordering::Greater => current = node.right.as_deref_mut(),
            }
        }
        None
    }

    pub fn contains_key(&self, key: usize) -> bool {
        self.get(key).is_some()
    }

    /// Insert `value` under `key`, returning the payload it replaced
    pub fn insert(&mut self, key: usize, value: V) -> Option<V> {
        let (root, replaced) = insert_node(self.root.take(), key, value);
        self.root = Some(root);
        if replaced.is_none() {
            self.len += 1;
        }
        replaced
    }

    /// Remove `key`, returning its payload if it was present
    pub fn remove(&mut self, key: usize) -> Option<V> {
        let (root, removed) = remove_node(self.root.take(), key);
        self.root = root;
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Drop every node
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// In-order iterator over `(key, &payload)`
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self.root.as_deref(), self.len)
    }

    /// Keys in increasing order
    pub fn keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Apply `f` to every payload in key order
    pub fn for_each_value_mut<F: FnMut(&mut V)>(&mut self, mut f: F) {
        for_each_value_mut(&mut self.root, &mut f);
    }

    /// Check AVL balance, cached heights, strict key order and the length counter
    pub fn validate(&self) -> Result<(), MatrixError> {
        let (_, count) = validate_link(&self.root, None, None)?;
        if count != self.len {
            return Err(MatrixError::InvalidArgument);
        }
        Ok(())
    }
}

/// In-order iterator over an [`AvlTree`]
pub struct Iter<'a, V> {
    stack: Vec<&'a Node<V>>,
    remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    fn new(root: Option<&'a Node<V>>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node<V>>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left.as_deref();
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (usize, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining = self.remaining.saturating_sub(1);
        Some((node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, V> ExactSizeIterator for Iter<'a, V> {}

impl<'a, V> IntoIterator for &'a AvlTree<V> {
    type Item = (usize, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
