#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::index::{DefaultIx, IndexType, NodeIndex};
use crate::interval::Interval;
use crate::iter::{FilterIter, IntoIter, Iter};
use crate::node::{Color, Node, Side};

/// An interval-value map backed by an augmented red-black tree.
///
/// Nodes live in a vector and refer to each other by [`NodeIndex`], with slot 0 reserved for
/// the black sentinel. Every node records the index of the node with the greatest upper bound
/// in its subtree, which lets overlap queries skip whole subtrees.
///
/// The map itself does not prevent overlapping keys; `IntervalSet` builds the non-overlapping
/// guarantees on top of it.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntervalMap<T, V, Ix = DefaultIx> {
    /// Vector that stores nodes
    pub(crate) nodes: Vec<Node<T, V, Ix>>,
    /// Root of the interval tree
    pub(crate) root: NodeIndex<Ix>,
    /// Number of elements in the map
    pub(crate) len: usize,
}

impl<T, V, Ix> IntervalMap<T, V, Ix>
where
    T: Ord,
    Ix: IndexType,
{
    /// Creates a new `IntervalMap` with estimated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = vec![Self::new_sentinel()];
        nodes.reserve(capacity);
        IntervalMap {
            nodes,
            root: Self::sentinel(),
            len: 0,
        }
    }

    /// Insert an interval-value pair into the map.
    /// If the interval exists, overwrite and return the previous value.
    ///
    /// # Panics
    ///
    /// This method panics when the tree is at the maximum number of nodes for its index
    ///
    /// # Example
    /// ```rust
    /// use rb_interval_set::{Interval, IntervalMap};
    ///
    /// let mut map = IntervalMap::new();
    /// assert_eq!(map.insert(Interval::new(1, 3), 1), None);
    /// assert_eq!(map.insert(Interval::new(1, 3), 2), Some(1));
    /// assert_eq!(map.insert(Interval::new(1, 3), 3), Some(2));
    /// ```
    #[inline]
    pub fn insert(&mut self, interval: Interval<T>, value: V) -> Option<V> {
        let node_idx = NodeIndex::new(self.nodes.len());
        // check for max capacity, except if we use usize
        assert!(
            <Ix as IndexType>::max().index() == !0 || NodeIndex::end() != node_idx,
            "Reached maximum number of nodes"
        );
        self.nodes.push(Self::new_node(interval, value, node_idx));
        self.insert_inner(node_idx)
    }

    /// Remove an interval from the map, returning the value at the interval if the interval exists
    ///
    /// # Example
    /// ```rust
    /// use rb_interval_set::{Interval, IntervalMap};
    ///
    /// let mut map = IntervalMap::new();
    /// map.insert(Interval::new(1, 3), 1);
    /// map.insert(Interval::new(5, 8), 2);
    /// assert_eq!(map.remove(&Interval::new(3, 6)), None);
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.remove(&Interval::new(5, 8)), Some(2));
    /// assert_eq!(map.len(), 1);
    /// ```
    #[inline]
    pub fn remove(&mut self, interval: &Interval<T>) -> Option<V> {
        let node_idx = self.search_exact(interval)?;
        self.remove_inner(node_idx);
        // Swap the node with the last node stored in the vector and update indices
        let mut node = self.nodes.swap_remove(node_idx.index());
        let old = NodeIndex::<Ix>::new(self.nodes.len());
        self.update_idx(old, node_idx);
        node.value.take()
    }

    /// Check if an interval in the map overlaps with the given interval.
    ///
    /// Both bounds are inclusive, so intervals sharing a single point overlap.
    ///
    /// # Example
    /// ```rust
    /// use rb_interval_set::{Interval, IntervalMap};
    ///
    /// let mut map = IntervalMap::new();
    /// map.insert(Interval::new(1, 3), ());
    /// map.insert(Interval::new(6, 7), ());
    /// assert!(map.overlaps(&Interval::new(3, 5)));
    /// assert!(!map.overlaps(&Interval::new(4, 5)));
    /// ```
    #[inline]
    pub fn overlaps(&self, interval: &Interval<T>) -> bool {
        let node_idx = self.search(interval);
        !self.node_ref(node_idx, Node::is_sentinel)
    }

    /// Find all intervals in the map that overlap with the given interval, sorted by interval.
    ///
    /// # Example
    /// ```rust
    /// use rb_interval_set::{Interval, IntervalMap};
    ///
    /// let mut map = IntervalMap::new();
    /// map.insert(Interval::new(6, 7), 'c');
    /// map.insert(Interval::new(1, 3), 'a');
    /// map.insert(Interval::new(4, 5), 'b');
    /// let found: Vec<_> = map
    ///     .find_all_overlap(&Interval::new(3, 6))
    ///     .into_iter()
    ///     .map(|(_, v)| *v)
    ///     .collect();
    /// assert_eq!(found, vec!['a', 'b', 'c']);
    /// ```
    #[inline]
    pub fn find_all_overlap(&self, interval: &Interval<T>) -> Vec<(&Interval<T>, &V)> {
        self.filter_iter(interval).collect()
    }

    /// Find the first interval, in sorted order, that overlaps with the given interval and whose
    /// value satisfies `predicate`. Overlapping entries after the match are never visited.
    ///
    /// # Example
    /// ```rust
    /// use rb_interval_set::{Interval, IntervalMap};
    ///
    /// let mut map = IntervalMap::new();
    /// map.insert(Interval::new(0, 4), 1);
    /// map.insert(Interval::new(5, 9), 2);
    /// map.insert(Interval::new(10, 14), 1);
    /// let query = Interval::new(3, 12);
    /// assert_eq!(map.find_first_overlap(&query, |v| *v == 1), Some((&Interval::new(0, 4), &1)));
    /// assert_eq!(map.find_first_overlap(&query, |v| *v == 2), Some((&Interval::new(5, 9), &2)));
    /// assert_eq!(map.find_first_overlap(&query, |v| *v == 3), None);
    /// ```
    #[inline]
    pub fn find_first_overlap<P>(
        &self,
        interval: &Interval<T>,
        mut predicate: P,
    ) -> Option<(&Interval<T>, &V)>
    where
        P: FnMut(&V) -> bool,
    {
        self.filter_iter(interval).find(|&(_, v)| predicate(v))
    }

    /// Find an interval containing `point`.
    ///
    /// When the stored intervals are pairwise disjoint the result is the only one.
    ///
    /// # Example
    /// ```rust
    /// use rb_interval_set::{Interval, IntervalMap};
    ///
    /// let mut map = IntervalMap::new();
    /// map.insert(Interval::new(0, 4), 'a');
    /// map.insert(Interval::new(8, 9), 'b');
    /// assert_eq!(map.find_covering(&4), Some((&Interval::new(0, 4), &'a')));
    /// assert_eq!(map.find_covering(&5), None);
    /// ```
    #[inline]
    pub fn find_covering(&self, point: &T) -> Option<(&Interval<T>, &V)> {
        let node_idx = self.search_point(point);
        self.node_ref(node_idx, Node::non_sentinel)
            .map(Node::entry)
    }

    /// Return reference to the value corresponding to the key.
    ///
    /// # Example
    /// ```rust
    /// use rb_interval_set::{Interval, IntervalMap};
    ///
    /// let mut map = IntervalMap::new();
    /// map.insert(Interval::new(1, 3), 1);
    /// map.insert(Interval::new(7, 11), 4);
    /// assert_eq!(map.get(&Interval::new(1, 3)), Some(&1));
    /// assert_eq!(map.get(&Interval::new(5, 17)), None);
    /// ```
    #[inline]
    pub fn get(&self, interval: &Interval<T>) -> Option<&V> {
        self.search_exact(interval)
            .map(|idx| self.node_ref(idx, Node::value))
    }

    /// Get an iterator over the entries of the map, sorted by key.
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T, V, Ix> {
        Iter::new(self)
    }

    /// Get an iterator over the entries overlapping `query`, sorted by key.
    #[inline]
    pub fn filter_iter<'a, 'q>(&'a self, query: &'q Interval<T>) -> FilterIter<'a, 'q, T, V, Ix> {
        FilterIter::new(self, query)
    }

    /// Remove all elements from the map
    #[inline]
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.push(Self::new_sentinel());
        self.root = Self::sentinel();
        self.len = 0;
    }

    /// Return the number of elements in the map.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return `true` if the map contains no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, V> IntervalMap<T, V>
where
    T: Ord,
{
    /// Create an empty `IntervalMap`
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }
}

impl<T, V> Default for IntervalMap<T, V>
where
    T: Ord,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, V, Ix> IntoIterator for IntervalMap<T, V, Ix>
where
    T: Ord,
    Ix: IndexType,
{
    type Item = (Interval<T>, V);
    type IntoIter = IntoIter<T, V, Ix>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T, V, Ix> IntoIterator for &'a IntervalMap<T, V, Ix>
where
    T: Ord,
    Ix: IndexType,
{
    type Item = (&'a Interval<T>, &'a V);
    type IntoIter = Iter<'a, T, V, Ix>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, V, Ix> IntervalMap<T, V, Ix>
where
    T: Ord,
    Ix: IndexType,
{
    /// Create a new sentinel node
    fn new_sentinel() -> Node<T, V, Ix> {
        Node {
            interval: None,
            value: None,
            max_index: None,
            left: None,
            right: None,
            parent: None,
            color: Color::Black,
        }
    }

    /// Create a new tree node
    fn new_node(interval: Interval<T>, value: V, index: NodeIndex<Ix>) -> Node<T, V, Ix> {
        Node {
            max_index: Some(index),
            interval: Some(interval),
            value: Some(value),
            left: Some(Self::sentinel()),
            right: Some(Self::sentinel()),
            parent: Some(Self::sentinel()),
            color: Color::Red,
        }
    }

    /// Get the sentinel node index
    fn sentinel() -> NodeIndex<Ix> {
        NodeIndex::sentinel()
    }
}

impl<T, V, Ix> IntervalMap<T, V, Ix>
where
    T: Ord,
    Ix: IndexType,
{
    /// Insert a node into the tree.
    fn insert_inner(&mut self, z: NodeIndex<Ix>) -> Option<V> {
        let mut y = Self::sentinel();
        let mut x = self.root;

        while !self.node_ref(x, Node::is_sentinel) {
            y = x;
            if self.node_ref(z, Node::interval) == self.node_ref(y, Node::interval) {
                // The duplicate node was pushed last, so dropping it keeps the arena dense
                let zval = self.node_mut(z, Node::take_value);
                let _ignore = self.nodes.pop();
                return Some(self.node_mut(y, Node::set_value(zval)));
            }
            x = self.node_ref(x, |nx| nx.child(self.descend_side(z, nx)));
        }
        self.node_mut(z, Node::set_parent(y));
        if self.node_ref(y, Node::is_sentinel) {
            self.root = z;
        } else {
            let side = self.node_ref(y, |ny| self.descend_side(z, ny));
            self.node_mut(y, Node::set_child(side, z));
            self.update_max_bottom_up(y);
        }
        self.node_mut(z, Node::set_color(Color::Red));

        self.insert_fixup(z);

        self.len = self.len.wrapping_add(1);
        None
    }

    /// The side of `parent` under which node `z` belongs.
    fn descend_side(&self, z: NodeIndex<Ix>, parent: &Node<T, V, Ix>) -> Side {
        if self.node_ref(z, Node::interval) < parent.interval() {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Remove a node from the tree.
    fn remove_inner(&mut self, z: NodeIndex<Ix>) {
        let mut y = z;
        let mut y_orig_color = self.node_ref(y, Node::color);
        let x;
        if self.child_ref(z, Side::Left, Node::is_sentinel) {
            x = self.node_ref(z, Node::right);
            self.transplant(z, x);
            self.update_max_bottom_up(self.node_ref(z, Node::parent));
        } else if self.child_ref(z, Side::Right, Node::is_sentinel) {
            x = self.node_ref(z, Node::left);
            self.transplant(z, x);
            self.update_max_bottom_up(self.node_ref(z, Node::parent));
        } else {
            y = self.tree_minimum(self.node_ref(z, Node::right));
            let mut p = y;
            y_orig_color = self.node_ref(y, Node::color);
            x = self.node_ref(y, Node::right);
            if self.node_ref(y, Node::parent) == z {
                self.node_mut(x, Node::set_parent(y));
            } else {
                self.transplant(y, x);
                p = self.node_ref(y, Node::parent);
                self.node_mut(y, Node::set_right(self.node_ref(z, Node::right)));
                self.child_mut(y, Side::Right, Node::set_parent(y));
            }
            self.transplant(z, y);
            self.node_mut(y, Node::set_left(self.node_ref(z, Node::left)));
            self.child_mut(y, Side::Left, Node::set_parent(y));
            self.node_mut(y, Node::set_color(self.node_ref(z, Node::color)));

            self.update_max_bottom_up(p);
        }

        if matches!(y_orig_color, Color::Black) {
            self.remove_fixup(x);
        }

        self.len = self.len.wrapping_sub(1);
    }

    /// Search for an interval that overlaps with the given interval.
    fn search(&self, interval: &Interval<T>) -> NodeIndex<Ix> {
        let mut x = self.root;
        while self
            .node_ref(x, Node::non_sentinel)
            .map(Node::interval)
            .is_some_and(|xi| !xi.overlap(interval))
        {
            if self.max(self.node_ref(x, Node::left)) >= Some(&interval.from) {
                x = self.node_ref(x, Node::left);
            } else {
                x = self.node_ref(x, Node::right);
            }
        }
        x
    }

    /// Search for an interval that contains the given point.
    fn search_point(&self, point: &T) -> NodeIndex<Ix> {
        let mut x = self.root;
        while self
            .node_ref(x, Node::non_sentinel)
            .map(Node::interval)
            .is_some_and(|xi| !xi.contains(point))
        {
            if self.max(self.node_ref(x, Node::left)) >= Some(point) {
                x = self.node_ref(x, Node::left);
            } else {
                x = self.node_ref(x, Node::right);
            }
        }
        x
    }

    /// Search for the node with exact the given interval
    fn search_exact(&self, interval: &Interval<T>) -> Option<NodeIndex<Ix>> {
        let mut x = self.root;
        while !self.node_ref(x, Node::is_sentinel) {
            if self.node_ref(x, Node::interval) == interval {
                return Some(x);
            }
            if self.max(x) < Some(&interval.to) {
                return None;
            }
            if self.node_ref(x, Node::interval) > interval {
                x = self.node_ref(x, Node::left);
            } else {
                x = self.node_ref(x, Node::right);
            }
        }
        None
    }

    /// Restore red-black tree properties after an insert.
    fn insert_fixup(&mut self, mut z: NodeIndex<Ix>) {
        while self.parent_ref(z, Node::is_red) {
            if self.grand_parent_ref(z, Node::is_sentinel) {
                break;
            }
            let side = self.side_of(self.node_ref(z, Node::parent));
            let uncle = self.grand_parent_ref(z, |g| g.child(side.opposite()));
            if self.node_ref(uncle, Node::is_red) {
                self.parent_mut(z, Node::set_color(Color::Black));
                self.node_mut(uncle, Node::set_color(Color::Black));
                self.grand_parent_mut(z, Node::set_color(Color::Red));
                z = self.parent_ref(z, Node::parent);
            } else {
                if self.side_of(z) != side {
                    z = self.node_ref(z, Node::parent);
                    self.rotate(z, side);
                }
                self.parent_mut(z, Node::set_color(Color::Black));
                self.grand_parent_mut(z, Node::set_color(Color::Red));
                self.rotate(self.parent_ref(z, Node::parent), side.opposite());
            }
        }
        self.node_mut(self.root, Node::set_color(Color::Black));
    }

    /// Restore red-black tree properties after a remove.
    fn remove_fixup(&mut self, mut x: NodeIndex<Ix>) {
        while x != self.root && self.node_ref(x, Node::is_black) {
            let side = self.side_of(x);
            let far = side.opposite();
            let mut w = self.parent_ref(x, |p| p.child(far));
            if self.node_ref(w, Node::is_red) {
                self.node_mut(w, Node::set_color(Color::Black));
                self.parent_mut(x, Node::set_color(Color::Red));
                self.rotate(self.node_ref(x, Node::parent), side);
                w = self.parent_ref(x, |p| p.child(far));
            }
            if self.node_ref(w, Node::is_sentinel) {
                break;
            }
            if self.child_ref(w, side, Node::is_black) && self.child_ref(w, far, Node::is_black) {
                self.node_mut(w, Node::set_color(Color::Red));
                x = self.node_ref(x, Node::parent);
            } else {
                if self.child_ref(w, far, Node::is_black) {
                    self.child_mut(w, side, Node::set_color(Color::Black));
                    self.node_mut(w, Node::set_color(Color::Red));
                    self.rotate(w, far);
                    w = self.parent_ref(x, |p| p.child(far));
                }
                self.node_mut(w, Node::set_color(self.parent_ref(x, Node::color)));
                self.parent_mut(x, Node::set_color(Color::Black));
                self.child_mut(w, far, Node::set_color(Color::Black));
                self.rotate(self.node_ref(x, Node::parent), side);
                x = self.root;
            }
        }
        self.node_mut(x, Node::set_color(Color::Black));
    }

    /// Binary tree rotation. `Side::Left` moves `x` down to the left and lifts its right child.
    fn rotate(&mut self, x: NodeIndex<Ix>, side: Side) {
        let lifted = side.opposite();
        if self.child_ref(x, lifted, Node::is_sentinel) {
            return;
        }
        let y = self.node_ref(x, |nx| nx.child(lifted));
        self.node_mut(x, Node::set_child(lifted, self.node_ref(y, |ny| ny.child(side))));
        if !self.child_ref(y, side, Node::is_sentinel) {
            self.child_mut(y, side, Node::set_parent(x));
        }

        self.replace_parent(x, y);
        self.node_mut(y, Node::set_child(side, x));

        self.rotate_update_max(x, y);
    }

    /// Replace parent during a rotation.
    fn replace_parent(&mut self, x: NodeIndex<Ix>, y: NodeIndex<Ix>) {
        self.node_mut(y, Node::set_parent(self.node_ref(x, Node::parent)));
        if self.parent_ref(x, Node::is_sentinel) {
            self.root = y;
        } else {
            let side = self.side_of(x);
            self.parent_mut(x, Node::set_child(side, y));
        }
        self.node_mut(x, Node::set_parent(y));
    }

    /// Update the max value after a rotation.
    fn rotate_update_max(&mut self, x: NodeIndex<Ix>, y: NodeIndex<Ix>) {
        self.node_mut(y, Node::set_max_index(self.node_ref(x, Node::max_index)));
        self.recalculate_max(x);
    }

    /// Update the max value towards the root
    fn update_max_bottom_up(&mut self, x: NodeIndex<Ix>) {
        let mut p = x;
        while !self.node_ref(p, Node::is_sentinel) {
            self.recalculate_max(p);
            p = self.node_ref(p, Node::parent);
        }
    }

    /// Recalculate max value from left and right children
    fn recalculate_max(&mut self, x: NodeIndex<Ix>) {
        self.node_mut(x, Node::set_max_index(x));
        for side in [Side::Left, Side::Right] {
            let child = self.node_ref(x, |nx| nx.child(side));
            if self.max(child) > self.max(x) {
                self.node_mut(x, Node::set_max_index(self.node_ref(child, Node::max_index)));
            }
        }
    }

    /// Find the node with the minimum interval.
    fn tree_minimum(&self, mut x: NodeIndex<Ix>) -> NodeIndex<Ix> {
        while !self.child_ref(x, Side::Left, Node::is_sentinel) {
            x = self.node_ref(x, Node::left);
        }
        x
    }

    /// Replace one subtree as a child of its parent with another subtree.
    fn transplant(&mut self, u: NodeIndex<Ix>, v: NodeIndex<Ix>) {
        if self.parent_ref(u, Node::is_sentinel) {
            self.root = v;
        } else {
            let side = self.side_of(u);
            self.parent_mut(u, Node::set_child(side, v));
        }
        self.node_mut(v, Node::set_parent(self.node_ref(u, Node::parent)));
    }

    /// Which child of its parent a node is.
    fn side_of(&self, node: NodeIndex<Ix>) -> Side {
        if self.parent_ref(node, Node::left) == node {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Update nodes indices after remove
    ///
    /// This method has a time complexity of `O(logn)`, as we need to
    /// update the max index from bottom to top.
    fn update_idx(&mut self, old: NodeIndex<Ix>, new: NodeIndex<Ix>) {
        if self.root == old {
            self.root = new;
        }
        if self.nodes.get(new.index()).is_some() {
            if !self.parent_ref(new, Node::is_sentinel) {
                if self.parent_ref(new, Node::left) == old {
                    self.parent_mut(new, Node::set_left(new));
                } else {
                    self.parent_mut(new, Node::set_right(new));
                }
            }
            self.child_mut(new, Side::Left, Node::set_parent(new));
            self.child_mut(new, Side::Right, Node::set_parent(new));

            let mut p = new;
            while !self.node_ref(p, Node::is_sentinel) {
                if self.node_ref(p, Node::max_index) == old {
                    self.node_mut(p, Node::set_max_index(new));
                }
                p = self.node_ref(p, Node::parent);
            }
        }
    }
}

// Convenient methods for reference or mutate current/parent/child node
impl<'a, T, V, Ix> IntervalMap<T, V, Ix>
where
    Ix: IndexType,
{
    pub(crate) fn node_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<T, V, Ix>) -> R,
    {
        op(&self.nodes[node.index()])
    }

    fn node_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<T, V, Ix>) -> R,
    {
        op(&mut self.nodes[node.index()])
    }

    pub(crate) fn child_ref<F, R>(&'a self, node: NodeIndex<Ix>, side: Side, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<T, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].child(side).index();
        op(&self.nodes[idx])
    }

    fn parent_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<T, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].parent().index();
        op(&self.nodes[idx])
    }

    fn grand_parent_ref<F, R>(&'a self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a Node<T, V, Ix>) -> R,
    {
        let parent_idx = self.nodes[node.index()].parent().index();
        let grand_parent_idx = self.nodes[parent_idx].parent().index();
        op(&self.nodes[grand_parent_idx])
    }

    fn child_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, side: Side, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<T, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].child(side).index();
        op(&mut self.nodes[idx])
    }

    fn parent_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<T, V, Ix>) -> R,
    {
        let idx = self.nodes[node.index()].parent().index();
        op(&mut self.nodes[idx])
    }

    fn grand_parent_mut<F, R>(&'a mut self, node: NodeIndex<Ix>, op: F) -> R
    where
        R: 'a,
        F: FnOnce(&'a mut Node<T, V, Ix>) -> R,
    {
        let parent_idx = self.nodes[node.index()].parent().index();
        let grand_parent_idx = self.nodes[parent_idx].parent().index();
        op(&mut self.nodes[grand_parent_idx])
    }

    /// The greatest upper bound in the subtree rooted at `node`
    pub(crate) fn max(&self, node: NodeIndex<Ix>) -> Option<&T> {
        let max_index = self.nodes[node.index()].max_index?.index();
        self.nodes[max_index].interval.as_ref().map(|i| &i.to)
    }
}
