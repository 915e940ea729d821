use crate::index::{IndexType, NodeIndex};
use crate::interval::Interval;
use crate::intervalmap::IntervalMap;
use crate::node::Node;

/// Pushes a link of nodes on the left to stack.
fn left_link<T, V, Ix>(map_ref: &IntervalMap<T, V, Ix>, mut x: NodeIndex<Ix>) -> Vec<NodeIndex<Ix>>
where
    T: Ord,
    Ix: IndexType,
{
    let mut nodes = vec![];
    while !map_ref.node_ref(x, Node::is_sentinel) {
        nodes.push(x);
        x = map_ref.node_ref(x, Node::left);
    }
    nodes
}

/// Like `left_link`, but skips subtrees that end before the query starts
/// and nodes that start after it ends.
fn left_link_with_query<T, V, Ix>(
    map_ref: &IntervalMap<T, V, Ix>,
    mut x: NodeIndex<Ix>,
    query: &Interval<T>,
) -> Vec<NodeIndex<Ix>>
where
    T: Ord,
    Ix: IndexType,
{
    let mut stack: Vec<NodeIndex<Ix>> = vec![];
    if map_ref.max(x).is_some_and(|v| v < &query.from) {
        return stack;
    }
    while map_ref.node_ref(x, Node::non_sentinel).is_some() {
        if map_ref.node_ref(x, Node::interval).from <= query.to {
            stack.push(x);
        }
        if map_ref.max(map_ref.node_ref(x, Node::left)) < Some(&query.from) {
            break;
        }
        x = map_ref.node_ref(x, Node::left);
    }
    stack
}

/// An iterator over the entries of a `IntervalMap`, sorted by interval.
#[derive(Debug)]
pub struct Iter<'a, T, V, Ix>
where
    T: Ord,
{
    /// Reference to the map
    pub(crate) map_ref: &'a IntervalMap<T, V, Ix>,
    /// Stack for iteration
    pub(crate) stack: Vec<NodeIndex<Ix>>,
}

impl<'a, T, V, Ix> Iter<'a, T, V, Ix>
where
    T: Ord,
    Ix: IndexType,
{
    pub(crate) fn new(map_ref: &'a IntervalMap<T, V, Ix>) -> Self {
        Iter {
            map_ref,
            stack: left_link(map_ref, map_ref.root),
        }
    }
}

impl<'a, T, V, Ix> Iterator for Iter<'a, T, V, Ix>
where
    T: Ord,
    Ix: IndexType,
{
    type Item = (&'a Interval<T>, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let x = self.stack.pop()?;
        self.stack.extend(left_link(
            self.map_ref,
            self.map_ref.node_ref(x, Node::right),
        ));
        Some(self.map_ref.node_ref(x, Node::entry))
    }
}

/// An into iterator over the entries of a `IntervalMap`, sorted by interval.
#[derive(Debug)]
pub struct IntoIter<T, V, Ix>
where
    T: Ord,
{
    interval_map: IntervalMap<T, V, Ix>,
    /// Stack for iteration
    stack: Vec<NodeIndex<Ix>>,
}

impl<T, V, Ix> IntoIter<T, V, Ix>
where
    T: Ord,
    Ix: IndexType,
{
    pub(crate) fn new(interval_map: IntervalMap<T, V, Ix>) -> Self {
        let stack = left_link(&interval_map, interval_map.root);
        IntoIter {
            interval_map,
            stack,
        }
    }
}

impl<T, V, Ix> Iterator for IntoIter<T, V, Ix>
where
    T: Ord,
    Ix: IndexType,
{
    type Item = (Interval<T>, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let x = self.stack.pop()?;
        self.stack.extend(left_link(
            &self.interval_map,
            self.interval_map.node_ref(x, Node::right),
        ));
        let node = &mut self.interval_map.nodes[x.index()];
        node.interval.take().zip(node.value.take())
    }
}

/// A filter iterator over the entries of a `IntervalMap` overlapping a query, sorted by
/// interval. It's equal to `iter().filter()` but prunes subtrees using the max upper bound.
#[derive(Debug)]
pub struct FilterIter<'a, 'q, T, V, Ix>
where
    T: Ord,
{
    /// Reference to the map
    pub(crate) map_ref: &'a IntervalMap<T, V, Ix>,
    /// Stack for iteration
    pub(crate) stack: Vec<NodeIndex<Ix>>,
    /// Filter criteria
    pub(crate) query: &'q Interval<T>,
}

impl<'a, 'q, T, V, Ix> FilterIter<'a, 'q, T, V, Ix>
where
    T: Ord,
    Ix: IndexType,
{
    pub(crate) fn new(map_ref: &'a IntervalMap<T, V, Ix>, query: &'q Interval<T>) -> Self {
        FilterIter {
            map_ref,
            stack: left_link_with_query(map_ref, map_ref.root, query),
            query,
        }
    }
}

impl<'a, T, V, Ix> Iterator for FilterIter<'a, '_, T, V, Ix>
where
    T: Ord,
    Ix: IndexType,
{
    type Item = (&'a Interval<T>, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let x = self.stack.pop()?;
            self.stack.extend(left_link_with_query(
                self.map_ref,
                self.map_ref.node_ref(x, Node::right),
                self.query,
            ));
            if self.map_ref.node_ref(x, Node::interval).overlap(self.query) {
                return Some(self.map_ref.node_ref(x, Node::entry));
            }
        }
    }
}
