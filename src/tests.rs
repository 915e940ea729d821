use std::collections::HashSet;

use rand::{rngs::StdRng, Rng, SeedableRng};

use super::*;
use crate::index::NodeIndex;
use crate::node::{Color, Node, Side};

struct IntervalGenerator {
    rng: StdRng,
    unique: HashSet<Interval<i32>>,
    limit: i32,
}

impl IntervalGenerator {
    fn new(seed: [u8; 32]) -> Self {
        const LIMIT: i32 = 1000;
        Self {
            rng: SeedableRng::from_seed(seed),
            unique: HashSet::new(),
            limit: LIMIT,
        }
    }

    fn next(&mut self) -> Interval<i32> {
        let from = self.rng.gen_range(0..self.limit - 1);
        let to = self.rng.gen_range(from..self.limit);
        Interval::new(from, to)
    }

    fn next_unique(&mut self) -> Interval<i32> {
        let mut interval = self.next();
        while self.unique.contains(&interval) {
            interval = self.next();
        }
        self.unique.insert(interval.clone());
        interval
    }

    fn next_with_range(&mut self, range: i32) -> Interval<i32> {
        let from = self.rng.gen_range(0..self.limit - 1);
        let to = self.rng.gen_range(from..self.limit.min(from + range));
        Interval::new(from, to)
    }

    /// Consecutive disjoint intervals separated by random gaps
    fn disjoint(&mut self, count: usize) -> Vec<Interval<i32>> {
        let mut next_from = 0;
        std::iter::repeat_with(|| {
            let from = next_from + self.rng.gen_range(0..3);
            let to = from + self.rng.gen_range(0..5);
            next_from = to + 1;
            Interval::new(from, to)
        })
        .take(count)
        .collect()
    }
}

impl<V> IntervalMap<i32, V> {
    fn check_max(&self) {
        let _ignore = self.check_max_inner(self.root);
    }

    fn check_max_inner(&self, x: NodeIndex<u32>) -> i32 {
        if self.node_ref(x, Node::is_sentinel) {
            return i32::MIN;
        }
        let l_max = self.check_max_inner(self.node_ref(x, Node::left));
        let r_max = self.check_max_inner(self.node_ref(x, Node::right));
        let max = self.node_ref(x, |x| x.interval().to.max(l_max).max(r_max));
        assert_eq!(self.max(x), Some(&max));
        max
    }

    /// 1. Every node is either red or black.
    /// 2. The root is black.
    /// 3. Every leaf (NIL) is black.
    /// 4. If a node is red, then both its children are black.
    /// 5. For each node, all simple paths from the node to descendant leaves contain the
    /// same number of black nodes.
    fn check_rb_properties(&self) {
        assert!(matches!(
            self.node_ref(self.root, Node::color),
            Color::Black
        ));
        self.check_children_color(self.root);
        self.check_black_height(self.root);
    }

    fn check_children_color(&self, x: NodeIndex<u32>) {
        if self.node_ref(x, Node::is_sentinel) {
            return;
        }
        self.check_children_color(self.node_ref(x, Node::left));
        self.check_children_color(self.node_ref(x, Node::right));
        if self.node_ref(x, Node::is_red) {
            assert!(self.child_ref(x, Side::Left, Node::is_black));
            assert!(self.child_ref(x, Side::Right, Node::is_black));
        }
    }

    fn check_black_height(&self, x: NodeIndex<u32>) -> usize {
        if self.node_ref(x, Node::is_sentinel) {
            return 0;
        }
        let lefth = self.check_black_height(self.node_ref(x, Node::left));
        let righth = self.check_black_height(self.node_ref(x, Node::right));
        assert_eq!(lefth, righth);
        if self.node_ref(x, Node::is_black) {
            return lefth + 1;
        }
        lefth
    }
}

fn with_map_and_generator<V>(test_fn: impl Fn(IntervalMap<i32, V>, IntervalGenerator)) {
    let seeds = vec![[0; 32], [1; 32], [2; 32]];
    for seed in seeds {
        let gen = IntervalGenerator::new(seed);
        let map = IntervalMap::new();
        test_fn(map, gen);
    }
}

#[test]
fn red_black_tree_properties_is_satisfied() {
    with_map_and_generator(|mut map, mut gen| {
        let intervals: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for i in intervals.clone() {
            let _ignore = map.insert(i, ());
        }
        map.check_rb_properties();
        for i in intervals.iter().step_by(3) {
            let _ignore = map.remove(i);
        }
        map.check_rb_properties();
    });
}

#[test]
fn map_len_will_update() {
    with_map_and_generator(|mut map, mut gen| {
        let intervals: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(100)
            .collect();
        for i in intervals.clone() {
            let _ignore = map.insert(i, ());
        }
        assert_eq!(map.len(), 100);
        for i in intervals {
            let _ignore = map.remove(&i);
        }
        assert_eq!(map.len(), 0);
        assert_eq!(map.nodes.len(), 1);
    });
}

#[test]
fn check_overlap_is_ok() {
    with_map_and_generator(|mut map, mut gen| {
        let intervals: Vec<_> = std::iter::repeat_with(|| gen.next_with_range(10))
            .take(100)
            .collect();
        for i in intervals.clone() {
            let _ignore = map.insert(i, ());
        }
        let to_check: Vec<_> = std::iter::repeat_with(|| gen.next_with_range(10))
            .take(1000)
            .collect();
        let expects: Vec<_> = to_check
            .iter()
            .map(|ci| intervals.iter().any(|i| ci.overlap(i)))
            .collect();

        for (ci, expect) in to_check.into_iter().zip(expects.into_iter()) {
            assert_eq!(map.overlaps(&ci), expect);
        }
    });
}

#[test]
fn check_max_is_ok() {
    with_map_and_generator(|mut map, mut gen| {
        let intervals: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for i in intervals.clone() {
            let _ignore = map.insert(i, ());
            map.check_max();
        }
        assert_eq!(map.len(), 1000);
        for i in intervals {
            let _ignore = map.remove(&i);
            map.check_max();
        }
    });
}

#[test]
fn remove_non_exist_interval_will_do_nothing() {
    with_map_and_generator(|mut map, mut gen| {
        let intervals: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for i in intervals {
            let _ignore = map.insert(i, ());
        }
        assert_eq!(map.len(), 1000);
        let to_remove: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for i in to_remove {
            let _ignore = map.remove(&i);
        }
        assert_eq!(map.len(), 1000);
    });
}

#[test]
fn insert_existing_interval_overwrites_in_place() {
    let mut map = IntervalMap::new();
    assert_eq!(map.insert(Interval::new(1, 3), 'a'), None);
    assert_eq!(map.insert(Interval::new(1, 3), 'b'), Some('a'));
    assert_eq!(map.len(), 1);
    assert_eq!(map.nodes.len(), 2);
    assert_eq!(map.get(&Interval::new(1, 3)), Some(&'b'));
}

#[test]
fn find_all_overlap_is_ok() {
    with_map_and_generator(|mut map, mut gen| {
        let intervals: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for i in intervals.clone() {
            let _ignore = map.insert(i, ());
        }
        let to_find: Vec<_> = std::iter::repeat_with(|| gen.next()).take(1000).collect();

        for ti in to_find {
            let mut expect: Vec<_> = intervals.iter().filter(|i| ti.overlap(i)).collect();
            expect.sort_unstable();
            let result: Vec<_> = map.find_all_overlap(&ti).into_iter().map(|r| r.0).collect();
            assert_eq!(expect, result);
        }
    });
}

#[test]
fn find_first_overlap_is_first_match_of_filter_iter() {
    with_map_and_generator(|mut map, mut gen| {
        let intervals: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .enumerate()
            .take(500)
            .collect();
        for (v, i) in intervals.clone() {
            let _ignore = map.insert(i, v);
        }
        for _ in 0..500 {
            let query = gen.next_with_range(50);
            let expect = map.filter_iter(&query).find(|(_, v)| **v % 7 == 0);
            assert_eq!(map.find_first_overlap(&query, |v| *v % 7 == 0), expect);
        }
    });
}

#[test]
fn find_covering_is_ok() {
    with_map_and_generator(|mut map, mut gen| {
        let intervals = gen.disjoint(300);
        for (v, i) in intervals.iter().enumerate() {
            let _ignore = map.insert(i.clone(), v);
        }
        let end = intervals.last().map_or(0, |i| i.to) + 2;
        for point in -1..end {
            let expect = intervals
                .iter()
                .enumerate()
                .find(|(_, i)| i.contains(&point))
                .map(|(v, i)| (i, v));
            let result = map.find_covering(&point).map(|(i, v)| (i, *v));
            assert_eq!(result, expect);
        }
    });
}

#[test]
fn iterate_through_map_is_sorted() {
    with_map_and_generator(|mut map, mut gen| {
        let mut intervals: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .enumerate()
            .take(1000)
            .collect();
        for (v, i) in intervals.clone() {
            let _ignore = map.insert(i, v);
        }
        intervals.sort_unstable_by(|a, b| a.1.cmp(&b.1));

        for ((ei, ev), (v, i)) in map.iter().zip(intervals.iter()) {
            assert_eq!(ei, i);
            assert_eq!(ev, v);
        }
        let owned: Vec<_> = map.into_iter().collect();
        let expect: Vec<_> = intervals.into_iter().map(|(v, i)| (i, v)).collect();
        assert_eq!(owned, expect);
    });
}

#[test]
fn interval_map_clear_is_ok() {
    let mut map = IntervalMap::new();
    map.insert(Interval::new(1, 3), 1);
    map.insert(Interval::new(2, 4), 2);
    map.insert(Interval::new(6, 7), 3);
    assert_eq!(map.len(), 3);
    map.clear();
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert_eq!(map.nodes.len(), 1);
    assert!(map.nodes[0].is_sentinel());
}

#[cfg(test)]
struct TestCaseFilterIter<T> {
    query: Interval<T>,
    expected: Vec<Interval<T>>,
}

#[test]
fn interval_map_filter_iter_is_ok() {
    let tests = [
        TestCaseFilterIter {
            query: Interval::new(50, 51),
            expected: vec![Interval::new(6, 99)],
        },
        TestCaseFilterIter {
            query: Interval::new(23, 26),
            expected: vec![
                Interval::new(0, 23),
                Interval::new(6, 99),
                Interval::new(15, 23),
                Interval::new(25, 30),
                Interval::new(26, 27),
            ],
        },
        TestCaseFilterIter {
            query: Interval::new(6, 17),
            expected: vec![
                Interval::new(0, 23),
                Interval::new(5, 6),
                Interval::new(6, 99),
                Interval::new(8, 9),
                Interval::new(15, 23),
                Interval::new(16, 21),
                Interval::new(17, 19),
            ],
        },
        TestCaseFilterIter {
            query: Interval::point(24),
            expected: vec![Interval::new(6, 99)],
        },
        TestCaseFilterIter {
            query: Interval::new(100, 200),
            expected: vec![],
        },
    ];

    let mut map = IntervalMap::new();
    map.insert(Interval::new(16, 21), 30);
    map.insert(Interval::new(8, 9), 23);
    map.insert(Interval::new(0, 23), 3);
    map.insert(Interval::new(5, 6), 10);
    map.insert(Interval::new(6, 99), 10);
    map.insert(Interval::new(15, 23), 23);
    map.insert(Interval::new(17, 19), 20);
    map.insert(Interval::new(25, 30), 30);
    map.insert(Interval::new(26, 27), 26);
    map.insert(Interval::new(19, 20), 20);

    for (i, tt) in tests.iter().enumerate() {
        let v: Vec<_> = map.filter_iter(&tt.query).map(|v| v.0.clone()).collect();
        assert_eq!(v, tt.expected, "#{}: error", i);
    }
}

#[test]
fn check_filter_iter_equal_to_iter_filter() {
    with_map_and_generator(|mut map, mut gen| {
        let intervals: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for i in intervals.clone() {
            let _ignore = map.insert(i, ());
        }

        for i in intervals {
            let filter_iter_res: Vec<_> = map.filter_iter(&i).collect();
            let iter_filter_res: Vec<_> = map.iter().filter(|v| v.0.overlap(&i)).collect();
            assert_eq!(filter_iter_res, iter_filter_res);
        }
    });
}

#[test]
fn narrow_index_type_is_usable() {
    let mut map = IntervalMap::<i64, &str, u16>::with_capacity(4);
    map.insert(Interval::new(-10, -5), "neg");
    map.insert(Interval::new(0, 0), "zero");
    map.insert(Interval::new(5, 10), "pos");
    assert_eq!(map.find_covering(&-7), Some((&Interval::new(-10, -5), &"neg")));
    assert_eq!(map.remove(&Interval::new(0, 0)), Some("zero"));
    let keys: Vec<_> = map.iter().map(|(i, _)| i.from).collect();
    assert_eq!(keys, vec![-10, 5]);
}

#[cfg(feature = "serde")]
#[test]
fn test_serde_interval_map() {
    let mut interval_map = IntervalMap::<i32, i32>::new();
    interval_map.insert(Interval::new(1, 5), 10);
    interval_map.insert(Interval::new(3, 7), 20);
    interval_map.insert(Interval::new(2, 6), 15);

    let serialized = serde_json::to_string(&interval_map).unwrap();
    let deserialized: IntervalMap<i32, i32> = serde_json::from_str(&serialized).unwrap();
    let dv: Vec<_> = deserialized.iter().collect();
    let ev: Vec<_> = interval_map.iter().collect();

    assert_eq!(ev, dv);
    assert_eq!(deserialized.len(), 3);
    deserialized.check_rb_properties();
}
