use criterion::{criterion_group, criterion_main, Bencher, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rb_interval_set::{Interval, IntervalMap, IntervalSet};
use std::hint::black_box;

struct IntervalGenerator {
    rng: StdRng,
    limit: u32,
}
impl IntervalGenerator {
    fn new() -> Self {
        const LIMIT: u32 = 100_000;
        Self {
            rng: StdRng::from_seed([0; 32]),
            limit: LIMIT,
        }
    }

    fn next(&mut self) -> Interval<u32> {
        let from = self.rng.gen_range(0..self.limit);
        let to = self.rng.gen_range(from..self.limit.min(from + 100));
        Interval::new(from, to)
    }

    fn next_tagged(&mut self) -> (Interval<u32>, u8) {
        let interval = self.next();
        (interval, self.rng.gen_range(0..4))
    }
}

// add helper fn
fn interval_set_add(count: usize, bench: &mut Bencher) {
    let mut gen = IntervalGenerator::new();
    let ops: Vec<_> = std::iter::repeat_with(|| gen.next_tagged()).take(count).collect();
    bench.iter(|| {
        let mut set = IntervalSet::new();
        for (i, v) in ops.clone() {
            black_box(set.add(i.from, i.to, v)).unwrap();
        }
        set
    });
}

// add and remove helper fn
fn interval_set_add_remove(count: usize, bench: &mut Bencher) {
    let mut gen = IntervalGenerator::new();
    let ops: Vec<_> = std::iter::repeat_with(|| gen.next_tagged()).take(count).collect();
    bench.iter(|| {
        let mut set = IntervalSet::new();
        for (i, v) in ops.clone() {
            black_box(set.add(i.from, i.to, v)).unwrap();
        }
        for (i, _) in &ops {
            black_box(set.remove(i.from, i.to)).unwrap();
        }
        set
    });
}

// map insert and remove helper fn
fn interval_map_insert_remove(count: usize, bench: &mut Bencher) {
    let mut gen = IntervalGenerator::new();
    let intervals: Vec<_> = std::iter::repeat_with(|| gen.next()).take(count).collect();
    bench.iter(|| {
        let mut map = IntervalMap::new();
        for i in intervals.clone() {
            black_box(map.insert(i, ()));
        }
        for i in &intervals {
            black_box(map.remove(i));
        }
    });
}

fn bench_interval_set_add(c: &mut Criterion) {
    c.bench_function("bench_interval_set_add_100", |b| interval_set_add(100, b));
    c.bench_function("bench_interval_set_add_1000", |b| interval_set_add(1000, b));
    c.bench_function("bench_interval_set_add_10,000", |b| {
        interval_set_add(10_000, b)
    });
}

fn bench_interval_set_add_remove(c: &mut Criterion) {
    c.bench_function("bench_interval_set_add_remove_100", |b| {
        interval_set_add_remove(100, b)
    });
    c.bench_function("bench_interval_set_add_remove_1000", |b| {
        interval_set_add_remove(1000, b)
    });
    c.bench_function("bench_interval_set_add_remove_10,000", |b| {
        interval_set_add_remove(10_000, b)
    });
}

fn bench_interval_map_insert_remove(c: &mut Criterion) {
    c.bench_function("bench_interval_map_insert_remove_1000", |b| {
        interval_map_insert_remove(1000, b)
    });
    c.bench_function("bench_interval_map_insert_remove_10,000", |b| {
        interval_map_insert_remove(10_000, b)
    });
}

// covering lookup helper fn
fn interval_set_get(count: usize, bench: &mut Bencher) {
    let mut gen = IntervalGenerator::new();
    let mut set = IntervalSet::new();
    for _ in 0..count {
        let (i, v) = gen.next_tagged();
        set.add(i.from, i.to, v).unwrap();
    }
    let points: Vec<_> = std::iter::repeat_with(|| gen.next().from)
        .take(count)
        .collect();
    bench.iter(|| {
        for p in &points {
            black_box(set.get(p));
        }
    });
}

fn bench_interval_set_get(c: &mut Criterion) {
    c.bench_function("bench_interval_set_get_1000", |b| interval_set_get(1000, b));
    c.bench_function("bench_interval_set_get_10,000", |b| {
        interval_set_get(10_000, b)
    });
}

fn criterion_config() -> Criterion {
    Criterion::default().configure_from_args().without_plots()
}

criterion_group! {
    name = benches_basic_op;
    config = criterion_config();
    targets = bench_interval_set_add, bench_interval_set_add_remove, bench_interval_map_insert_remove,
}

criterion_group! {
    name = benches_lookup;
    config = criterion_config();
    targets = bench_interval_set_get
}

criterion_main!(benches_basic_op, benches_lookup);
