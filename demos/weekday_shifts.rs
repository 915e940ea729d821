use rb_interval_set::{Interval, IntervalSet, Step};

/// Day number within a schedule, clamped to the days the schedule covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Day(u16);

impl Day {
    const LAST: u16 = 365;
}

impl Step for Day {
    fn predecessor(&self) -> Option<Self> {
        self.0.checked_sub(1).map(Day)
    }

    fn successor(&self) -> Option<Self> {
        (self.0 < Self::LAST).then(|| Day(self.0 + 1))
    }

    fn count_inclusive(start: &Self, end: &Self) -> Option<usize> {
        (start <= end).then(|| usize::from(end.0 - start.0) + 1)
    }
}

fn main() {
    let mut shifts = IntervalSet::new();
    shifts.subscribe(|event| {
        let action = if event.is_insert() { "store" } else { "drop" };
        println!("{action} {:?} -> {}", event.interval(), event.value());
    });

    shifts.add(Day(0), Day(Day::LAST), "day").unwrap();
    shifts.add(Day(100), Day(120), "night").unwrap();
    shifts.add(Day(121), Day(130), "night").unwrap();
    assert_eq!(
        shifts.get(&Day(125)),
        Some((&Interval::new(Day(100), Day(130)), &"night"))
    );

    shifts.add(Day(110), Day(115), "day").unwrap();
    shifts.remove(Day(300), Day(Day::LAST)).unwrap();
    for (interval, shift) in &shifts {
        println!("{:?}..={:?}: {shift} ({:?} days)", interval.from, interval.to, interval.size());
    }
    assert_eq!(shifts.len(), 5);
}
