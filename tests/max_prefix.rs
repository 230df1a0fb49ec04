use augmented_rbtree::{Interval, MaxPrefixTree, Summary};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Recomputes (sum, best prefix, best position) by scanning intervals in order of start.
fn scan(intervals: &[Interval]) -> (i64, Option<i64>, Option<i64>) {
    let mut sorted = intervals.to_vec();
    sorted.sort_by_key(|interval| interval.start);

    let mut running = 0;
    let mut best: Option<(i64, i64)> = None;
    for interval in &sorted {
        running += i64::from(interval.weight);
        if best.is_none_or(|(value, _)| running > value) {
            best = Some((running, interval.start));
        }
    }
    (running, best.map(|b| b.0), best.map(|b| b.1))
}

fn parts(summary: Summary) -> (i64, Option<i64>, Option<i64>) {
    (summary.sum(), summary.best_prefix(), summary.best_position())
}

#[test]
fn weighted_intervals_example() {
    let mut tree = MaxPrefixTree::new();
    tree.insert(Interval::new(0, 5, 10));
    tree.insert(Interval::new(5, 10, -5));
    tree.insert(Interval::new(10, 15, 8));
    tree.insert(Interval::new(15, 20, -3));

    // Running totals are 10, 5, 13, 10.
    assert_eq!(parts(tree.query()), (10, Some(13), Some(10)));
    assert_eq!(tree.total_sum(), 10);
    assert_eq!(tree.len(), 4);
}

#[test]
fn leading_interval_holds_the_best_prefix() {
    let mut tree = MaxPrefixTree::new();
    tree.insert(Interval::new(0, 5, 10));
    tree.insert(Interval::new(5, 10, -5));
    tree.insert(Interval::new(10, 15, 3));
    tree.insert(Interval::new(15, 20, -3));

    assert_eq!(parts(tree.query()), (5, Some(10), Some(0)));
}

#[test]
fn weights_at_the_type_limits_accumulate_exactly() {
    let mut tree = MaxPrefixTree::new();
    tree.insert(Interval::new(0, 1, i32::MAX));
    tree.insert(Interval::new(1, 2, i32::MAX));
    tree.insert(Interval::new(2, 3, 1));
    tree.insert(Interval::new(3, 4, i32::MIN));

    let peak = 2 * i64::from(i32::MAX) + 1;
    assert_eq!(parts(tree.query()), (peak + i64::from(i32::MIN), Some(peak), Some(2)));
}

#[test]
fn empty_tree_has_no_best_position() {
    let tree = MaxPrefixTree::new();
    assert!(tree.is_empty());
    assert_eq!(tree.query(), Summary::EMPTY);
    assert_eq!(parts(tree.query()), (0, None, None));
    assert_eq!(tree.total_sum(), 0);
}

#[test]
fn insertion_order_does_not_matter() {
    let intervals = [
        Interval::new(30, 40, 7),
        Interval::new(0, 10, -2),
        Interval::new(20, 30, 5),
        Interval::new(10, 20, 1),
        Interval::new(40, 50, -20),
    ];
    let forward: MaxPrefixTree = intervals.iter().copied().collect();
    let backward: MaxPrefixTree = intervals.iter().rev().copied().collect();

    assert_eq!(forward.query(), backward.query());
    assert_eq!(parts(forward.query()), (-9, Some(11), Some(30)));
    assert_eq!(
        forward.iter().map(|interval| interval.start).collect::<Vec<_>>(),
        [0, 10, 20, 30, 40]
    );
}

#[test]
fn duplicate_start_is_rejected() {
    let mut tree = MaxPrefixTree::new();
    assert!(tree.insert(Interval::new(0, 5, 1)));
    assert!(!tree.insert(Interval::new(0, 9, 100)));
    assert_eq!(tree.get(0), Some(&Interval::new(0, 5, 1)));
    assert_eq!(tree.total_sum(), 1);
}

#[test]
fn removals_update_the_best_prefix() {
    let mut tree: MaxPrefixTree = [
        Interval::new(0, 1, 5),
        Interval::new(1, 2, 5),
        Interval::new(2, 3, -1),
        Interval::new(3, 4, 2),
    ]
    .into_iter()
    .collect();
    assert_eq!(parts(tree.query()), (11, Some(11), Some(3)));

    assert!(tree.remove(&Interval::new(3, 4, 2)));
    assert_eq!(parts(tree.query()), (9, Some(10), Some(1)));

    assert!(!tree.remove(&Interval::new(3, 4, 2)));
    assert!(tree.remove(&Interval::new(1, 2, 5)));
    assert_eq!(parts(tree.query()), (4, Some(5), Some(0)));

    tree.clear();
    assert_eq!(tree.query(), Summary::EMPTY);
}

#[derive(Clone, Debug)]
enum Op {
    Insert(i64, i32),
    Remove(i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0i64..1_000, -100i32..100).prop_map(|(slot, weight)| Op::Insert(slot, weight)),
        2 => (0i64..1_000).prop_map(Op::Remove),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    /// Replays random insertions and removals and compares the query against a linear scan.
    #[test]
    fn query_matches_linear_scan(ops in proptest::collection::vec(op_strategy(), 1..2_000)) {
        let mut tree = MaxPrefixTree::new();
        let mut model: Vec<Interval> = Vec::new();

        for op in ops {
            match op {
                Op::Insert(slot, weight) => {
                    let interval = Interval::new(slot * 10, slot * 10 + 10, weight);
                    let fresh = model.iter().all(|existing| existing.start != interval.start);
                    prop_assert_eq!(tree.insert(interval), fresh);
                    if fresh {
                        model.push(interval);
                    }
                }
                Op::Remove(slot) => {
                    let probe = Interval::new(slot * 10, slot * 10 + 10, 0);
                    let position = model.iter().position(|existing| existing.start == probe.start);
                    prop_assert_eq!(tree.remove(&probe), position.is_some());
                    if let Some(position) = position {
                        model.swap_remove(position);
                    }
                }
            }
            prop_assert_eq!(parts(tree.query()), scan(&model));
            prop_assert_eq!(tree.len(), model.len());
        }
    }
}
