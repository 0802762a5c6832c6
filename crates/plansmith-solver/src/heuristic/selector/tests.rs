use plansmith_core::{Solution, Value, ValueRangeRegistry};
use plansmith_test::{device_schedule, knapsack};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;
use crate::heuristic::ChangeMove;

fn moves(selector: &dyn MoveSelector, solution: &Solution) -> Vec<Move> {
    let registry = ValueRangeRegistry::new(solution).unwrap();
    let mut out = Vec::new();
    selector.collect_moves(solution, &registry, &mut out);
    out
}

#[test]
fn test_change_selector_skips_current_value() {
    let problem = knapsack::generate_problem();
    let all = moves(&ChangeMoveSelector::new(), &problem);
    assert_eq!(all.len(), 5);
    for m in &all {
        match m {
            Move::Change(c) => {
                assert_eq!(c.from, Value::Bool(false));
                assert_eq!(c.to, Value::Bool(true));
            }
            Move::Swap(_) => panic!("unexpected swap"),
        }
    }
}

#[test]
fn test_change_selector_enumeration_order() {
    let problem = device_schedule::generate_problem();
    let all = moves(&ChangeMoveSelector::new(), &problem);
    // 10 devices: 40 timeslots + 3 technicians + 3 workstations each
    assert_eq!(all.len(), 10 * 46);
    let first: Vec<usize> = all
        .iter()
        .take(2)
        .map(|m| match m {
            Move::Change(c) => c.field,
            Move::Swap(s) => s.field,
        })
        .collect();
    // variables are visited in declaration order
    assert_eq!(first, vec![device_schedule::TIMESLOT_VAR; 2]);
}

#[test]
fn test_change_selector_for_variable() {
    let problem = device_schedule::generate_problem();
    let selector = ChangeMoveSelector::for_variable(
        device_schedule::DEVICE,
        device_schedule::TECHNICIAN_VAR,
    );
    assert_eq!(moves(&selector, &problem).len(), 10 * 3);
}

#[test]
fn test_swap_selector_pairs_differing_values() {
    let mut problem = knapsack::generate_problem();
    assert!(moves(&SwapMoveSelector::new(), &problem).is_empty());

    knapsack::select(&mut problem, &[0, 1]);
    let swaps = moves(&SwapMoveSelector::new(), &problem);
    // 2 packed x 3 unpacked
    assert_eq!(swaps.len(), 6);
    assert!(swaps.iter().all(Move::is_doable));
}

#[test]
fn test_union_selector_default() {
    let mut problem = knapsack::generate_problem();
    knapsack::select(&mut problem, &[4]);
    let union = UnionMoveSelector::default();
    assert_eq!(union.len(), 2);
    let all = moves(&union, &problem);
    assert_eq!(all.len(), 5 + 4);
    assert!(matches!(all[0], Move::Change(_)));
    assert!(matches!(all[all.len() - 1], Move::Swap(_)));
}

fn numbered(count: usize) -> Vec<Move> {
    (0..count)
        .map(|i| {
            Move::Change(ChangeMove::new(0, i, 0, Value::None, Value::Int(i as i64)))
        })
        .collect()
}

fn entities(moves: &[Move]) -> Vec<usize> {
    moves
        .iter()
        .map(|m| match m {
            Move::Change(c) => c.entity,
            Move::Swap(s) => s.left,
        })
        .collect()
}

#[test]
fn test_arranger_original_keeps_order() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut arranger = MoveArranger::new(SelectionOrder::Original);
    let mut list = numbered(4);
    arranger.arrange(&mut list, &mut rng);
    assert_eq!(entities(&list), vec![0, 1, 2, 3]);
}

#[test]
fn test_arranger_random_is_seeded() {
    let shuffle = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut arranger = MoveArranger::new(SelectionOrder::Random);
        let mut list = numbered(20);
        arranger.arrange(&mut list, &mut rng);
        entities(&list)
    };
    assert_eq!(shuffle(7), shuffle(7));
    let mut sorted = shuffle(7);
    sorted.sort_unstable();
    assert_eq!(sorted, (0..20).collect::<Vec<_>>());
}

#[test]
fn test_arranger_round_robin_resumes_after_pick() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut arranger = MoveArranger::new(SelectionOrder::RoundRobin);

    let mut list = numbered(5);
    arranger.arrange(&mut list, &mut rng);
    assert_eq!(entities(&list), vec![0, 1, 2, 3, 4]);
    arranger.picked(1);

    let mut list = numbered(5);
    arranger.arrange(&mut list, &mut rng);
    assert_eq!(entities(&list), vec![2, 3, 4, 0, 1]);
    arranger.picked(3);

    let mut list = numbered(5);
    arranger.arrange(&mut list, &mut rng);
    assert_eq!(entities(&list), vec![1, 2, 3, 4, 0]);
}
