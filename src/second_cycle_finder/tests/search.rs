use itertools::Itertools;
use log::info;
use second_cycle_finder::{
    SearchError, SearchOptions, SecondCycleFinder, SharedComponent, encode,
};

const BOTH_SHARED: SearchOptions = SearchOptions {
    share_edge: true,
    share_corner: true,
    target_order: 24,
};

#[test_log::test]
fn second_cycles_of_order_24() {
    let finder = SecondCycleFinder::cube3().unwrap();
    let first_cycle = finder.first_cycle("U L F L' R2").unwrap();

    let result = finder.search(&first_cycle, &BOTH_SHARED).unwrap();
    info!(
        "Candidate group of order {} with {} classes of order 24",
        result.candidate_group_order(),
        result.classes_of_order()
    );

    assert!(!result.is_empty());
    assert!(result.classes_of_order() >= result.kept_classes().len());

    let candidates = result.candidates().collect_vec();
    assert!(!candidates.is_empty());
    for candidate in &candidates {
        assert_eq!(candidate.order(), 24);
        assert!(finder.puzzle().group().is_member(candidate));
    }

    // No kept class holds the inverse of another kept class
    let kept = result.kept_classes();
    for (i, a) in kept.iter().enumerate() {
        for (j, b) in kept.iter().enumerate() {
            if i != j {
                assert!(!b.contains(&a.representative().inverse()));
            }
        }
    }

    let encodings = result.encodings().collect_vec();
    assert_eq!(encodings.len(), candidates.len());
    for (candidate, encoding) in candidates.iter().zip(&encodings) {
        assert_eq!(&encode(candidate), encoding);
        assert_eq!(encoding.to_string().matches('.').count(), 1);
    }
}

#[test_log::test]
fn first_cycle_without_a_two_cycle() {
    let finder = SecondCycleFinder::cube3().unwrap();
    let first_cycle = finder.first_cycle("R").unwrap();

    assert!(matches!(
        finder.search(&first_cycle, &BOTH_SHARED),
        Err(SearchError::MissingSharedComponent {
            component: SharedComponent::Edge
        })
    ));
}

#[test_log::test]
fn nothing_of_the_target_order() {
    let finder = SecondCycleFinder::cube3().unwrap();
    let first_cycle = finder.first_cycle("U L F L' R2").unwrap();
    let options = SearchOptions {
        target_order: 1_000_000,
        ..BOTH_SHARED
    };

    let result = finder.search(&first_cycle, &options).unwrap();

    assert!(result.is_empty());
    assert_eq!(result.classes_of_order(), 0);
    assert_eq!(result.encodings().count(), 0);
}

#[test_log::test]
fn search_all_keeps_going_after_errors() {
    let finder = SecondCycleFinder::cube3().unwrap();
    let first_cycles = ["R", "U L F L' R2"]
        .into_iter()
        .map(|moves| finder.first_cycle(moves).unwrap())
        .collect_vec();

    let results = finder.search_all(&first_cycles, &BOTH_SHARED).collect_vec();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].0, 0);
    assert!(results[0].1.as_ref().is_err_and(|e| !e.is_fatal()));
    assert_eq!(results[1].0, 1);
    assert!(!results[1].1.as_ref().unwrap().is_empty());
}
