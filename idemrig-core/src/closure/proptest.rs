use crate::{
    algebra::{Algebra as _, AlgebraTables, ONE_GENERATOR},
    closure::{ClosureEngine, Strategy},
    ids::Element,
    partition::PartitionStore,
};
use proptest::prelude::*;

const UNIVERSE: usize = 16;

fn identified(pairs: &[(usize, usize)]) -> PartitionStore {
    let mut store = PartitionStore::discrete(UNIVERSE);
    for &(x, y) in pairs {
        let (cx, cy) = (store.class_of(Element(x)), store.class_of(Element(y)));
        if cx != cy {
            store.merge(cx, cy);
        }
    }
    store
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Both strategies compute the least congruence containing the seed pairs.
    #[test]
    fn strategies_agree(pairs in proptest::collection::vec((0..UNIVERSE, 0..UNIVERSE), 0..4)) {
        let tables = AlgebraTables::build(&ONE_GENERATOR);

        let mut exhaustive = ClosureEngine::from_partition(&tables, identified(&pairs)).unwrap();
        let mut worklist = ClosureEngine::from_partition(&tables, identified(&pairs)).unwrap();
        let exhaustive_merges = exhaustive.refine(Strategy::Exhaustive, |store| {
            assert_eq!(store.validate(), Ok(()));
        });
        let worklist_merges = worklist.refine(Strategy::Worklist, |store| {
            assert_eq!(store.validate(), Ok(()));
        });

        prop_assert_eq!(exhaustive.quotient(), worklist.quotient());
        prop_assert_eq!(exhaustive_merges, worklist_merges);

        prop_assert_eq!(worklist.find_violation(), None);
        prop_assert_eq!(exhaustive.certify(), Ok(()));
        for &(x, y) in &pairs {
            let store = worklist.store();
            prop_assert_eq!(store.class_of(Element(x)), store.class_of(Element(y)));
        }
    }

    /// Congruent inputs give congruent outputs for every quadruple.
    #[test]
    fn stable_partition_respects_both_operations(
        pairs in proptest::collection::vec((0..UNIVERSE, 0..UNIVERSE), 1..3)
    ) {
        let tables = AlgebraTables::build(&ONE_GENERATOR);
        let mut engine = ClosureEngine::from_partition(&tables, identified(&pairs)).unwrap();
        engine.refine(Strategy::Worklist, |_| {});

        let store = engine.store();
        let same = |x: Element, y: Element| store.class_of(x) == store.class_of(y);
        for x1 in (0..UNIVERSE).map(Element) {
            for x2 in (0..UNIVERSE).map(Element).filter(|&x2| same(x1, x2)) {
                for y1 in (0..UNIVERSE).map(Element) {
                    for y2 in (0..UNIVERSE).map(Element).filter(|&y2| same(y1, y2)) {
                        prop_assert!(same(tables.mul(x1, y1), tables.mul(x2, y2)));
                        prop_assert!(same(tables.add(x1, y1), tables.add(x2, y2)));
                    }
                }
            }
        }
    }
}
