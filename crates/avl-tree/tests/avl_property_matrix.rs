use avl_tree::AvlTree;
use avl_tree_util::{Model, Op};
use proptest::prelude::*;

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0i64..64).prop_map(Op::Insert),
        3 => (0i64..64).prop_map(Op::Remove),
        1 => Just(Op::Clear),
    ]
}

fn apply(tree: &mut AvlTree<i64>, op: Op) -> bool {
    match op {
        Op::Insert(k) => {
            tree.insert(k);
            true
        }
        Op::Remove(k) => tree.remove_value(&k).is_some(),
        Op::Clear => {
            tree.clear();
            true
        }
    }
}

proptest! {
    #[test]
    fn invariants_hold_after_every_op(ops in prop::collection::vec(op_strategy(), 0..300)) {
        let mut tree = AvlTree::new();
        let mut model = Model::default();
        for op in ops {
            prop_assert_eq!(apply(&mut tree, op), model.apply(op));
            prop_assert_eq!(tree.assert_valid(), Ok(()));
            prop_assert_eq!(tree.len(), tree.iter().count());
        }
        let contents: Vec<i64> = tree.iter().copied().collect();
        prop_assert_eq!(contents.as_slice(), model.as_slice());
    }

    #[test]
    fn height_stays_logarithmic(keys in prop::collection::vec(any::<i32>(), 1..500)) {
        let tree: AvlTree<i32> = keys.iter().copied().collect();
        let n = keys.len() as f64;
        // AVL bound: h < 1.4405 * log2(n + 2) - 0.3277
        let bound = 1.4405 * (n + 2.0).log2() - 0.3277;
        prop_assert!((tree.height() as f64) < bound);
    }

    #[test]
    fn clone_round_trips(keys in prop::collection::vec(0u16..1000, 0..200)) {
        let tree: AvlTree<u16> = keys.iter().copied().collect();
        let copy = tree.clone();
        prop_assert_eq!(copy.assert_valid(), Ok(()));
        prop_assert_eq!(copy.height(), tree.height());
        prop_assert!(copy.iter().eq(tree.iter()));
    }

    #[test]
    fn find_agrees_with_contains(keys in prop::collection::vec(0u8..50, 0..100), probe in 0u8..60) {
        let tree: AvlTree<u8> = keys.iter().copied().collect();
        let found = tree.find(&probe);
        prop_assert_eq!(found.is_some(), tree.contains(&probe));
        prop_assert_eq!(found.is_some(), keys.contains(&probe));
        if let Some(node) = found {
            prop_assert_eq!(tree.get(node), Ok(&probe));
        }
        prop_assert_eq!(tree.count(&probe), keys.iter().filter(|&&k| k == probe).count());
    }

    #[test]
    fn remove_by_handle_keeps_others(keys in prop::collection::vec(0i32..100, 1..120), pick in any::<prop::sample::Index>()) {
        let mut tree: AvlTree<i32> = keys.iter().copied().collect();
        let target = keys[pick.index(keys.len())];
        let node = tree.find(&target).unwrap();
        prop_assert_eq!(tree.remove(node), Ok(target));
        prop_assert_eq!(tree.assert_valid(), Ok(()));

        let mut expected = keys.clone();
        expected.sort_unstable();
        let at = expected.binary_search(&target).unwrap();
        expected.remove(at);
        let contents: Vec<i32> = tree.iter().copied().collect();
        prop_assert_eq!(contents, expected);
    }
}
