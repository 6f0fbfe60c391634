//! Integration test: identical inputs produce identical tables.

use maglev_integration_tests::{backend_names, owners};
use maglev_table::{Maglev, TableOptions};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

#[test]
fn test_any_insertion_order_same_table() {
    let names = backend_names(50);
    let reference = Maglev::new(names.clone(), 10_007, TableOptions::default()).unwrap();

    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..5 {
        let mut shuffled = names.clone();
        shuffled.shuffle(&mut rng);
        let t = Maglev::new(shuffled, 10_007, TableOptions::default()).unwrap();
        assert_eq!(t.names(), reference.names());
        assert_eq!(t.snapshot(), reference.snapshot());
    }
}

#[test]
fn test_incremental_add_equals_batch_build() {
    let names = backend_names(9);
    let mut grown = Maglev::new(&names[..3], 2003, TableOptions::default()).unwrap();
    for name in &names[3..] {
        grown.add([name]).unwrap();
    }
    let batch = Maglev::new(&names, 2003, TableOptions::default()).unwrap();
    assert_eq!(owners(&grown.snapshot()), owners(&batch.snapshot()));
}

#[test]
fn test_options_are_part_of_identity() {
    let names = backend_names(8);
    let base = TableOptions::default();
    let a = Maglev::new(&names, 2003, base.clone()).unwrap();
    let b = Maglev::new(&names, 2003, base.clone().with_permutation_rounds(3)).unwrap();
    let c = Maglev::new(&names, 2003, base.with_hash_key(7)).unwrap();
    assert_ne!(owners(&a.snapshot()), owners(&b.snapshot()));
    assert_ne!(owners(&a.snapshot()), owners(&c.snapshot()));
}

#[test]
fn test_same_dead_history_same_table() {
    let build = || {
        let mut t = Maglev::new(backend_names(10), 5003, TableOptions::default()).unwrap();
        t.remove(["backend-2"]).unwrap();
        t.remove(["backend-6"]).unwrap();
        t
    };
    let a = build();
    let b = build();
    assert_eq!(a.snapshot(), b.snapshot());
    assert_eq!(a.cursors(), b.cursors());
}
