//! Integration test: how many keys change owner on membership changes.

use maglev_integration_tests::{key_disruption, owner_set, random_keys, table};
use maglev_table::LookupTable;

/// Removing one of N backends moves exactly that backend's keys.
#[test]
fn test_remove_moves_about_one_nth() {
    for n in [5usize, 10, 40] {
        let mut t = table(n, 65_537);
        let before = t.snapshot();
        t.remove(["backend-1"]).unwrap();
        let after = t.snapshot();

        let keys = random_keys(n as u64, 100_000);
        let moved = key_disruption(&before, &after, &keys);
        let ideal = 1.0 / n as f64;
        assert!(
            moved < ideal * 1.3,
            "n={n}: moved {moved:.4}, ideal {ideal:.4}"
        );

        for k in &keys {
            let old = before.lookup(*k);
            if old != "backend-1" {
                assert_eq!(old, after.lookup(*k), "key {k} moved off a live backend");
            }
        }
    }
}

/// Adding a backend to N moves close to 1/(N+1) of the keys.
#[test]
fn test_add_moves_about_one_nth() {
    let mut t = table(10, 65_537);
    let before = t.snapshot();
    t.add(["backend-10"]).unwrap();
    let after = t.snapshot();

    let moved = LookupTable::disruption(&before, &after);
    let ideal = 1.0 / 11.0;
    assert!(moved < ideal * 2.0, "moved {moved:.4}, ideal {ideal:.4}");
    assert!(owner_set(&after).contains("backend-10"));
}

/// Remove then re-add returns to the all-live table.
#[test]
fn test_remove_then_readd_round_trip() {
    let mut t = table(16, 65_537);
    let all_live = t.snapshot();

    t.remove(["backend-4", "backend-9"]).unwrap();
    let degraded = t.snapshot();
    assert!(LookupTable::disruption(&all_live, &degraded) < 2.0 / 16.0 * 1.1);

    t.add(["backend-4", "backend-9"]).unwrap();
    assert_eq!(*t.snapshot(), *all_live);
}

/// Removing backends one at a time never disturbs survivors.
#[test]
fn test_cascading_failures_preserve_survivors() {
    let mut t = table(12, 10_007);
    for i in 0..6 {
        let name = format!("backend-{i}");
        let before = t.snapshot();
        t.remove([&name]).unwrap();
        let after = t.snapshot();

        for r in LookupTable::diff(&before, &after) {
            assert_eq!(r.from, name, "partition {} moved off {}", r.partition, r.from);
        }
    }
    assert_eq!(owner_set(&t.snapshot()).len(), 6);
}
