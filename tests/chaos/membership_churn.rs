//! Chaos test: random add/remove/rebuild sequences keep every invariant.

use std::collections::BTreeSet;

use maglev_integration_tests::{backend_names, owner_set};
use maglev_table::{LookupTable, Maglev, MaglevError, TableOptions};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn check(t: &Maglev, dead: &BTreeSet<String>) {
    let snap = t.snapshot();
    let owners = owner_set(&snap);
    for name in dead {
        assert!(!owners.contains(name), "dead backend {name} still owns slots");
    }
    let live = t.names().len() - dead.len();
    assert_eq!(owners.len(), live, "some live backend owns nothing");
    let reported: BTreeSet<String> = t.dead().map(String::from).collect();
    assert_eq!(&reported, dead);
}

#[test]
fn test_random_membership_churn() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let mut next_id = 8;
    let mut t = Maglev::new(backend_names(8), 4099, TableOptions::default()).unwrap();
    let mut dead: BTreeSet<String> = BTreeSet::new();

    for step in 0..200 {
        let before = t.snapshot();
        match rng.random_range(0..4) {
            0 => {
                let name = format!("backend-{}", rng.random_range(0..next_id));
                let changed = match t.remove([&name]) {
                    Ok(changed) => changed,
                    Err(MaglevError::NoLiveBackends) => {
                        assert_eq!(t.names().len() - dead.len(), 1);
                        continue;
                    }
                    Err(e) => panic!("step {step}: remove {name}: {e}"),
                };
                assert_eq!(changed, dead.insert(name.clone()));
                if changed {
                    // Only the removed backend's partitions move.
                    for r in LookupTable::diff(&before, &t.snapshot()) {
                        assert_eq!(r.from, name);
                    }
                }
            }
            1 => {
                let name = format!("backend-{next_id}");
                next_id += 1;
                assert!(t.add([&name]).unwrap());
            }
            2 => {
                if let Some(name) = dead.iter().next().cloned() {
                    assert!(t.add([&name]).unwrap());
                    dead.remove(&name);
                }
            }
            _ => {
                let k = rng.random_range(0..next_id / 2);
                let wanted: BTreeSet<String> = (0..k)
                    .map(|_| format!("backend-{}", rng.random_range(0..next_id)))
                    .collect();
                if wanted.len() < t.names().len() {
                    t.rebuild(&wanted).unwrap();
                    dead = wanted;
                }
            }
        }
        check(&t, &dead);
    }
}
