//! Integration test: readers only ever observe completed snapshots.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use maglev_integration_tests::{backend_names, random_keys, table};
use maglev_table::SharedMaglev;

#[test]
fn test_readers_during_churn() {
    let shared = Arc::new(SharedMaglev::new(table(16, 10_007)));
    let done = Arc::new(AtomicBool::new(false));
    let names = backend_names(16);

    let readers: Vec<_> = (0..4)
        .map(|r| {
            let shared = Arc::clone(&shared);
            let done = Arc::clone(&done);
            let keys = random_keys(r, 1_000);
            thread::spawn(move || {
                let mut reads = 0usize;
                while !done.load(Ordering::Relaxed) {
                    let snap = shared.snapshot();
                    for &k in &keys {
                        let owner = snap.lookup(k);
                        assert!(snap.names().iter().any(|n| n == owner));
                        // Congruent keys agree within one snapshot.
                        assert_eq!(owner, snap.lookup(k % snap.modulus().get()));
                    }
                    reads += keys.len();
                }
                reads
            })
        })
        .collect();

    for round in 0..20 {
        let name = &names[round % names.len()];
        shared.remove([name]).unwrap();
        let snap = shared.snapshot();
        assert!(
            snap.assignments()
                .iter()
                .all(|&i| snap.names()[i as usize] != *name)
        );
        shared.add([name]).unwrap();
    }
    done.store(true, Ordering::Relaxed);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
}
