use lfukit::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut session = Session::new(2);

    session.put(1, 1);
    session.put(2, 2);
    session.get(1);
    session.put(3, 3);
    session.get(2);

    for record in session.history() {
        println!("{}", record);
    }

    for group in &session.cache().snapshot_buckets() {
        println!("freq {}: {:?}", group.freq, group.entries);
    }
}

// Expected output:
// PUT (1, 1)
// PUT (2, 2)
// GET (1) -> 1
// PUT (3, 3)
// GET (2) -> not found (-1)
// freq 1: [(3, 3)]
// freq 2: [(1, 1)]
//
// Explanation: capacity=2; key 1 is read before key 3 arrives, so key 2 (still
// at frequency 1) is evicted. Run with RUST_LOG=lfukit=debug to see the
// eviction logged.
