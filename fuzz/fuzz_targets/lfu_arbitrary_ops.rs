#![no_main]

use libfuzzer_sys::fuzz_target;
use lfukit::policy::lfu::{LfuCache, PutOutcome};
use lfukit::traits::{CacheIntrospect, CoreCache, LfuCacheTrait};

// Fuzz arbitrary operation sequences on LfuCache
//
// First byte picks the capacity, then every 3 bytes are one operation.
// Invariants are re-validated after each step.
fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let capacity = usize::from(data[0] % 16);
    let mut cache = LfuCache::new(capacity);

    let mut idx = 1;
    while idx + 2 < data.len() {
        let op = data[idx] % 8;
        let key = i64::from(data[idx + 1] % 32) - 8;
        let value = i64::from(data[idx + 2]);

        match op {
            0 | 1 => {
                let existed = cache.contains(key);
                let full = cache.len() >= cache.capacity();
                let before = cache.frequency(key);
                match cache.put(key, value) {
                    PutOutcome::Rejected => assert_eq!(capacity, 0),
                    PutOutcome::Updated { .. } => {
                        assert!(existed);
                        assert_eq!(cache.frequency(key), before.map(|f| f.saturating_add(1)));
                    }
                    PutOutcome::Evicted(victim) => {
                        assert!(!existed && full);
                        assert!(!cache.contains(victim.key));
                    }
                    PutOutcome::Inserted => assert!(!existed && !full),
                }
            }
            2 | 3 => {
                let before = cache.frequency(key);
                let got = cache.get(key);
                assert_eq!(got.is_some(), before.is_some());
            }
            4 => {
                let _ = cache.peek(key);
            }
            5 => {
                let snapshot = cache.snapshot_buckets();
                assert_eq!(snapshot.key_count(), cache.len());
                assert_eq!(snapshot.groups().first().map(|g| g.freq), cache.min_freq());
            }
            6 => {
                if let Some((victim, _)) = cache.peek_lfu() {
                    assert!(cache.contains(victim));
                }
            }
            7 => {
                if value % 8 == 0 {
                    cache.reset();
                }
            }
            _ => unreachable!(),
        }

        cache.debug_validate_invariants();
        idx += 3;
    }
});
