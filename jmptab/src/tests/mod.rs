use crate::{
    keys::distinguishing_prefix_len,
    placement::{bucket_count, jump_table_len},
    search::find_perfect_hash,
    BuildError, Builder, Mphf, OwnedJumpTable,
};
use alloc::{format, string::String, vec, vec::Vec};
use core::ops::Deref;
use rand::{rngs::SmallRng, SeedableRng};

const GOOS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux",
    "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

const GOARCH: &[&str] = &[
    "386", "amd64", "amd64p32", "arm", "armbe", "arm64", "arm64be", "loong64", "mips", "mipsle",
    "mips64", "mips64le", "mips64p32", "mips64p32le", "ppc", "ppc64", "ppc64le", "riscv", "riscv64",
    "s390", "s390x", "sparc", "sparc64", "wasm",
];

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
];

const HTTP_METHODS: &[&str] = &[
    "GET", "HEAD", "POST", "PUT", "DELETE", "CONNECT", "OPTIONS", "TRACE", "PATCH",
];

fn identifiers(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("ident_{i}")).collect()
}

fn fixtures() -> Vec<Vec<String>> {
    let mut sets: Vec<Vec<String>> = [GOOS, GOARCH, KEYWORDS, HTTP_METHODS]
        .iter()
        .map(|set| set.iter().map(|&key| key.into()).collect())
        .collect();
    sets.push(identifiers(200));
    sets
}

fn init_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

fn assert_perfect<S: Deref<Target = [u8]>, K: AsRef<[u8]>>(mphf: &Mphf<S>, keys: &[K]) {
    assert_eq!(mphf.capacity(), jump_table_len(keys.len()));
    assert_eq!(mphf.bucket_count(), bucket_count(keys.len()));
    assert_eq!(mphf.shifts().len(), mphf.bucket_count());

    let mut seen = vec![false; mphf.capacity()];
    for key in keys {
        let index = mphf.index_of(key.as_ref());
        assert!(index < mphf.capacity());
        assert!(!seen[index], "collision at {index}");
        seen[index] = true;
    }
}

#[test]
fn fixtures_are_perfect() {
    init_logger();
    for keys in fixtures() {
        let mphf = Builder::new().build(&keys).expect("construction failed");
        assert_perfect(&mphf, &keys);
        assert_eq!(
            mphf.hasher().prefix_len(),
            distinguishing_prefix_len(&crate::keys::deduplicate(keys.clone()))
        );
    }
}

#[test]
fn five_keys() {
    let mphf = Builder::new()
        .build(["linux", "darwin", "windows", "freebsd", "plan9"])
        .expect("construction failed");
    assert_eq!(mphf.capacity(), 8);
    assert_eq!(mphf.bucket_count(), 2);
    assert_eq!(mphf.jump_mask(), 7);
    assert_eq!(mphf.bucket_mask(), 1);
}

#[test]
fn distinct_lengths_hash_length_only() {
    let keys = ["", "a", "ab", "abc"];
    let mphf = Builder::new().build(keys).expect("construction failed");
    assert_eq!(mphf.hasher().prefix_len(), 0);
    assert_perfect(&mphf, &keys);
}

#[test]
fn duplicates_are_ignored() {
    let mphf = Builder::new()
        .build(["GET", "PUT", "GET", "POST", "PUT"])
        .expect("construction failed");
    assert_eq!(mphf.capacity(), 4);
    assert_perfect(&mphf, &["GET", "PUT", "POST"]);
}

#[test]
fn table_lookups() {
    init_logger();
    let entries: Vec<(&str, usize)> = KEYWORDS.iter().copied().zip(0..).collect();
    let table = Builder::new()
        .build_table(entries.clone())
        .expect("construction failed");

    assert_eq!(table.len(), KEYWORDS.len());
    assert!(!table.is_empty());
    assert_eq!(table.capacity(), 64);
    for (key, value) in &entries {
        assert_eq!(table.get(key), Some(value));
        assert_eq!(table.get_key_value(key), Some((key, value)));
        assert!(table.contains_key(key));
        assert!(table.position(key).is_some());
    }

    for foreign in ["", "fun", "matches", "SELF", "unsafe!", "union"] {
        assert_eq!(table.get(foreign), None, "{foreign} should be missing");
        assert!(!table.contains_key(foreign));
        assert_eq!(table.position(foreign), None);
    }

    let mut values: Vec<usize> = table.values().copied().collect();
    values.sort_unstable();
    assert_eq!(values, (0..KEYWORDS.len()).collect::<Vec<_>>());
    assert_eq!(table.keys().count(), KEYWORDS.len());
    assert_eq!(
        table.slots().iter().filter(|slot| slot.is_some()).count(),
        KEYWORDS.len()
    );
}

#[test]
fn table_first_entry_wins() {
    let table = Builder::new()
        .build_table(vec![("GET", 1), ("PUT", 2), ("GET", 3)])
        .expect("construction failed");
    assert_eq!(table.len(), 2);
    assert_eq!(table.get("GET"), Some(&1));
    assert_eq!(table.get("PUT"), Some(&2));
}

#[test]
fn table_slots_match_mphf() {
    let entries: Vec<(String, ())> = identifiers(100).into_iter().map(|key| (key, ())).collect();
    let table: OwnedJumpTable<String, ()> = Builder::new()
        .build_table(entries)
        .expect("construction failed");
    for (index, slot) in table.slots().iter().enumerate() {
        if let Some((key, ())) = slot {
            assert_eq!(table.mphf().index_of(key.as_bytes()), index);
            assert_eq!(table.position(key), Some(index));
        }
    }
}

#[test]
fn deterministic() {
    let keys = identifiers(150);
    let a = Builder::new().build(&keys).expect("construction failed");
    let b = Builder::new().build(&keys).expect("construction failed");
    assert_eq!(a, b);

    let c = Builder::with_rng(SmallRng::seed_from_u64(42))
        .build(&keys)
        .expect("construction failed");
    let d = Builder::with_rng(SmallRng::seed_from_u64(42))
        .build(&keys)
        .expect("construction failed");
    assert_eq!(c.hasher(), d.hasher());
    assert_eq!(c.shifts(), d.shifts());
}

#[test]
fn input_order_does_not_matter() {
    let mut keys: Vec<&str> = GOARCH.to_vec();
    let a = Builder::new().build(&keys).expect("construction failed");
    keys.reverse();
    let b = Builder::new().build(&keys).expect("construction failed");
    assert_eq!(a, b);
}

#[cfg(feature = "std")]
#[test]
fn concurrent_builds() {
    init_logger();
    let sets = fixtures();
    std::thread::scope(|scope| {
        let handles: Vec<_> = sets
            .iter()
            .enumerate()
            .map(|(i, keys)| {
                scope.spawn(move || {
                    let mphf = Builder::with_rng(SmallRng::seed_from_u64(i as u64))
                        .build(keys)
                        .expect("construction failed");
                    assert_perfect(&mphf, keys);
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("builder thread panicked");
        }
    });
}

#[test]
fn full_table_exhausts_placement() {
    init_logger();
    // 1023 keys in 1024 slots: the greedy placement cannot fill the last buckets
    let keys: Vec<String> = (0..1023).map(|i| format!("key{i}")).collect();
    let error = Builder::new().attempts(3).build(&keys).unwrap_err();
    assert_eq!(error, BuildError::PlacementExhausted { attempts: 3 });
}

#[test]
fn equal_lengths_exhaust_seeds() {
    let keys = ["GET", "PUT"];
    let error = find_perfect_hash(&keys, 0, 10, &mut SmallRng::seed_from_u64(0)).unwrap_err();
    assert_eq!(error, BuildError::SeedExhausted { attempts: 10 });
}
