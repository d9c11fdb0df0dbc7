use std::env;
use std::str::FromStr;
use std::sync::Mutex;

use rand::prelude::*;

use zipf::ZipfDistribution;

/// Provides a set of key patterns useful for testing and benchmarking key-value sorts.
/// Keys are produced as i64 and converted to the key type under test.

// --- Public ---

pub fn random(len: usize) -> Vec<i64> {
    //     .
    // : . : :
    // :.:::.::

    random_vec(len)
}

pub fn random_uniform<R>(len: usize, range: R) -> Vec<i64>
where
    R: Into<rand::distributions::Uniform<i64>>,
{
    // :.:.:.::
    let mut rng = new_seed();

    let dist: rand::distributions::Uniform<i64> = range.into();

    (0..len).map(|_| dist.sample(&mut rng)).collect()
}

pub fn random_unique(len: usize) -> Vec<i64> {
    //   .  :
    // . :.:::.
    // Every key occurs exactly once.
    let mut rng = new_seed();

    let mut vals: Vec<i64> = (0..len as i64).map(|i| i * 3 - len as i64).collect();
    vals.shuffle(&mut rng);

    vals
}

pub fn random_zipf(len: usize, exponent: f64) -> Vec<i64> {
    // https://en.wikipedia.org/wiki/Zipf's_law
    if len == 0 {
        return Vec::new();
    }

    let mut rng = new_seed();
    let dist = ZipfDistribution::new(len, exponent).unwrap();

    (0..len).map(|_| dist.sample(&mut rng) as i64).collect()
}

pub fn random_sorted(len: usize, sorted_percent: f64) -> Vec<i64> {
    //     .:
    //   .:::. :
    // .::::::.::
    // [----][--]
    //  ^      ^
    //  |      |
    // sorted  |
    //     unsorted

    let mut v = random_vec(len);
    let sorted_len = ((len as f64) * (sorted_percent / 100.0)).round() as usize;

    v[0..sorted_len].sort_unstable();

    v
}

pub fn all_equal(len: usize) -> Vec<i64> {
    // ......
    // ::::::

    (0..len).map(|_| 66).collect::<Vec<_>>()
}

pub fn ascending(len: usize) -> Vec<i64> {
    //     .:
    //   .:::
    // .:::::

    (0..len as i64).collect::<Vec<_>>()
}

pub fn descending(len: usize) -> Vec<i64> {
    // :.
    // :::.
    // :::::.

    (0..len as i64).rev().collect::<Vec<_>>()
}

pub fn saw_mixed(len: usize, saw_count: usize) -> Vec<i64> {
    // :.  :.    .::.    .:
    // :::.:::..::::::..:::

    if len == 0 {
        return Vec::new();
    }

    let mut vals = random_vec(len);
    let chunks_size = (len / saw_count.max(1)).max(1);
    let saw_directions = random_uniform((len / chunks_size) + 1, 0..=1);

    for (i, chunk) in vals.chunks_mut(chunks_size).enumerate() {
        if saw_directions[i] == 0 {
            chunk.sort_unstable();
        } else {
            chunk.sort_unstable_by_key(|&e| std::cmp::Reverse(e));
        }
    }

    vals
}

pub fn pipe_organ(len: usize) -> Vec<i64> {
    //   .:.
    // .:::::.

    let mut vals = random_vec(len);

    let first_half = &mut vals[0..(len / 2)];
    first_half.sort_unstable();

    let second_half = &mut vals[(len / 2)..len];
    second_half.sort_unstable_by_key(|&e| std::cmp::Reverse(e));

    vals
}

/// Random payload values to attach to a key pattern.
pub fn payload(len: usize) -> Vec<u64> {
    // Separate stream so payloads don't mirror the bits of `random` keys of the same length.
    let mut rng = StdRng::seed_from_u64(random_init_seed() ^ 0x9e37_79b9_7f4a_7c15);

    (0..len).map(|_| rng.gen::<u64>()).collect()
}

/// Replaces roughly `nan_percent` of `keys` with NaN at random positions.
pub fn sprinkle_nan(keys: &mut [f64], nan_percent: f64) {
    let mut rng = new_seed();
    let nan_count = ((keys.len() as f64) * (nan_percent / 100.0)).round() as usize;

    for idx in rand::seq::index::sample(&mut rng, keys.len(), nan_count).iter() {
        keys[idx] = f64::NAN;
    }
}

/// Overwrites the default behavior so that each call to a random derived pattern yields new random
/// values.
///
/// By default `patterns::random(4)` will yield the same values per process invocation.
/// For benchmarks it's advised to use call this function.
pub fn use_random_seed_each_time() {
    let (seed_type, _) = get_or_init_seed_type_and_value();
    if seed_type == SeedType::ExternalOverride {
        panic!("Using use_random_seed_each_time conflicts with the external seed override.");
    }

    *SEED_TYPE_AND_VALUE.lock().unwrap() = Some((SeedType::RandomEachTime, 0));
}

pub fn random_init_seed() -> u64 {
    get_or_init_seed_type_and_value().1
}

// --- Private ---

#[derive(Copy, Clone, PartialEq, Eq)]
enum SeedType {
    RandomEachTime,
    RandomOncePerProcess,
    ExternalOverride,
}

static SEED_TYPE_AND_VALUE: Mutex<Option<(SeedType, u64)>> = Mutex::new(None);

fn get_or_init_seed_type_and_value() -> (SeedType, u64) {
    let (seed_type, seed_val) = *SEED_TYPE_AND_VALUE.lock().unwrap().get_or_insert_with(|| {
        if let Some(override_seed) = env::var("OVERRIDE_SEED")
            .ok()
            .map(|seed| u64::from_str(&seed).unwrap())
        {
            (SeedType::ExternalOverride, override_seed)
        } else {
            let per_process_seed = thread_rng().gen();
            (SeedType::RandomOncePerProcess, per_process_seed)
        }
    });

    if seed_type == SeedType::RandomEachTime {
        (SeedType::RandomEachTime, thread_rng().gen())
    } else {
        (seed_type, seed_val)
    }
}

fn new_seed() -> StdRng {
    // Random seed, but prints it for repeatability.
    StdRng::seed_from_u64(random_init_seed())
}

fn random_vec(len: usize) -> Vec<i64> {
    let mut rng = new_seed();

    (0..len).map(|_| rng.gen::<i64>()).collect()
}
