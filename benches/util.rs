use std::env;
use std::hint::black_box;

use regex::Regex;

use criterion::{BatchSize, Criterion};

use once_cell::sync::OnceCell;

pub fn pin_thread_to_core() {
    use std::cell::Cell;
    let pin_core_id: usize = 2;

    thread_local! {static AFFINITY_ALREADY_SET: Cell<bool> = const { Cell::new(false) }; }

    // Set affinity only once per thread.
    AFFINITY_ALREADY_SET.with(|affinity_already_set| {
        if !affinity_already_set.get() {
            if let Some(core_id_2) = core_affinity::get_core_ids()
                .as_ref()
                .and_then(|ids| ids.get(pin_core_id))
            {
                core_affinity::set_for_current(*core_id_2);
            }

            affinity_already_set.set(true);
        }
    });
}

fn is_bench_name_ok(name: &str) -> bool {
    static FILTER_REGEX: OnceCell<Option<Regex>> = OnceCell::new();

    let filter_regex = FILTER_REGEX.get_or_init(|| {
        env::var("CUSTOM_BENCH_REGEX")
            .ok()
            .map(|filter_regex| Regex::new(&filter_regex).unwrap())
    });

    filter_regex
        .as_ref()
        .map(|reg| reg.is_match(name))
        .unwrap_or(true)
}

/// Applies `BENCH_NAME_OVERWRITE=<match>:<replacement>` to `bench_name`.
fn overwrite_bench_name(bench_name: &str) -> String {
    static NAME_OVERWRITE: OnceCell<Option<String>> = OnceCell::new();

    let name_overwrite = NAME_OVERWRITE.get_or_init(|| env::var("BENCH_NAME_OVERWRITE").ok());

    if let Some(name) = name_overwrite {
        let split_pos = name.find(':').unwrap();
        if bench_name == &name[..split_pos] {
            return name[(split_pos + 1)..].to_string();
        }
    }

    bench_name.to_string()
}

#[inline(never)]
#[allow(clippy::too_many_arguments)]
pub fn bench_fn<K: Copy>(
    c: &mut Criterion,
    test_size: usize,
    key_name: &str,
    transform: fn(i64) -> K,
    pattern_name: &str,
    pattern_provider: impl Fn(usize) -> Vec<i64>,
    bench_name: &str,
    sort_fn: impl Fn(&mut [K], &mut [u64]),
) {
    // Pin the benchmark to the same core to improve repeatability. Doing it this way allows
    // criterion to do other stuff with other threads, which greatly impacts overall benchmark
    // throughput.
    pin_thread_to_core();

    let batch_size = if test_size > 30 {
        BatchSize::LargeInput
    } else {
        BatchSize::SmallInput
    };

    let bench_name = overwrite_bench_name(bench_name);
    let bench_name_hot = format!("{bench_name}-hot-{key_name}-{pattern_name}-{test_size}");
    if !is_bench_name_ok(&bench_name_hot) {
        return;
    }

    c.bench_function(&bench_name_hot, |b| {
        b.iter_batched_ref(
            || {
                let keys: Vec<K> = pattern_provider(test_size)
                    .into_iter()
                    .map(transform)
                    .collect();
                let values: Vec<u64> = (0..keys.len() as u64).collect();
                (keys, values)
            },
            |(keys, values)| {
                sort_fn(black_box(keys.as_mut_slice()), black_box(values.as_mut_slice()));
                black_box((keys, values)); // side-effect
            },
            batch_size,
        )
    });
}
