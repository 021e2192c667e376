//! Benchmarks for reactor-core
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use reactor_core::{batch, derived, effect, signal};

// =============================================================================
// SIGNAL BENCHMARKS
// =============================================================================

fn bench_signal_create(c: &mut Criterion) {
    c.bench_function("signal_create", |b| {
        b.iter(|| black_box(signal(0i32)))
    });
}

fn bench_signal_get(c: &mut Criterion) {
    let s = signal(42i32);
    c.bench_function("signal_get", |b| b.iter(|| black_box(s.get())));
}

fn bench_signal_set(c: &mut Criterion) {
    let s = signal(0i32);
    c.bench_function("signal_set", |b| b.iter(|| s.set(black_box(42))));
}

fn bench_signal_set_same_value(c: &mut Criterion) {
    let s = signal(42i32);
    c.bench_function("signal_set_same_value", |b| b.iter(|| s.set(black_box(42))));
}

// =============================================================================
// DERIVED BENCHMARKS
// =============================================================================

fn bench_derived_create(c: &mut Criterion) {
    let s = signal(0i32);
    c.bench_function("derived_create", |b| {
        let s = s.clone();
        b.iter(|| {
            black_box(derived({
                let s = s.clone();
                move || s.get() * 2
            }))
        })
    });
}

fn bench_derived_get_cached(c: &mut Criterion) {
    let s = signal(42i32);
    let s_clone = s.clone();
    let d = derived(move || s_clone.get() * 2);

    let _ = d.get();

    c.bench_function("derived_get_cached", |b| b.iter(|| black_box(d.get())));
}

fn bench_derived_get_dirty(c: &mut Criterion) {
    let s = signal(0i32);
    let s_clone = s.clone();
    let d = derived(move || s_clone.get() * 2);

    let mut i = 0i32;
    c.bench_function("derived_get_dirty", |b| {
        b.iter(|| {
            s.set(i);
            i += 1;
            black_box(d.get())
        })
    });
}

fn bench_derived_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("derived_chain");

    for depth in [1, 5, 10, 20] {
        group.bench_with_input(BenchmarkId::new("depth", depth), &depth, |b, &depth| {
            let s = signal(1i32);

            let mut current = {
                let s = s.clone();
                derived(move || s.get() + 1)
            };

            for _ in 1..depth {
                let prev = current.clone();
                current = derived(move || prev.get() + 1);
            }

            b.iter(|| {
                s.set(black_box(1));
                black_box(current.get())
            })
        });
    }

    group.finish();
}

// =============================================================================
// EFFECT BENCHMARKS
// =============================================================================

fn bench_effect_create(c: &mut Criterion) {
    c.bench_function("effect_create", |b| {
        b.iter(|| black_box(effect(|| {})))
    });
}

fn bench_effect_trigger(c: &mut Criterion) {
    let s = signal(0i32);
    let s_clone = s.clone();
    let _e = effect(move || {
        black_box(s_clone.get());
    });

    let mut i = 0i32;
    c.bench_function("effect_trigger", |b| {
        b.iter(|| {
            s.set(i);
            i += 1;
        })
    });
}

fn bench_effect_multiple_deps(c: &mut Criterion) {
    let a = signal(0i32);
    let b_sig = signal(0i32);
    let c_sig = signal(0i32);

    let a_c = a.clone();
    let b_c = b_sig.clone();
    let c_c = c_sig.clone();
    let _e = effect(move || {
        black_box(a_c.get() + b_c.get() + c_c.get());
    });

    let mut i = 0i32;
    c.bench_function("effect_multiple_deps", |b| {
        b.iter(|| {
            a.set(i);
            i += 1;
        })
    });
}

// =============================================================================
// BATCH BENCHMARKS
// =============================================================================

fn bench_batch_updates(c: &mut Criterion) {
    let s = signal(0i32);
    let s_clone = s.clone();
    let _e = effect(move || {
        black_box(s_clone.get());
    });

    c.bench_function("batch_10_updates", |b| {
        b.iter(|| {
            batch(|| {
                for i in 0..10 {
                    s.set(black_box(i));
                }
            })
        })
    });
}

// =============================================================================
// STRESS TESTS
// =============================================================================

fn bench_many_signals(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_signals");

    for count in [100, 1000, 10000] {
        group.bench_with_input(BenchmarkId::new("create", count), &count, |b, &count| {
            b.iter(|| {
                let signals: Vec<_> = (0..count).map(signal).collect();
                black_box(signals)
            })
        });
    }

    group.finish();
}

fn bench_many_effects(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_effects");

    for count in [10, 100, 500] {
        group.bench_with_input(BenchmarkId::new("trigger", count), &count, |b, &count| {
            let s = signal(0i32);

            let effects: Vec<_> = (0..count)
                .map(|_| {
                    let s = s.clone();
                    effect(move || {
                        black_box(s.get());
                    })
                })
                .collect();

            let mut i = 0i32;
            b.iter(|| {
                s.set(i);
                i += 1;
            });

            drop(effects);
        });
    }

    group.finish();
}

// =============================================================================
// CRITERION SETUP
// =============================================================================

criterion_group!(
    signal_benches,
    bench_signal_create,
    bench_signal_get,
    bench_signal_set,
    bench_signal_set_same_value,
);

criterion_group!(
    derived_benches,
    bench_derived_create,
    bench_derived_get_cached,
    bench_derived_get_dirty,
    bench_derived_chain,
);

criterion_group!(
    effect_benches,
    bench_effect_create,
    bench_effect_trigger,
    bench_effect_multiple_deps,
    bench_batch_updates,
);

criterion_group!(stress_benches, bench_many_signals, bench_many_effects,);

criterion_main!(signal_benches, derived_benches, effect_benches, stress_benches);
