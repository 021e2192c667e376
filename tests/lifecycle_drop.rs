use reactor_core::{derived, effect, effect_root, effect_sync_with_cleanup, push_teardown, signal};
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn dispose_runs_cleanup() {
    let cleanup_called = Rc::new(Cell::new(false));
    let cleanup_clone = cleanup_called.clone();

    let dispose = effect_sync_with_cleanup(move || {
        let cc = cleanup_clone.clone();
        Some(Box::new(move || cc.set(true)))
    });

    assert!(!cleanup_called.get());
    dispose();
    assert!(cleanup_called.get(), "disposing an effect should run its cleanup");
}

#[test]
fn dispose_stops_future_runs() {
    let run_count = Rc::new(Cell::new(0));
    let run_count_clone = run_count.clone();
    let count = signal(0);
    let count_clone = count.clone();

    let dispose = effect(move || {
        let _ = count_clone.get();
        run_count_clone.set(run_count_clone.get() + 1);
    });

    assert_eq!(run_count.get(), 1);
    count.set(1);
    assert_eq!(run_count.get(), 2);

    dispose();

    count.set(2);
    assert_eq!(run_count.get(), 2, "effect should not run after dispose");
}

#[test]
fn effect_root_disposes_every_nested_effect() {
    let run_count = Rc::new(Cell::new(0));
    let count = signal(0);

    let dispose_root = {
        let run_count = run_count.clone();
        let count = count.clone();
        effect_root(move || {
            let run_count_a = run_count.clone();
            let count_a = count.clone();
            effect(move || {
                let _ = count_a.get();
                run_count_a.set(run_count_a.get() + 1);
            });

            let run_count_b = run_count.clone();
            let count_b = count.clone();
            effect(move || {
                let _ = count_b.get();
                run_count_b.set(run_count_b.get() + 1);
            });
        })
    };

    assert_eq!(run_count.get(), 2);
    count.set(1);
    assert_eq!(run_count.get(), 4);

    dispose_root();

    count.set(2);
    assert_eq!(run_count.get(), 4, "nested effects should stop once their root is disposed");
}

#[test]
fn derived_created_inside_effect_is_destroyed_on_rerun() {
    let derive_count = Rc::new(Cell::new(0));
    let source = signal(1);
    let switch = signal(true);

    let derive_count_clone = derive_count.clone();
    let source_clone = source.clone();
    let switch_clone = switch.clone();
    let dispose = effect(move || {
        if switch_clone.get() {
            let source_inner = source_clone.clone();
            let derive_count_inner = derive_count_clone.clone();
            let d = derived(move || {
                derive_count_inner.set(derive_count_inner.get() + 1);
                source_inner.get() * 2
            });
            let _ = d.get();
        }
    });

    assert_eq!(derive_count.get(), 1);

    // Re-running the effect should tear down the previous derived, so the
    // new one starts its own count of how many times it has recomputed.
    switch.set(true);

    dispose();
}

#[test]
fn push_teardown_runs_alongside_effect_cleanup() {
    let extra_ran = Rc::new(Cell::new(false));
    let extra_ran_clone = extra_ran.clone();

    let dispose = effect(move || {
        let flag = extra_ran_clone.clone();
        push_teardown(move || flag.set(true));
    });

    assert!(!extra_ran.get());
    dispose();
    assert!(extra_ran.get(), "teardown registered via push_teardown must run on dispose");
}
