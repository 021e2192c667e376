// ============================================================================
// reactor-core
// A fine-grained reactive runtime: the signal graph, scheduler, and
// ownership model behind a component compiler's generated code.
// ============================================================================
//
// The graph has three kinds of node - sources, deriveds, and effects - all
// sharing one bitflag-based state record (`core::constants`). Reads install
// dependency edges at read time (`reactivity::tracking::track_read`); writes
// propagate a three-valued staleness lattice (CLEAN/DIRTY/MAYBE_DIRTY)
// outward, lazily, so a derived only recomputes when something it actually
// reads has changed. Effects are scheduled onto a two-phase microtask flush
// (`reactivity::scheduling`) unless they opt into running synchronously.
//
// `core` holds the node vtables (`AnySource`/`AnyReaction`) and the
// thread-local `ReactiveContext`. `reactivity` holds the algorithms that
// operate on them: tracking, dirty propagation, scheduling, batching,
// equality, and mutation validation. `primitives` is the public-facing
// surface built on top: `Signal`, `Derived`, effects of all four flavors,
// `Selector`, component contexts, and the external store bridge.
// ============================================================================

pub mod core;
pub mod error;
pub mod macros;
pub mod primitives;
pub mod reactivity;

pub use error::{AccessAfterDestroy, RuntimeError};

pub use core::{ImmediateHost, MutationMode, SchedulerHost, DEFAULT_MAX_UPDATE_DEPTH};

pub use primitives::{
    bridge_store, bridge_store_set, derived, derived_with_equals, destroy_effect, effect,
    effect_root, effect_sync, effect_sync_with_cleanup, effect_tracking, effect_with_cleanup,
    managed_effect, managed_render_effect, mutable_source, pop, pre_effect, push, push_teardown,
    render_effect, selector, signal, signal_f32, signal_f64, signal_with_equals, source,
    sync_effect, unsubscribe_on_teardown, ComponentContext, Derived, Effect, Selector, Signal,
    SourceOptions, StoreBridge,
};

pub use reactivity::{batch, capture_reads, flush_now, is_batching, peek, tick, untrack};

pub use reactivity::equality::{
    always_equals, by_field, deep_equals, default_equals_fn, equals, never_equals,
    safe_equals_f32, safe_equals_f64, safe_equals_option_f64, safe_not_equal_f32,
    safe_not_equal_f64, shallow_equals_slice, shallow_equals_vec,
};

/// Block a subtree from running its effects without destroying it, or lift
/// that block, per §4.5's inert-subtree rule.
///
/// An inert effect is skipped by the scheduler (`reactivity::scheduling::run_one`
/// checks the flag directly) but keeps its dependency edges, so re-activating
/// it doesn't require re-tracking - only re-running a single pass over the
/// currently dirty state picks it back up.
pub fn mark_subtree_inert(effect: &std::rc::Rc<primitives::EffectInner>, inert: bool) {
    use core::constants::INERT;
    use core::types::AnyReaction;

    let flags = effect.flags();
    if inert {
        effect.set_flags(flags | INERT);
    } else {
        effect.set_flags(flags & !INERT);
    }

    let mut child = effect.first_child();
    while let Some(c) = child {
        mark_subtree_inert(&c, inert);
        child = c.next_sibling();
    }
}

/// Await the next scheduler flush, running every pending effect this tick.
///
/// Equivalent to the host's microtask queue draining on its own, but callable
/// synchronously from code (tests, non-async callers) that can't wait on a
/// real microtask checkpoint.
pub fn await_tick() -> Result<(), RuntimeError> {
    reactivity::flush_now()
}
