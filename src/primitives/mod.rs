// ============================================================================
// reactor-core - Primitives Module
// Core reactive primitives: signal, derived, effect, selector, component, store bridge
// ============================================================================

pub mod component;
pub mod derived;
pub mod effect;
pub mod selector;
pub mod signal;
pub mod store_bridge;

// Re-export for convenience
pub use component::{push, pop, ComponentContext, MountHook};
pub use derived::{derived, derived_with_equals, Derived, DerivedInner};
pub use effect::{
    destroy_effect, effect, effect_root, effect_sync, effect_sync_with_cleanup,
    effect_tracking, effect_with_cleanup, managed_effect, managed_render_effect, pre_effect,
    push_teardown, render_effect, sync_effect, update_effect, CleanupFn, DisposeFn, Effect,
    EffectFn, EffectInner,
};
pub use selector::{selector, Selector};
pub use signal::{
    signal, signal_f32, signal_f64, signal_with_equals, source, mutable_source, Signal,
    SourceOptions,
};
pub use store_bridge::{bridge_store, bridge_store_set, unsubscribe_on_teardown, StoreBridge};
