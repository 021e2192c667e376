// ============================================================================
// reactor-core - External Store Bridge
// Adapts a `subscribe(observer) -> unsubscribe` / `set(value)` external
// contract into the signal graph (§4.6).
// ============================================================================
//
// Grounded in the same shape as primitives/signal.rs's Signal<T>: a bridge
// holds a Signal internally and forwards every external notification into
// it via `.set()`, so reads of the bridge participate in dependency
// tracking exactly like a native signal would.
// ============================================================================

use std::cell::RefCell;

use crate::primitives::effect::push_teardown;
use crate::primitives::signal::Signal;

/// An unsubscribe callback returned by an external store's `subscribe`.
pub type Unsubscribe = Box<dyn FnOnce()>;

/// A bridge between an external store and the signal graph.
///
/// `get()` reads the last value the external store pushed through its
/// observer, participating in dependency tracking like any other source.
/// The bridge keeps the last observed value even after `unsubscribe` runs,
/// per the access-after-destroy rule: a dropped subscription doesn't erase
/// history, it just stops updating it.
pub struct StoreBridge<T> {
    signal: Signal<T>,
    unsubscribe: RefCell<Option<Unsubscribe>>,
}

impl<T: Clone + PartialEq + 'static> StoreBridge<T> {
    /// Read the bridged value, tracking it as a dependency if called inside
    /// a reaction.
    pub fn get(&self) -> T {
        self.signal.get()
    }

    /// The underlying signal, for cases that need the type-erased handle.
    pub fn signal(&self) -> &Signal<T> {
        &self.signal
    }

    /// Disconnect from the external store early. Safe to call more than
    /// once; subsequent calls are no-ops.
    pub fn unsubscribe(&self) {
        if let Some(unsub) = self.unsubscribe.borrow_mut().take() {
            unsub();
        }
    }
}

/// Subscribe to an external store and mirror its notifications into a
/// signal.
///
/// `subscribe` is called once, immediately, with an observer closure; it
/// must invoke the observer synchronously or asynchronously with every new
/// value and return an unsubscribe callback.
///
/// # Example
///
/// ```ignore
/// let bridge = bridge_store(0, |observer| {
///     external_store.on_change(observer)
/// });
/// assert_eq!(bridge.get(), 0);
/// ```
pub fn bridge_store<T, Sub>(initial: T, subscribe: Sub) -> StoreBridge<T>
where
    T: Clone + PartialEq + 'static,
    Sub: FnOnce(Box<dyn FnMut(T)>) -> Unsubscribe,
{
    let sig = Signal::new(initial);
    let sig_for_observer = sig.clone();

    // The external store is notifying of its own change, not a derived
    // mutating a source mid-evaluation, so this write bypasses mutation
    // validation (§4.6).
    let unsubscribe = subscribe(Box::new(move |value: T| {
        sig_for_observer.set_unvalidated(value);
    }));

    StoreBridge {
        signal: sig,
        unsubscribe: RefCell::new(Some(unsubscribe)),
    }
}

/// Push a value from the signal graph out to the external store.
///
/// Does not update the bridge's own signal directly; the external store is
/// expected to echo the new value back through the subscription the bridge
/// already holds, the same way a write from outside the bridge would.
pub fn bridge_store_set<T, F>(value: T, set_external: F)
where
    F: FnOnce(T),
{
    set_external(value);
}

/// Register `bridge`'s unsubscribe as a teardown of the currently active
/// effect, so the subscription ends when the effect does.
///
/// Returns `false` if there is no active effect to attach to (the bridge
/// still works, it just needs to be unsubscribed manually via
/// [`StoreBridge::unsubscribe`]).
pub fn unsubscribe_on_teardown<T: Clone + PartialEq + 'static>(
    bridge: std::rc::Rc<StoreBridge<T>>,
) -> bool {
    push_teardown(move || bridge.unsubscribe())
}
