// ============================================================================
// reactor-core - Signal Primitive
// The core writable reactive signal
// ============================================================================

use std::rc::Rc;

use crate::core::context::with_context;
use crate::core::types::{AnySource, EqualsFn, SourceInner};
use crate::error::RuntimeError;
use crate::reactivity::tracking::{notify_write, notify_write_unvalidated, track_read};

// =============================================================================
// SIGNAL<T> - The public signal handle
// =============================================================================

/// A reactive signal that holds a value of type T.
///
/// Signals are the foundation of the reactive system. When a signal's value
/// changes, all dependent deriveds and effects are notified and updated.
///
/// # Example
///
/// ```
/// use reactor_core::signal;
///
/// let count = signal(0);
/// assert_eq!(count.get(), 0);
///
/// count.set(5);
/// assert_eq!(count.get(), 5);
/// ```
#[derive(Clone)]
pub struct Signal<T> {
    inner: Rc<SourceInner<T>>,
}

impl<T> Signal<T> {
    /// Create a new signal with the given initial value.
    pub fn new(value: T) -> Self
    where
        T: PartialEq + 'static,
    {
        Self {
            inner: Rc::new(SourceInner::new(value)),
        }
    }

    /// Create a new signal with a custom equality function.
    pub fn new_with_equals(value: T, equals: EqualsFn<T>) -> Self
    where
        T: 'static,
    {
        Self {
            inner: Rc::new(SourceInner::new_with_equals(value, equals)),
        }
    }

    /// Get the current value (cloning).
    ///
    /// In a reactive context (inside an effect or derived), this will
    /// register the signal as a dependency.
    pub fn get(&self) -> T
    where
        T: Clone + 'static,
    {
        // Track this read for dependency registration
        track_read(self.inner.clone() as Rc<dyn AnySource>);
        self.inner.get()
    }

    /// Try to get the current value, returning None if the borrow fails.
    ///
    /// This is useful when you're not sure if the value is currently borrowed
    /// mutably elsewhere (though this shouldn't happen in normal usage).
    pub fn try_get(&self) -> Option<T>
    where
        T: Clone,
    {
        // In normal usage this always succeeds, but provides safety for edge cases
        Some(self.inner.get())
    }

    /// Access the current value with a closure (avoids cloning).
    ///
    /// # Example
    ///
    /// ```
    /// use reactor_core::signal;
    ///
    /// let items = signal(vec![1, 2, 3]);
    /// let sum = items.with(|v| v.iter().sum::<i32>());
    /// assert_eq!(sum, 6);
    /// ```
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R
    where
        T: 'static,
    {
        // Track this read for dependency registration
        track_read(self.inner.clone() as Rc<dyn AnySource>);
        self.inner.with(f)
    }

    /// Set the signal's value.
    ///
    /// Returns true if the value changed (based on equality check).
    /// If the value didn't change, no notifications are sent.
    ///
    /// Panics if the write is rejected by the active mutation policy (§4.4) -
    /// writing to a signal from inside a derived under `MutationMode::Strict`.
    /// Use [`Signal::try_set`] to handle that case without panicking.
    pub fn set(&self, value: T) -> bool
    where
        T: 'static,
    {
        match self.try_set(value) {
            Ok(changed) => changed,
            Err(e) => panic!("{e}"),
        }
    }

    /// Set the signal's value, returning an error instead of panicking if the
    /// write is rejected by the active mutation policy (§4.4).
    pub fn try_set(&self, value: T) -> Result<bool, RuntimeError>
    where
        T: 'static,
    {
        let changed = self.inner.set(value);
        if changed {
            // Update write version in context and notify reactions
            with_context(|ctx| {
                let wv = ctx.increment_write_version();
                self.inner.set_write_version(wv);
            });
            notify_write(self.inner.clone() as Rc<dyn AnySource>)?;
        }
        Ok(changed)
    }

    /// Update the value in place using a closure.
    ///
    /// # Example
    ///
    /// ```
    /// use reactor_core::signal;
    ///
    /// let count = signal(0);
    /// count.update(|n| *n += 1);
    /// assert_eq!(count.get(), 1);
    /// ```
    ///
    /// Panics if the write is rejected by the active mutation policy (§4.4);
    /// see [`Signal::try_update`] for a non-panicking variant.
    pub fn update(&self, f: impl FnOnce(&mut T))
    where
        T: Clone + 'static,
    {
        if let Err(e) = self.try_update(f) {
            panic!("{e}");
        }
    }

    /// Update the value in place, returning an error instead of panicking if
    /// the write is rejected by the active mutation policy (§4.4).
    pub fn try_update(&self, f: impl FnOnce(&mut T)) -> Result<(), RuntimeError>
    where
        T: Clone + 'static,
    {
        let had_reactions = self.inner.update(f);
        if had_reactions {
            // Update write version and notify reactions
            with_context(|ctx| {
                let wv = ctx.increment_write_version();
                self.inner.set_write_version(wv);
            });
            notify_write(self.inner.clone() as Rc<dyn AnySource>)?;
        }
        Ok(())
    }

    /// Set the signal's value bypassing mutation validation.
    ///
    /// Used by collaborators that write on behalf of something other than
    /// the active reaction - the external store bridge's observer callback
    /// (§4.6) is the only caller, since that write represents the external
    /// store notifying of its own change rather than a derived mutating a
    /// source mid-evaluation.
    pub(crate) fn set_unvalidated(&self, value: T)
    where
        T: 'static,
    {
        let changed = self.inner.set(value);
        if changed {
            with_context(|ctx| {
                let wv = ctx.increment_write_version();
                self.inner.set_write_version(wv);
            });
            notify_write_unvalidated(self.inner.clone() as Rc<dyn AnySource>);
        }
    }

    /// Get a reference to the inner source (for advanced use).
    pub fn inner(&self) -> &Rc<SourceInner<T>> {
        &self.inner
    }

    /// Get the inner source as a type-erased AnySource.
    ///
    /// This enables storing signals of different types in the same collection.
    pub fn as_any_source(&self) -> Rc<dyn AnySource>
    where
        T: 'static,
    {
        self.inner.clone()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Signal<T>
where
    T: Clone + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("value", &self.get())
            .finish()
    }
}

// =============================================================================
// SIGNAL CREATION FUNCTIONS (TypeScript-like API)
// =============================================================================

/// Create a new reactive signal.
///
/// This is the primary way to create signals, matching the TypeScript API.
///
/// # Example
///
/// ```
/// use reactor_core::signal;
///
/// let count = signal(0);
/// let name = signal(String::from("hello"));
///
/// count.set(42);
/// assert_eq!(count.get(), 42);
/// ```
pub fn signal<T>(value: T) -> Signal<T>
where
    T: PartialEq + 'static,
{
    Signal::new(value)
}

/// Create a signal with a custom equality function.
///
/// # Example
///
/// ```
/// use reactor_core::primitives::signal::signal_with_equals;
///
/// // Signal that always considers values different (always notifies)
/// let always_notify = signal_with_equals(0, |_, _| false);
///
/// // Even setting the same value returns true (changed)
/// assert!(always_notify.set(0));
/// ```
pub fn signal_with_equals<T>(value: T, equals: EqualsFn<T>) -> Signal<T>
where
    T: 'static,
{
    Signal::new_with_equals(value, equals)
}

// =============================================================================
// SOURCE (Low-level API)
// =============================================================================

/// Options for creating a source.
pub struct SourceOptions<T> {
    pub equals: Option<EqualsFn<T>>,
}

impl<T> Default for SourceOptions<T> {
    fn default() -> Self {
        Self { equals: None }
    }
}

/// Create a source (low-level signal).
///
/// This is the low-level primitive. Most users should use `signal()` instead.
pub fn source<T>(value: T, options: Option<SourceOptions<T>>) -> Signal<T>
where
    T: PartialEq + 'static,
{
    match options.and_then(|o| o.equals) {
        Some(eq) => Signal::new_with_equals(value, eq),
        None => Signal::new(value),
    }
}

// =============================================================================
// MUTABLE SOURCE (for objects that need forced updates)
// =============================================================================

/// Create a mutable source that always triggers updates on set.
///
/// Unlike regular `source()` which uses equality checking, `mutable_source()`
/// always considers values as "changed", ensuring dependent reactions run.
///
/// Use this when:
/// - Storing mutable objects that may be modified in place
/// - You want to ensure updates propagate regardless of equality
/// - Working with types that don't implement PartialEq meaningfully
///
/// # Example
///
/// ```
/// use reactor_core::primitives::signal::mutable_source;
///
/// let data = mutable_source(vec![1, 2, 3]);
///
/// // Even setting to the "same" value triggers updates
/// assert!(data.set(vec![1, 2, 3])); // Returns true (changed)
/// ```
pub fn mutable_source<T>(value: T) -> Signal<T>
where
    T: 'static,
{
    Signal::new_with_equals(value, crate::reactivity::equality::never_equals)
}

/// Create a signal for f64 values with safe NaN handling.
///
/// Uses `safe_equals_f64` which treats NaN == NaN as true,
/// unlike IEEE 754 where NaN != NaN.
///
/// # Example
///
/// ```
/// use reactor_core::primitives::signal::signal_f64;
///
/// let value = signal_f64(f64::NAN);
///
/// // Setting to the same NaN doesn't trigger update (correctly equal)
/// assert!(!value.set(f64::NAN)); // Returns false (not changed)
///
/// // Setting to different value triggers update
/// assert!(value.set(1.0)); // Returns true (changed)
/// ```
pub fn signal_f64(value: f64) -> Signal<f64> {
    Signal::new_with_equals(value, crate::reactivity::equality::safe_equals_f64)
}

/// Create a signal for f32 values with safe NaN handling.
pub fn signal_f32(value: f32) -> Signal<f32> {
    Signal::new_with_equals(value, crate::reactivity::equality::safe_equals_f32)
}

// =============================================================================
// TESTS
// =============================================================================
