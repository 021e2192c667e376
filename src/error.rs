// ============================================================================
// reactor-core - Error Types
// The failure modes of the reactive graph, scheduler, and ownership model.
// ============================================================================

use std::fmt;

/// Errors raised by the reactive runtime.
///
/// Most of these represent programmer errors (misuse of the API) rather than
/// recoverable runtime conditions. See each variant for the condition that
/// produces it and how the runtime responds.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// An effect constructor was called with no component context active.
    ///
    /// Effects created via [`crate::effect`], [`crate::pre_effect`], etc. need an
    /// owning context (or an explicit root) to attach to; calling them outside
    /// of `push`/`pop` and outside of `effect_root` is a programmer error.
    #[error("effect constructor called with no active component context")]
    EffectOutsideInit,

    /// A write to a source occurred while a derived was being evaluated, in
    /// strict mode.
    ///
    /// Deriveds must be pure: they may read any number of sources but must
    /// not write to them. Legacy-mode contexts permit this with coarse
    /// invalidation instead of failing; see [`crate::core::context::MutationMode`].
    #[error("cannot write to a source while a derived is being evaluated (strict mode)")]
    MutationDuringDerivation,

    /// A flush ran more reactions than the configured re-entrancy bound
    /// without reaching quiescence.
    ///
    /// This is almost always an effect that writes to a source it also reads,
    /// without a guard. The flush that trips this is abandoned immediately;
    /// graph state is left as-is and the next externally-triggered write
    /// flushes normally with the depth counter reset.
    #[error("update depth exceeded ({depth}); an effect may be triggering itself indefinitely")]
    UpdateDepthExceeded {
        /// The re-entrancy bound that was exceeded.
        depth: u32,
    },

    /// One or more teardown closures panicked during destruction.
    ///
    /// Teardown is best-effort: every registered closure runs even if an
    /// earlier one panics. This error reports the first panic message;
    /// destruction still completes for every closure in the list.
    #[error("{count} teardown closure(s) failed during destroy; first error: {first}")]
    TeardownFailed {
        /// Total number of teardown closures that panicked.
        count: usize,
        /// The message captured from the first panic.
        first: String,
    },
}

/// Marker error returned by reads of a destroyed node.
///
/// Per the access-after-destroy rule, a read of a [`crate::core::constants::DESTROYED`]
/// node does not itself error — it returns the preserved last value (store
/// bridges) or the uninitialized sentinel (everything else). This type exists
/// so callers that want to distinguish "destroyed" from "never computed" can
/// opt in via [`crate::primitives::signal::Signal::try_get`]-style APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessAfterDestroy;

impl fmt::Display for AccessAfterDestroy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "read of a destroyed reactive node")
    }
}

impl std::error::Error for AccessAfterDestroy {}
