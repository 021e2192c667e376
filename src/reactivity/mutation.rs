// ============================================================================
// reactor-core - Mutation Validation
// Strict vs legacy policy for writes that occur while a derived is being
// evaluated (§4.4), plus `capture_reads` for recording a closure's
// dependencies without installing a real reaction (§6).
// ============================================================================

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::core::constants::*;
use crate::core::context::{with_context, MutationMode};
use crate::core::types::{AnyReaction, AnySource};
use crate::error::RuntimeError;

/// Check whether a write occurring right now is allowed, given whatever
/// reaction is currently active.
///
/// A write from inside an effect is always fine. A write from inside a
/// derived is a policy decision: `Strict` contexts reject it outright (the
/// derived should have been pure), `Legacy` contexts allow it but mark the
/// writing derived itself dirty, so its cached value isn't trusted past this
/// point and it recomputes on next read.
pub(crate) fn validate_mutation() -> Result<(), RuntimeError> {
    with_context(|ctx| {
        let Some(reaction_weak) = ctx.get_active_reaction() else {
            return Ok(());
        };
        let Some(reaction) = reaction_weak.upgrade() else {
            return Ok(());
        };
        if !reaction.is_derived() {
            return Ok(());
        }

        match ctx.mutation_mode() {
            MutationMode::Strict => Err(RuntimeError::MutationDuringDerivation),
            MutationMode::Legacy => {
                reaction.mark_dirty();
                Ok(())
            }
        }
    })
}

/// A throwaway reaction used only to give `track_read` something to record
/// dependencies against. Never scheduled, never updated.
struct CaptureProbe {
    flags: Cell<u32>,
    deps: RefCell<Vec<Rc<dyn AnySource>>>,
}

impl AnyReaction for CaptureProbe {
    fn flags(&self) -> u32 {
        self.flags.get()
    }

    fn set_flags(&self, flags: u32) {
        self.flags.set(flags);
    }

    fn dep_count(&self) -> usize {
        self.deps.borrow().len()
    }

    fn add_dep(&self, source: Rc<dyn AnySource>) {
        self.deps.borrow_mut().push(source);
    }

    fn clear_deps(&self) {
        self.deps.borrow_mut().clear();
    }

    fn remove_deps_from(&self, start: usize) {
        self.deps.borrow_mut().truncate(start);
    }

    fn for_each_dep(&self, f: &mut dyn FnMut(&Rc<dyn AnySource>) -> bool) {
        for dep in self.deps.borrow().iter() {
            if !f(dep) {
                break;
            }
        }
    }

    fn remove_source(&self, source: &Rc<dyn AnySource>) {
        let ptr = Rc::as_ptr(source) as *const ();
        self.deps.borrow_mut().retain(|d| Rc::as_ptr(d) as *const () != ptr);
    }

    fn update(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_derived_source(&self) -> Option<Rc<dyn AnySource>> {
        None
    }
}

/// Run `f`, recording every source it reads along the way, without
/// installing `f`'s reads as dependencies of whatever reaction is already
/// active (if any).
///
/// Unlike `untrack`, this doesn't discard the reads - it hands them back so
/// the caller can use them for purposes other than normal dependency
/// installation (diagnostics, explicit manual subscriptions, etc).
pub fn capture_reads<T>(f: impl FnOnce() -> T) -> (T, Vec<Rc<dyn AnySource>>) {
    // Deliberately no REACTION_IS_UPDATING: that flag routes track_read through
    // the version-deduped new_deps buffer, which is shared thread-local state
    // belonging to whatever reaction is already mid-update. Leaving it unset
    // makes track_read add deps straight onto the probe instead.
    let probe: Rc<dyn AnyReaction> = Rc::new(CaptureProbe {
        flags: Cell::new(EFFECT),
        deps: RefCell::new(Vec::new()),
    });

    let prev_reaction = with_context(|ctx| ctx.set_active_reaction(Some(Rc::downgrade(&probe))));
    let result = f();
    with_context(|ctx| ctx.set_active_reaction(prev_reaction));

    let deps = probe
        .as_any()
        .downcast_ref::<CaptureProbe>()
        .map(|p| p.deps.borrow().clone())
        .unwrap_or_default();
    (result, deps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::signal::signal;

    #[test]
    fn capture_reads_records_sources_read() {
        let a = signal(1);
        let b = signal(2);
        let a_clone = a.clone();
        let b_clone = b.clone();

        let (sum, deps) = capture_reads(move || a_clone.get() + b_clone.get());

        assert_eq!(sum, 3);
        assert_eq!(deps.len(), 2);
    }

    #[test]
    fn capture_reads_does_not_install_as_outer_dependency() {
        use crate::primitives::effect::effect;
        use std::cell::Cell as StdCell;
        use std::rc::Rc as StdRc;

        let tracked = signal(0);
        let untracked = signal(0);
        let runs = StdRc::new(StdCell::new(0));

        let tracked_clone = tracked.clone();
        let untracked_clone = untracked.clone();
        let runs_clone = runs.clone();
        let _dispose = effect(move || {
            let _ = tracked_clone.get();
            let (_, _deps) = capture_reads(|| untracked_clone.get());
            runs_clone.set(runs_clone.get() + 1);
        });

        assert_eq!(runs.get(), 1);
        untracked.set(42);
        assert_eq!(runs.get(), 1, "capture_reads must not subscribe the outer effect");
        tracked.set(1);
        assert_eq!(runs.get(), 2);
    }
}
