// ============================================================================
// reactor-core - Scheduler
// Two-phase flush queues (pre/render before plain effects), SYNC_EFFECT
// inline execution, and the re-entrancy bound on a single flush (§4.3).
// ============================================================================

use std::rc::{Rc, Weak};

use crate::core::constants::*;
use crate::core::context::with_context;
use crate::core::types::AnyReaction;
use crate::error::RuntimeError;
use crate::primitives::effect::EffectInner;
use crate::reactivity::tracking::is_dirty;

/// Route a freshly-dirtied reaction onto the appropriate queue, or run it
/// immediately if it carries SYNC_EFFECT.
///
/// Called from `mark_reactions` for newly-dirtied effects and from
/// `create_effect` for effects constructed outside of a sync context.
pub(crate) fn schedule_effect(effect: Rc<dyn AnyReaction>) {
    let flags = effect.flags();

    if flags & SYNC_EFFECT != 0 {
        run_one(&effect);
        return;
    }

    with_context(|ctx| {
        if flags & (PRE_EFFECT | RENDER_EFFECT) != 0 {
            ctx.push_pre_render(Rc::downgrade(&effect));
        } else {
            ctx.push_normal(Rc::downgrade(&effect));
        }
    });

    // A batch or an in-progress flush will pick this up itself; don't
    // re-enter.
    let hold_off = with_context(|ctx| ctx.is_batching() || ctx.is_flushing_sync());
    if hold_off {
        return;
    }

    schedule_flush();
}

/// Entry point used by `primitives::effect::create_effect` when constructing
/// an effect that doesn't run synchronously.
pub fn schedule_effect_inner(effect: Rc<EffectInner>) {
    schedule_effect(effect as Rc<dyn AnyReaction>);
}

fn schedule_flush() {
    let already_scheduled = with_context(|ctx| ctx.mark_flush_scheduled());
    if already_scheduled {
        return;
    }
    let host = with_context(|ctx| ctx.host());
    host.queue_microtask(Box::new(|| {
        let _ = flush_now();
    }));
}

/// Drain both phase queues to quiescence: every pass runs all pending
/// pre/render effects before any plain effect, and a plain effect that
/// dirties a pre/render effect causes it to run on the *next* pass rather
/// than being skipped (§4.3's "local render flushes" rule).
///
/// Returns `Err(UpdateDepthExceeded)` if the configured re-entrancy bound is
/// hit; the flush is abandoned at that point, graph state is left exactly as
/// it was after the last reaction that ran, and the depth counter resets on
/// the next externally-triggered flush.
pub fn flush_now() -> Result<(), RuntimeError> {
    with_context(|ctx| ctx.clear_flush_scheduled());

    let was_flushing = with_context(|ctx| {
        let was = ctx.is_flushing_sync();
        ctx.set_flushing_sync(true);
        was
    });

    let result = drain_until_quiescent();

    with_context(|ctx| {
        ctx.set_flushing_sync(was_flushing);
        if result.is_ok() {
            ctx.reset_flush_depth();
        }
    });

    #[cfg(feature = "trace")]
    if let Err(ref e) = result {
        tracing::warn!(error = %e, "flush abandoned");
    }

    result
}

/// Force an immediate flush. Identical to the microtask-triggered path, but
/// callable directly by `batch()` on exit and by the public `flush_now` API.
pub fn flush_sync() -> Result<(), RuntimeError> {
    flush_now()
}

/// Legacy alias kept for callers that only care that pending work ran, not
/// whether it hit the depth bound.
pub fn flush_pending_reactions() {
    let _ = flush_now();
}

fn drain_until_quiescent() -> Result<(), RuntimeError> {
    loop {
        // Fully exhaust pre/render, including any cascade a pre/render effect
        // schedules into itself, before a single normal effect runs (§4.3,
        // §5: "all PRE+RENDER effects run to quiescence before any normal
        // EFFECT runs"). A snapshot-once take here would let a cascading
        // pre/render effect land behind this pass's normal batch instead.
        drain_pre_render()?;

        let normal = with_context(|ctx| ctx.take_normal());
        let legacy = with_context(|ctx| ctx.take_pending_reactions());

        if normal.is_empty() && legacy.is_empty() {
            return Ok(());
        }

        run_batch(normal)?;
        run_batch(legacy)?;

        // A normal effect may have dirtied a pre/render effect; it runs on
        // the next pass, not this one (the "local render flushes" rule).
    }
}

fn drain_pre_render() -> Result<(), RuntimeError> {
    loop {
        let pre_render = with_context(|ctx| ctx.take_pre_render());
        if pre_render.is_empty() {
            return Ok(());
        }
        run_batch(pre_render)?;
    }
}

fn run_batch(batch: Vec<Weak<dyn AnyReaction>>) -> Result<(), RuntimeError> {
    for weak in batch {
        let depth = with_context(|ctx| ctx.bump_flush_depth());
        let max = with_context(|ctx| ctx.max_update_depth());
        if depth > max {
            return Err(RuntimeError::UpdateDepthExceeded { depth: max });
        }

        if let Some(reaction) = weak.upgrade() {
            run_one(&reaction);
        }
    }
    Ok(())
}

fn run_one(reaction: &Rc<dyn AnyReaction>) {
    let flags = reaction.flags();

    if flags & (INERT | DESTROYED) != 0 {
        return;
    }
    if !is_dirty(&**reaction) {
        return;
    }
    if flags & EFFECT != 0 {
        reaction.update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::with_context;

    #[test]
    fn flush_now_is_idempotent_when_nothing_pending() {
        with_context(|ctx| {
            ctx.take_pre_render();
            ctx.take_normal();
            ctx.take_pending_reactions();
        });
        assert!(flush_now().is_ok());
        assert!(flush_now().is_ok());
    }
}
