// ============================================================================
// reactor-core - Selector
// O(1) active-key membership tracking (§4.7). Turns "which of these N items
// is selected" from an O(n) problem (every item's effect re-running on every
// selection change) into O(1): only the previously-active and newly-active
// key's subscribers are marked dirty.
// ============================================================================

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::rc::{Rc, Weak};

use crate::core::constants::{DESTROYED, DIRTY};
use crate::core::context::with_context;
use crate::core::types::AnyReaction;
use crate::reactivity::tracking::set_signal_status;

/// A weak reaction reference keyed by pointer identity, so a selector can
/// hold many without keeping them alive.
#[derive(Clone)]
struct SubscriberEntry {
    reaction: Weak<dyn AnyReaction>,
}

impl PartialEq for SubscriberEntry {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.reaction, &other.reaction)
    }
}

impl Eq for SubscriberEntry {}

impl std::hash::Hash for SubscriberEntry {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.reaction.as_ptr().hash(state);
    }
}

/// Tracks which single key out of a set is "active" and lets reactions ask
/// `is(key)` without depending on the whole active-key source.
///
/// Each key has its own subscriber set; `set()` only dirties the subscribers
/// of the key that was active and the key that is becoming active, not every
/// subscriber of every key.
#[derive(Clone)]
pub struct Selector<K>
where
    K: Clone + Eq + Hash + 'static,
{
    current: Rc<RefCell<Option<K>>>,
    subscribers: Rc<RefCell<HashMap<K, HashSet<SubscriberEntry>>>>,
}

impl<K> Selector<K>
where
    K: Clone + Eq + Hash + 'static,
{
    /// Check whether `key` is the active key, subscribing the current
    /// reaction (if any) so it re-runs only when `key`'s membership flips.
    pub fn is(&self, key: &K) -> bool {
        let is_active = self.current.borrow().as_ref() == Some(key);

        with_context(|ctx| {
            if let Some(weak_reaction) = ctx.get_active_reaction() {
                if let Some(reaction) = weak_reaction.upgrade() {
                    if (reaction.flags() & DESTROYED) == 0 {
                        let mut subscribers = self.subscribers.borrow_mut();
                        subscribers.entry(key.clone()).or_default().insert(SubscriberEntry {
                            reaction: Rc::downgrade(&reaction),
                        });
                    }
                }
            }
        });

        is_active
    }

    /// Change the active key. Only subscribers of the previously active key
    /// and the newly active key are marked dirty; every other key's
    /// subscribers are left untouched (the O(1) guarantee).
    pub fn set(&self, new_key: K) {
        let prev_key = self.current.replace(Some(new_key.clone()));

        if prev_key.as_ref() == Some(&new_key) {
            return;
        }

        let mut dirty_reactions: Vec<Rc<dyn AnyReaction>> = Vec::new();
        let mut subscribers = self.subscribers.borrow_mut();

        for key in prev_key.iter().chain(std::iter::once(&new_key)) {
            let Some(entries) = subscribers.get_mut(key) else {
                continue;
            };

            let mut dead = Vec::new();
            for entry in entries.iter() {
                match entry.reaction.upgrade() {
                    Some(reaction) if (reaction.flags() & DESTROYED) == 0 => {
                        dirty_reactions.push(reaction);
                    }
                    _ => dead.push(entry.clone()),
                }
            }
            for entry in dead {
                entries.remove(&entry);
            }
            if entries.is_empty() {
                subscribers.remove(key);
            }
        }
        drop(subscribers);

        if dirty_reactions.is_empty() {
            return;
        }

        with_context(|ctx| {
            for reaction in &dirty_reactions {
                set_signal_status(&**reaction, DIRTY);
                ctx.add_pending_reaction(Rc::downgrade(reaction));
            }
        });

        let should_flush = with_context(|ctx| !ctx.is_batching() && !ctx.is_flushing_sync());
        if should_flush {
            let _ = crate::reactivity::scheduling::flush_sync();
        }
    }

    /// The currently active key, if any, without subscribing.
    pub fn active_key(&self) -> Option<K> {
        self.current.borrow().clone()
    }
}

/// Create a selector, optionally starting with an active key.
///
/// # Example
///
/// ```
/// use reactor_core::{selector, sync_effect};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let sel = selector(Some(1));
///
/// let item2_runs = Rc::new(Cell::new(0));
/// let item2_runs_clone = item2_runs.clone();
/// let sel2 = sel.clone();
/// let _e2 = sync_effect(move || {
///     let _ = sel2.is(&2);
///     item2_runs_clone.set(item2_runs_clone.get() + 1);
/// });
/// assert_eq!(item2_runs.get(), 1);
///
/// sel.set(2);
/// assert_eq!(item2_runs.get(), 2);
/// ```
pub fn selector<K>(initial: Option<K>) -> Selector<K>
where
    K: Clone + Eq + Hash + 'static,
{
    Selector {
        current: Rc::new(RefCell::new(initial)),
        subscribers: Rc::new(RefCell::new(HashMap::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::derived::derived;
    use crate::primitives::effect::sync_effect;
    use std::cell::Cell;

    #[test]
    fn selector_basic() {
        let sel = selector(Some(1));
        assert!(sel.is(&1));
        assert!(!sel.is(&2));

        sel.set(2);
        assert!(!sel.is(&1));
        assert!(sel.is(&2));
    }

    #[test]
    fn selector_o1_optimization() {
        let sel = selector(Some(1));

        let item1_runs = Rc::new(Cell::new(0));
        let item2_runs = Rc::new(Cell::new(0));
        let item3_runs = Rc::new(Cell::new(0));

        let sel1 = sel.clone();
        let runs1 = item1_runs.clone();
        let _e1 = sync_effect(move || {
            let _ = sel1.is(&1);
            runs1.set(runs1.get() + 1);
        });

        let sel2 = sel.clone();
        let runs2 = item2_runs.clone();
        let _e2 = sync_effect(move || {
            let _ = sel2.is(&2);
            runs2.set(runs2.get() + 1);
        });

        let sel3 = sel.clone();
        let runs3 = item3_runs.clone();
        let _e3 = sync_effect(move || {
            let _ = sel3.is(&3);
            runs3.set(runs3.get() + 1);
        });

        assert_eq!(item1_runs.get(), 1);
        assert_eq!(item2_runs.get(), 1);
        assert_eq!(item3_runs.get(), 1);

        sel.set(2);

        assert_eq!(item1_runs.get(), 2, "item1 was active, now isn't");
        assert_eq!(item2_runs.get(), 2, "item2 becomes active");
        assert_eq!(item3_runs.get(), 1, "item3's membership never changed");
    }

    #[test]
    fn selector_with_strings() {
        let sel = selector(Some("apple".to_string()));
        assert!(sel.is(&"apple".to_string()));
        assert!(!sel.is(&"banana".to_string()));

        sel.set("banana".to_string());
        assert!(!sel.is(&"apple".to_string()));
        assert!(sel.is(&"banana".to_string()));
    }

    #[test]
    fn selector_in_derived() {
        let sel = selector(Some(1));
        let is_one = derived({
            let sel = sel.clone();
            move || sel.is(&1)
        });

        assert!(is_one.get());
        sel.set(2);
        assert!(!is_one.get());
        sel.set(1);
        assert!(is_one.get());
    }

    #[test]
    fn selector_no_active_key_initially() {
        let sel: Selector<i32> = selector(None);
        assert!(!sel.is(&1));
        sel.set(1);
        assert!(sel.is(&1));
    }
}
