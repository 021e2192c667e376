// ============================================================================
// reactor-core - Component Context
// Props, owned effects, context map, and mount lifecycle for a component
// subtree (§4.8).
// ============================================================================
//
// A component context is a stack frame pushed around the construction of a
// component's reactive tree. It is NOT itself part of the signal graph - it
// exists so that effects created while it's active have somewhere to record
// "I belong to this component" for lifecycle hooks (mounted/before_update/
// after_update) that the graph's own effect tree has no notion of.
// ============================================================================

use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::core::context::{with_context, MutationMode};
use crate::primitives::effect::EffectInner;

/// A lifecycle hook registered via `before_update`/`after_update`.
pub type MountHook = Box<dyn FnMut()>;

/// A component's reactive context: props, the effects it owns directly,
/// a type-keyed context map for dependency injection, and mount hooks.
pub struct ComponentContext {
    parent: Option<Rc<ComponentContext>>,
    props: RefCell<HashMap<String, Rc<dyn Any>>>,
    owned_effects: RefCell<Vec<Rc<EffectInner>>>,
    context_map: RefCell<HashMap<TypeId, Rc<dyn Any>>>,
    immutable: Cell<bool>,
    strict_mode: Cell<bool>,
    mounted: Cell<bool>,
    before_update: RefCell<Vec<MountHook>>,
    after_update: RefCell<Vec<MountHook>>,
}

impl ComponentContext {
    fn new(parent: Option<Rc<ComponentContext>>) -> Rc<Self> {
        let strict_mode = parent.as_ref().map(|p| p.strict_mode.get()).unwrap_or(true);
        Rc::new(Self {
            parent,
            props: RefCell::new(HashMap::new()),
            owned_effects: RefCell::new(Vec::new()),
            context_map: RefCell::new(HashMap::new()),
            immutable: Cell::new(false),
            strict_mode: Cell::new(strict_mode),
            mounted: Cell::new(false),
            before_update: RefCell::new(Vec::new()),
            after_update: RefCell::new(Vec::new()),
        })
    }

    /// This context's parent, if it was pushed while another was active.
    pub fn parent(&self) -> Option<Rc<ComponentContext>> {
        self.parent.clone()
    }

    /// Fetch a prop by name.
    pub fn prop(&self, name: &str) -> Option<Rc<dyn Any>> {
        self.props.borrow().get(name).cloned()
    }

    /// Set a prop by name.
    pub fn set_prop(&self, name: impl Into<String>, value: Rc<dyn Any>) {
        self.props.borrow_mut().insert(name.into(), value);
    }

    /// Whether props are treated as read-only within this context.
    pub fn is_immutable(&self) -> bool {
        self.immutable.get()
    }

    pub fn set_immutable(&self, value: bool) {
        self.immutable.set(value);
    }

    /// Whether mutation-during-derivation fails loudly in this context.
    pub fn strict_mode(&self) -> bool {
        self.strict_mode.get()
    }

    pub fn set_strict_mode(&self, value: bool) {
        self.strict_mode.set(value);
    }

    /// Has this component completed its first mount?
    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    /// Mark mounted and run every registered `after_update` hook once.
    pub fn mount(&self) {
        if self.mounted.replace(true) {
            return;
        }
        for hook in self.after_update.borrow_mut().iter_mut() {
            hook();
        }
    }

    /// Register a hook that runs before every flush this component
    /// participates in.
    pub fn before_update(&self, hook: MountHook) {
        self.before_update.borrow_mut().push(hook);
    }

    /// Register a hook that runs after mount and after every subsequent flush.
    pub fn after_update(&self, hook: MountHook) {
        self.after_update.borrow_mut().push(hook);
    }

    /// Run the registered `before_update` hooks.
    pub fn run_before_update(&self) {
        for hook in self.before_update.borrow_mut().iter_mut() {
            hook();
        }
    }

    /// Run the registered `after_update` hooks (only once mounted).
    pub fn run_after_update(&self) {
        if !self.mounted.get() {
            return;
        }
        for hook in self.after_update.borrow_mut().iter_mut() {
            hook();
        }
    }

    /// Provide a value into the context map, keyed by its type.
    pub fn provide<T: 'static>(&self, value: Rc<T>) {
        self.context_map
            .borrow_mut()
            .insert(TypeId::of::<T>(), value as Rc<dyn Any>);
    }

    /// Look up a value in this context or any ancestor's context map.
    pub fn inject<T: 'static>(&self) -> Option<Rc<T>> {
        if let Some(value) = self.context_map.borrow().get(&TypeId::of::<T>()) {
            if let Ok(typed) = Rc::downcast::<T>(value.clone()) {
                return Some(typed);
            }
        }
        self.parent.as_ref().and_then(|p| p.inject::<T>())
    }

    fn add_owned_effect(&self, effect: Rc<EffectInner>) {
        self.owned_effects.borrow_mut().push(effect);
    }

    /// Destroy every effect this component owns directly. Effects owned
    /// transitively through the signal-graph effect tree are destroyed by
    /// their own parent, not here.
    pub fn destroy(&self) {
        for effect in self.owned_effects.borrow_mut().drain(..) {
            crate::primitives::effect::destroy_effect(effect, true);
        }
    }
}

thread_local! {
    static ACTIVE_COMPONENT: RefCell<Option<Rc<ComponentContext>>> = RefCell::new(None);
}

/// Push a new component context, nesting under whichever one is currently
/// active (if any). Returns the new context so callers can set props on it
/// before running the component body.
pub fn push() -> Rc<ComponentContext> {
    let parent = ACTIVE_COMPONENT.with(|cell| cell.borrow().clone());
    let ctx = ComponentContext::new(parent);

    with_context(|rc| {
        let mode = if ctx.strict_mode() {
            MutationMode::Strict
        } else {
            MutationMode::Legacy
        };
        rc.set_mutation_mode(mode);
    });

    ACTIVE_COMPONENT.with(|cell| *cell.borrow_mut() = Some(ctx.clone()));
    ctx
}

/// Pop the active component context, restoring its parent (if any) as
/// active.
pub fn pop() -> Option<Rc<ComponentContext>> {
    ACTIVE_COMPONENT.with(|cell| {
        let popped = cell.borrow_mut().take();
        let parent = popped.as_ref().and_then(|c| c.parent());
        *cell.borrow_mut() = parent.clone();
        with_context(|rc| {
            let mode = parent
                .as_ref()
                .map(|p| {
                    if p.strict_mode() {
                        MutationMode::Strict
                    } else {
                        MutationMode::Legacy
                    }
                })
                .unwrap_or_default();
            rc.set_mutation_mode(mode);
        });
        popped
    })
}

/// The currently active component context, if any.
pub fn current() -> Option<Rc<ComponentContext>> {
    ACTIVE_COMPONENT.with(|cell| cell.borrow().clone())
}

/// Record that `effect` was created while a component context was active, so
/// the component can tear it down on its own destroy. Effects created inside
/// another effect already cascade via the effect tree; this only matters for
/// top-level effects created directly inside a component body.
pub fn register_effect_with_component(effect: &Rc<EffectInner>) {
    if let Some(ctx) = current() {
        if effect.parent().is_none() {
            ctx.add_owned_effect(effect.clone());
        }
    }
}
