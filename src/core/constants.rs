// ============================================================================
// reactor-core - Constants
// Flag constants for the unified node record (§3 of the runtime spec)
// ============================================================================

// =============================================================================
// SIGNAL TYPE FLAGS
// =============================================================================

/// Source signal (basic reactive value)
pub const SOURCE: u32 = 1 << 0;

/// Signal is a derived value (computed)
pub const DERIVED: u32 = 1 << 1;

/// Signal is an effect
pub const EFFECT: u32 = 1 << 2;

/// Effect is a render effect - runs before DOM updates
pub const RENDER_EFFECT: u32 = 1 << 3;

/// Effect is a root effect (created via effect.root())
pub const ROOT_EFFECT: u32 = 1 << 4;

/// Effect is a branch effect (if/each blocks)
pub const BRANCH_EFFECT: u32 = 1 << 5;

/// Effect is a user effect
pub const USER_EFFECT: u32 = 1 << 6;

/// Effect is a block effect
pub const BLOCK_EFFECT: u32 = 1 << 7;

/// Effect runs before the render effects of the same component context
/// (phase 1 of a flush, alongside RENDER_EFFECT).
pub const PRE_EFFECT: u32 = 1 << 20;

/// Effect always runs synchronously, inline with the write that dirtied it.
/// Never queued on either scheduler phase.
pub const SYNC_EFFECT: u32 = 1 << 21;

// =============================================================================
// DERIVED-SPECIFIC FLAGS
// =============================================================================

/// Derived has no owner (created outside effect)
pub const UNOWNED: u32 = 1 << 8;

/// Derived is disconnected (no reactions, can be GC'd)
pub const DISCONNECTED: u32 = 1 << 9;

/// Node was created with an explicit owner other than the enclosing effect;
/// the enclosing effect will not auto-own it on destroy.
pub const MANAGED: u32 = 1 << 22;

// =============================================================================
// SIGNAL STATE FLAGS
// =============================================================================

/// Signal/reaction is clean (up-to-date)
pub const CLEAN: u32 = 1 << 10;

/// Signal/reaction is dirty (definitely needs update)
pub const DIRTY: u32 = 1 << 11;

/// Signal/reaction might be dirty (needs to check dependencies)
pub const MAYBE_DIRTY: u32 = 1 << 12;

/// Reaction is currently being updated
pub const REACTION_IS_UPDATING: u32 = 1 << 13;

/// Effect has been destroyed
pub const DESTROYED: u32 = 1 << 14;

/// Effect is inert (paused)
pub const INERT: u32 = 1 << 15;

/// Effect has run at least once
pub const EFFECT_RAN: u32 = 1 << 16;

/// Effect is preserved (not destroyed with parent)
pub const EFFECT_PRESERVED: u32 = 1 << 17;

// =============================================================================
// INSPECT FLAGS (for debugging)
// =============================================================================

/// Effect is an inspect effect (for debugging)
pub const INSPECT_EFFECT: u32 = 1 << 18;

/// Reaction is a repeater (inline write-through forwarding node)
pub const REPEATER: u32 = 1 << 19;

// =============================================================================
// STATUS MASK (for clearing status bits)
// =============================================================================

/// Mask to clear all status bits (CLEAN, DIRTY, MAYBE_DIRTY)
pub const STATUS_MASK: u32 = !(DIRTY | MAYBE_DIRTY | CLEAN);

// =============================================================================
// TESTS
// =============================================================================
