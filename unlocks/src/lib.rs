//! Unlock resolver: which regions and buildings a given level has access to.
//!
//! Every query is a pure function of the validated configuration and a level
//! passed in by the caller. Nothing here caches unlock state, so any number of
//! views can ask "what's locked and why" without going stale. Unlocks are
//! monotonic in level and levels never decrease, so an unlocked region stays
//! unlocked for the rest of the session.

mod resolver;

pub use resolver::*;
