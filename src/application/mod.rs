//! Application layer - command/query handlers around the pure engine.
//!
//! Handlers own the collaborator calls (store, extractor, responder) and the
//! per-session turn serialization that the domain requires but does not
//! enforce itself.

pub mod handlers;
mod locks;

pub use locks::SessionLocks;
