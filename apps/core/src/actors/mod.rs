//! Actor layer for the optional AI delegate.
//!
//! The delegate runs as its own Tokio task owned by a cloneable handle, so
//! slow or failing network calls never block the engine's rule path.

pub mod delegate;
pub mod messages;
pub mod traits;
