//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external collaborators. The reconciler
//! depends only on these traits, not on concrete implementations.

mod connection;
mod script_source;

pub use connection::ConnectionProvider;
pub use script_source::ScriptSource;
