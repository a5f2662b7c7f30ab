//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: in-process comment storage, user directory, and session
//!   token table
//! - **broadcast**: in-process per-post publish/subscribe hub
//!
//! Adapters are thin translators between domain types and their backing
//! store. They contain no business logic.

pub mod broadcast;
pub mod memory;
