//! In-process adapters for storage, the user directory, and session tokens.
//!
//! These adapters keep all state in memory. They back the default server
//! wiring and the integration tests; a durable deployment swaps them for
//! adapters over real infrastructure without touching the domain.

mod comment_store;
mod session_tokens;
mod user_directory;

pub use comment_store::InMemoryCommentStore;
pub use session_tokens::StaticTokenAuthenticator;
pub use user_directory::InMemoryUserDirectory;
