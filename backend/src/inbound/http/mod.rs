//! HTTP inbound adapter exposing read endpoints and health probes.

pub mod comments;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;

pub use error::ApiResult;
