//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! Reads are served over HTTP ([`http`]); writes and live updates travel over
//! the WebSocket protocol ([`ws`]).

pub mod http;
pub mod ws;
