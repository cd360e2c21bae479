//! A2A (agent-to-agent) protocol surface
//!
//! JSON-RPC 2.0 over HTTP: `message/send`, `message/stream` and
//! `tasks/cancel`, plus the agent card under `/.well-known/`.

mod server;
mod types;

pub use server::{A2aState, a2a_router, serve};
pub use types::*;
