//! Agents
//!
//! One generic endpoint type, parametrized by an [`AgentSpec`], serves all
//! four specialized agents. The executor adapts an endpoint to the transport
//! boundary and the card describes it for discovery.

mod card;
mod endpoint;
mod error;
mod executor;
mod spec;

pub use card::{AgentCapabilities, AgentCard, CARD_VERSION};
pub use endpoint::AgentEndpoint;
pub use error::AgentError;
pub use executor::{AgentExecutor, DEFAULT_SESSION};
pub use spec::{AgentSkill, AgentSpec};
