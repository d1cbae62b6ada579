//! Pipeline agents: roles, the capability registry, and the stage order.

mod registry;
mod role;
mod workflow;

pub use registry::{AgentRegistry, Capability, RegistryError};
pub use role::AgentRole;
pub use workflow::{Stage, Workflow};
