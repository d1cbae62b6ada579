//! Agent registry.
//!
//! Thread-safe record of the pipeline's agents and the capabilities they
//! advertise. Listings keep registration order.

use crate::agents::role::AgentRole;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::debug;

/// Agent registry errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Agent not found.
    #[error("agent not found: {0}")]
    NotFound(String),

    /// Lock poisoned.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// A capability advertised by an agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    /// Capability name.
    pub name: String,
    /// What the capability does.
    pub description: String,
}

#[derive(Debug, Default)]
struct RegistryState {
    /// `(name, kind)` pairs.
    agents: Vec<(String, String)>,
    /// Capabilities per agent name. An agent may advertise capabilities
    /// before it is registered.
    capabilities: Vec<(String, Vec<Capability>)>,
}

impl RegistryState {
    fn capabilities_of(&self, agent: &str) -> Option<&Vec<Capability>> {
        self.capabilities.iter().find(|(name, _)| name == agent).map(|(_, caps)| caps)
    }
}

/// Registry of agents and their capabilities.
#[derive(Debug, Clone, Default)]
pub struct AgentRegistry {
    state: Arc<RwLock<RegistryState>>,
}

impl AgentRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every pipeline role and its capability.
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn with_default_roles() -> Result<Self> {
        let registry = Self::new();
        for role in AgentRole::ALL {
            registry.register_agent(role.as_str(), role.kind())?;
            registry.register_capability(
                role.as_str(),
                role.capability(),
                role.capability_description(),
            )?;
        }
        Ok(registry)
    }

    /// Registers `name` with the given kind label. Re-registering replaces
    /// the kind and keeps the original position.
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn register_agent(&self, name: impl Into<String>, kind: impl Into<String>) -> Result<()> {
        let (name, kind) = (name.into(), kind.into());
        let mut state = self.state.write().map_err(|e| RegistryError::LockPoisoned(e.to_string()))?;

        debug!(agent = %name, kind = %kind, "Registering agent");

        match state.agents.iter().position(|(existing, _)| *existing == name) {
            Some(index) => state.agents[index].1 = kind,
            None => state.agents.push((name, kind)),
        }
        Ok(())
    }

    /// Records that `agent` offers `capability`. Re-registering replaces the
    /// description.
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn register_capability(
        &self,
        agent: impl Into<String>,
        capability: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<()> {
        let agent = agent.into();
        let capability = Capability {
            name: capability.into(),
            description: description.into(),
        };
        let mut state = self.state.write().map_err(|e| RegistryError::LockPoisoned(e.to_string()))?;

        let index = match state.capabilities.iter().position(|(name, _)| *name == agent) {
            Some(index) => index,
            None => {
                state.capabilities.push((agent, Vec::new()));
                state.capabilities.len() - 1
            }
        };

        let caps = &mut state.capabilities[index].1;
        match caps.iter().position(|existing| existing.name == capability.name) {
            Some(position) => caps[position].description = capability.description,
            None => caps.push(capability),
        }
        Ok(())
    }

    /// Kind label of a registered agent.
    ///
    /// # Errors
    ///
    /// Returns error if the agent is not registered or the lock is poisoned.
    pub fn kind(&self, agent: &str) -> Result<String> {
        let state = self.state.read().map_err(|e| RegistryError::LockPoisoned(e.to_string()))?;
        state
            .agents
            .iter()
            .find(|(name, _)| name == agent)
            .map(|(_, kind)| kind.clone())
            .ok_or_else(|| RegistryError::NotFound(agent.to_string()))
    }

    /// Capability names of `agent`; empty if it has none.
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn capabilities(&self, agent: &str) -> Result<Vec<String>> {
        let state = self.state.read().map_err(|e| RegistryError::LockPoisoned(e.to_string()))?;
        Ok(state
            .capabilities_of(agent)
            .map(|caps| caps.iter().map(|c| c.name.clone()).collect())
            .unwrap_or_default())
    }

    /// Agents offering `capability` (exact match).
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn agents_with_capability(&self, capability: &str) -> Result<Vec<String>> {
        let state = self.state.read().map_err(|e| RegistryError::LockPoisoned(e.to_string()))?;
        Ok(state
            .capabilities
            .iter()
            .filter(|(_, caps)| caps.iter().any(|c| c.name == capability))
            .map(|(agent, _)| agent.clone())
            .collect())
    }

    /// Registered `(name, kind)` pairs.
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn describe_agents(&self) -> Result<Vec<(String, String)>> {
        let state = self.state.read().map_err(|e| RegistryError::LockPoisoned(e.to_string()))?;
        Ok(state.agents.clone())
    }

    /// Every agent's capabilities, including agents not yet registered.
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn describe_capabilities(&self) -> Result<Vec<(String, Vec<Capability>)>> {
        let state = self.state.read().map_err(|e| RegistryError::LockPoisoned(e.to_string()))?;
        Ok(state.capabilities.clone())
    }

    /// Human-readable listing of registered agents and their capabilities.
    ///
    /// ```text
    /// supervisor (SupervisorAgent):
    ///   - design_video_structure: Create the segment-by-segment ...
    ///
    /// foreman (ForemanAgent):
    ///   - interpret_video_structure: Translate a video structure ...
    /// ```
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn describe_all(&self) -> Result<String> {
        let state = self.state.read().map_err(|e| RegistryError::LockPoisoned(e.to_string()))?;

        let mut description = String::new();
        for (name, kind) in &state.agents {
            description.push_str(&format!("{name} ({kind}):\n"));
            for cap in state.capabilities_of(name).into_iter().flatten() {
                description.push_str(&format!("  - {}: {}\n", cap.name, cap.description));
            }
            description.push('\n');
        }

        Ok(description.trim().to_string())
    }

    /// Number of registered agents.
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn count(&self) -> Result<usize> {
        let state = self.state.read().map_err(|e| RegistryError::LockPoisoned(e.to_string()))?;
        Ok(state.agents.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_new() {
        let registry = AgentRegistry::new();
        assert_eq!(registry.count().unwrap(), 0);
        assert_eq!(registry.describe_all().unwrap(), "");
    }

    #[test]
    fn test_register_agent_keeps_order() {
        let registry = AgentRegistry::new();
        registry.register_agent("supervisor", "SupervisorAgent").unwrap();
        registry.register_agent("foreman", "ForemanAgent").unwrap();
        registry.register_agent("supervisor", "LeadAgent").unwrap();

        let agents = registry.describe_agents().unwrap();
        assert_eq!(
            agents,
            vec![
                ("supervisor".to_string(), "LeadAgent".to_string()),
                ("foreman".to_string(), "ForemanAgent".to_string()),
            ]
        );
    }

    #[test]
    fn test_kind_lookup() {
        let registry = AgentRegistry::new();
        registry.register_agent("foreman", "ForemanAgent").unwrap();

        assert_eq!(registry.kind("foreman").unwrap(), "ForemanAgent");
        assert!(matches!(
            registry.kind("narrator"),
            Err(RegistryError::NotFound(name)) if name == "narrator"
        ));
    }

    #[test]
    fn test_capabilities() {
        let registry = AgentRegistry::new();
        registry.register_capability("code_generator", "generate_manim_code", "old").unwrap();
        registry.register_capability("code_generator", "fix_manim_code", "Repair code").unwrap();
        registry.register_capability("code_generator", "generate_manim_code", "new").unwrap();

        assert_eq!(
            registry.capabilities("code_generator").unwrap(),
            vec!["generate_manim_code", "fix_manim_code"]
        );
        assert!(registry.capabilities("confirmer").unwrap().is_empty());

        let described = registry.describe_capabilities().unwrap();
        assert_eq!(described[0].1[0].description, "new");
    }

    #[test]
    fn test_agents_with_capability() {
        let registry = AgentRegistry::new();
        registry.register_capability("foreman", "interpret_video_structure", "d").unwrap();
        registry.register_capability("supervisor", "interpret_video_structure", "d").unwrap();
        registry.register_capability("supervisor", "design_video_structure", "d").unwrap();

        assert_eq!(
            registry.agents_with_capability("interpret_video_structure").unwrap(),
            vec!["foreman", "supervisor"]
        );
        assert!(registry.agents_with_capability("interpret").unwrap().is_empty());
    }

    #[test]
    fn test_describe_all_format() {
        let registry = AgentRegistry::new();
        registry.register_agent("supervisor", "SupervisorAgent").unwrap();
        registry.register_agent("confirmer", "ConfirmerAgent").unwrap();
        registry.register_capability("supervisor", "design_video_structure", "Design").unwrap();
        registry.register_capability("supervisor", "review", "Review").unwrap();
        // capabilities of unregistered agents are not listed
        registry.register_capability("ghost", "haunt", "Boo").unwrap();

        assert_eq!(
            registry.describe_all().unwrap(),
            concat!(
                "supervisor (SupervisorAgent):\n",
                "  - design_video_structure: Design\n",
                "  - review: Review\n\n",
                "confirmer (ConfirmerAgent):",
            )
        );
    }

    #[test]
    fn test_with_default_roles() {
        let registry = AgentRegistry::with_default_roles().unwrap();
        assert_eq!(registry.count().unwrap(), 5);
        assert_eq!(
            registry.agents_with_capability("evaluate_video").unwrap(),
            vec!["video_watcher"]
        );
        assert!(registry.describe_all().unwrap().starts_with("supervisor (SupervisorAgent):\n"));
    }

    #[test]
    fn test_registry_is_shared_across_clones() {
        let registry = AgentRegistry::new();
        let handle = registry.clone();
        std::thread::spawn(move || handle.register_agent("foreman", "ForemanAgent").unwrap())
            .join()
            .unwrap();
        assert_eq!(registry.count().unwrap(), 1);
    }
}
