//! Ordered pipeline stages.

use crate::agents::role::AgentRole;

/// One pipeline stage: an agent and the capabilities it handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    /// Agent name.
    pub agent: String,
    /// Capabilities handled at this stage.
    pub capabilities: Vec<String>,
}

/// Ordered list of pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workflow {
    stages: Vec<Stage>,
}

impl Default for Workflow {
    /// supervisor -> foreman -> code_generator -> video_watcher -> confirmer.
    fn default() -> Self {
        Self::new(
            AgentRole::ALL
                .into_iter()
                .map(|role| (role.as_str(), vec![role.capability()])),
        )
    }
}

impl Workflow {
    /// Builds a workflow from `(agent, capabilities)` pairs in order.
    pub fn new<I, A, C, S>(stages: I) -> Self
    where
        I: IntoIterator<Item = (A, C)>,
        A: Into<String>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stages = stages
            .into_iter()
            .map(|(agent, caps)| Stage {
                agent: agent.into(),
                capabilities: caps.into_iter().map(Into::into).collect(),
            })
            .collect();
        Self { stages }
    }

    /// Stages in order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// The agent after `agent`, or `None` if `agent` is last or not a stage.
    pub fn next_agent(&self, agent: &str) -> Option<&str> {
        let index = self.stages.iter().position(|stage| stage.agent == agent)?;
        self.stages.get(index + 1).map(|stage| stage.agent.as_str())
    }

    /// The first stage with a capability mentioned in `issue`.
    ///
    /// Matching is a case-insensitive substring search.
    pub fn agent_for_issue(&self, issue: &str) -> Option<&str> {
        let issue = issue.to_lowercase();
        self.stages
            .iter()
            .find(|stage| {
                stage.capabilities.iter().any(|cap| issue.contains(&cap.to_lowercase()))
            })
            .map(|stage| stage.agent.as_str())
    }
}
