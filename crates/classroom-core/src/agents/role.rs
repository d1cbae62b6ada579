//! Pipeline agent roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A role in the lesson-video pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// Designs the video structure from the lesson request.
    Supervisor,
    /// Turns the structure into visual instructions.
    Foreman,
    /// Writes Manim code for the instructions.
    CodeGenerator,
    /// Reviews rendered videos.
    VideoWatcher,
    /// Consolidates approved videos.
    Confirmer,
}

impl AgentRole {
    /// All roles in pipeline order.
    pub const ALL: [AgentRole; 5] = [
        AgentRole::Supervisor,
        AgentRole::Foreman,
        AgentRole::CodeGenerator,
        AgentRole::VideoWatcher,
        AgentRole::Confirmer,
    ];

    /// Agent name used in configuration and on the message bus.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Supervisor => "supervisor",
            Self::Foreman => "foreman",
            Self::CodeGenerator => "code_generator",
            Self::VideoWatcher => "video_watcher",
            Self::Confirmer => "confirmer",
        }
    }

    /// Kind label shown in registry listings.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Supervisor => "SupervisorAgent",
            Self::Foreman => "ForemanAgent",
            Self::CodeGenerator => "CodeGeneratorAgent",
            Self::VideoWatcher => "VideoWatcherAgent",
            Self::Confirmer => "ConfirmerAgent",
        }
    }

    /// The capability this role contributes to the pipeline.
    pub fn capability(&self) -> &'static str {
        match self {
            Self::Supervisor => "design_video_structure",
            Self::Foreman => "interpret_video_structure",
            Self::CodeGenerator => "generate_manim_code",
            Self::VideoWatcher => "evaluate_video",
            Self::Confirmer => "consolidate_videos",
        }
    }

    /// Human-readable description of [`Self::capability`].
    pub fn capability_description(&self) -> &'static str {
        match self {
            Self::Supervisor => "Create the segment-by-segment structure of a lesson video",
            Self::Foreman => "Translate a video structure into timed visual instructions",
            Self::CodeGenerator => "Generate Manim animation code from visual instructions",
            Self::VideoWatcher => "Evaluate a rendered video against its instructions",
            Self::Confirmer => "Merge approved segment videos into the final lesson",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("unknown agent role: {s}"))
    }
}
