//! Agent transcript types for agentic orchestration

use serde::{Deserialize, Serialize};
use std::fmt;

/// Specialized role invoked by the supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// Gathers related literature and assesses novelty
    Research,
    /// Extracts concepts and claims
    Analyzer,
    /// Produces hypotheses from concept pairs
    Generator,
    /// Reviews and scores hypotheses
    Critic,
}

impl AgentRole {
    /// Stable name used in transcripts and tool records
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Research => "research_agent",
            AgentRole::Analyzer => "analyzer_agent",
            AgentRole::Generator => "generator_agent",
            AgentRole::Critic => "critic_agent",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the append-only agent transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentMessage {
    /// Role that produced the message
    pub role: AgentRole,
    /// Free-form content
    pub content: String,
}

impl AgentMessage {
    /// Create a transcript entry
    pub fn new(role: AgentRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Record of one tool call made by a role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Calling role
    pub role: AgentRole,
    /// Tool name
    pub tool: String,
    /// Arguments passed to the tool
    pub arguments: serde_json::Value,
}
