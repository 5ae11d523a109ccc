//! Append-only transcript of role messages

use cognito_domain::{AgentMessage, AgentRole};

/// Role-tagged messages in invocation order
///
/// There is no way to edit or remove an entry once appended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    messages: Vec<AgentMessage>,
}

impl Transcript {
    /// Empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one message
    pub fn push(&mut self, role: AgentRole, content: impl Into<String>) {
        self.messages.push(AgentMessage::new(role, content));
    }

    /// Messages so far
    pub fn messages(&self) -> &[AgentMessage] {
        &self.messages
    }

    /// Most recent message
    pub fn last(&self) -> Option<&AgentMessage> {
        self.messages.last()
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True if nothing was appended yet
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Consume into the message list
    pub fn into_messages(self) -> Vec<AgentMessage> {
        self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_preserved() {
        let mut transcript = Transcript::new();
        transcript.push(AgentRole::Research, "found 3 papers");
        transcript.push(AgentRole::Analyzer, "extracted 4 concepts");

        let roles: Vec<_> = transcript.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![AgentRole::Research, AgentRole::Analyzer]);
        assert_eq!(transcript.last().unwrap().content, "extracted 4 concepts");
    }
}
