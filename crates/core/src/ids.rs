//! Interaction identifiers
//!
//! Sequential ids scoped to one simulation run. Replaces a process-wide
//! counter: each run owns its generator, so ids are reproducible.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one interaction turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InteractionId(pub u64);

impl fmt::Display for InteractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of an agent within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent-{}", self.0)
    }
}

/// Monotonic id generator
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    next_interaction: u64,
    next_agent: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_interaction(&mut self) -> InteractionId {
        let id = InteractionId(self.next_interaction);
        self.next_interaction += 1;
        id
    }

    pub fn next_agent(&mut self) -> AgentId {
        let id = AgentId(self.next_agent);
        self.next_agent += 1;
        id
    }

    /// Number of interaction ids handed out so far
    pub fn issued_interactions(&self) -> u64 {
        self.next_interaction
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_interaction(), InteractionId(0));
        assert_eq!(ids.next_interaction(), InteractionId(1));
        assert_eq!(ids.next_agent(), AgentId(0));
        assert_eq!(ids.issued_interactions(), 2);
    }

    #[test]
    fn test_reset() {
        let mut ids = IdGenerator::new();
        ids.next_interaction();
        ids.next_agent();
        ids.reset();
        assert_eq!(ids.next_interaction(), InteractionId(0));
        assert_eq!(ids.next_agent(), AgentId(0));
    }

    #[test]
    fn test_display() {
        assert_eq!(InteractionId(3).to_string(), "#3");
        assert_eq!(AgentId(1).to_string(), "agent-1");
    }
}
