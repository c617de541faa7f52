//! Agent registry
//!
//! An immutable snapshot of every known agent. Reloading builds a new
//! registry; in-flight queries keep the snapshot they started with.

use super::descriptor::{AgentDescriptor, AgentId};
use crate::core::error::DomainError;
use std::collections::HashSet;

/// Immutable set of known agents, in configuration order
#[derive(Debug, Clone, Default)]
pub struct AgentRegistry {
    agents: Vec<AgentDescriptor>,
}

impl AgentRegistry {
    /// Build a registry, rejecting duplicate or empty ids
    pub fn new(agents: Vec<AgentDescriptor>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for agent in &agents {
            if agent.id.as_str().trim().is_empty() {
                return Err(DomainError::InvalidConfig(
                    "agent id cannot be empty".to_string(),
                ));
            }
            if !seen.insert(agent.id.clone()) {
                return Err(DomainError::InvalidConfig(format!(
                    "duplicate agent id: {}",
                    agent.id
                )));
            }
        }
        Ok(Self { agents })
    }

    pub fn all(&self) -> &[AgentDescriptor] {
        &self.agents
    }

    pub fn enabled(&self) -> impl Iterator<Item = &AgentDescriptor> {
        self.agents.iter().filter(|a| a.enabled)
    }

    pub fn get(&self, id: &AgentId) -> Option<&AgentDescriptor> {
        self.agents.iter().find(|a| &a.id == id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Resolve the fan-out subset for a request.
    ///
    /// - `agent_ids` restricts to the named agents; naming an unknown agent is
    ///   an invalid request, naming a disabled one silently drops it.
    /// - `max_agents` caps the subset when `agent_ids` is absent, keeping
    ///   the agents with the highest `base_weight` (registry order on ties).
    /// - The result keeps registry order and is never empty.
    pub fn resolve(
        &self,
        agent_ids: Option<&[AgentId]>,
        max_agents: Option<usize>,
    ) -> Result<Vec<AgentDescriptor>, DomainError> {
        let selected: Vec<AgentDescriptor> = match agent_ids {
            Some(ids) => {
                if let Some(unknown) = ids.iter().find(|id| self.get(id).is_none()) {
                    return Err(DomainError::InvalidRequest(format!(
                        "unknown agent id: {}",
                        unknown
                    )));
                }
                self.enabled()
                    .filter(|a| ids.contains(&a.id))
                    .cloned()
                    .collect()
            }
            None => {
                let mut enabled: Vec<(usize, &AgentDescriptor)> =
                    self.enabled().enumerate().collect();
                if let Some(cap) = max_agents
                    && cap < enabled.len()
                {
                    // Stable sort, so equal weights keep registry order
                    enabled.sort_by(|(_, a), (_, b)| b.base_weight.total_cmp(&a.base_weight));
                    enabled.truncate(cap);
                    enabled.sort_by_key(|(position, _)| *position);
                }
                enabled.into_iter().map(|(_, a)| a.clone()).collect()
            }
        };

        if selected.is_empty() {
            return Err(DomainError::NoAgentsAvailable);
        }
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> AgentRegistry {
        AgentRegistry::new(vec![
            AgentDescriptor::new("a", "h", 1, "m1"),
            AgentDescriptor::new("b", "h", 2, "m2").disabled(),
            AgentDescriptor::new("c", "h", 3, "m3"),
            AgentDescriptor::new("d", "h", 4, "m4"),
        ])
        .unwrap()
    }

    fn ids(agents: &[AgentDescriptor]) -> Vec<&str> {
        agents.iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = AgentRegistry::new(vec![
            AgentDescriptor::new("a", "h", 1, "m"),
            AgentDescriptor::new("a", "h", 2, "m"),
        ]);
        assert!(matches!(result, Err(DomainError::InvalidConfig(_))));
    }

    #[test]
    fn test_resolve_all_enabled() {
        let resolved = registry().resolve(None, None).unwrap();
        assert_eq!(ids(&resolved), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_resolve_with_cap() {
        let resolved = registry().resolve(None, Some(2)).unwrap();
        assert_eq!(ids(&resolved), vec!["a", "c"]);
    }

    #[test]
    fn test_resolve_cap_prefers_heavier_agents() {
        let registry = AgentRegistry::new(vec![
            AgentDescriptor::new("a", "h", 1, "m"),
            AgentDescriptor::new("b", "h", 2, "m").with_base_weight(3.0),
            AgentDescriptor::new("c", "h", 3, "m").with_base_weight(0.5),
            AgentDescriptor::new("d", "h", 4, "m").with_base_weight(2.0),
            AgentDescriptor::new("e", "h", 5, "m").with_base_weight(4.0).disabled(),
        ])
        .unwrap();
        let resolved = registry.resolve(None, Some(2)).unwrap();
        assert_eq!(ids(&resolved), vec!["b", "d"]);

        let resolved = registry.resolve(None, Some(3)).unwrap();
        assert_eq!(ids(&resolved), vec!["a", "b", "d"]);
    }

    #[test]
    fn test_resolve_subset_keeps_registry_order() {
        let wanted = [AgentId::from("d"), AgentId::from("a")];
        let resolved = registry().resolve(Some(&wanted), Some(1)).unwrap();
        assert_eq!(ids(&resolved), vec!["a", "d"]);
    }

    #[test]
    fn test_resolve_only_disabled_is_no_agents() {
        let wanted = [AgentId::from("b")];
        assert_eq!(
            registry().resolve(Some(&wanted), None).unwrap_err(),
            DomainError::NoAgentsAvailable
        );
    }

    #[test]
    fn test_resolve_unknown_id_is_invalid() {
        let wanted = [AgentId::from("zz")];
        assert!(matches!(
            registry().resolve(Some(&wanted), None),
            Err(DomainError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_resolve_empty_registry() {
        let empty = AgentRegistry::default();
        assert_eq!(
            empty.resolve(None, None).unwrap_err(),
            DomainError::NoAgentsAvailable
        );
    }
}
