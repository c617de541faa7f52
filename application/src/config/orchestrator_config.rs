//! Orchestrator configuration

use super::dispatch_params::DispatchParams;
use quorum_domain::{TopicTaxonomy, VotingStrategy};

/// Everything the query use case needs besides its ports.
///
/// Built by the CLI from the loaded file configuration.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub dispatch: DispatchParams,
    /// Strategy applied to the revised debate answers
    pub debate_final: VotingStrategy,
    /// Added to the request seed for the debate round
    pub round2_seed_offset: u64,
    /// Update per-agent consensus rates after each query
    pub track_consensus: bool,
    pub taxonomy: TopicTaxonomy,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            dispatch: DispatchParams::default(),
            debate_final: VotingStrategy::Majority,
            round2_seed_offset: 7,
            track_consensus: true,
            taxonomy: TopicTaxonomy::default(),
        }
    }
}

impl OrchestratorConfig {
    pub fn with_dispatch(mut self, dispatch: DispatchParams) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn with_debate_final(mut self, strategy: VotingStrategy) -> Self {
        self.debate_final = strategy;
        self
    }

    pub fn with_track_consensus(mut self, track: bool) -> Self {
        self.track_consensus = track;
        self
    }

    pub fn with_taxonomy(mut self, taxonomy: TopicTaxonomy) -> Self {
        self.taxonomy = taxonomy;
        self
    }
}
