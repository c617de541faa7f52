//! Shared state handed to every route

use quorum_application::{
    AgentGateway, FeedbackUseCase, HealthUseCase, RegistryHandle, ReloadAgentsUseCase,
    RunQueryUseCase,
};
use quorum_domain::WeightStore;
use std::sync::Arc;

/// Use cases and shared stores behind the HTTP surface
pub struct AppState<G: AgentGateway + 'static> {
    pub run_query: Arc<RunQueryUseCase<G>>,
    pub health: Arc<HealthUseCase<G>>,
    pub feedback: Arc<FeedbackUseCase>,
    pub reload: Arc<ReloadAgentsUseCase>,
    pub registry: Arc<RegistryHandle>,
    pub weights: Arc<WeightStore>,
}

// Derived Clone would require `G: Clone`
impl<G: AgentGateway + 'static> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            run_query: Arc::clone(&self.run_query),
            health: Arc::clone(&self.health),
            feedback: Arc::clone(&self.feedback),
            reload: Arc::clone(&self.reload),
            registry: Arc::clone(&self.registry),
            weights: Arc::clone(&self.weights),
        }
    }
}
