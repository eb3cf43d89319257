use std::sync::Arc;

use crate::llm_client::LlmClient;
use crate::report::scorer::ComplianceScorer;
use crate::storage::AssessmentStore;

/// Shared application state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub store: AssessmentStore,
    pub scorer: Arc<dyn ComplianceScorer>,
}

impl AppState {
    pub fn new(llm: LlmClient, store: AssessmentStore, scorer: Arc<dyn ComplianceScorer>) -> Self {
        Self { llm, store, scorer }
    }
}
