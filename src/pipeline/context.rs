use std::sync::Arc;

use super::types::GenerativeClient;
use crate::config::{DispatchConfig, ModelConfig};

/// Handle threaded through every pipeline call: the client plus the
/// settings that govern how it is used. Cheap to clone.
#[derive(Clone)]
pub struct AuditContext {
    pub client: Arc<dyn GenerativeClient>,
    pub dispatch: DispatchConfig,
    pub models: ModelConfig,
}

impl AuditContext {
    pub fn new(client: Arc<dyn GenerativeClient>) -> Self {
        Self {
            client,
            dispatch: DispatchConfig::default(),
            models: ModelConfig::default(),
        }
    }

    pub fn with_dispatch(mut self, dispatch: DispatchConfig) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn with_models(mut self, models: ModelConfig) -> Self {
        self.models = models;
        self
    }
}

impl std::fmt::Debug for AuditContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditContext")
            .field("dispatch", &self.dispatch)
            .field("models", &self.models)
            .finish_non_exhaustive()
    }
}
