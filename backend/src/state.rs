//! Shared application state handed to every request handler.
//!
//! The managers are the wizard's external collaborators. They are held as
//! trait objects behind `Arc` so the state is cheap to clone into blocking
//! tasks and can be swapped for in-memory implementations in tests.

use crate::managers::{DataSchemaManager, ResourceManager, SourceManager};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Installed data schemas, loaded at start-up.
    pub schemas: Arc<dyn DataSchemaManager>,
    /// Reads preview rows and column names from resource sources.
    pub sources: Arc<dyn SourceManager>,
    /// Loads and persists whole resource configurations.
    pub resources: Arc<dyn ResourceManager>,
}

impl AppState {
    pub fn new(
        schemas: Arc<dyn DataSchemaManager>,
        sources: Arc<dyn SourceManager>,
        resources: Arc<dyn ResourceManager>,
    ) -> Self {
        Self {
            schemas,
            sources,
            resources,
        }
    }
}
