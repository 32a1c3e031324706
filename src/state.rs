//! Application state shared by all handlers.

use std::sync::Arc;

use crate::assistant::AssistantClient;
use crate::db::DbPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,

    /// Teaching assistant client, None when no API key is configured.
    /// Assistant routes answer 503 in that case; everything else works.
    pub assistant: Option<Arc<AssistantClient>>,
}

impl AppState {
    pub fn new(pool: DbPool, assistant: Option<AssistantClient>) -> Self {
        Self {
            pool,
            assistant: assistant.map(Arc::new),
        }
    }
}
