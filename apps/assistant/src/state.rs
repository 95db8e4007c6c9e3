use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ChatModel;
use crate::weather::WeatherLookup;

/// Collaborators wired once at startup and handed to the dialogue engine.
#[derive(Clone)]
pub struct AppState {
    /// Streaming model used for generic replies and career reports.
    pub llm: Arc<dyn ChatModel>,
    pub weather: Arc<dyn WeatherLookup>,
    pub config: Config,
}
