pub mod api;
pub mod chunk;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod llm;
pub mod normalize;
pub mod pipeline;
pub mod readability;
pub mod summarize;
pub mod validate;

use std::sync::Arc;

use config::Config;
use pipeline::Pipeline;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: Arc<Pipeline>,
}
