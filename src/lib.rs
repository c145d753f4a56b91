// Library exports for the AgriYield advisory core

pub mod advisor;
pub mod analytics;
pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod history;
pub mod prompt;
pub mod schema;
pub mod storage;
pub mod types;
pub mod validate;

// Re-export the surface the binary and integration tests build on
pub use advisor::YieldAdvisor;
pub use analytics::{avg_yield_by_crop, CropYieldSummary};
pub use api::{GeminiClient, GenerationRequest, GenerativeBackend, HistoryTurn, TurnRole};
pub use chat::ChatTranscript;
pub use config::{AiConfig, Config};
pub use error::{AdvisorError, AdvisorResult};
pub use history::HistoryStore;
pub use storage::{BlobStore, FileStore, MemoryStore};
pub use types::*;
