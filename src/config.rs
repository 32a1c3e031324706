//! Application configuration constants.
//!
//! This module centralizes all configurable values: database location,
//! server binding, grading defaults, and the assistant endpoint settings.

use serde::Deserialize;
use std::path::PathBuf;

// ==================== Database Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct AppConfig {
    database: Option<DatabaseConfig>,
    assistant: Option<AssistantSection>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AssistantSection {
    base_url: Option<String>,
    model: Option<String>,
}

/// Load database path with priority: config.toml > .env > default
pub fn load_database_path() -> PathBuf {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Priority 1: config.toml
    if let Ok(contents) = std::fs::read_to_string("config.toml") {
        if let Ok(config) = toml::from_str::<AppConfig>(&contents) {
            if let Some(db) = config.database {
                if let Some(path) = db.path {
                    tracing::info!("Using database from config.toml: {}", path);
                    return PathBuf::from(path);
                }
            }
        }
    }

    // Priority 2: .env DATABASE_PATH
    if let Ok(path) = std::env::var("DATABASE_PATH") {
        tracing::info!("Using database from DATABASE_PATH env: {}", path);
        return PathBuf::from(path);
    }

    // Default
    let default = PathBuf::from("data/coursebook.db");
    tracing::info!("Using default database path: {}", default.display());
    default
}

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "0.0.0.0";

/// Server port
pub const SERVER_PORT: u16 = 3000;

/// Get the full server bind address
pub fn server_bind_addr() -> String {
    format!("{}:{}", SERVER_ADDR, SERVER_PORT)
}

// ==================== Grading Configuration ====================

/// Passing threshold (percent of max score) applied when a quiz author
/// does not set one
pub const DEFAULT_PASSING_SCORE: u32 = 70;

/// Points assigned to a question when the author omits a weight
pub const DEFAULT_QUESTION_POINTS: f64 = 1.0;

// ==================== Assistant Configuration ====================

/// Settings for the chat-completion endpoint backing the teaching
/// assistant. The provider is external; the feature stays disabled until
/// an API key is configured.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

/// Endpoint used when none is configured
pub const ASSISTANT_DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Model used when none is configured
pub const ASSISTANT_DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Request timeout for assistant calls in seconds
pub const ASSISTANT_TIMEOUT_SECS: u64 = 60;

/// Response token cap for assistant calls
pub const ASSISTANT_MAX_TOKENS: u32 = 2048;

/// Upper bound on questions in a generated quiz draft
pub const ASSISTANT_MAX_DRAFT_QUESTIONS: usize = 10;

/// Load assistant settings with priority: config.toml > .env > defaults.
/// Returns None when no API key is present, which disables the feature.
pub fn load_assistant_config() -> Option<AssistantConfig> {
    let _ = dotenvy::dotenv();

    let api_key = std::env::var("ASSISTANT_API_KEY").ok()?;
    if api_key.trim().is_empty() {
        return None;
    }

    let mut base_url = None;
    let mut model = None;
    if let Ok(contents) = std::fs::read_to_string("config.toml") {
        if let Ok(config) = toml::from_str::<AppConfig>(&contents) {
            if let Some(section) = config.assistant {
                base_url = section.base_url;
                model = section.model;
            }
        }
    }

    Some(AssistantConfig {
        base_url: base_url
            .or_else(|| std::env::var("ASSISTANT_BASE_URL").ok())
            .unwrap_or_else(|| ASSISTANT_DEFAULT_BASE_URL.to_string()),
        api_key,
        model: model
            .or_else(|| std::env::var("ASSISTANT_MODEL").ok())
            .unwrap_or_else(|| ASSISTANT_DEFAULT_MODEL.to_string()),
    })
}

// ==================== Query Limits ====================

/// Default limit for notification listings
pub const NOTIFICATIONS_LIMIT: i64 = 50;

/// Default limit for quiz attempt history
pub const ATTEMPTS_LIMIT: i64 = 50;
