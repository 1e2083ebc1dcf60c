//! Error types for CreamCrafter.

/// Top-level error type for the app.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}

/// Input validation errors, caught before any network call.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Ingredient text is required")]
    MissingIngredients,
}

/// Failures from the recipe generation endpoint.
///
/// The user-facing surface collapses all of these into a single generic
/// message; the variants exist so the distinction survives in logs.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Request to generation endpoint failed: {reason}")]
    RequestFailed { reason: String },

    #[error("Generation endpoint returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Generation endpoint returned an empty text payload")]
    EmptyResponse,

    #[error("Malformed response from generation endpoint: {reason}")]
    MalformedResponse { reason: String },
}

/// Local persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for the app.
pub type Result<T> = std::result::Result<T, Error>;
