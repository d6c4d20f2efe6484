use thiserror::Error;

#[derive(Debug, Error)]
pub enum SousError {
    #[error("not initialized: run 'sous init'")]
    NotInitialized,

    #[error("recipe not found: {0}")]
    RecipeNotFound(String),

    #[error("recipe already exists: {0}")]
    RecipeExists(String),

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error("invalid phase: {0}")]
    InvalidPhase(String),

    #[error("invalid transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error("recipe '{0}' has no steps; cannot start cooking")]
    NoSteps(String),

    #[error("timer not found: {0}")]
    TimerNotFound(String),

    #[error("session store error: {0}")]
    Store(String),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SousError>;
