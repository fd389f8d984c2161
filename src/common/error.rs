use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// Listing call failed or returned something other than a listing.
    #[error("Listing request for '{path}' failed: {message}")]
    Transport { path: String, message: String },

    #[error("Invalid input catalog: {0}")]
    InputShape(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    pub fn transport(path: &str, message: impl Into<String>) -> Self {
        CatalogError::Transport {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
