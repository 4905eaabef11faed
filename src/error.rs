//! Error handling for the marketplace client

use std::fmt;
use thiserror::Error;

/// Unified error type for the marketplace client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Missing or malformed startup configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Authentication errors
    #[error("authentication error: {0}")]
    Auth(String),

    /// Database query errors
    #[error("database error: {0}")]
    Database(String),

    /// Storage errors
    #[error("storage error: {0}")]
    Storage(String),

    /// Form field validation errors, caught before any network call
    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// An operation that requires a signed-in user was called without one
    #[error("you need to be signed in to {0}")]
    SignInRequired(&'static str),

    /// More images attached than an ad allows
    #[error("you can upload a maximum of {0} images")]
    TooManyImages(usize),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new database error
    pub fn database<T: fmt::Display>(msg: T) -> Self {
        Error::Database(msg.to_string())
    }

    /// Create a new storage error
    pub fn storage<T: fmt::Display>(msg: T) -> Self {
        Error::Storage(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }
}
