//! Configuration for the marketplace client

use std::time::Duration;

use url::Url;

use crate::error::Error;

/// Names of the required environment variables
pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";

/// Connection settings for the hosted backend.
///
/// Both values are required; a missing variable is a fatal startup
/// condition, matching how the application refuses to boot without them.
#[derive(Debug, Clone)]
pub struct Config {
    /// The base URL of the backend project
    pub url: Url,

    /// The anonymous (public) API key
    pub anon_key: String,
}

impl Config {
    /// Create a new configuration, validating the URL
    pub fn new(url: &str, anon_key: &str) -> Result<Self, Error> {
        let url = Url::parse(url)?;
        if anon_key.is_empty() {
            return Err(Error::config("anon key cannot be empty"));
        }
        Ok(Self {
            url,
            anon_key: anon_key.to_string(),
        })
    }

    /// Load the configuration from the environment
    pub fn from_env() -> Result<Self, Error> {
        let url = std::env::var(ENV_SUPABASE_URL)
            .map_err(|_| Error::config(format!("{} is not set", ENV_SUPABASE_URL)))?;
        let anon_key = std::env::var(ENV_SUPABASE_ANON_KEY)
            .map_err(|_| Error::config(format!("{} is not set", ENV_SUPABASE_ANON_KEY)))?;
        Self::new(&url, &anon_key)
    }
}

/// Tuning options for the marketplace client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout applied to the shared HTTP client; `None` keeps the
    /// client's own default
    pub request_timeout: Option<Duration>,

    /// The database schema queried through PostgREST
    pub db_schema: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: None,
            db_schema: "public".to_string(),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the database schema
    pub fn with_db_schema(mut self, value: &str) -> Self {
        self.db_schema = value.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_anon_key() {
        let result = Config::new("https://project.supabase.co", "");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn rejects_malformed_url() {
        let result = Config::new("not a url", "anon-key");
        assert!(matches!(result, Err(Error::Url(_))));
    }
}
