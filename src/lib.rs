//! Kerala Classifieds
//!
//! A regional classifieds marketplace built on a hosted Supabase backend:
//! users browse categorized listings, authenticate, post ads with images,
//! and manage favorites from a dashboard. All persistence, authentication,
//! and file storage belong to the backend; this crate holds the form
//! validation, the query construction, and the calls into the backend's
//! REST surfaces.

pub mod ads;
pub mod auth;
pub mod config;
pub mod error;
pub mod favorites;
pub mod fetch;
pub mod forms;
pub mod listings;
pub mod models;
pub mod postgrest;
pub mod storage;

use reqwest::Client;

use crate::ads::Ads;
use crate::auth::Auth;
use crate::config::{ClientOptions, Config};
use crate::error::Error;
use crate::favorites::Favorites;
use crate::listings::Listings;
use crate::postgrest::PostgrestClient;
use crate::storage::StorageClient;

/// Client identification header sent with every request
pub(crate) const CLIENT_INFO: &str = "kerala-classifieds/0.2.0";

/// The main entry point for the marketplace
pub struct Marketplace {
    /// The base URL for the backend project
    pub url: String,
    /// The anonymous API key for the backend project
    pub key: String,
    /// HTTP client used for requests
    pub http_client: Client,
    /// Auth client for user management and authentication
    pub auth: Auth,
    /// Client options
    pub options: ClientOptions,
}

impl Marketplace {
    /// Create a new marketplace client
    ///
    /// # Example
    ///
    /// ```
    /// use kerala_classifieds::Marketplace;
    ///
    /// let app = Marketplace::new("https://your-project.supabase.co", "your-anon-key");
    /// ```
    pub fn new(url: &str, key: &str) -> Self {
        Self::new_with_options(url, key, ClientOptions::default())
    }

    /// Create a new marketplace client with custom options
    pub fn new_with_options(url: &str, key: &str, options: ClientOptions) -> Self {
        let http_client = match options.request_timeout {
            Some(timeout) => Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            None => Client::new(),
        };

        let url = url.trim_end_matches('/');
        let auth = Auth::new(url, key, http_client.clone());

        Self {
            url: url.to_string(),
            key: key.to_string(),
            http_client,
            auth,
            options,
        }
    }

    /// Create a client from the `SUPABASE_URL` and `SUPABASE_ANON_KEY`
    /// environment variables. Missing variables are a fatal startup
    /// condition.
    pub fn from_env() -> Result<Self, Error> {
        let config = Config::from_env()?;
        Ok(Self::new(config.url.as_str(), &config.anon_key))
    }

    /// The auth client for user management and authentication
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// A PostgREST client for operations on a specific table
    ///
    /// # Example
    ///
    /// ```
    /// use kerala_classifieds::Marketplace;
    ///
    /// let app = Marketplace::new("https://your-project.supabase.co", "your-anon-key");
    /// let query = app.from("categories");
    /// ```
    pub fn from(&self, table: &str) -> PostgrestClient {
        PostgrestClient::new(&self.url, &self.key, table, self.http_client.clone())
    }

    /// The storage client for file operations
    pub fn storage(&self) -> StorageClient {
        StorageClient::new(&self.url, &self.key, self.http_client.clone())
    }

    /// Listing search and the category/location lookups
    pub fn listings(&self) -> Listings<'_> {
        Listings::new(self)
    }

    /// Favorite operations
    pub fn favorites(&self) -> Favorites<'_> {
        Favorites::new(self)
    }

    /// Operations on the user's own ads
    pub fn ads(&self) -> Ads<'_> {
        Ads::new(self)
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::ads::ImageUpload;
    pub use crate::auth::Session;
    pub use crate::error::Error;
    pub use crate::forms::{AdForm, SignInForm, SignUpForm};
    pub use crate::listings::{ListingQuery, SortKey};
    pub use crate::Marketplace;
}
