//! Database operations through the PostgREST API

mod filter;
mod query;
mod types;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Error;

pub use filter::*;
pub use query::*;
pub use types::*;

/// Client for database operations on a single table
pub struct PostgrestClient {
    /// The base URL for the backend project
    url: String,

    /// The anonymous API key
    key: String,

    /// The table or view name
    table: String,

    /// HTTP client
    client: Client,
}

impl PostgrestClient {
    /// Create a new PostgrestClient
    pub(crate) fn new(url: &str, key: &str, table: &str, client: Client) -> Self {
        Self {
            url: url.to_string(),
            key: key.to_string(),
            table: table.to_string(),
            client,
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.url, self.table)
    }

    /// Select specific columns from the table; embedded resources are
    /// expressed in the column list (`*,categories(name,slug)`)
    pub fn select(&self, columns: &str) -> SelectBuilder {
        SelectBuilder::new(self.table_url(), self.key.clone(), columns, self.client.clone())
    }

    /// Insert a row into the table
    pub fn insert<T: Serialize>(&self, values: T) -> InsertBuilder<T> {
        InsertBuilder::new(self.table_url(), self.key.clone(), values, self.client.clone())
    }

    /// Insert a row, merging with an existing one on conflict
    pub fn upsert<T: Serialize>(&self, values: T) -> UpsertBuilder<T> {
        UpsertBuilder::new(self.table_url(), self.key.clone(), values, self.client.clone())
    }

    /// Delete rows matching the filters added to the builder
    pub fn delete(&self) -> DeleteBuilder {
        DeleteBuilder::new(self.table_url(), self.key.clone(), self.client.clone())
    }
}

/// Parse a PostgREST response body, mapping failures to [`Error::Database`]
/// with the backend-provided message.
pub(crate) async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await?;
        return Err(Error::database(error_message(status, &body)));
    }
    Ok(response.json::<T>().await?)
}

/// Check a PostgREST response for success, discarding the body
pub(crate) async fn check_response(response: Response) -> Result<(), Error> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await?;
        return Err(Error::database(error_message(status, &body)));
    }
    Ok(())
}

fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<PostgrestErrorBody>(body) {
        Ok(parsed) if !parsed.message.is_empty() => parsed.message,
        _ => format!("request failed with status {}: {}", status, body),
    }
}
