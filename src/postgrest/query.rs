//! Request builders for the PostgREST client

use std::collections::HashMap;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Error;
use crate::fetch::{Fetch, FetchBuilder};
use crate::postgrest::{check_response, parse_response, FilterOperator, ReturnOption};
use crate::CLIENT_INFO;

/// Accumulates the query string of a request
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    params: HashMap<String, String>,
}

impl QueryBuilder {
    /// Create a new QueryBuilder
    pub fn new() -> Self {
        Self {
            params: HashMap::new(),
        }
    }

    /// Set a parameter, replacing any existing value
    pub fn set_param(&mut self, key: &str, value: &str) {
        self.params.insert(key.to_string(), value.to_string());
    }

    /// Append to a comma-separated parameter such as `order`
    pub fn push_param(&mut self, key: &str, value: &str) {
        self.params
            .entry(key.to_string())
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    /// Get the query parameters
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }
}

/// Builder for SELECT queries
pub struct SelectBuilder {
    url: String,
    key: String,
    client: Client,
    query: QueryBuilder,
    token: Option<String>,
}

impl SelectBuilder {
    /// Create a new SelectBuilder
    pub fn new(url: String, key: String, columns: &str, client: Client) -> Self {
        let mut query = QueryBuilder::new();
        query.set_param("select", columns);

        Self {
            url,
            key,
            client,
            query,
            token: None,
        }
    }

    /// Attach a user's access token so row-level security sees the caller
    pub fn auth(&mut self, token: &str) -> &mut Self {
        self.token = Some(token.to_string());
        self
    }

    /// Filter rows by comparing a column against a value
    pub fn filter<T: ToString>(&mut self, column: &str, op: FilterOperator, value: T) -> &mut Self {
        self.query
            .set_param(column, &format!("{}.{}", op.as_str(), value.to_string()));
        self
    }

    /// Filter rows where column equals a value
    pub fn eq<T: ToString>(&mut self, column: &str, value: T) -> &mut Self {
        self.filter(column, FilterOperator::Eq, value)
    }

    /// Filter rows where column matches a pattern, case insensitively
    pub fn ilike(&mut self, column: &str, pattern: &str) -> &mut Self {
        self.filter(column, FilterOperator::ILike, pattern)
    }

    /// Match rows satisfying any of the comma-separated filter clauses
    pub fn or(&mut self, filters: &str) -> &mut Self {
        self.query.set_param("or", &format!("({})", filters));
        self
    }

    /// Order the results by a column; repeated calls add secondary sort keys
    pub fn order(&mut self, column: &str, ascending: bool) -> &mut Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.query
            .push_param("order", &format!("{}.{}", column, direction));
        self
    }

    /// Limit the number of rows returned
    pub fn limit(&mut self, count: i32) -> &mut Self {
        self.query.set_param("limit", &count.to_string());
        self
    }

    /// Query parameters accumulated so far
    pub fn query_params(&self) -> &HashMap<String, String> {
        self.query.params()
    }

    fn request(&self) -> FetchBuilder<'_> {
        let mut fetch = Fetch::get(&self.client, &self.url)
            .header("apikey", &self.key)
            .header("X-Client-Info", CLIENT_INFO);
        if let Some(token) = &self.token {
            fetch = fetch.bearer_auth(token);
        }
        fetch.query(self.query.params().clone())
    }

    /// Execute the query and return the matching rows
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<Vec<T>, Error> {
        parse_response(self.request().send().await?).await
    }

    /// Execute the query and return the first matching row
    pub async fn execute_one<T: DeserializeOwned>(&mut self) -> Result<Option<T>, Error> {
        self.limit(1);
        let rows = self.execute::<T>().await?;
        Ok(rows.into_iter().next())
    }
}

/// Builder for INSERT queries
pub struct InsertBuilder<T: Serialize> {
    url: String,
    key: String,
    values: T,
    client: Client,
    token: Option<String>,
}

impl<T: Serialize> InsertBuilder<T> {
    /// Create a new InsertBuilder
    pub fn new(url: String, key: String, values: T, client: Client) -> Self {
        Self {
            url,
            key,
            values,
            client,
            token: None,
        }
    }

    /// Attach a user's access token
    pub fn auth(&mut self, token: &str) -> &mut Self {
        self.token = Some(token.to_string());
        self
    }

    fn request(&self, returning: ReturnOption) -> Result<FetchBuilder<'_>, Error> {
        let mut fetch = Fetch::post(&self.client, &self.url)
            .header("apikey", &self.key)
            .header("X-Client-Info", CLIENT_INFO)
            .header("Prefer", &returning.prefer());
        if let Some(token) = &self.token {
            fetch = fetch.bearer_auth(token);
        }
        fetch.json(&self.values)
    }

    /// Execute the insert and return the inserted rows
    pub async fn execute<R: DeserializeOwned>(&self) -> Result<R, Error> {
        let fetch = self.request(ReturnOption::Representation)?;
        parse_response(fetch.send().await?).await
    }

    /// Execute the insert without returning the inserted data
    pub async fn execute_no_return(&self) -> Result<(), Error> {
        let fetch = self.request(ReturnOption::Minimal)?;
        check_response(fetch.send().await?).await
    }
}

/// Builder for UPSERT queries (insert, merging with an existing row on
/// conflict)
pub struct UpsertBuilder<T: Serialize> {
    url: String,
    key: String,
    values: T,
    client: Client,
    token: Option<String>,
    on_conflict: Option<String>,
}

impl<T: Serialize> UpsertBuilder<T> {
    /// Create a new UpsertBuilder
    pub fn new(url: String, key: String, values: T, client: Client) -> Self {
        Self {
            url,
            key,
            values,
            client,
            token: None,
            on_conflict: None,
        }
    }

    /// Attach a user's access token
    pub fn auth(&mut self, token: &str) -> &mut Self {
        self.token = Some(token.to_string());
        self
    }

    /// Specify the column(s) whose uniqueness constraint resolves conflicts
    pub fn on_conflict(&mut self, columns: &str) -> &mut Self {
        self.on_conflict = Some(columns.to_string());
        self
    }

    fn request(&self, returning: ReturnOption) -> Result<FetchBuilder<'_>, Error> {
        let mut query = QueryBuilder::new();
        if let Some(columns) = &self.on_conflict {
            query.set_param("on_conflict", columns);
        }

        let mut fetch = Fetch::post(&self.client, &self.url)
            .header("apikey", &self.key)
            .header("X-Client-Info", CLIENT_INFO)
            .header(
                "Prefer",
                &format!("resolution=merge-duplicates,{}", returning.prefer()),
            )
            .query(query.params().clone());
        if let Some(token) = &self.token {
            fetch = fetch.bearer_auth(token);
        }
        fetch.json(&self.values)
    }

    /// Execute the upsert and return the resulting rows
    pub async fn execute<R: DeserializeOwned>(&self) -> Result<R, Error> {
        let fetch = self.request(ReturnOption::Representation)?;
        parse_response(fetch.send().await?).await
    }

    /// Execute the upsert without returning the resulting data
    pub async fn execute_no_return(&self) -> Result<(), Error> {
        let fetch = self.request(ReturnOption::Minimal)?;
        check_response(fetch.send().await?).await
    }
}

/// Builder for DELETE queries
pub struct DeleteBuilder {
    url: String,
    key: String,
    client: Client,
    query: QueryBuilder,
    token: Option<String>,
}

impl DeleteBuilder {
    /// Create a new DeleteBuilder
    pub fn new(url: String, key: String, client: Client) -> Self {
        Self {
            url,
            key,
            client,
            query: QueryBuilder::new(),
            token: None,
        }
    }

    /// Attach a user's access token
    pub fn auth(&mut self, token: &str) -> &mut Self {
        self.token = Some(token.to_string());
        self
    }

    /// Restrict the delete by comparing a column against a value
    pub fn filter<T: ToString>(&mut self, column: &str, op: FilterOperator, value: T) -> &mut Self {
        self.query
            .set_param(column, &format!("{}.{}", op.as_str(), value.to_string()));
        self
    }

    /// Restrict the delete to rows where column equals a value
    pub fn eq<T: ToString>(&mut self, column: &str, value: T) -> &mut Self {
        self.filter(column, FilterOperator::Eq, value)
    }

    fn request(&self, returning: ReturnOption) -> FetchBuilder<'_> {
        let mut fetch = Fetch::delete(&self.client, &self.url)
            .header("apikey", &self.key)
            .header("X-Client-Info", CLIENT_INFO)
            .header("Prefer", &returning.prefer());
        if let Some(token) = &self.token {
            fetch = fetch.bearer_auth(token);
        }
        fetch.query(self.query.params().clone())
    }

    /// Execute the delete and return the deleted rows.
    ///
    /// An empty result means no row matched the predicate, which callers use
    /// as an existence check.
    pub async fn execute<R: DeserializeOwned>(&self) -> Result<R, Error> {
        let fetch = self.request(ReturnOption::Representation);
        parse_response(fetch.send().await?).await
    }

    /// Execute the delete without returning the deleted data
    pub async fn execute_no_return(&self) -> Result<(), Error> {
        let fetch = self.request(ReturnOption::Minimal);
        check_response(fetch.send().await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> SelectBuilder {
        SelectBuilder::new(
            "http://localhost/rest/v1/ads".to_string(),
            "anon-key".to_string(),
            "*",
            Client::new(),
        )
    }

    #[test]
    fn filters_render_operator_prefixes() {
        let mut select = builder();
        select
            .eq("status", "approved")
            .filter("price", FilterOperator::Gte, 100)
            .ilike("title", "%bicycle%");

        let params = select.query_params();
        assert_eq!(params.get("status").map(String::as_str), Some("eq.approved"));
        assert_eq!(params.get("price").map(String::as_str), Some("gte.100"));
        assert_eq!(
            params.get("title").map(String::as_str),
            Some("ilike.%bicycle%")
        );
    }

    #[test]
    fn repeated_order_calls_accumulate() {
        let mut select = builder();
        select.order("price", true).order("id", true);

        assert_eq!(
            select.query_params().get("order").map(String::as_str),
            Some("price.asc,id.asc")
        );
    }

    #[test]
    fn or_wraps_clauses_in_parentheses() {
        let mut select = builder();
        select.or("title.ilike.%x%,description.ilike.%x%");

        assert_eq!(
            select.query_params().get("or").map(String::as_str),
            Some("(title.ilike.%x%,description.ilike.%x%)")
        );
    }
}
