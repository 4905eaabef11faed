//! Object storage operations for ad images

mod types;

use reqwest::{multipart, Client};
use serde_json::json;

use crate::error::Error;
use crate::fetch::Fetch;
use crate::CLIENT_INFO;

pub use types::*;

/// Client for the backend's object storage
pub struct StorageClient {
    /// The base URL for the backend project
    url: String,

    /// The anonymous API key
    key: String,

    /// HTTP client used for requests
    client: Client,

    /// Access token of the acting user, when uploads run under row-level
    /// security
    token: Option<String>,
}

/// Client for a specific storage bucket
pub struct BucketClient<'a> {
    storage: &'a StorageClient,
    bucket_id: String,
}

impl StorageClient {
    /// Create a new StorageClient
    pub(crate) fn new(url: &str, key: &str, client: Client) -> Self {
        Self {
            url: url.to_string(),
            key: key.to_string(),
            client,
            token: None,
        }
    }

    /// Attach a user's access token to subsequent operations
    pub fn with_auth(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1{}", self.url, path)
    }

    /// Get a client for a specific bucket
    pub fn from(&self, bucket_id: &str) -> BucketClient<'_> {
        BucketClient {
            storage: self,
            bucket_id: bucket_id.to_string(),
        }
    }
}

impl<'a> BucketClient<'a> {
    /// Upload a file to the bucket and return the stored object
    pub async fn upload(
        &self,
        path: &str,
        data: Vec<u8>,
        options: FileOptions,
    ) -> Result<FileObject, Error> {
        let url = self
            .storage
            .object_url(&format!("/object/{}/{}", self.bucket_id, path));

        let file_name = path
            .rsplit('/')
            .next()
            .unwrap_or("file")
            .to_string();
        let mut part = multipart::Part::bytes(data).file_name(file_name);
        if let Some(content_type) = &options.content_type {
            part = part.mime_str(content_type)?;
        }
        let form = multipart::Form::new().part("file", part);

        let mut request = self
            .storage
            .client
            .post(&url)
            .header("apikey", &self.storage.key)
            .header("X-Client-Info", CLIENT_INFO)
            .header(
                "Cache-Control",
                options.cache_control.as_deref().unwrap_or("3600"),
            )
            .header("x-upsert", options.upsert.to_string());
        if let Some(token) = &self.storage.token {
            request = request.bearer_auth(token);
        }

        let response = request.multipart(form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            return Err(Error::storage(format!(
                "upload failed with status {}: {}",
                status, body
            )));
        }

        Ok(response.json::<FileObject>().await?)
    }

    /// Delete objects from the bucket
    pub async fn remove(&self, paths: &[String]) -> Result<(), Error> {
        let url = self.storage.object_url(&format!("/object/{}", self.bucket_id));

        let body = json!({ "prefixes": paths });

        let mut fetch = Fetch::delete(&self.storage.client, &url)
            .header("apikey", &self.storage.key)
            .header("X-Client-Info", CLIENT_INFO);
        if let Some(token) = &self.storage.token {
            fetch = fetch.bearer_auth(token);
        }
        let response = fetch.json(&body)?.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            return Err(Error::storage(format!(
                "remove failed with status {}: {}",
                status, body
            )));
        }
        Ok(())
    }

    /// The public URL for an object in this bucket
    pub fn get_public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.storage.url, self.bucket_id, path
        )
    }
}
