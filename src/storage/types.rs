//! Types for storage operations

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A file in a storage bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileObject {
    /// The object key within the bucket
    #[serde(alias = "Key")]
    pub key: Option<String>,

    /// The file ID
    pub id: Option<String>,

    /// Creation timestamp
    pub created_at: Option<String>,

    /// File metadata
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

/// Options for uploading a file
#[derive(Debug, Clone)]
pub struct FileOptions {
    /// Cache control header
    pub cache_control: Option<String>,

    /// Content type header
    pub content_type: Option<String>,

    /// Whether to overwrite an existing object at the same path
    pub upsert: bool,
}

impl Default for FileOptions {
    fn default() -> Self {
        Self {
            cache_control: None,
            content_type: None,
            upsert: false,
        }
    }
}

impl FileOptions {
    /// Set the content type
    pub fn with_content_type(mut self, value: &str) -> Self {
        self.content_type = Some(value.to_string());
        self
    }
}
