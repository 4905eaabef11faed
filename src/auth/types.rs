//! Types for authentication and user management

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Session;

/// Response from the sign-up and token endpoints.
///
/// The token fields are flat in the wire format; [`AuthResponse::session`]
/// folds them into a [`Session`]. A sign-up that still needs email
/// confirmation returns a user without tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The access token, when a session was established
    pub access_token: Option<String>,

    /// The refresh token
    pub refresh_token: Option<String>,

    /// The token type (`bearer`)
    pub token_type: Option<String>,

    /// Seconds until the access token expires
    pub expires_in: Option<i64>,

    /// The authenticated user
    pub user: Option<User>,
}

impl AuthResponse {
    /// Fold the flat token fields into a [`Session`], when present
    pub fn session(&self) -> Option<Session> {
        let access_token = self.access_token.clone()?;
        let refresh_token = self.refresh_token.clone()?;
        let user = self.user.as_ref()?;

        Some(Session::new(
            access_token,
            refresh_token,
            user.id,
            user.email.clone(),
            self.expires_in.unwrap_or(3600),
        ))
    }
}

/// User data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// The user ID
    pub id: Uuid,

    /// The user's email address
    pub email: Option<String>,

    /// The user's phone number
    pub phone: Option<String>,

    /// Metadata supplied at sign-up, such as `full_name`
    #[serde(default)]
    pub user_metadata: HashMap<String, serde_json::Value>,

    /// Whether the email has been confirmed
    pub email_confirmed_at: Option<DateTime<Utc>>,

    /// The last sign-in time
    pub last_sign_in_at: Option<DateTime<Utc>>,

    /// The creation time
    pub created_at: Option<DateTime<Utc>>,

    /// The update time
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// The display name supplied at sign-up, if any
    pub fn full_name(&self) -> Option<&str> {
        self.user_metadata.get("full_name").and_then(|v| v.as_str())
    }
}
