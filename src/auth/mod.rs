//! Authentication against the backend's auth endpoints.
//!
//! The backend owns tokens, password storage, and confirmation flows; this
//! client only issues the requests and hands the resulting [`Session`] back
//! to the caller.

mod session;
mod types;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use validator::Validate;

use crate::error::Error;
use crate::fetch::Fetch;
use crate::forms::{SignInForm, SignUpForm};
use crate::CLIENT_INFO;

pub use session::*;
pub use types::*;

/// Client for authentication and user management
pub struct Auth {
    /// The base URL for the backend project
    url: String,

    /// The anonymous API key
    key: String,

    /// HTTP client used for requests
    client: Client,
}

impl Auth {
    /// Create a new Auth client
    pub(crate) fn new(url: &str, key: &str, client: Client) -> Self {
        Self {
            url: url.to_string(),
            key: key.to_string(),
            client,
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.url, path)
    }

    /// Register a new user.
    ///
    /// The display name travels in the sign-up metadata; the backend's
    /// trigger turns it into a profile row. Depending on project settings
    /// the response may or may not carry a usable session.
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<AuthResponse, Error> {
        form.validate()?;

        let body = json!({
            "email": form.email,
            "password": form.password,
            "data": { "full_name": form.full_name },
        });

        let response = Fetch::post(&self.client, &self.auth_url("/signup"))
            .header("apikey", &self.key)
            .header("X-Client-Info", CLIENT_INFO)
            .json(&body)?
            .send()
            .await?;

        let parsed: AuthResponse = parse_auth(response).await?;
        debug!(email = %form.email, "signed up");
        Ok(parsed)
    }

    /// Sign a user in with email and password
    pub async fn sign_in(&self, form: &SignInForm) -> Result<Session, Error> {
        form.validate()?;

        let body = json!({
            "email": form.email,
            "password": form.password,
        });

        let response = Fetch::post(&self.client, &self.auth_url("/token?grant_type=password"))
            .header("apikey", &self.key)
            .header("X-Client-Info", CLIENT_INFO)
            .json(&body)?
            .send()
            .await?;

        let parsed: AuthResponse = parse_auth(response).await?;
        let session = parsed
            .session()
            .ok_or_else(|| Error::auth("sign in did not return a session"))?;
        debug!(user_id = %session.user_id, "signed in");
        Ok(session)
    }

    /// Sign the user out, invalidating the session's tokens
    pub async fn sign_out(&self, session: &Session) -> Result<(), Error> {
        let response = Fetch::post(&self.client, &self.auth_url("/logout"))
            .header("apikey", &self.key)
            .header("X-Client-Info", CLIENT_INFO)
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(Error::auth(auth_error_message(status, &body)));
        }
        Ok(())
    }

    /// Fetch the authenticated user's record
    pub async fn get_user(&self, session: &Session) -> Result<User, Error> {
        let response = Fetch::get(&self.client, &self.auth_url("/user"))
            .header("apikey", &self.key)
            .header("X-Client-Info", CLIENT_INFO)
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        parse_auth(response).await
    }
}

async fn parse_auth<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await?;
        return Err(Error::auth(auth_error_message(status, &body)));
    }
    Ok(response.json::<T>().await?)
}

/// Error bodies vary across auth endpoints; prefer the most descriptive
/// field available.
fn auth_error_message(status: StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct AuthErrorBody {
        error_description: Option<String>,
        msg: Option<String>,
        error: Option<String>,
    }

    if let Ok(parsed) = serde_json::from_str::<AuthErrorBody>(body) {
        if let Some(message) = parsed.error_description.or(parsed.msg).or(parsed.error) {
            return message;
        }
    }
    format!("request failed with status {}: {}", status, body)
}
