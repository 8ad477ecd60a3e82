//! Authentication endpoints (`/api/v1/auth`).
//!
//! Login and captcha are the only calls sent without a bearer token. Login
//! returns the access token; storing it on the client is the caller's job
//! (the CLI also persists it next to the config file).

use serde::{Deserialize, Serialize};

use crate::http::{Client, Result};

const AUTH_BASE_URL: &str = "/api/v1/auth";

/// Accessor for the auth resource. Obtained via [`Client::auth`].
pub struct AuthApi<'a> {
    pub(super) client: &'a Client,
}

impl AuthApi<'_> {
    /// Fetch a captcha challenge for the login form.
    pub fn captcha(&self) -> Result<Captcha> {
        self.client.get_public(&format!("{AUTH_BASE_URL}/captcha"))
    }

    /// Exchange credentials (plus the captcha answer) for an access token.
    pub fn login(&self, request: &LoginRequest) -> Result<LoginResult> {
        self.client
            .post_public(&format!("{AUTH_BASE_URL}/login"), request)
    }

    /// Invalidate the current session server-side.
    pub fn logout(&self) -> Result<()> {
        self.client
            .delete_unit(&format!("{AUTH_BASE_URL}/logout"))
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Captcha challenge: an opaque key plus the rendered image.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Captcha {
    pub captcha_key: String,
    /// Base64-encoded PNG.
    pub captcha_base64: String,
}

/// Login form.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha_code: Option<String>,
}

/// Successful login payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub access_token: String,
    /// Token lifetime in seconds.
    #[serde(default)]
    pub expires: i64,
    #[serde(default)]
    pub token_type: String,
}
