//! Platform user endpoints (`/api/v1/platform`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PageQuery, PageResult};
use crate::http::{Client, Result};

const PLATFORM_BASE_URL: &str = "/api/v1/platform";

/// Accessor for the platform-user resource. Obtained via [`Client::platform`].
pub struct PlatformApi<'a> {
    pub(super) client: &'a Client,
}

impl PlatformApi<'_> {
    /// The logged-in user's identity, roles, and permissions.
    pub fn me(&self) -> Result<PlatformInfo> {
        self.client
            .get(&format!("{PLATFORM_BASE_URL}/me"), None::<&()>)
    }

    /// Fetch one page of users.
    pub fn page(&self, query: &PlatformPageQuery) -> Result<PageResult<PlatformItem>> {
        self.client.get(PLATFORM_BASE_URL, Some(query))
    }

    /// Fetch a single user for editing.
    pub fn get(&self, id: u64) -> Result<PlatformForm> {
        self.client
            .get(&format!("{PLATFORM_BASE_URL}/{id}"), None::<&()>)
    }

    /// Create a user.
    pub fn create(&self, form: &PlatformForm) -> Result<()> {
        self.client.post_unit(PLATFORM_BASE_URL, form)
    }

    /// Update a user.
    pub fn update(&self, id: u64, form: &PlatformForm) -> Result<()> {
        self.client
            .put_unit(&format!("{PLATFORM_BASE_URL}/{id}"), form)
    }

    /// Admin reset of another user's password.
    pub fn reset_password(&self, id: u64, password: &str) -> Result<()> {
        self.client.put_unit(
            &format!("{PLATFORM_BASE_URL}/password/reset"),
            &PasswordResetRequest {
                id,
                password: password.to_string(),
            },
        )
    }

    /// Delete users by id; multiple ids are comma-joined into the path.
    pub fn delete(&self, ids: &[u64]) -> Result<()> {
        let joined = ids
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.client
            .delete_unit(&format!("{PLATFORM_BASE_URL}/{joined}"))
    }

    /// The logged-in user's profile page data.
    pub fn profile(&self) -> Result<PlatformProfile> {
        self.client
            .get(&format!("{PLATFORM_BASE_URL}/profile"), None::<&()>)
    }

    /// Update the logged-in user's profile.
    pub fn update_profile(&self, form: &PlatformProfileForm) -> Result<()> {
        self.client
            .put_unit(&format!("{PLATFORM_BASE_URL}/profile"), form)
    }

    /// Change the logged-in user's own password.
    pub fn change_password(&self, form: &PasswordChangeForm) -> Result<()> {
        self.client
            .put_unit(&format!("{PLATFORM_BASE_URL}/password"), form)
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Identity of the logged-in user, including role and permission codes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformInfo {
    pub id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub perms: Vec<String>,
}

/// Query params for the user page listing.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformPageQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    /// Search keyword matched against the username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// User status filter (1 enabled, 0 disabled).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// One row of the user page listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformItem {
    pub id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub avatar: String,
    /// 1 enabled, 0 disabled.
    #[serde(default)]
    pub status: i32,
    /// Role names, comma-separated.
    #[serde(default)]
    pub role_names: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Create/update form for a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub status: i32,
    /// Assigned role ids.
    #[serde(default)]
    pub role_id: Vec<u64>,
}

/// Profile-page view of the logged-in user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformProfile {
    pub id: u64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub avatar: String,
    /// Role names, comma-separated.
    #[serde(default)]
    pub role_names: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Profile update form.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformProfileForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub avatar: String,
}

/// Own-password change form.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeForm {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Serialize)]
struct PasswordResetRequest {
    id: u64,
    password: String,
}
