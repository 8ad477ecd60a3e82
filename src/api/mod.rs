//! Typed endpoint modules, one per backend resource.
//!
//! Each module exposes an accessor struct borrowing the [`Client`] —
//! `client.config()`, `client.platform()`, `client.dashboard()`,
//! `client.auth()` — with one method per REST call. Request and response
//! types live next to the module that uses them; everything is camelCase on
//! the wire.

use serde::{Deserialize, Serialize};

use crate::http::Client;

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod platform;

pub use auth::AuthApi;
pub use config::ConfigApi;
pub use dashboard::DashboardApi;
pub use platform::PlatformApi;

impl Client {
    /// Authentication endpoints (`/api/v1/auth`).
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }

    /// System configuration endpoints (`/api/v1/config`).
    pub fn config(&self) -> ConfigApi<'_> {
        ConfigApi { client: self }
    }

    /// Dashboard statistics endpoints (`/api/v1/dashboard`).
    pub fn dashboard(&self) -> DashboardApi<'_> {
        DashboardApi { client: self }
    }

    /// Platform user endpoints (`/api/v1/platform`).
    pub fn platform(&self) -> PlatformApi<'_> {
        PlatformApi { client: self }
    }
}

// ---------------------------------------------------------------------------
// Shared paging types
// ---------------------------------------------------------------------------

/// Common pagination fields, flattened into the concrete query types.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page_num: u32,
    pub page_size: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page_num: 1,
            page_size: 20,
        }
    }
}

/// One page of results plus the total row count.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
    #[serde(default)]
    pub total: i64,
}
