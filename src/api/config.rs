//! System configuration endpoints (`/api/v1/config`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{PageQuery, PageResult};
use crate::dict::DictOption;
use crate::http::{Client, Result};

const CONFIG_BASE_URL: &str = "/api/v1/config";

/// Accessor for the config resource. Obtained via [`Client::config`].
pub struct ConfigApi<'a> {
    pub(super) client: &'a Client,
}

impl ConfigApi<'_> {
    /// Fetch one page of config records.
    pub fn page(&self, query: &ConfigPageQuery) -> Result<PageResult<ConfigItem>> {
        self.client.get(CONFIG_BASE_URL, Some(query))
    }

    /// Fetch a single config record for editing.
    pub fn get(&self, id: u64) -> Result<ConfigForm> {
        self.client
            .get(&format!("{CONFIG_BASE_URL}/{id}"), None::<&()>)
    }

    /// Create a config record.
    pub fn create(&self, form: &ConfigForm) -> Result<()> {
        self.client.post_unit(CONFIG_BASE_URL, form)
    }

    /// Update a config record.
    pub fn update(&self, id: u64, form: &ConfigForm) -> Result<()> {
        self.client.put_unit(&format!("{CONFIG_BASE_URL}/{id}"), form)
    }

    /// Delete a config record.
    pub fn delete(&self, id: u64) -> Result<()> {
        self.client.delete_unit(&format!("{CONFIG_BASE_URL}/{id}"))
    }

    /// Ask the backend to rebuild its config cache.
    pub fn refresh_cache(&self) -> Result<()> {
        self.client.patch_unit(CONFIG_BASE_URL)
    }

    /// Bulk-fetch every dictionary: code → ordered option list.
    pub fn dict(&self) -> Result<HashMap<String, Vec<DictOption>>> {
        self.client
            .get(&format!("{CONFIG_BASE_URL}/dict"), None::<&()>)
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Query params for the config page listing.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPageQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    /// Search keyword matched against the config name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Create/update form for a config record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub description: String,
}

/// One row of the config page listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigItem {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub description: String,
}
