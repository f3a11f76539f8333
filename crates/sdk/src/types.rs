//! SDK Request/Response Types
//!
//! Mirrors the wire types of the api-http crate.

use serde::{Deserialize, Serialize};

/// Client-editable job fields (create and update)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPayload {
    /// Required for update, ignored on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary: f64,
    #[serde(default)]
    pub quantity: i64,
    /// INTERN, FRESHER, JUNIOR, MIDDLE or SENIOR
    pub level: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub skills: Vec<String>,
}

fn default_active() -> bool {
    true
}

/// Job as returned by the API
///
/// Create and update responses omit some fields, hence the defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary: f64,
    #[serde(default)]
    pub quantity: i64,
    pub level: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub cluster: Option<i32>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub page_size: u32,
    pub pages: u64,
    pub total: u64,
}

/// One page of a listing
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub meta: PageMeta,
    pub result: Vec<T>,
}

/// Query parameters shared by both listings
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub filter: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    /// `field` or `field,asc|desc`
    pub sort: Option<String>,
}

impl ListParams {
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(filter) = &self.filter {
            query.push(("filter", filter.clone()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(size) = self.size {
            query.push(("size", size.to_string()));
        }
        if let Some(sort) = &self.sort {
            query.push(("sort", sort.clone()));
        }
        query
    }
}
