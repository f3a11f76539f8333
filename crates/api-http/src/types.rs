//! HTTP Request/Response Types

use crate::error::ApiError;
use jobmatch_core::domain::{
    FilterExpression, Job, JobId, JobLevel, PageLimits, PageRequest, PageResult, Sort, UserId,
};
use serde::{Deserialize, Serialize};

/// GET /api/v1/jobs
#[derive(Debug, Default, Deserialize)]
pub struct ListJobsQuery {
    pub filter: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort: Option<String>,
}

impl ListJobsQuery {
    pub fn filter(&self) -> Result<FilterExpression, ApiError> {
        Ok(FilterExpression::parse(
            self.filter.as_deref().unwrap_or_default(),
        )?)
    }

    pub fn page_request(&self, limits: &PageLimits) -> Result<PageRequest, ApiError> {
        let sort = match self.sort.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(Sort::parse(raw)?),
        };
        Ok(PageRequest::from_params(self.page, self.size, limits)?.with_sort(sort))
    }
}

/// GET /api/v1/job-cluster/jobs
///
/// Same parameters as the plain listing plus `userId`. Kept flat because
/// query-string numbers do not survive `#[serde(flatten)]`.
#[derive(Debug, Default, Deserialize)]
pub struct ClusterJobsQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<UserId>,
    pub filter: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort: Option<String>,
}

impl ClusterJobsQuery {
    pub fn user_id(&self) -> Result<UserId, ApiError> {
        self.user_id
            .ok_or_else(|| ApiError::bad_request("userId is required"))
    }

    pub fn listing(&self) -> ListJobsQuery {
        ListJobsQuery {
            filter: self.filter.clone(),
            page: self.page,
            size: self.size,
            sort: self.sort.clone(),
        }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Zero-based, as requested
    pub page: u32,
    pub page_size: u32,
    pub pages: u64,
    pub total: u64,
}

/// `{"meta": {...}, "result": [...]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageEnvelope<T> {
    pub meta: PageMeta,
    pub result: Vec<T>,
}

impl<T> From<PageResult<T>> for PageEnvelope<T> {
    fn from(page: PageResult<T>) -> Self {
        Self {
            meta: PageMeta {
                page: page.page_index,
                page_size: page.page_size,
                pages: page.total_pages,
                total: page.total_count,
            },
            result: page.items,
        }
    }
}

/// POST /api/v1/jobs response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedJobResponse {
    pub id: JobId,
    pub name: String,
    pub description: String,
    pub location: String,
    pub salary: f64,
    pub quantity: i64,
    pub level: JobLevel,
    pub active: bool,
    pub skills: Vec<String>,
    pub created_at: i64,
}

impl From<Job> for CreatedJobResponse {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            name: job.name,
            description: job.description,
            location: job.location,
            salary: job.salary,
            quantity: job.quantity,
            level: job.level,
            active: job.active,
            skills: job.skills.into_iter().collect(),
            created_at: job.created_at,
        }
    }
}

/// PUT /api/v1/jobs response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedJobResponse {
    pub id: JobId,
    pub name: String,
    pub description: String,
    pub location: String,
    pub salary: f64,
    pub quantity: i64,
    pub level: JobLevel,
    pub active: bool,
    pub skills: Vec<String>,
    pub updated_at: Option<i64>,
}

impl From<Job> for UpdatedJobResponse {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            name: job.name,
            description: job.description,
            location: job.location,
            salary: job.salary,
            quantity: job.quantity,
            level: job.level,
            active: job.active,
            skills: job.skills.into_iter().collect(),
            updated_at: job.updated_at,
        }
    }
}
