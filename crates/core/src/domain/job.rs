// Job Domain Model

use crate::domain::error::{DomainError, Result};
use crate::domain::ClusterLabel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Job ID (assigned by storage on insert)
pub type JobId = i64;

/// Maximum length of a job name
pub const MAX_NAME_LEN: usize = 255;

/// Seniority level of a posting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobLevel {
    Intern,
    Fresher,
    Junior,
    Middle,
    Senior,
}

impl JobLevel {
    pub const ALL: [JobLevel; 5] = [
        JobLevel::Intern,
        JobLevel::Fresher,
        JobLevel::Junior,
        JobLevel::Middle,
        JobLevel::Senior,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobLevel::Intern => "INTERN",
            JobLevel::Fresher => "FRESHER",
            JobLevel::Junior => "JUNIOR",
            JobLevel::Middle => "MIDDLE",
            JobLevel::Senior => "SENIOR",
        }
    }
}

impl std::fmt::Display for JobLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        JobLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::InvalidLevel(s.to_string()))
    }
}

/// Client-editable part of a job, as accepted by create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary: f64,
    #[serde(default)]
    pub quantity: i64,
    pub level: JobLevel,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub skills: Vec<String>,
}

fn default_active() -> bool {
    true
}

impl JobDraft {
    /// Check field constraints before anything is persisted
    pub fn validate(&self) -> Result<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DomainError::ValidationError(
                "name must not be blank".to_string(),
            ));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::ValidationError(format!(
                "name is too long (max {} characters)",
                MAX_NAME_LEN
            )));
        }
        if !self.salary.is_finite() || self.salary < 0.0 {
            return Err(DomainError::ValidationError(format!(
                "salary must be a non-negative number, got {}",
                self.salary
            )));
        }
        if self.quantity < 0 {
            return Err(DomainError::ValidationError(format!(
                "quantity must not be negative, got {}",
                self.quantity
            )));
        }
        Ok(())
    }

    /// Skill names trimmed, lower-cased and de-duplicated
    pub fn normalized_skills(&self) -> BTreeSet<String> {
        self.skills
            .iter()
            .map(|s| normalize_skill(s))
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Canonical form of a skill name
pub fn normalize_skill(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Job Entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub name: String,
    pub description: String,
    pub location: String,
    pub salary: f64,
    pub quantity: i64,
    pub level: JobLevel,
    pub active: bool,
    pub skills: BTreeSet<String>,

    /// Assigned by the cluster refresh service, never by clients
    pub cluster: Option<ClusterLabel>,

    pub created_at: i64, // epoch ms
    pub updated_at: Option<i64>,
}

impl Job {
    /// Build an unsaved job from a draft (id 0 until storage assigns one)
    ///
    /// # Arguments
    ///
    /// * `draft` - Validated client input
    /// * `created_at` - Creation timestamp in epoch ms (injected, not system time)
    pub fn new(draft: JobDraft, created_at: i64) -> Self {
        let skills = draft.normalized_skills();
        Self {
            id: 0,
            name: draft.name.trim().to_string(),
            description: draft.description,
            location: draft.location,
            salary: draft.salary,
            quantity: draft.quantity,
            level: draft.level,
            active: draft.active,
            skills,
            cluster: None,
            created_at,
            updated_at: None,
        }
    }

    /// Overwrite every client-editable field, keeping id, cluster and created_at
    pub fn apply(&mut self, draft: JobDraft, now_millis: i64) {
        self.skills = draft.normalized_skills();
        self.name = draft.name.trim().to_string();
        self.description = draft.description;
        self.location = draft.location;
        self.salary = draft.salary;
        self.quantity = draft.quantity;
        self.level = draft.level;
        self.active = draft.active;
        self.updated_at = Some(now_millis);
    }

    /// Create a test job with deterministic timestamp.
    ///
    /// **Note**: This method should only be used in tests.
    pub fn new_test(name: impl Into<String>, cluster: Option<ClusterLabel>) -> Self {
        let mut job = Self::new(
            JobDraft {
                name: name.into(),
                description: String::new(),
                location: "Hanoi".to_string(),
                salary: 1000.0,
                quantity: 1,
                level: JobLevel::Junior,
                active: true,
                skills: vec!["rust".to_string()],
            },
            1000,
        );
        job.cluster = cluster;
        job
    }
}
