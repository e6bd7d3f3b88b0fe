// Core structs: JobData, JobRecord, fetch bookkeeping and error kinds
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A job posting as produced by a source fetcher, before it is stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobData {
    pub external_id: String,
    pub title: String,
    pub company: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub salary_currency: Option<String>,
    pub salary_text: Option<String>,
    pub url: Option<String>,
    pub company_logo: Option<String>,
    pub source_category: Option<String>,
    pub posted_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

/// The read-only view of a job the market analyzers work on.
///
/// Absent fields stay `None` all the way into the analyzers: "no salary given"
/// and "salary of zero" are different things to the compensation parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub source_category: Option<String>,
    #[serde(default)]
    pub salary_text: Option<String>,
    #[serde(default)]
    pub salary_min: Option<i64>,
    #[serde(default)]
    pub salary_max: Option<i64>,
}

impl JobRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_source_category(mut self, category: impl Into<String>) -> Self {
        self.source_category = Some(category.into());
        self
    }

    pub fn with_salary_text(mut self, text: impl Into<String>) -> Self {
        self.salary_text = Some(text.into());
        self
    }

    pub fn with_salary_range(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.salary_min = min;
        self.salary_max = max;
        self
    }

    /// Lowercased `title description`, the text experience and education rules scan.
    pub fn title_and_description(&self) -> String {
        format!(
            "{} {}",
            self.title,
            self.description.as_deref().unwrap_or("")
        )
        .to_lowercase()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<&JobData> for JobRecord {
    fn from(job: &JobData) -> Self {
        Self {
            title: job.title.clone(),
            description: job.description.clone(),
            source_category: job.source_category.clone(),
            salary_text: job.salary_text.clone(),
            salary_min: job.salary_min,
            salary_max: job.salary_max,
        }
    }
}

/// Outcome of one source in a fetch round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    Success,
    Error,
    Skipped,
}

impl FetchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchStatus::Success => "success",
            FetchStatus::Error => "error",
            FetchStatus::Skipped => "skipped",
        }
    }
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub source: String,
    pub status: FetchStatus,
    pub jobs: Vec<JobData>,
    pub error: Option<String>,
}

impl FetchOutcome {
    pub fn count(&self) -> usize {
        self.jobs.len()
    }
}

/// Latest fetch log row for a source.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchLogEntry {
    pub source: String,
    pub status: String,
    pub jobs_fetched: usize,
    pub error: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("request timed out")]
    Timeout,
    #[error("invalid response: HTTP {0}")]
    InvalidResponse(u16),
    #[error("unexpected payload: {0}")]
    Decode(String),
    #[error("source is not configured")]
    NotConfigured,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Rejection of a job batch at the JSON boundary, before any analysis runs.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("job batch must be a JSON array, got {0}")]
    NotAnArray(&'static str),
    #[error("job #{index} is invalid: {reason}")]
    InvalidJob { index: usize, reason: String },
}
