use crate::fetcher::http::get_json;
use crate::fetcher::{id_string, JobFetcher};
use crate::model::{FetchError, JobData};
use crate::normalizer::normalize_job_type;
use crate::utils::parse_datetime;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

const API_URL: &str = "https://remotive.com/api/remote-jobs";

#[derive(Debug, Deserialize)]
struct RemotiveResponse {
    #[serde(default)]
    jobs: Vec<RemotiveJob>,
}

#[derive(Debug, Deserialize)]
struct RemotiveJob {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    title: String,
    #[serde(default)]
    company_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    candidate_required_location: Option<String>,
    #[serde(default)]
    job_type: Option<String>,
    #[serde(default)]
    salary: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    company_logo: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    publication_date: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

/// Remotive public feed. Rate limited upstream to a few requests per day.
pub struct RemotiveFetcher {
    client: Client,
    category: Option<String>,
}

impl RemotiveFetcher {
    pub const SOURCE: &'static str = "remotive";

    pub fn new(client: Client) -> Self {
        Self {
            client,
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    fn normalize_job(raw: RemotiveJob) -> JobData {
        JobData {
            external_id: id_string(&raw.id).unwrap_or_default(),
            title: raw.title,
            company: raw.company_name.unwrap_or_else(|| "Unknown".to_string()),
            description: raw.description,
            location: Some(
                raw.candidate_required_location
                    .filter(|l| !l.trim().is_empty())
                    .unwrap_or_else(|| "Worldwide".to_string()),
            ),
            job_type: Some(normalize_job_type(raw.job_type.as_deref().unwrap_or("")).to_string()),
            salary_text: raw.salary,
            url: raw.url,
            company_logo: raw.company_logo,
            source_category: raw.category,
            posted_at: raw.publication_date.as_deref().and_then(parse_datetime),
            tags: raw.tags,
            ..JobData::default()
        }
    }
}

#[async_trait::async_trait]
impl JobFetcher for RemotiveFetcher {
    fn source_name(&self) -> &'static str {
        Self::SOURCE
    }

    async fn fetch(&self) -> Result<Vec<JobData>, FetchError> {
        let query: Vec<(&str, String)> = self
            .category
            .iter()
            .map(|c| ("category", c.clone()))
            .collect();
        let response: RemotiveResponse = get_json(&self.client, API_URL, &query).await?;
        Ok(response.jobs.into_iter().map(Self::normalize_job).collect())
    }
}
