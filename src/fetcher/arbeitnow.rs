use crate::fetcher::http::get_json;
use crate::fetcher::JobFetcher;
use crate::model::{FetchError, JobData};
use crate::normalizer::job_type_from_tags;
use crate::utils::parse_json_date;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

const API_URL: &str = "https://www.arbeitnow.com/api/job-board-api";

#[derive(Debug, Deserialize)]
struct ArbeitnowResponse {
    #[serde(default)]
    data: Vec<ArbeitnowJob>,
}

#[derive(Debug, Deserialize)]
struct ArbeitnowJob {
    #[serde(default)]
    slug: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    company_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    remote: bool,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    /// Unix seconds or a date string depending on the listing.
    #[serde(default)]
    created_at: Value,
}

pub struct ArbeitnowFetcher {
    client: Client,
}

impl ArbeitnowFetcher {
    pub const SOURCE: &'static str = "arbeitnow";

    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn normalize_job(raw: ArbeitnowJob) -> JobData {
        let job_type = if raw.remote {
            "remote"
        } else {
            job_type_from_tags(&raw.tags)
        };

        JobData {
            external_id: raw.slug,
            title: raw.title,
            company: raw.company_name.unwrap_or_else(|| "Unknown".to_string()),
            description: raw.description,
            location: raw.location,
            job_type: Some(job_type.to_string()),
            url: raw.url,
            source_category: Some(raw.tags.join(",")),
            posted_at: parse_json_date(&raw.created_at),
            tags: raw.tags,
            ..JobData::default()
        }
    }
}

#[async_trait::async_trait]
impl JobFetcher for ArbeitnowFetcher {
    fn source_name(&self) -> &'static str {
        Self::SOURCE
    }

    async fn fetch(&self) -> Result<Vec<JobData>, FetchError> {
        let response: ArbeitnowResponse = get_json(&self.client, API_URL, &[]).await?;
        Ok(response.data.into_iter().map(Self::normalize_job).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(job: Value) -> JobData {
        let response: ArbeitnowResponse = serde_json::from_value(json!({"data": [job]})).unwrap();
        ArbeitnowFetcher::normalize_job(response.data.into_iter().next().unwrap())
    }

    #[test]
    fn remote_flag_overrides_tags() {
        let job = parse(json!({
            "slug": "rust-dev-berlin",
            "title": "Rust Developer",
            "tags": ["Freelance"],
            "remote": true,
            "created_at": 1_700_000_000
        }));
        assert_eq!(job.external_id, "rust-dev-berlin");
        assert_eq!(job.job_type.as_deref(), Some("remote"));
        assert_eq!(job.source_category.as_deref(), Some("Freelance"));
        assert!(job.posted_at.is_some());
    }

    #[test]
    fn job_type_comes_from_tags_otherwise() {
        let job = parse(json!({"slug": "a", "title": "Ops", "tags": ["part-time"], "created_at": "2024-01-02"}));
        assert_eq!(job.job_type.as_deref(), Some("part-time"));
        assert!(job.posted_at.is_some());
    }
}
