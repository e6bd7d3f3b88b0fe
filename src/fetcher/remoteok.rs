use crate::fetcher::http::get_json;
use crate::fetcher::{id_string, JobFetcher};
use crate::model::{FetchError, JobData};
use crate::normalizer::salary_range_text;
use crate::utils::parse_datetime;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;

const API_URL: &str = "https://remoteok.com/api";

/// Tags queried on top of the untagged feed.
const CLOUD_TAGS: &[&str] = &["devops", "cloud", "aws", "sysadmin", "backend", "infra"];

#[derive(Debug, Deserialize)]
struct RemoteOkJob {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    salary_min: Option<i64>,
    #[serde(default)]
    salary_max: Option<i64>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    company_logo: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    date: Option<String>,
}

pub struct RemoteOkFetcher {
    client: Client,
}

impl RemoteOkFetcher {
    pub const SOURCE: &'static str = "remoteok";

    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn normalize_job(raw: RemoteOkJob, external_id: String) -> JobData {
        let salary_min = raw.salary_min.filter(|v| *v > 0);
        let salary_max = raw.salary_max.filter(|v| *v > 0);

        JobData {
            external_id,
            title: raw.position.unwrap_or_default(),
            company: raw.company.unwrap_or_else(|| "Unknown".to_string()),
            description: raw.description,
            location: raw
                .location
                .filter(|l| !l.trim().is_empty())
                .or_else(|| Some("Remote".to_string())),
            job_type: Some("remote".to_string()),
            salary_min,
            salary_max,
            salary_currency: None,
            salary_text: salary_range_text(salary_min, salary_max, "$", ""),
            url: raw.url,
            company_logo: raw.company_logo,
            source_category: Some(raw.tags.join(",")),
            posted_at: raw.date.as_deref().and_then(parse_datetime),
            tags: raw.tags,
        }
    }

    /// Decodes one feed page; the first element is a legal notice, not a job.
    fn parse_feed(feed: Vec<Value>) -> Vec<(String, RemoteOkJob)> {
        feed.into_iter()
            .skip(1)
            .filter_map(|item| serde_json::from_value::<RemoteOkJob>(item).ok())
            .filter_map(|job| {
                let id = id_string(&job.id)?;
                job.position.as_ref().filter(|p| !p.is_empty())?;
                Some((id, job))
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl JobFetcher for RemoteOkFetcher {
    fn source_name(&self) -> &'static str {
        Self::SOURCE
    }

    async fn fetch(&self) -> Result<Vec<JobData>, FetchError> {
        let mut seen = HashSet::new();
        let mut jobs = Vec::new();

        let tags = CLOUD_TAGS.iter().map(|t| Some(*t)).chain(std::iter::once(None));
        for tag in tags {
            let query: Vec<(&str, String)> = tag.map(|t| ("tag", t.to_string())).into_iter().collect();
            let feed: Vec<Value> = match get_json(&self.client, API_URL, &query).await {
                Ok(feed) => feed,
                Err(e) => {
                    warn!("remoteok tag {:?} failed: {}", tag, e);
                    continue;
                }
            };

            for (id, raw) in Self::parse_feed(feed) {
                if seen.insert(id.clone()) {
                    jobs.push(Self::normalize_job(raw, id));
                }
            }
        }

        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn feed_skips_notice_and_incomplete_entries() {
        let feed = vec![
            json!({"legal": "terms of use"}),
            json!({"id": 101, "position": "Senior DevOps", "company": "Acme",
                   "salary_min": 90000, "salary_max": 120000,
                   "tags": ["devops", "aws"], "date": "2024-05-01T08:00:00+00:00"}),
            json!({"id": "102", "position": ""}),
            json!({"position": "No id"}),
        ];
        let parsed = RemoteOkFetcher::parse_feed(feed);
        assert_eq!(parsed.len(), 1);

        let (id, raw) = parsed.into_iter().next().unwrap();
        let job = RemoteOkFetcher::normalize_job(raw, id);
        assert_eq!(job.external_id, "101");
        assert_eq!(job.title, "Senior DevOps");
        assert_eq!(job.salary_text.as_deref(), Some("$90,000 - $120,000"));
        assert_eq!(job.source_category.as_deref(), Some("devops,aws"));
        assert_eq!(job.location.as_deref(), Some("Remote"));
        assert!(job.posted_at.is_some());
    }
}
