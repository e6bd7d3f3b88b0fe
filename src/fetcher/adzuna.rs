use crate::fetcher::http::get_json;
use crate::fetcher::{id_string, JobFetcher};
use crate::model::{FetchError, JobData};
use crate::normalizer::salary_range_text;
use crate::utils::parse_datetime;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

const API_URL: &str = "https://api.adzuna.com/v1/api/jobs";

pub const SEARCH_KEYWORDS: &[&str] = &[
    "AWS",
    "cloud",
    "DevOps",
    "Kubernetes",
    "Docker",
    "Azure",
    "GCP",
    "infrastructure",
    "SRE",
    "développeur Python",
    "ingénieur cloud",
];

const PAGES: &[u32] = &[1, 2];

#[derive(Debug, Deserialize)]
struct AdzunaResponse {
    #[serde(default)]
    results: Vec<AdzunaJob>,
}

#[derive(Debug, Default, Deserialize)]
struct Named {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    label: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AdzunaLocation {
    #[serde(default)]
    area: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AdzunaJob {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    title: String,
    #[serde(default)]
    company: Named,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    location: AdzunaLocation,
    #[serde(default)]
    salary_min: Option<f64>,
    #[serde(default)]
    salary_max: Option<f64>,
    #[serde(default)]
    contract_type: Option<String>,
    #[serde(default)]
    contract_time: Option<String>,
    #[serde(default)]
    redirect_url: Option<String>,
    #[serde(default)]
    category: Named,
    #[serde(default)]
    created: Option<String>,
}

/// Adzuna search API. Needs an application id and key.
pub struct AdzunaFetcher {
    client: Client,
    app_id: Option<String>,
    api_key: Option<String>,
    country: String,
    results_per_page: usize,
}

impl AdzunaFetcher {
    pub const SOURCE: &'static str = "adzuna";

    pub fn new(
        client: Client,
        app_id: Option<String>,
        api_key: Option<String>,
        results_per_page: usize,
    ) -> Self {
        Self {
            client,
            app_id: app_id.filter(|v| !v.is_empty()),
            api_key: api_key.filter(|v| !v.is_empty()),
            country: "fr".to_string(),
            results_per_page,
        }
    }

    fn normalize_job(raw: AdzunaJob, external_id: String) -> JobData {
        let salary_min = raw.salary_min.filter(|v| *v > 0.0).map(|v| v as i64);
        let salary_max = raw.salary_max.filter(|v| *v > 0.0).map(|v| v as i64);
        let salary_text = salary_min.and_then(|_| salary_range_text(salary_min, salary_max, "", " EUR"));

        let location = if raw.location.area.is_empty() {
            "France".to_string()
        } else {
            raw.location.area.join(", ")
        };

        let contract_type = raw.contract_type.unwrap_or_default().to_lowercase();
        let contract_time = raw.contract_time.unwrap_or_default().to_lowercase();
        let job_type = if contract_type.contains("contract") {
            "contract"
        } else if contract_time.contains("part") {
            "part-time"
        } else {
            "full-time"
        };

        JobData {
            external_id,
            title: raw.title,
            company: raw
                .company
                .display_name
                .unwrap_or_else(|| "Unknown".to_string()),
            description: raw.description,
            location: Some(location),
            job_type: Some(job_type.to_string()),
            salary_min,
            salary_max,
            salary_currency: Some("EUR".to_string()),
            salary_text,
            url: raw.redirect_url,
            source_category: raw.category.label,
            posted_at: raw.created.as_deref().and_then(parse_datetime),
            ..JobData::default()
        }
    }

    async fn search_page(
        &self,
        app_id: &str,
        api_key: &str,
        keyword: &str,
        page: u32,
    ) -> Result<Vec<AdzunaJob>, FetchError> {
        let url = format!("{}/{}/search/{}", API_URL, self.country, page);
        let query = [
            ("app_id", app_id.to_string()),
            ("app_key", api_key.to_string()),
            ("results_per_page", self.results_per_page.to_string()),
            ("what", keyword.to_string()),
            ("content-type", "application/json".to_string()),
        ];
        let response: AdzunaResponse = get_json(&self.client, &url, &query).await?;
        Ok(response.results)
    }
}

#[async_trait::async_trait]
impl JobFetcher for AdzunaFetcher {
    fn source_name(&self) -> &'static str {
        Self::SOURCE
    }

    fn is_configured(&self) -> bool {
        self.app_id.is_some() && self.api_key.is_some()
    }

    async fn fetch(&self) -> Result<Vec<JobData>, FetchError> {
        let (Some(app_id), Some(api_key)) = (&self.app_id, &self.api_key) else {
            return Err(FetchError::NotConfigured);
        };

        let mut seen = HashSet::new();
        let mut jobs = Vec::new();

        for keyword in SEARCH_KEYWORDS {
            for &page in PAGES {
                let results = match self.search_page(app_id, api_key, keyword, page).await {
                    Ok(results) => results,
                    Err(e) => {
                        warn!("adzuna '{}' page {} skipped: {}", keyword, page, e);
                        continue;
                    }
                };
                debug!("adzuna '{}' page {}: {} results", keyword, page, results.len());

                for raw in results {
                    let Some(id) = id_string(&raw.id) else { continue };
                    if seen.insert(id.clone()) {
                        jobs.push(Self::normalize_job(raw, id));
                    }
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
    fn configuration_requires_both_credentials() {
        let client = Client::new();
        assert!(!AdzunaFetcher::new(client.clone(), Some("id".into()), None, 50).is_configured());
        assert!(!AdzunaFetcher::new(client.clone(), Some("id".into()), Some("".into()), 50).is_configured());
        assert!(AdzunaFetcher::new(client, Some("id".into()), Some("key".into()), 50).is_configured());
    }

    #[test]
    fn normalizes_adzuna_result() {
        let raw: AdzunaJob = serde_json::from_value(json!({
            "id": "4321",
            "title": "Ingénieur Cloud AWS",
            "company": {"display_name": "Cloudy"},
            "location": {"area": ["France", "Île-de-France", "Paris"]},
            "salary_min": 50000.0,
            "salary_max": 60000.0,
            "contract_type": "permanent",
            "contract_time": "full_time",
            "category": {"label": "IT Jobs"},
            "created": "2024-04-02T09:30:00Z"
        }))
        .unwrap();
        let id = id_string(&raw.id).unwrap();
        let job = AdzunaFetcher::normalize_job(raw, id);

        assert_eq!(job.external_id, "4321");
        assert_eq!(job.company, "Cloudy");
        assert_eq!(job.location.as_deref(), Some("France, Île-de-France, Paris"));
        assert_eq!(job.salary_text.as_deref(), Some("50,000 - 60,000 EUR"));
        assert_eq!(job.job_type.as_deref(), Some("full-time"));
        assert_eq!(job.source_category.as_deref(), Some("IT Jobs"));
        assert!(job.posted_at.is_some());
    }
}
