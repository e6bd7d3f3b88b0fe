use crate::fetcher::http::get_json;
use crate::fetcher::JobFetcher;
use crate::model::{FetchError, JobData};
use crate::utils::parse_datetime;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const API_URL: &str = "https://public.api.careerjet.net/search";

#[derive(Debug, Deserialize)]
struct CareerjetResponse {
    /// "JOBS" for a result page; "LOCATIONS" when the location was ambiguous.
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    jobs: Vec<CareerjetJob>,
}

#[derive(Debug, Deserialize)]
struct CareerjetJob {
    #[serde(default)]
    title: String,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    locations: Option<String>,
    #[serde(default)]
    salary: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    site: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    contracttype: Option<String>,
}

/// Careerjet partner API (Optioncarriere in France). Needs an affiliate id.
pub struct CareerjetFetcher {
    client: Client,
    affid: Option<String>,
    keywords: String,
    location: String,
    page_size: usize,
}

impl CareerjetFetcher {
    pub const SOURCE: &'static str = "careerjet";

    pub fn new(client: Client, affid: Option<String>) -> Self {
        Self {
            client,
            affid: affid.filter(|v| !v.is_empty()),
            keywords: "développeur".to_string(),
            location: "france".to_string(),
            page_size: 99,
        }
    }

    fn job_type(contracttype: Option<&str>) -> &'static str {
        match contracttype {
            Some("c") => "contract",
            Some("t") => "part-time",
            _ => "full-time",
        }
    }

    /// Postings without a URL have no stable key and are dropped.
    fn normalize_job(raw: CareerjetJob) -> Option<JobData> {
        let url = raw.url.filter(|u| !u.trim().is_empty())?;

        Some(JobData {
            external_id: url.clone(),
            title: raw.title,
            company: raw.company.unwrap_or_else(|| "Unknown".to_string()),
            description: raw.description,
            location: raw.locations,
            job_type: Some(Self::job_type(raw.contracttype.as_deref()).to_string()),
            salary_text: raw.salary.filter(|s| !s.is_empty()),
            url: Some(url),
            source_category: raw.site,
            posted_at: raw.date.as_deref().and_then(parse_datetime),
            ..JobData::default()
        })
    }
}

#[async_trait::async_trait]
impl JobFetcher for CareerjetFetcher {
    fn source_name(&self) -> &'static str {
        Self::SOURCE
    }

    fn is_configured(&self) -> bool {
        self.affid.is_some()
    }

    async fn fetch(&self) -> Result<Vec<JobData>, FetchError> {
        let Some(affid) = &self.affid else {
            return Err(FetchError::NotConfigured);
        };

        let query = [
            ("affid", affid.clone()),
            ("locale_code", "fr_FR".to_string()),
            ("keywords", self.keywords.clone()),
            ("location", self.location.clone()),
            ("pagesize", self.page_size.to_string()),
            ("page", "1".to_string()),
            ("sort", "date".to_string()),
        ];
        let response: CareerjetResponse = get_json(&self.client, API_URL, &query).await?;

        if response.kind != "JOBS" {
            debug!("careerjet returned '{}' instead of a job page", response.kind);
            return Ok(Vec::new());
        }

        Ok(response
            .jobs
            .into_iter()
            .filter_map(Self::normalize_job)
            .collect())
    }
}
