use crate::fetcher::http::get_json;
use crate::fetcher::JobFetcher;
use crate::model::{FetchError, JobData};
use crate::normalizer::salary_range_text;
use crate::utils::from_timestamp;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

const API_URL: &str = "https://himalayas.app/jobs/api";

#[derive(Debug, Deserialize)]
struct HimalayasResponse {
    #[serde(default)]
    jobs: Vec<HimalayasJob>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HimalayasJob {
    #[serde(default)]
    guid: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    company_name: Option<String>,
    #[serde(default)]
    excerpt: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    min_salary: Option<f64>,
    #[serde(default)]
    max_salary: Option<f64>,
    #[serde(default)]
    currency: Option<String>,
    /// Mixed-type list upstream; only the string entries are kept.
    #[serde(default)]
    categories: Vec<Value>,
    #[serde(default)]
    location_restrictions: Vec<Value>,
    #[serde(default)]
    pub_date: Option<i64>,
    #[serde(default)]
    application_link: Option<String>,
    #[serde(default)]
    company_logo: Option<String>,
}

/// Himalayas remote job board.
pub struct HimalayasFetcher {
    client: Client,
    limit: usize,
}

impl HimalayasFetcher {
    pub const SOURCE: &'static str = "himalayas";

    pub fn new(client: Client, limit: usize) -> Self {
        Self { client, limit }
    }

    fn normalize_job(raw: HimalayasJob) -> JobData {
        let salary_min = raw.min_salary.filter(|v| *v > 0.0).map(|v| v as i64);
        let salary_max = raw.max_salary.filter(|v| *v > 0.0).map(|v| v as i64);
        let currency = raw.currency.unwrap_or_else(|| "USD".to_string());
        // Only "min - max" and "min+" are shown; a lone maximum gets no text.
        let salary_text = salary_min
            .and_then(|_| salary_range_text(salary_min, salary_max, "", &format!(" {currency}")));

        let tags: Vec<String> = raw
            .categories
            .into_iter()
            .filter_map(|c| c.as_str().map(str::to_string))
            .collect();

        let restrictions: Vec<&str> = raw
            .location_restrictions
            .iter()
            .filter_map(Value::as_str)
            .take(3)
            .collect();
        let location = if restrictions.is_empty() {
            "Worldwide Remote".to_string()
        } else {
            restrictions.join(", ")
        };

        // guid is stable across fetches; the application link is the fallback key.
        let external_id = raw
            .guid
            .clone()
            .filter(|g| !g.is_empty())
            .or_else(|| raw.application_link.clone())
            .unwrap_or_default();

        JobData {
            external_id,
            title: raw.title,
            company: raw.company_name.unwrap_or_else(|| "Unknown".to_string()),
            description: raw.excerpt.filter(|e| !e.is_empty()).or(raw.description),
            location: Some(location),
            job_type: Some("remote".to_string()),
            salary_min,
            salary_max,
            salary_currency: Some(currency),
            salary_text,
            url: raw.application_link.or(raw.guid),
            company_logo: raw.company_logo,
            source_category: Some(tags.iter().take(5).cloned().collect::<Vec<_>>().join(",")),
            posted_at: raw.pub_date.and_then(from_timestamp),
            tags,
        }
    }
}

#[async_trait::async_trait]
impl JobFetcher for HimalayasFetcher {
    fn source_name(&self) -> &'static str {
        Self::SOURCE
    }

    async fn fetch(&self) -> Result<Vec<JobData>, FetchError> {
        let query = [("limit", self.limit.to_string())];
        let response: HimalayasResponse = get_json(&self.client, API_URL, &query).await?;
        Ok(response.jobs.into_iter().map(Self::normalize_job).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_himalayas_payload() {
        let payload = json!({"jobs": [{
            "guid": "https://himalayas.app/companies/acme/jobs/sre",
            "title": "Site Reliability Engineer",
            "companyName": "Acme",
            "excerpt": "Kubernetes and Terraform",
            "minSalary": 80000.0,
            "maxSalary": 100000.0,
            "currency": "EUR",
            "categories": ["DevOps", 3, "Cloud"],
            "locationRestrictions": ["France", "Germany", "Spain", "Italy"],
            "pubDate": 1_700_000_000
        }]});
        let response: HimalayasResponse = serde_json::from_value(payload).unwrap();
        let job = HimalayasFetcher::normalize_job(response.jobs.into_iter().next().unwrap());

        assert_eq!(job.external_id, "https://himalayas.app/companies/acme/jobs/sre");
        assert_eq!(job.salary_text.as_deref(), Some("80,000 - 100,000 EUR"));
        assert_eq!(job.salary_min, Some(80000));
        assert_eq!(job.location.as_deref(), Some("France, Germany, Spain"));
        assert_eq!(job.tags, vec!["DevOps", "Cloud"]);
        assert_eq!(job.source_category.as_deref(), Some("DevOps,Cloud"));
        assert_eq!(job.description.as_deref(), Some("Kubernetes and Terraform"));
        assert!(job.posted_at.is_some());
    }

    #[test]
    fn missing_restrictions_mean_worldwide() {
        let raw: HimalayasJob =
            serde_json::from_value(json!({"title": "Dev", "applicationLink": "https://x/apply"})).unwrap();
        let job = HimalayasFetcher::normalize_job(raw);
        assert_eq!(job.location.as_deref(), Some("Worldwide Remote"));
        assert_eq!(job.external_id, "https://x/apply");
        assert_eq!(job.salary_text, None);
    }
}
