use crate::config::AppConfig;
use crate::fetcher::http::build_client;
use crate::fetcher::{
    AdzunaFetcher, ArbeitnowFetcher, CareerjetFetcher, HimalayasFetcher, JobFetcher,
    RemoteOkFetcher, RemotiveFetcher,
};
use crate::model::{FetchError, FetchOutcome, FetchStatus};
use crate::normalizer::normalize_all;
use futures::future::join_all;
use tracing::{info, warn};

const NOT_CONFIGURED: &str = "not configured: missing API credentials";

/// Coordinates fetching across every registered job board.
pub struct JobAggregator {
    fetchers: Vec<Box<dyn JobFetcher>>,
    max_jobs_per_source: usize,
}

impl JobAggregator {
    pub fn new(fetchers: Vec<Box<dyn JobFetcher>>, max_jobs_per_source: usize) -> Self {
        Self {
            fetchers,
            max_jobs_per_source,
        }
    }

    /// Registers the public boards plus any credentialed board whose keys are set.
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let client = build_client(config.fetch_timeout_seconds)?;

        let mut fetchers: Vec<Box<dyn JobFetcher>> = vec![
            Box::new(RemoteOkFetcher::new(client.clone())),
            Box::new(RemotiveFetcher::new(client.clone())),
            Box::new(ArbeitnowFetcher::new(client.clone())),
            Box::new(HimalayasFetcher::new(client.clone(), 500)),
        ];

        let adzuna = AdzunaFetcher::new(
            client.clone(),
            config.adzuna.app_id.clone(),
            config.adzuna.api_key.clone(),
            50,
        );
        if adzuna.is_configured() {
            fetchers.push(Box::new(adzuna));
        }

        let careerjet = CareerjetFetcher::new(client, config.careerjet.affid.clone());
        if careerjet.is_configured() {
            fetchers.push(Box::new(careerjet));
        }

        Ok(Self::new(fetchers, config.max_jobs_per_source))
    }

    pub fn all_sources(&self) -> Vec<(&'static str, bool)> {
        self.fetchers
            .iter()
            .map(|f| (f.source_name(), f.is_configured()))
            .collect()
    }

    pub fn available_sources(&self) -> Vec<&'static str> {
        self.fetchers
            .iter()
            .filter(|f| f.is_configured())
            .map(|f| f.source_name())
            .collect()
    }

    /// Fetches the selected sources concurrently. Outcomes keep registration order.
    pub async fn fetch_all(&self, sources: Option<&[String]>) -> Vec<FetchOutcome> {
        let selected = self.fetchers.iter().filter(|f| {
            sources.is_none_or(|names| names.iter().any(|n| n == f.source_name()))
        });

        let tasks = selected.map(|fetcher| self.fetch_one(fetcher.as_ref()));
        join_all(tasks).await
    }

    /// Fetches one source by name. Asking for an unconfigured source is an error,
    /// unlike `fetch_all` where it is skipped.
    pub async fn fetch_source(&self, name: &str) -> FetchOutcome {
        match self.fetchers.iter().find(|f| f.source_name() == name) {
            Some(fetcher) if !fetcher.is_configured() => FetchOutcome {
                source: name.to_string(),
                status: FetchStatus::Error,
                jobs: Vec::new(),
                error: Some(NOT_CONFIGURED.to_string()),
            },
            Some(fetcher) => self.fetch_one(fetcher.as_ref()).await,
            None => FetchOutcome {
                source: name.to_string(),
                status: FetchStatus::Error,
                jobs: Vec::new(),
                error: Some(format!("unknown source: {}", name)),
            },
        }
    }

    async fn fetch_one(&self, fetcher: &dyn JobFetcher) -> FetchOutcome {
        let source = fetcher.source_name().to_string();

        if !fetcher.is_configured() {
            info!("Skipping {}: {}", source, NOT_CONFIGURED);
            return FetchOutcome {
                source,
                status: FetchStatus::Skipped,
                jobs: Vec::new(),
                error: Some(NOT_CONFIGURED.to_string()),
            };
        }

        match fetcher.fetch().await {
            Ok(mut jobs) => {
                normalize_all(&mut jobs);
                jobs.truncate(self.max_jobs_per_source);
                info!("Fetched {} jobs from {}", jobs.len(), source);
                FetchOutcome {
                    source,
                    status: FetchStatus::Success,
                    jobs,
                    error: None,
                }
            }
            Err(e) => {
                warn!("Fetch from {} failed: {}", source, e);
                FetchOutcome {
                    source,
                    status: FetchStatus::Error,
                    jobs: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
