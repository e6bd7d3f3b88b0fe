use chrono::Utc;
use job_sniper::aggregator::JobAggregator;
use job_sniper::analyzer::MarketAnalyzer;
use job_sniper::config::{load_config, AppConfig};
use job_sniper::model::{FetchOutcome, FetchStatus};
use job_sniper::storage::SqliteStorage;
use std::env;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    let config_path = env::args().nth(1).unwrap_or_else(|| "config.json".to_string());
    let config: AppConfig = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error ({}): {}", config_path, e);
            return;
        }
    };

    let mut storage = match SqliteStorage::new(&config.database_path) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to initialize storage: {:?}", e);
            return;
        }
    };

    let aggregator = match JobAggregator::from_config(&config) {
        Ok(a) => a,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return;
        }
    };
    let analyzer = MarketAnalyzer::new();

    info!("Sources available: {:?}", aggregator.available_sources());

    loop {
        info!("Starting fetch cycle...");
        let outcomes = aggregator.fetch_all(config.sources.as_deref()).await;
        for outcome in &outcomes {
            record_outcome(&mut storage, outcome);
        }

        match storage.load_records() {
            Ok(records) => {
                let report = analyzer.analyze(&records);
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => info!("Market report over {} jobs:\n{}", report.total_jobs, json),
                    Err(e) => warn!("Report serialization failed: {}", e),
                }
            }
            Err(e) => warn!("Failed to load stored jobs: {:?}", e),
        }

        if let Ok(counts) = storage.count_by_source() {
            for (source, count) in counts {
                info!("{}: {} jobs stored", source, count);
            }
        }

        match storage.last_fetch_status() {
            Ok(entries) => {
                for entry in entries {
                    info!(
                        "{}: last fetch {} at {} ({} jobs){}",
                        entry.source,
                        entry.status,
                        entry.fetched_at.to_rfc3339(),
                        entry.jobs_fetched,
                        entry
                            .error
                            .map(|e| format!(", error: {}", e))
                            .unwrap_or_default()
                    );
                }
            }
            Err(e) => warn!("Failed to read fetch status: {:?}", e),
        }

        if config.check_interval_seconds == 0 {
            info!("Interval is 0, exiting after one cycle.");
            break;
        }

        info!("Waiting {}s before next cycle...", config.check_interval_seconds);
        sleep(Duration::from_secs(config.check_interval_seconds)).await;
    }
}

/// Saves the jobs of one outcome and writes its fetch log row.
fn record_outcome(storage: &mut SqliteStorage, outcome: &FetchOutcome) {
    let now = Utc::now();

    if outcome.status == FetchStatus::Success {
        match storage.save_jobs(&outcome.source, &outcome.jobs, now) {
            Ok(new_jobs) => info!(
                "{}: {} fetched, {} new",
                outcome.source,
                outcome.count(),
                new_jobs
            ),
            Err(e) => warn!("DB save error for {}: {:?}", outcome.source, e),
        }
    }

    if let Err(e) = storage.log_fetch(
        &outcome.source,
        outcome.status,
        outcome.count(),
        outcome.error.as_deref(),
        now,
    ) {
        warn!("Fetch log write failed for {}: {:?}", outcome.source, e);
    }
}
