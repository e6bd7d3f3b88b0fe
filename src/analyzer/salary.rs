use crate::analyzer::{round_to, JobAnalyzer};
use crate::model::JobRecord;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

pub const HOURS_PER_YEAR: f64 = 1600.0;
pub const DAYS_PER_YEAR: f64 = 218.0;
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Time unit a pay figure is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hourly,
    Daily,
    Monthly,
    Yearly,
}

impl Granularity {
    /// How many units of this granularity make up one year.
    pub fn units_per_year(self) -> f64 {
        match self {
            Granularity::Hourly => HOURS_PER_YEAR,
            Granularity::Daily => DAYS_PER_YEAR,
            Granularity::Monthly => MONTHS_PER_YEAR,
            Granularity::Yearly => 1.0,
        }
    }

    /// Guess the unit of a bare amount from its size.
    pub fn from_magnitude(value: f64) -> Self {
        if value < 100.0 {
            Granularity::Hourly
        } else if value < 1500.0 {
            Granularity::Daily
        } else if value < 15000.0 {
            Granularity::Monthly
        } else {
            Granularity::Yearly
        }
    }
}

/// One job's pay reading; `low <= high` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateObservation {
    pub granularity: Granularity,
    pub low: f64,
    pub high: f64,
}

impl RateObservation {
    pub fn new(granularity: Granularity, low: f64, high: f64) -> Self {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        Self {
            granularity,
            low,
            high,
        }
    }

    pub fn single(granularity: Granularity, value: f64) -> Self {
        Self::new(granularity, value, value)
    }

    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    pub fn yearly_equivalent(&self) -> f64 {
        self.midpoint() * self.granularity.units_per_year()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawCounts {
    pub hourly: usize,
    pub daily: usize,
    pub monthly: usize,
    pub yearly: usize,
}

impl RawCounts {
    fn record(&mut self, granularity: Granularity) {
        match granularity {
            Granularity::Hourly => self.hourly += 1,
            Granularity::Daily => self.daily += 1,
            Granularity::Monthly => self.monthly += 1,
            Granularity::Yearly => self.yearly += 1,
        }
    }
}

/// Pooled pay averages, expressed back in every unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalarySummary {
    pub hourly: Option<f64>,
    pub daily: Option<f64>,
    pub monthly: Option<f64>,
    pub yearly: Option<f64>,
    pub sample_size: usize,
    pub raw_counts: RawCounts,
}

const AMOUNT: &str = r"(\d+(?:[.,]\d+)?)";

/// Unit-qualified patterns in priority order; the first family that matches wins.
static RATE_PATTERNS: LazyLock<Vec<(Granularity, Regex)>> = LazyLock::new(|| {
    let currency = r"\s*(?:€|eur|euros?)?\s*/?\s*";
    let table: Vec<(Granularity, String)> = vec![
        (Granularity::Hourly, format!(r"{AMOUNT}{currency}(?:h|heure|hour)")),
        (Granularity::Hourly, format!(r"{AMOUNT}\s*€/h")),
        (Granularity::Daily, format!(r"{AMOUNT}{currency}(?:j|jour|day|tjm)")),
        (Granularity::Daily, r"tjm[:\s]*(\d+)".to_string()),
        (Granularity::Monthly, format!(r"{AMOUNT}{currency}(?:mois|month)")),
        (Granularity::Monthly, r"(\d+)k?\s*(?:€|eur)?\s*/\s*mois".to_string()),
        (Granularity::Yearly, format!(r"{AMOUNT}\s*k?{currency}(?:an|year|annuel)")),
        (Granularity::Yearly, r"(\d+)k?\s*(?:€|eur)?\s*/\s*an".to_string()),
    ];
    table
        .into_iter()
        .map(|(granularity, pattern)| {
            (
                granularity,
                Regex::new(&pattern).expect("salary rate pattern must compile"),
            )
        })
        .collect()
});

static BARE_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{AMOUNT}\s*(?:k)?\s*(?:€|eur)")).expect("amount pattern must compile")
});

/// Extracts pay readings and pools them on a yearly basis.
#[derive(Debug, Default, Clone, Copy)]
pub struct CompensationNormalizer;

impl CompensationNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Reads one job's pay, trying in order: unit-qualified text, the numeric
    /// min/max fields, then any amount followed by a currency marker.
    pub fn parse(&self, job: &JobRecord) -> Option<RateObservation> {
        let text = job.salary_text.as_deref().unwrap_or("").to_lowercase();

        parse_rate_text(&text)
            .or_else(|| parse_range_fields(job.salary_min, job.salary_max))
            .or_else(|| parse_bare_amount(&text))
    }

    pub fn summarize(&self, jobs: &[JobRecord]) -> SalarySummary {
        let mut raw_counts = RawCounts::default();
        let mut yearly: Vec<f64> = Vec::new();

        for job in jobs {
            if let Some(observation) = self.parse(job) {
                raw_counts.record(observation.granularity);
                yearly.push(observation.yearly_equivalent());
            }
        }

        if yearly.is_empty() {
            return SalarySummary {
                raw_counts,
                ..SalarySummary::default()
            };
        }

        let avg_yearly = yearly.iter().sum::<f64>() / yearly.len() as f64;

        SalarySummary {
            hourly: Some(round_to(avg_yearly / HOURS_PER_YEAR, 2)),
            daily: Some(round_to(avg_yearly / DAYS_PER_YEAR, 2)),
            monthly: Some(round_to(avg_yearly / MONTHS_PER_YEAR, 2)),
            yearly: Some(round_to(avg_yearly, 2)),
            sample_size: yearly.len(),
            raw_counts,
        }
    }
}

impl JobAnalyzer for CompensationNormalizer {
    type Output = SalarySummary;

    fn analyze(&self, jobs: &[JobRecord]) -> Self::Output {
        self.summarize(jobs)
    }
}

fn parse_rate_text(text: &str) -> Option<RateObservation> {
    RATE_PATTERNS.iter().find_map(|(granularity, pattern)| {
        let amount = pattern.captures(text)?.get(1)?;
        let value = parse_amount(text, amount)?;
        Some(RateObservation::single(*granularity, value))
    })
}

fn parse_range_fields(min: Option<i64>, max: Option<i64>) -> Option<RateObservation> {
    let min = min.filter(|v| *v > 0);
    let max = max.filter(|v| *v > 0);
    let low = min.or(max)? as f64;
    let high = max.or(min)? as f64;
    let granularity = Granularity::from_magnitude((low + high) / 2.0);
    Some(RateObservation::new(granularity, low, high))
}

fn parse_bare_amount(text: &str) -> Option<RateObservation> {
    let amount = BARE_AMOUNT.captures(text)?.get(1)?;
    let value = parse_amount(text, amount)?;
    Some(RateObservation::single(Granularity::from_magnitude(value), value))
}

/// Parses a captured numeral, accepting a comma decimal separator and scaling
/// by a thousand when a `k` follows an amount below 1000. Zero is not a reading.
fn parse_amount(text: &str, amount: regex::Match<'_>) -> Option<f64> {
    let value: f64 = amount.as_str().replace(',', ".").parse().ok()?;
    if value <= 0.0 {
        return None;
    }
    let thousands = text[amount.end()..].trim_start().starts_with('k');
    if thousands && value < 1000.0 {
        Some(value * 1000.0)
    } else {
        Some(value)
    }
}
