use crate::analyzer::{round_to, JobAnalyzer};
use crate::model::JobRecord;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Year-count phrases, most specific first. Group 1 is the lower bound and the
/// optional group 2 the upper bound of a range.
const YEAR_PATTERNS: &[&str] = &[
    r"(\d+)\s*(?:à|-)?\s*(\d+)?\s*(?:ans?|années?)\s*(?:d['’])?exp[ée]rience",
    r"exp[ée]rience\s*(?:de\s*)?(\d+)\s*(?:à|-)?\s*(\d+)?\s*(?:ans?|années?)",
    r"(\d+)\+?\s*(?:ans?|années?|years?)\s*(?:of\s*)?experience",
    r"experience[:\s]*(\d+)\s*(?:à|-)?\s*(\d+)?\s*(?:ans?|années?|years?)",
    r"(\d+)\s*(?:ans?|années?)\s*minimum",
];

/// Seniority tiers checked in this order; the first tier that matches is kept.
const LEVEL_PATTERNS: &[(SeniorityLevel, &str)] = &[
    (SeniorityLevel::Junior, r"junior|débutant|entry.?level|0.?2\s*ans"),
    (
        SeniorityLevel::Confirmed,
        r"confirmé|intermédiaire|intermediate|mid.?level|3.?5\s*ans",
    ),
    (
        SeniorityLevel::Senior,
        r"senior|expert|lead|(?:5|7|10)\+\s*(?:ans|years)",
    ),
];

static YEAR_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    YEAR_PATTERNS
        .iter()
        .map(|p| Regex::new(p).expect("experience pattern must compile"))
        .collect()
});

static LEVEL_RULES: LazyLock<Vec<(SeniorityLevel, Regex)>> = LazyLock::new(|| {
    LEVEL_PATTERNS
        .iter()
        .map(|(level, p)| (*level, Regex::new(p).expect("level pattern must compile")))
        .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SeniorityLevel {
    Junior,
    Confirmed,
    Senior,
}

/// Histogram of detected years: `<=2`, `(2,5]`, `(5,10]`, `>10`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct YearBuckets {
    #[serde(rename = "0-2")]
    pub up_to_two: usize,
    #[serde(rename = "3-5")]
    pub three_to_five: usize,
    #[serde(rename = "5-10")]
    pub five_to_ten: usize,
    #[serde(rename = "10+")]
    pub over_ten: usize,
}

impl YearBuckets {
    fn record(&mut self, years: f64) {
        if years <= 2.0 {
            self.up_to_two += 1;
        } else if years <= 5.0 {
            self.three_to_five += 1;
        } else if years <= 10.0 {
            self.five_to_ten += 1;
        } else {
            self.over_ten += 1;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExperienceSummary {
    pub average_years: Option<f64>,
    pub sample_size: usize,
    pub levels: BTreeMap<SeniorityLevel, usize>,
    pub distribution: YearBuckets,
}

/// Reads required years of experience and a seniority tier from job text.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExperienceExtractor;

impl ExperienceExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Years asked for by the first matching phrase; a range yields its midpoint.
    pub fn years(&self, text: &str) -> Option<f64> {
        YEAR_RULES.iter().find_map(|rule| {
            let caps = rule.captures(text)?;
            let low: f64 = caps.get(1)?.as_str().parse().ok()?;
            let high = caps
                .get(2)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .unwrap_or(low);
            Some((low + high) / 2.0)
        })
    }

    pub fn level(&self, text: &str) -> Option<SeniorityLevel> {
        LEVEL_RULES
            .iter()
            .find(|(_, rule)| rule.is_match(text))
            .map(|(level, _)| *level)
    }

    pub fn summarize(&self, jobs: &[JobRecord]) -> ExperienceSummary {
        let mut samples: Vec<f64> = Vec::new();
        let mut levels: BTreeMap<SeniorityLevel, usize> = BTreeMap::new();
        let mut distribution = YearBuckets::default();

        for job in jobs {
            let text = job.title_and_description();

            if let Some(years) = self.years(&text) {
                distribution.record(years);
                samples.push(years);
            }
            if let Some(level) = self.level(&text) {
                *levels.entry(level).or_insert(0) += 1;
            }
        }

        let average_years = if samples.is_empty() {
            None
        } else {
            Some(round_to(samples.iter().sum::<f64>() / samples.len() as f64, 1))
        };

        ExperienceSummary {
            average_years,
            sample_size: samples.len(),
            levels,
            distribution,
        }
    }
}

impl JobAnalyzer for ExperienceExtractor {
    type Output = ExperienceSummary;

    fn analyze(&self, jobs: &[JobRecord]) -> Self::Output {
        self.summarize(jobs)
    }
}
