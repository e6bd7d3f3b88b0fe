use crate::analyzer::education::{EducationExtractor, EducationSummary};
use crate::analyzer::experience::{ExperienceExtractor, ExperienceSummary};
use crate::analyzer::salary::{CompensationNormalizer, SalarySummary};
use crate::analyzer::technologies::{TechnologyCount, TechnologyDetector};
use crate::analyzer::JobAnalyzer;
use crate::model::{InputError, JobRecord};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Structure representing the overall market analysis of one job batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketReport {
    /// Most frequently mentioned technologies, most common first.
    pub technologies: Vec<TechnologyCount>,
    /// Pooled compensation expressed per hour, day, month and year.
    pub salaries: SalarySummary,
    /// Required years and seniority tiers.
    pub experience: ExperienceSummary,
    /// Diploma categories asked for.
    pub education: EducationSummary,
    pub total_jobs: usize,
}

/// Runs every analyzer over the same batch and assembles a [`MarketReport`].
#[derive(Default)]
pub struct MarketAnalyzer {
    technologies: TechnologyDetector,
    salaries: CompensationNormalizer,
    experience: ExperienceExtractor,
    education: EducationExtractor,
}

impl MarketAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn analyze_technologies(&self, jobs: &[JobRecord]) -> Vec<TechnologyCount> {
        self.technologies.analyze(jobs)
    }

    pub fn analyze_salaries(&self, jobs: &[JobRecord]) -> SalarySummary {
        self.salaries.analyze(jobs)
    }

    pub fn analyze_experience(&self, jobs: &[JobRecord]) -> ExperienceSummary {
        self.experience.analyze(jobs)
    }

    pub fn analyze_education(&self, jobs: &[JobRecord]) -> EducationSummary {
        self.education.analyze(jobs)
    }

    /// Builds the full report. The input batch is only read.
    pub fn analyze(&self, jobs: &[JobRecord]) -> MarketReport {
        debug!("Analyzing {} jobs", jobs.len());

        MarketReport {
            technologies: self.analyze_technologies(jobs),
            salaries: self.analyze_salaries(jobs),
            experience: self.analyze_experience(jobs),
            education: self.analyze_education(jobs),
            total_jobs: jobs.len(),
        }
    }

    /// Validates a JSON job batch and analyzes it.
    ///
    /// The batch must be an array of objects whose fields, when present, have the
    /// types of [`JobRecord`]. Nothing is analyzed if any element is rejected.
    pub fn analyze_json(&self, batch: &Value) -> Result<MarketReport, InputError> {
        let jobs = parse_batch(batch)?;
        Ok(self.analyze(&jobs))
    }
}

pub fn parse_batch(batch: &Value) -> Result<Vec<JobRecord>, InputError> {
    let items = batch
        .as_array()
        .ok_or_else(|| InputError::NotAnArray(json_kind(batch)))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(InputError::InvalidJob {
                    index,
                    reason: format!("expected an object, got {}", json_kind(item)),
                });
            }
            serde_json::from_value::<JobRecord>(item.clone()).map_err(|e| InputError::InvalidJob {
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::experience::SeniorityLevel;
    use serde_json::json;

    fn sample_batch() -> Vec<JobRecord> {
        vec![
            JobRecord::new("Senior AWS Engineer").with_salary_text("600€/j"),
            JobRecord::new("Python Developer").with_salary_range(Some(45000), Some(55000)),
            JobRecord::new("Junior DevOps")
                .with_description("Docker, Kubernetes, 1 an d'expérience"),
        ]
    }

    #[test]
    fn full_report_for_small_batch() {
        let report = MarketAnalyzer::new().analyze(&sample_batch());

        let techs: Vec<(&str, usize)> = report
            .technologies
            .iter()
            .map(|t| (t.name.as_str(), t.count))
            .collect();
        assert_eq!(
            techs,
            vec![("Python", 1), ("AWS", 1), ("Docker", 1), ("Kubernetes", 1)]
        );

        assert_eq!(report.salaries.sample_size, 2);
        assert_eq!(report.salaries.raw_counts.daily, 1);
        assert_eq!(report.salaries.raw_counts.yearly, 1);

        assert_eq!(report.experience.sample_size, 1);
        assert_eq!(report.experience.average_years, Some(1.0));
        assert_eq!(report.experience.levels.get(&SeniorityLevel::Senior), Some(&1));
        assert_eq!(report.experience.levels.get(&SeniorityLevel::Junior), Some(&1));
        assert_eq!(report.experience.levels.len(), 2);

        assert_eq!(report.total_jobs, 3);
        assert_eq!(report.education.total_jobs, 3);
    }

    #[test]
    fn report_is_deterministic() {
        let analyzer = MarketAnalyzer::new();
        let jobs = sample_batch();
        let first = serde_json::to_string(&analyzer.analyze(&jobs)).unwrap();
        let second = serde_json::to_string(&analyzer.analyze(&jobs)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_batch_yields_empty_report() {
        let report = MarketAnalyzer::new().analyze(&[]);
        assert!(report.technologies.is_empty());
        assert_eq!(report.salaries.sample_size, 0);
        assert_eq!(report.experience.average_years, None);
        assert_eq!(report.total_jobs, 0);
    }

    #[test]
    fn json_batch_must_be_an_array_of_objects() {
        let analyzer = MarketAnalyzer::new();
        assert_eq!(
            analyzer.analyze_json(&json!({"title": "x"})),
            Err(InputError::NotAnArray("object"))
        );
        assert!(matches!(
            analyzer.analyze_json(&json!([{"title": "ok"}, 42])),
            Err(InputError::InvalidJob { index: 1, .. })
        ));
        assert!(matches!(
            analyzer.analyze_json(&json!([{"title": "x", "salary_min": "lots"}])),
            Err(InputError::InvalidJob { index: 0, .. })
        ));
    }

    #[test]
    fn json_batch_tolerates_missing_fields() {
        let batch = json!([
            {"title": "Rust developer", "description": null},
            {"description": "50€/h, Kafka"},
            {"title": null, "salary_text": "45k€/an"}
        ]);
        let report = MarketAnalyzer::new().analyze_json(&batch).unwrap();
        assert_eq!(report.total_jobs, 3);
        assert_eq!(report.salaries.sample_size, 1);
        assert!(report.technologies.iter().any(|t| t.name == "Rust"));
        assert!(report.technologies.iter().any(|t| t.name == "Kafka"));
    }
}
