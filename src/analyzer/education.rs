use crate::analyzer::JobAnalyzer;
use crate::model::JobRecord;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Diploma {
    #[serde(rename = "Bac+2")]
    Bac2,
    #[serde(rename = "Bac+3/Licence")]
    Bac3Licence,
    #[serde(rename = "Bac+5/Master")]
    Bac5Master,
    #[serde(rename = "Bac+8/Doctorat")]
    Bac8Doctorat,
    #[serde(rename = "Autodidact-accepted")]
    AutodidactAccepted,
}

impl Diploma {
    pub const ALL: [Diploma; 5] = [
        Diploma::Bac2,
        Diploma::Bac3Licence,
        Diploma::Bac5Master,
        Diploma::Bac8Doctorat,
        Diploma::AutodidactAccepted,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Diploma::Bac2 => "Bac+2",
            Diploma::Bac3Licence => "Bac+3/Licence",
            Diploma::Bac5Master => "Bac+5/Master",
            Diploma::Bac8Doctorat => "Bac+8/Doctorat",
            Diploma::AutodidactAccepted => "Autodidact-accepted",
        }
    }

    fn patterns(&self) -> &'static [&'static str] {
        match self {
            Diploma::Bac2 => &[r"bac\s*\+\s*2", r"deug", r"\bbts\b", r"\bdut\b"],
            Diploma::Bac3Licence => &[
                r"bac\s*\+\s*3",
                r"licence",
                r"bachelor",
                r"\bdut\b",
                r"\bbts\b",
            ],
            Diploma::Bac5Master => &[
                r"bac\s*\+\s*5",
                r"master",
                r"ingénieur",
                r"école d['’]ingénieur",
                r"\bmsc\b",
                r"\bm\.sc\b",
                r"\bmba\b",
                r"mastère",
                r"diplôme d['’]ingénieur",
            ],
            Diploma::Bac8Doctorat => &[
                r"bac\s*\+\s*8",
                r"doctorat",
                r"\bph\.?d\b",
                r"thèse",
            ],
            Diploma::AutodidactAccepted => &[
                r"autodidacte",
                r"self.?taught",
                r"sans diplôme",
                r"bootcamp",
            ],
        }
    }
}

static DIPLOMA_RULES: LazyLock<Vec<(Diploma, Vec<Regex>)>> = LazyLock::new(|| {
    Diploma::ALL
        .iter()
        .map(|diploma| {
            let rules = diploma
                .patterns()
                .iter()
                .map(|p| Regex::new(p).expect("diploma pattern must compile"))
                .collect();
            (*diploma, rules)
        })
        .collect()
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EducationSummary {
    pub distribution: BTreeMap<Diploma, usize>,
    /// Jobs that named at least one diploma category.
    pub total_with_requirement: usize,
    pub total_jobs: usize,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EducationExtractor;

impl EducationExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Diploma categories a text asks for, in category order.
    pub fn diplomas(&self, text: &str) -> Vec<Diploma> {
        DIPLOMA_RULES
            .iter()
            .filter(|(_, rules)| rules.iter().any(|rule| rule.is_match(text)))
            .map(|(diploma, _)| *diploma)
            .collect()
    }

    pub fn summarize(&self, jobs: &[JobRecord]) -> EducationSummary {
        let mut distribution: BTreeMap<Diploma, usize> = BTreeMap::new();
        let mut total_with_requirement = 0;

        for job in jobs {
            let matched = self.diplomas(&job.title_and_description());
            if !matched.is_empty() {
                total_with_requirement += 1;
            }
            for diploma in matched {
                *distribution.entry(diploma).or_insert(0) += 1;
            }
        }

        EducationSummary {
            distribution,
            total_with_requirement,
            total_jobs: jobs.len(),
        }
    }
}

impl JobAnalyzer for EducationExtractor {
    type Output = EducationSummary;

    fn analyze(&self, jobs: &[JobRecord]) -> Self::Output {
        self.summarize(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_job_can_count_in_several_categories() {
        let jobs = vec![JobRecord::new("Data engineer").with_description("Master ou BTS accepté")];
        let summary = EducationExtractor::new().summarize(&jobs);

        assert_eq!(summary.distribution.get(&Diploma::Bac5Master), Some(&1));
        assert_eq!(summary.distribution.get(&Diploma::Bac2), Some(&1));
        assert_eq!(summary.distribution.get(&Diploma::Bac3Licence), Some(&1));
        assert_eq!(summary.total_with_requirement, 1);
        assert_eq!(summary.total_jobs, 1);
    }

    #[test]
    fn a_category_counts_once_per_job() {
        let jobs = vec![JobRecord::new("Dev").with_description("Bac+5, master, MSc ou MBA")];
        let summary = EducationExtractor::new().summarize(&jobs);
        assert_eq!(summary.distribution.get(&Diploma::Bac5Master), Some(&1));
    }

    #[test]
    fn total_jobs_is_batch_size() {
        let jobs = vec![
            JobRecord::new("Dev"),
            JobRecord::new("Researcher").with_description("PhD in physics"),
            JobRecord::new("Dev").with_description("autodidacte bienvenu"),
        ];
        let summary = EducationExtractor::new().summarize(&jobs);
        assert_eq!(summary.total_jobs, 3);
        assert_eq!(summary.total_with_requirement, 2);
        assert_eq!(summary.distribution.get(&Diploma::Bac8Doctorat), Some(&1));
        assert_eq!(summary.distribution.get(&Diploma::AutodidactAccepted), Some(&1));
    }

    #[test]
    fn acronyms_need_word_boundaries() {
        let extractor = EducationExtractor::new();
        assert!(extractor.diplomas("great abstractions, but no diploma talk").is_empty());
        assert_eq!(extractor.diplomas("bac + 3 requis"), vec![Diploma::Bac3Licence]);
    }

    #[test]
    fn distribution_serializes_with_labels() {
        let jobs = vec![JobRecord::new("Dev").with_description("licence informatique")];
        let summary = EducationExtractor::new().summarize(&jobs);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["distribution"]["Bac+3/Licence"], 1);
        assert_eq!(Diploma::Bac3Licence.label(), "Bac+3/Licence");
    }
}
