use crate::analyzer::JobAnalyzer;
use crate::model::JobRecord;
use serde::Serialize;

/// Technologies searched for in job text, in declaration order.
///
/// Declaration order is the tie-break of the frequency ranking, so entries that
/// alias to the same canonical name rank at the position of the first one.
pub const TECHNOLOGIES: &[&str] = &[
    // Languages
    "Python", "JavaScript", "TypeScript", "Java", "C#", "C++", "PHP", "Ruby", "Go", "Rust",
    "Swift", "Kotlin", "Scala", "R", "MATLAB", "Perl", "Shell", "Bash", "PowerShell",
    // Frontend
    "React", "Angular", "Vue", "Vue.js", "Svelte", "Next.js", "Nuxt", "jQuery",
    "HTML", "CSS", "SASS", "SCSS", "Tailwind", "Bootstrap", "Material UI",
    // Backend
    "Node.js", "Express", "Django", "Flask", "FastAPI", "Spring", "Spring Boot",
    ".NET", "ASP.NET", "Laravel", "Symfony", "Rails", "Ruby on Rails",
    // Data & ML
    "TensorFlow", "PyTorch", "Keras", "Scikit-learn", "Pandas", "NumPy",
    "Spark", "Hadoop", "Kafka", "Airflow", "DBT",
    // Databases
    "SQL", "MySQL", "PostgreSQL", "MongoDB", "Redis", "Elasticsearch",
    "Oracle", "SQL Server", "SQLite", "Cassandra", "DynamoDB", "Neo4j",
    // Cloud & infrastructure
    "AWS", "Azure", "GCP", "Google Cloud", "Docker", "Kubernetes", "K8s",
    "Terraform", "Ansible", "Jenkins", "GitLab CI", "GitHub Actions",
    "Linux", "Nginx", "Apache",
    // Mobile
    "React Native", "Flutter", "iOS", "Android", "Xamarin",
    // Other
    "Git", "GraphQL", "REST", "API", "Microservices", "Agile", "Scrum",
    "CI/CD", "SAP", "Salesforce", "Power BI", "Tableau",
];

/// Spelling variants folded onto one canonical name (keys are lowercase).
const ALIASES: &[(&str, &str)] = &[
    ("vue", "Vue.js"),
    ("vue.js", "Vue.js"),
    ("node.js", "Node.js"),
    ("react native", "React Native"),
    ("ruby on rails", "Rails"),
    ("rails", "Rails"),
    ("k8s", "Kubernetes"),
    ("gcp", "Google Cloud"),
    ("google cloud", "Google Cloud"),
    ("spring boot", "Spring Boot"),
    ("spring", "Spring"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnologyCount {
    pub name: String,
    pub count: usize,
}

struct CatalogEntry {
    needle: String,
    canonical: usize,
}

/// Counts how many jobs mention each catalog technology.
pub struct TechnologyDetector {
    entries: Vec<CatalogEntry>,
    /// Canonical names in order of first appearance in the catalog.
    canonical_names: Vec<&'static str>,
    limit: usize,
}

impl TechnologyDetector {
    pub const DEFAULT_LIMIT: usize = 20;

    pub fn new(limit: usize) -> Self {
        Self::from_catalog(TECHNOLOGIES, limit)
    }

    pub fn from_catalog(catalog: &[&'static str], limit: usize) -> Self {
        let mut canonical_names: Vec<&'static str> = Vec::new();
        let mut entries = Vec::with_capacity(catalog.len());

        for &tech in catalog {
            let canonical = canonical_name(tech);
            let slot = match canonical_names.iter().position(|&c| c == canonical) {
                Some(slot) => slot,
                None => {
                    canonical_names.push(canonical);
                    canonical_names.len() - 1
                }
            };
            entries.push(CatalogEntry {
                needle: tech.to_lowercase(),
                canonical: slot,
            });
        }

        Self {
            entries,
            canonical_names,
            limit,
        }
    }

    /// Canonical technologies found in one job, each at most once.
    pub fn detect(&self, job: &JobRecord) -> Vec<&'static str> {
        self.matched_slots(job)
            .into_iter()
            .map(|slot| self.canonical_names[slot])
            .collect()
    }

    /// Catalog slots of the canonical names one job mentions, ascending, no repeats.
    fn matched_slots(&self, job: &JobRecord) -> Vec<usize> {
        let blob = technology_blob(job);
        let mut matched = vec![false; self.canonical_names.len()];
        for entry in &self.entries {
            if !matched[entry.canonical] && contains_word(&blob, &entry.needle) {
                matched[entry.canonical] = true;
            }
        }
        matched
            .into_iter()
            .enumerate()
            .filter_map(|(slot, hit)| hit.then_some(slot))
            .collect()
    }

    pub fn count(&self, jobs: &[JobRecord]) -> Vec<TechnologyCount> {
        let mut counts = vec![0usize; self.canonical_names.len()];

        for job in jobs {
            for slot in self.matched_slots(job) {
                counts[slot] += 1;
            }
        }

        let mut ranked: Vec<(usize, usize)> = counts
            .into_iter()
            .enumerate()
            .filter(|&(_, count)| count > 0)
            .collect();
        // Stable sort keeps catalog order among equal counts.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        ranked
            .into_iter()
            .take(self.limit)
            .map(|(slot, count)| TechnologyCount {
                name: self.canonical_names[slot].to_string(),
                count,
            })
            .collect()
    }
}

impl Default for TechnologyDetector {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT)
    }
}

impl JobAnalyzer for TechnologyDetector {
    type Output = Vec<TechnologyCount>;

    fn analyze(&self, jobs: &[JobRecord]) -> Self::Output {
        self.count(jobs)
    }
}

fn canonical_name(tech: &'static str) -> &'static str {
    let key = tech.to_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|&(_, canonical)| canonical)
        .unwrap_or(tech)
}

fn technology_blob(job: &JobRecord) -> String {
    format!(
        "{} {} {}",
        job.title,
        job.description.as_deref().unwrap_or(""),
        job.source_category.as_deref().unwrap_or("")
    )
    .to_lowercase()
}

/// True if `needle` occurs in `haystack` with no alphanumeric character directly
/// before or after it.
pub fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, matched)| {
        let end = start + matched.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_of(counts: &[TechnologyCount], name: &str) -> usize {
        counts
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    #[test]
    fn mixed_case_mentions_count_once_per_job() {
        let jobs = vec![JobRecord::new("Frontend").with_description("React, react and REACT")];
        let counts = TechnologyDetector::default().count(&jobs);
        assert_eq!(count_of(&counts, "React"), 1);
    }

    #[test]
    fn go_needs_word_boundaries() {
        let detector = TechnologyDetector::default();
        let go_dev = vec![JobRecord::new("Go developer")];
        let recruiter = vec![JobRecord::new("Google recruiter")];
        assert_eq!(count_of(&detector.count(&go_dev), "Go"), 1);
        assert_eq!(count_of(&detector.count(&recruiter), "Go"), 0);

        let cloud = vec![JobRecord::new("Ops").with_description("Google Cloud is great")];
        let counts = detector.count(&cloud);
        assert_eq!(count_of(&counts, "Go"), 0);
        assert_eq!(count_of(&counts, "Google Cloud"), 1);
    }

    #[test]
    fn aliases_collapse_into_canonical_name() {
        let jobs = vec![
            JobRecord::new("Platform engineer").with_description("k8s and Kubernetes, GCP"),
            JobRecord::new("Frontend").with_description("Vue and Vue.js"),
        ];
        let counts = TechnologyDetector::default().count(&jobs);
        assert_eq!(count_of(&counts, "Kubernetes"), 1);
        assert_eq!(count_of(&counts, "Google Cloud"), 1);
        assert_eq!(count_of(&counts, "Vue.js"), 1);
        assert!(counts.iter().all(|c| c.name != "K8s" && c.name != "Vue"));
    }

    #[test]
    fn multi_word_names_match_as_phrase() {
        let detector = TechnologyDetector::default();
        let phrase = detector.detect(&JobRecord::new("Backend").with_description("Spring Boot services"));
        assert!(phrase.contains(&"Spring Boot"));

        let scattered = detector.detect(&JobRecord::new("Backend").with_description("boot camp in spring"));
        assert!(!scattered.contains(&"Spring Boot"));
    }

    #[test]
    fn symbols_in_names_are_matched_literally() {
        let detector = TechnologyDetector::default();
        let found = detector.detect(&JobRecord::new("Dev C++ / C#").with_description("CI/CD, .NET"));
        for name in ["C++", "C#", "CI/CD", ".NET"] {
            assert!(found.contains(&name), "missing {name}");
        }
    }

    #[test]
    fn source_category_is_scanned_and_missing_fields_are_empty() {
        let job = JobRecord::new("Engineer").with_source_category("docker,aws");
        let found = TechnologyDetector::default().detect(&job);
        assert_eq!(found, vec!["AWS", "Docker"]);

        assert!(TechnologyDetector::default().detect(&JobRecord::new("")).is_empty());
    }

    #[test]
    fn ranking_breaks_ties_by_catalog_order_and_honours_limit() {
        let jobs = vec![
            JobRecord::new("a").with_description("docker python"),
            JobRecord::new("b").with_description("docker aws"),
            JobRecord::new("c").with_description("rust"),
        ];
        let counts = TechnologyDetector::new(3).count(&jobs);
        let names: Vec<&str> = counts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Docker", "Python", "Rust"]);
        assert_eq!(counts[0].count, 2);
    }

    #[test]
    fn detect_and_count_agree_per_job() {
        let detector = TechnologyDetector::default();
        let job = JobRecord::new("K8s platform")
            .with_description("Kubernetes, GCP, Google Cloud, Python and python")
            .with_source_category("devops");
        let counts = detector.count(std::slice::from_ref(&job));
        let counted: Vec<&str> = counts.iter().map(|c| c.name.as_str()).collect();
        let detected = detector.detect(&job);

        assert_eq!(counted, detected);
        assert!(counts.iter().all(|c| c.count == 1));
    }

    #[test]
    fn contains_word_checks_both_sides() {
        assert!(contains_word("go developer", "go"));
        assert!(contains_word("we use go.", "go"));
        assert!(!contains_word("google", "go"));
        assert!(!contains_word("ergo", "go"));
        assert!(contains_word("ergo go", "go"));
        assert!(!contains_word("anything", ""));
    }
}
