use crate::model::JobData;
use crate::utils::html_to_text;
use std::collections::HashSet;

/// Cleans a freshly fetched batch in place and drops repeated external ids,
/// keeping the first occurrence.
pub fn normalize_all(jobs: &mut Vec<JobData>) {
    for job in jobs.iter_mut() {
        normalize_job(job);
    }

    let mut seen = HashSet::new();
    jobs.retain(|job| !job.external_id.is_empty() && seen.insert(job.external_id.clone()));
}

fn normalize_job(job: &mut JobData) {
    job.external_id = job.external_id.trim().to_string();
    job.title = job.title.trim().to_string();
    job.company = match job.company.trim() {
        "" => "Unknown".to_string(),
        company => company.to_string(),
    };

    job.description = non_empty(job.description.take().map(|d| html_to_text(&d)));
    job.location = non_empty(job.location.take());
    job.job_type = non_empty(job.job_type.take());
    job.salary_text = non_empty(job.salary_text.take());
    job.url = non_empty(job.url.take());
    job.company_logo = non_empty(job.company_logo.take());
    job.source_category = non_empty(job.source_category.take());
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Maps a board's free-form contract label onto the job types we store.
pub fn normalize_job_type(raw: &str) -> &'static str {
    let raw = raw.to_lowercase();
    if raw.contains("full") {
        "full-time"
    } else if raw.contains("contract") {
        "contract"
    } else if raw.contains("part") {
        "part-time"
    } else if raw.contains("freelance") {
        "freelance"
    } else {
        "remote"
    }
}

/// Job type from a list of board tags; a remote tag takes precedence.
pub fn job_type_from_tags(tags: &[String]) -> &'static str {
    let has = |needle: &str| tags.iter().any(|t| t.eq_ignore_ascii_case(needle));
    if has("remote") {
        "remote"
    } else if has("contract") || has("freelance") {
        "contract"
    } else if has("part-time") || has("part time") {
        "part-time"
    } else {
        "full-time"
    }
}

/// Formats an integer with `,` thousands separators.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if value < 0 {
        out.insert(0, '-');
    }
    out
}

/// Human-readable salary range, e.g. `45,000 - 55,000 EUR` with suffix `" EUR"`.
pub fn salary_range_text(
    min: Option<i64>,
    max: Option<i64>,
    prefix: &str,
    suffix: &str,
) -> Option<String> {
    match (min, max) {
        (Some(min), Some(max)) => Some(format!(
            "{prefix}{} - {prefix}{}{suffix}",
            group_thousands(min),
            group_thousands(max)
        )),
        (Some(min), None) => Some(format!("{prefix}{}+{suffix}", group_thousands(min))),
        (None, Some(max)) => Some(format!("Up to {prefix}{}{suffix}", group_thousands(max))),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: &str, title: &str) -> JobData {
        JobData {
            external_id: id.to_string(),
            title: title.to_string(),
            ..JobData::default()
        }
    }

    #[test]
    fn normalize_cleans_fields_and_dedups() {
        let mut jobs = vec![
            JobData {
                description: Some("<p>Rust &amp; <b>Kafka</b></p>".to_string()),
                location: Some("   ".to_string()),
                ..job("1", "  Rust dev ")
            },
            job("1", "duplicate"),
            job("", "no id"),
            job("2", "Go dev"),
        ];
        normalize_all(&mut jobs);

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].title, "Rust dev");
        assert_eq!(jobs[0].company, "Unknown");
        assert_eq!(jobs[0].description.as_deref(), Some("Rust & Kafka"));
        assert_eq!(jobs[0].location, None);
        assert_eq!(jobs[1].external_id, "2");
    }

    #[test]
    fn job_types() {
        assert_eq!(normalize_job_type("Full Time"), "full-time");
        assert_eq!(normalize_job_type("contract"), "contract");
        assert_eq!(normalize_job_type("part_time"), "part-time");
        assert_eq!(normalize_job_type("Freelance"), "freelance");
        assert_eq!(normalize_job_type(""), "remote");

        let tags = vec!["Freelance".to_string(), "Remote".to_string()];
        assert_eq!(job_type_from_tags(&tags), "remote");
        assert_eq!(job_type_from_tags(&tags[..1]), "contract");
        assert_eq!(job_type_from_tags(&[]), "full-time");
    }

    #[test]
    fn salary_text_formats() {
        assert_eq!(group_thousands(1234567), "1,234,567");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(
            salary_range_text(Some(45000), Some(55000), "$", "").as_deref(),
            Some("$45,000 - $55,000")
        );
        assert_eq!(salary_range_text(Some(60000), None, "$", "").as_deref(), Some("$60,000+"));
        assert_eq!(
            salary_range_text(None, Some(90000), "$", "").as_deref(),
            Some("Up to $90,000")
        );
        assert_eq!(salary_range_text(None, None, "$", ""), None);
        assert_eq!(
            salary_range_text(Some(45000), Some(55000), "", " EUR").as_deref(),
            Some("45,000 - 55,000 EUR")
        );
    }
}
