//! Positional heuristic for "what is my latest role?".
//!
//! Assumes the common layout where each position starts with a date-range line followed by the
//! job title and then the company. Résumés that order these differently will produce wrong or
//! missing answers; a miss is reported as `None`.

use regex::Regex;
use std::sync::LazyLock;

use super::sections::canonical_lines;
use super::types::{LatestRole, RoleEvidence};

const MONTH: &str = r"(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:t|tember)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)";

static DATE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)(?:{MONTH}\s*\d{{4}}\s*-\s*(?:{MONTH}\s*)?(?:\d{{4}}|Present)|\b\d{{4}}\s*-\s*(?:\d{{4}}|Present))"
    ))
    .expect("date range pattern compiles")
});

static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-\u{2022}]\s*").expect("bullet pattern compiles"));

static EXPERIENCE_EXACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^experience$").expect("experience pattern compiles"));

static EXPERIENCE_ANY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)experience").expect("experience pattern compiles"));

static MAJOR_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(education|skills|projects|certificates?|awards|summary|languages|references)\b",
    )
    .expect("major heading pattern compiles")
});

/// Remove one leading bullet marker and surrounding whitespace.
pub fn strip_bullet(line: &str) -> &str {
    match BULLET.find(line) {
        Some(marker) => line[marker.end()..].trim(),
        None => line.trim(),
    }
}

/// Whether `line` contains a date range such as `Jun 2021 - Present` or `2019 - 2021`.
pub fn is_date_range(line: &str) -> bool {
    DATE_RANGE.is_match(line)
}

/// Locate the most recent role in `text`, or `None` when the layout does not fit.
pub fn extract_latest_role(text: &str) -> Option<LatestRole> {
    let lines = canonical_lines(text);

    let experience = lines
        .iter()
        .position(|line| EXPERIENCE_EXACT.is_match(strip_bullet(line)))
        .or_else(|| lines.iter().position(|line| EXPERIENCE_ANY.is_match(line)));
    let start = experience.map_or(0, |idx| idx + 1);

    let date_idx = date_line_in_region(&lines, start)
        .or_else(|| lines.iter().position(|line| is_date_range(line)));
    let Some(date_idx) = date_idx else {
        tracing::debug!("No date range found in resume");
        return None;
    };

    let dates = strip_bullet(lines[date_idx]);
    let (title_idx, title) = next_non_empty(&lines, date_idx + 1)?;
    let (_, company) = next_non_empty(&lines, title_idx + 1)?;

    Some(LatestRole {
        sentence: format!("Your latest job title is {title} at {company} ({dates})."),
        evidence: RoleEvidence {
            title: title.to_string(),
            company: company.to_string(),
            dates: dates.to_string(),
            idx: date_idx,
        },
    })
}

/// First date line from `start` that comes before the next major heading.
fn date_line_in_region(lines: &[&str], start: usize) -> Option<usize> {
    for (idx, line) in lines.iter().enumerate().skip(start) {
        if is_date_range(line) {
            return Some(idx);
        }
        if MAJOR_HEADING.is_match(strip_bullet(line)) {
            return None;
        }
    }
    None
}

fn next_non_empty<'a>(lines: &[&'a str], from: usize) -> Option<(usize, &'a str)> {
    lines
        .iter()
        .enumerate()
        .skip(from)
        .map(|(idx, line)| (idx, strip_bullet(line)))
        .find(|(_, stripped)| !stripped.is_empty())
}
