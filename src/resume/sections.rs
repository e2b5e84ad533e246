//! Line normalization, markdown rendering, and heading-based sectioning.

use regex::Regex;
use std::sync::LazyLock;

use super::types::{ParsedDocument, Section};

const MARKDOWN_HEADER: &str = "## Resume\n\n";

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(experience|work|employment|education|skills|projects|summary|certifications|awards|publications)",
    )
    .expect("heading pattern compiles")
});

/// Collapse every whitespace run to a single space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split on line breaks, trim each line, and drop empty lines.
///
/// This sequence is shared by the sectionizer and the latest-role extractor.
pub fn canonical_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Whether a line names one of the recognised résumé headings (substring match).
pub fn is_heading(line: &str) -> bool {
    HEADING.is_match(line)
}

/// Render lines as a markdown bullet list under a fixed header.
pub fn render_markdown(lines: &[&str]) -> String {
    let bullets = lines
        .iter()
        .map(|line| format!("- {line}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{MARKDOWN_HEADER}{bullets}")
}

/// Group lines into sections opened by heading lines. Lines before the first heading are
/// not part of any section.
pub fn sectionize(lines: &[&str]) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for &line in lines {
        if is_heading(line) {
            if let Some((title, body)) = current.take() {
                sections.push(close_section(title, &body));
            }
            current = Some((normalize_whitespace(line), Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }
    if let Some((title, body)) = current {
        sections.push(close_section(title, &body));
    }

    sections
}

fn close_section(title: String, body: &[&str]) -> Section {
    Section {
        title,
        content: normalize_whitespace(&body.join("\n")),
    }
}

/// Build the full parsed form of raw extracted text.
pub fn parse_text(raw: &str) -> ParsedDocument {
    let lines = canonical_lines(raw);
    let sections = sectionize(&lines);
    tracing::debug!(lines = lines.len(), sections = sections.len(), "Sectioned resume");
    ParsedDocument {
        text: lines.join("\n"),
        markdown: render_markdown(&lines),
        sections,
    }
}
