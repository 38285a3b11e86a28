//! Sanitizers for document text that ends up in generated source
//!
//! Summaries and descriptions are free-form Markdown. Before they become
//! `///` doc comments they are normalized to plain ASCII punctuation, single
//! spaces and no blank lines.

use once_cell::sync::Lazy;
use regex::Regex;

static SMART_PUNCTUATION: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"[\u{2018}\u{2019}\u{201C}\u{201D}\u{2013}\u{2014}]").ok());

static WHITESPACE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\s+").ok());

fn normalize_line(line: &str) -> String {
    let line = line.replace('\t', " ");
    let line = match SMART_PUNCTUATION.as_ref() {
        Some(re) => re
            .replace_all(&line, |caps: &regex::Captures| match &caps[0] {
                "\u{2018}" | "\u{2019}" => "'",
                "\u{201C}" | "\u{201D}" => "\"",
                _ => "-",
            })
            .into_owned(),
        None => line,
    };
    match WHITESPACE.as_ref() {
        Some(re) => re.replace_all(line.trim(), " ").into_owned(),
        None => line.trim().to_string(),
    }
}

/// Lines of a doc comment, blank lines removed
///
/// ```
/// use swaggen::generation::sanitizers::sanitize_doc_lines;
///
/// let lines = sanitize_doc_lines("Find a pet\u{2014}by id.\n\n  Returns   404 if missing.");
/// assert_eq!(lines, vec!["Find a pet-by id.", "Returns 404 if missing."]);
/// ```
pub fn sanitize_doc_lines(input: &str) -> Vec<String> {
    input
        .lines()
        .map(normalize_line)
        .filter(|line| !line.is_empty())
        .collect()
}

/// The same text joined into a single line
pub fn sanitize_inline(input: &str) -> String {
    sanitize_doc_lines(input).join(" ")
}

/// Summary and description of an operation as doc lines, summary first
pub fn operation_doc(summary: Option<&str>, description: Option<&str>) -> Vec<String> {
    let mut lines: Vec<String> = summary.map(sanitize_doc_lines).unwrap_or_default();
    if let Some(description) = description {
        let body = sanitize_doc_lines(description);
        if !body.is_empty() && body != lines {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.extend(body);
        }
    }
    lines
}
