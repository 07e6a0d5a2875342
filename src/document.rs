//! Named regions inside Markdown documents.
//!
//! A region is everything between `<!-- exercise-streak:NAME:start -->` and
//! `<!-- exercise-streak:NAME:end -->`, each sentinel on a line of its own. Only the text
//! between the two sentinels is ever rewritten; the sentinels and everything outside them
//! are left byte-for-byte intact.

use crate::errors::AppError;

const MARKER_NAMESPACE: &str = "exercise-streak";

pub fn start_marker(name: &str) -> String {
    format!("<!-- {MARKER_NAMESPACE}:{name}:start -->")
}

pub fn end_marker(name: &str) -> String {
    format!("<!-- {MARKER_NAMESPACE}:{name}:end -->")
}

/// Wraps `body` in the sentinels for `name`, as used by the document templates.
pub fn region(name: &str, body: &str) -> String {
    let body = body.trim_end_matches('\n');
    if body.is_empty() {
        format!("{}\n{}", start_marker(name), end_marker(name))
    } else {
        format!("{}\n{body}\n{}", start_marker(name), end_marker(name))
    }
}

/// Replaces the body of region `name`. Returns `Ok(None)` when the document has no such region.
///
/// Sentinels only count when they stand alone on a line; the body is written with the
/// line ending of the start sentinel's line.
pub fn replace_region(document: &str, name: &str, body: &str) -> Result<Option<String>, AppError> {
    let starts = marker_lines(document, &start_marker(name));
    let ends = marker_lines(document, &end_marker(name));

    let (start, end) = match (starts.as_slice(), ends.as_slice()) {
        ([], []) => return Ok(None),
        ([], _) => {
            return Err(AppError::invalid_input(format!(
                "region '{name}' has an end marker but no start marker"
            )));
        }
        ([start], [end]) if end.0 >= start.1 => (*start, *end),
        ([_], [] | [_]) => {
            return Err(AppError::invalid_input(format!(
                "region '{name}' is missing its end marker"
            )));
        }
        _ => {
            return Err(AppError::invalid_input(format!(
                "region '{name}' appears more than once"
            )));
        }
    };

    let newline = if document[start.0..start.1].ends_with("\r\n") {
        "\r\n"
    } else {
        "\n"
    };

    let mut updated = String::with_capacity(document.len() + body.len());
    updated.push_str(&document[..start.1]);
    for line in body.trim_end_matches(['\n', '\r']).lines() {
        updated.push_str(line);
        updated.push_str(newline);
    }
    updated.push_str(&document[end.0..]);

    Ok(Some(updated))
}

/// Byte spans `(line start, line end including newline)` of lines consisting of `marker` alone.
fn marker_lines(document: &str, marker: &str) -> Vec<(usize, usize)> {
    let mut found = Vec::new();
    let mut offset = 0;
    for line in document.split_inclusive('\n') {
        if line.trim() == marker {
            found.push((offset, offset + line.len()));
        }
        offset += line.len();
    }
    found
}

#[derive(Debug, Default)]
pub struct RegionReport {
    pub content: String,
    pub replaced: Vec<String>,
    pub missing: Vec<String>,
}

/// Applies several region replacements in order, collecting which ones were absent.
pub fn apply_regions(document: &str, regions: &[(&str, String)]) -> Result<RegionReport, AppError> {
    let mut report = RegionReport {
        content: document.to_string(),
        ..RegionReport::default()
    };

    for (name, body) in regions {
        match replace_region(&report.content, name, body)? {
            Some(updated) => {
                report.content = updated;
                report.replaced.push(name.to_string());
            }
            None => report.missing.push(name.to_string()),
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> String {
        format!(
            "# Title\n\nintro text\n\n{}\nold body\n{}\n\n## Footer\n",
            start_marker("stats"),
            end_marker("stats")
        )
    }

    #[test]
    fn replaces_only_the_region_body() {
        let updated = replace_region(&sample(), "stats", "new body").unwrap().unwrap();
        assert!(updated.starts_with("# Title\n\nintro text\n\n"));
        assert!(updated.ends_with(&format!("{}\n\n## Footer\n", end_marker("stats"))));
        assert!(updated.contains("new body"));
        assert!(!updated.contains("old body"));
    }

    #[test]
    fn replacement_is_idempotent() {
        let once = replace_region(&sample(), "stats", "body\n").unwrap().unwrap();
        let twice = replace_region(&once, "stats", "body\n").unwrap().unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn missing_region_is_reported_not_failed() {
        assert!(replace_region("# nothing here\n", "stats", "x").unwrap().is_none());

        let report = apply_regions(&sample(), &[("stats", "x".into()), ("log", "y".into())]).unwrap();
        assert_eq!(report.replaced, vec!["stats".to_string()]);
        assert_eq!(report.missing, vec!["log".to_string()]);
    }

    #[test]
    fn unterminated_region_is_an_error() {
        let doc = format!("{}\nbody\n", start_marker("log"));
        assert!(replace_region(&doc, "log", "x").is_err());

        let doc = format!("body\n{}\n", end_marker("log"));
        assert!(replace_region(&doc, "log", "x").is_err());
    }

    #[test]
    fn inline_sentinel_text_is_not_a_region() {
        let doc = format!(
            "| 2024-01-03 | see {} here |\n{}\n",
            end_marker("log"),
            region("log", "old")
        );
        let updated = replace_region(&doc, "log", "new").unwrap().unwrap();
        assert!(updated.starts_with(&format!("| 2024-01-03 | see {} here |\n", end_marker("log"))));
        assert!(updated.contains("new"));

        let inline_only = format!("text {} more\n", start_marker("log"));
        assert!(replace_region(&inline_only, "log", "x").unwrap().is_none());
    }

    #[test]
    fn crlf_documents_keep_their_line_endings() {
        let doc = format!(
            "intro\r\n{}\r\nold\r\n{}\r\nfooter\r\n",
            start_marker("stats"),
            end_marker("stats")
        );
        let updated = replace_region(&doc, "stats", "a\nb\n").unwrap().unwrap();
        assert_eq!(
            updated,
            format!(
                "intro\r\n{}\r\na\r\nb\r\n{}\r\nfooter\r\n",
                start_marker("stats"),
                end_marker("stats")
            )
        );
        assert!(!updated.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn end_before_start_is_an_error() {
        let doc = format!("{}\nbody\n{}\n", end_marker("log"), start_marker("log"));
        assert!(replace_region(&doc, "log", "x").is_err());
    }

    #[test]
    fn duplicated_region_is_an_error() {
        let doc = format!("{}\n{}", region("log", "a"), region("log", "b"));
        assert!(replace_region(&doc, "log", "x").is_err());
    }

    #[test]
    fn empty_body_collapses_region() {
        let updated = replace_region(&sample(), "stats", "").unwrap().unwrap();
        assert!(updated.contains(&format!("{}\n{}", start_marker("stats"), end_marker("stats"))));
        assert_eq!(updated, sample().replace("old body\n", ""));
    }

    #[test]
    fn region_helper_round_trips_through_replace() {
        let doc = region("milestones", "- [ ] 7 days");
        let updated = replace_region(&doc, "milestones", "- [x] 7 days").unwrap().unwrap();
        assert_eq!(updated, region("milestones", "- [x] 7 days"));
    }
}
