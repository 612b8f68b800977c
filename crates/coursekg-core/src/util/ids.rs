//! Node ID and course-code utilities.
//!
//! Every node in the course graph carries a type prefix in its ID:
//! `course_`, `prof_`, or `topic_`. These helpers build those IDs from
//! human-readable keys, infer the node kind back from an ID, and derive
//! display labels. Course codes are normalized to the spaced
//! `SUBJ 1234` form used in the catalog.

use regex::Regex;
use std::sync::LazyLock;

/// ID prefix for course nodes.
pub const COURSE_PREFIX: &str = "course_";
/// ID prefix for professor nodes.
pub const PROFESSOR_PREFIX: &str = "prof_";
/// ID prefix for topic nodes.
pub const TOPIC_PREFIX: &str = "topic_";

static COURSE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z]{2,4})\s*(\d{4})\b").expect("Invalid course code regex"));

/// Normalize a raw course code to `SUBJ 1234` form.
///
/// Handles the artifacts seen in scraped schedules: a trailing `Details`
/// link label, a repeated subject token (`CSCI CSCI 1012`), a section
/// suffix (`1012.10`), and a missing space (`CSCI1012`).
///
/// # Examples
///
/// ```
/// use coursekg_core::util::ids::normalize_course_code;
///
/// assert_eq!(normalize_course_code("CSCI 1010"), "CSCI 1010");
/// assert_eq!(normalize_course_code("CSCI CSCI 1012.10 Details"), "CSCI 1012");
/// assert_eq!(normalize_course_code("csci6221"), "CSCI 6221");
/// assert_eq!(normalize_course_code("  DATS   6101 "), "DATS 6101");
/// ```
pub fn normalize_course_code(raw: &str) -> String {
    let cleaned = raw.replace("Details", " ");
    let mut parts: Vec<String> = cleaned.split_whitespace().map(str::to_uppercase).collect();

    if parts.len() >= 2 && parts[0] == parts[1] {
        parts.remove(0);
    }

    let joined = parts.join(" ");
    let without_section = match joined.split_once('.') {
        Some((head, _section)) => head.to_string(),
        None => joined,
    };

    match COURSE_CODE_RE.captures(&without_section) {
        Some(caps) => format!("{} {}", &caps[1], &caps[2]),
        None => without_section.trim().to_string(),
    }
}

/// Find every course code mentioned in free text, in order of appearance.
///
/// Codes are returned normalized; duplicates are kept out.
///
/// ```
/// use coursekg_core::util::ids::extract_course_codes;
///
/// let codes = extract_course_codes("Prerequisites: CSCI 1011 and CSCI1012; or CSCI 1011.");
/// assert_eq!(codes, vec!["CSCI 1011", "CSCI 1012"]);
/// ```
pub fn extract_course_codes(text: &str) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for caps in COURSE_CODE_RE.captures_iter(text) {
        let code = format!("{} {}", &caps[1], &caps[2]);
        if !codes.contains(&code) {
            codes.push(code);
        }
    }
    codes
}

/// Build the node ID for a course code (`CSCI 1010` → `course_CSCI1010`).
pub fn course_node_id(code: &str) -> String {
    let compact: String = normalize_course_code(code)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    format!("{COURSE_PREFIX}{compact}")
}

/// Build the node ID for a professor display name.
pub fn professor_node_id(name: &str) -> String {
    format!("{PROFESSOR_PREFIX}{}", name.trim())
}

/// Build the node ID for a topic label (labels are lowercased).
pub fn topic_node_id(label: &str) -> String {
    format!("{TOPIC_PREFIX}{}", label.trim().to_lowercase())
}

/// Infer a node kind name from an ID prefix.
///
/// Returns `"course"`, `"professor"`, or `"topic"`, or `None` for IDs
/// without a recognized prefix.
pub fn infer_node_kind(id: &str) -> Option<&'static str> {
    if id.starts_with(COURSE_PREFIX) {
        Some("course")
    } else if id.starts_with(PROFESSOR_PREFIX) {
        Some("professor")
    } else if id.starts_with(TOPIC_PREFIX) {
        Some("topic")
    } else {
        None
    }
}

/// Derive a display label by stripping the first `_`-delimited segment.
///
/// ```
/// use coursekg_core::util::ids::display_label;
///
/// assert_eq!(display_label("course_CSCI1010"), "CSCI1010");
/// assert_eq!(display_label("topic_machine_learning"), "machine_learning");
/// assert_eq!(display_label("standalone"), "standalone");
/// ```
pub fn display_label(id: &str) -> &str {
    match id.split_once('_') {
        Some((_prefix, rest)) => rest,
        None => id,
    }
}
