//! Entity resolution: mapping question fragments to graph node IDs.
//!
//! A fragment can match a course by code, any number of professors by
//! name, and any number of topics by label. All matches are unioned into
//! one seed set for the subgraph expander.

use crate::KnowledgeIndex;
use coursekg_core::normalize_course_code;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static QUERY_COURSE_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]{2,4}\s+\d{4}").expect("Invalid course code regex"));

/// Case-insensitive substring test: does `haystack` contain `needle`?
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Case-insensitive containment in either direction.
///
/// ```
/// use coursekg_graph::resolver::matches_bidirectional;
///
/// assert!(matches_bidirectional("Goldfrank", "Goldfrank, J"));
/// assert!(matches_bidirectional("Prof. Goldfrank, J teaches", "goldfrank, j"));
/// assert!(!matches_bidirectional("Smith", "Goldfrank, J"));
/// ```
pub fn matches_bidirectional(a: &str, b: &str) -> bool {
    contains_ci(a, b) || contains_ci(b, a)
}

/// Resolve fragments to the set of node IDs they refer to.
///
/// For each fragment, in order:
/// 1. the course whose code equals the fragment (the normalized `SUBJ 1234`
///    form is tried when the raw fragment misses);
/// 2. every professor whose name contains, or is contained in, the
///    fragment (case-insensitive);
/// 3. every topic whose label occurs in the fragment (case-insensitive).
///
/// Blank fragments match nothing.
pub fn resolve<I, S>(index: &KnowledgeIndex, fragments: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seeds = BTreeSet::new();

    for fragment in fragments {
        let fragment = fragment.as_ref().trim();
        if fragment.is_empty() {
            continue;
        }

        let course = index
            .course(fragment)
            .or_else(|| index.course(&normalize_course_code(fragment)));
        if let Some(node_id) = course {
            seeds.insert(node_id.to_string());
        }

        for (name, node_id) in &index.professor_nodes {
            if !name.trim().is_empty() && matches_bidirectional(fragment, name) {
                seeds.insert(node_id.clone());
            }
        }

        for (label, node_id) in &index.topic_nodes {
            if !label.trim().is_empty() && contains_ci(fragment, label) {
                seeds.insert(node_id.clone());
            }
        }
    }

    log::debug!("Resolved {} seed node(s)", seeds.len());
    seeds
}

/// Pull candidate entity fragments out of a raw question.
///
/// Returns the course codes found (normalized to single-space form, in
/// order of appearance) followed by every keyword from `topic_keywords`
/// that occurs in the query, case-insensitively. Duplicates are dropped.
///
/// ```
/// use coursekg_graph::resolver::extract_entities;
///
/// let keywords = vec!["machine learning".to_string()];
/// let found = extract_entities("Does CSCI  1012 need CSCI 1010 for Machine Learning?", &keywords);
/// assert_eq!(found, vec!["CSCI 1012", "CSCI 1010", "machine learning"]);
/// ```
pub fn extract_entities(query: &str, topic_keywords: &[String]) -> Vec<String> {
    let mut entities: Vec<String> = Vec::new();

    for m in QUERY_COURSE_CODE_RE.find_iter(query) {
        let code = m.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
        if !entities.contains(&code) {
            entities.push(code);
        }
    }

    let lowered = query.to_lowercase();
    for keyword in topic_keywords {
        let keyword = keyword.trim();
        if keyword.is_empty() || !lowered.contains(&keyword.to_lowercase()) {
            continue;
        }
        if !entities.iter().any(|e| e == keyword) {
            entities.push(keyword.to_string());
        }
    }

    entities
}
