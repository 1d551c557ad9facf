//! Search query builder
//!
//! Omnivore's search endpoint takes one free-text query string. Label filters
//! are expressed inline as `label:<name>` terms; the final query is always
//! `in:all <label fragment> sort:saved`.
//!
//! Label names are inserted verbatim. A label containing reserved query
//! syntax (quotes, colons) produces a malformed query; this mirrors the
//! service's own CLI behavior and is not handled here.

/// Builds an OR-joined fragment matching items with ANY of the given labels
pub fn labels_to_query(labels: &[String]) -> String {
    labels
        .iter()
        .map(|label| format!("label:{}", label))
        .collect::<Vec<_>>()
        .join(" OR ")
}

/// Builds an AND-joined fragment matching items with NONE of the given labels
pub fn skip_labels_to_query(labels: &[String]) -> String {
    labels
        .iter()
        .map(|label| format!("-label:{}", label))
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Assembles the full search query from the configured label lists
///
/// Precedence: a non-empty include list wins and the exclude list is ignored
/// for the run. With both lists empty the query reduces to the base scope and
/// sort directive.
pub fn build_search_query(labels: &[String], skip_labels: &[String]) -> String {
    let fragment = if !labels.is_empty() {
        labels_to_query(labels)
    } else if !skip_labels.is_empty() {
        skip_labels_to_query(skip_labels)
    } else {
        String::new()
    };

    format!("in:all {} sort:saved", fragment)
}
