//! Wire types for the Omnivore GraphQL API

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One saved document returned by the search endpoint
///
/// Immutable once deserialized; the export driver consumes each item exactly
/// once per run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    /// Remote identifier
    pub id: String,

    /// Document title, used to derive the output filename
    pub title: String,

    /// Source URL the document was saved from
    pub url: String,

    /// When the document was saved
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,

    /// Labels attached to the document
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl SearchItem {
    /// Lowercased label names attached to this item
    pub fn label_names(&self) -> Vec<String> {
        self.labels
            .iter()
            .map(|label| label.name.to_lowercase())
            .collect()
    }
}

/// A label attached to a saved document
#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    pub name: String,
}

/// Top-level GraphQL response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct GraphqlResponse {
    pub data: Option<SearchData>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphqlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchData {
    pub search: SearchResult,
}

/// The `Search` union, flattened: a `SearchSuccess` carries edges and page
/// info, a `SearchError` carries error codes.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchResult {
    #[serde(default)]
    pub edges: Vec<SearchEdge>,
    #[serde(default)]
    pub page_info: Option<PageInfo>,
    #[serde(default)]
    pub error_codes: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchEdge {
    pub node: SearchItem,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}
