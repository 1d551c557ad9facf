//! GraphQL search client

use super::types::{GraphqlResponse, SearchItem};
use crate::{ExportError, Result};
use reqwest::Client as HttpClient;
use std::time::Duration;

/// Results requested per page; the API caps page size around this value
const PAGE_SIZE: u32 = 100;

/// The search operation. Only fields the exporter consumes are selected.
const SEARCH_QUERY: &str = r#"
query Search($query: String, $first: Int, $after: String) {
  search(query: $query, first: $first, after: $after) {
    ... on SearchSuccess {
      edges {
        node {
          id
          title
          url
          savedAt
          labels { name }
        }
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
    ... on SearchError {
      errorCodes
    }
  }
}
"#;

/// Options for constructing a [`Client`]
#[derive(Debug, Clone)]
pub struct ClientOpts {
    /// API bearer token
    pub token: String,
    /// GraphQL endpoint URL
    pub api_url: String,
}

/// Options for a search call
#[derive(Debug, Clone)]
pub struct SearchOpts {
    /// Free-text search query, label filters inline
    pub query: String,
}

/// Omnivore API client
#[derive(Debug, Clone)]
pub struct Client {
    http: HttpClient,
    token: String,
    api_url: String,
}

impl Client {
    /// Builds a client with the exporter's user agent and sane timeouts
    pub fn new(opts: ClientOpts) -> Result<Self> {
        let user_agent = format!("omnivore-export/{}", env!("CARGO_PKG_VERSION"));

        let http = HttpClient::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            http,
            token: opts.token,
            api_url: opts.api_url,
        })
    }

    /// Runs one search and returns all matching items in service order
    ///
    /// Follows the endpoint's native cursor pagination until `hasNextPage`
    /// is false, concatenating pages in the order the service returns them.
    pub async fn search(&self, opts: SearchOpts) -> Result<Vec<SearchItem>> {
        let mut items = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let page = self.search_page(&opts.query, after.as_deref()).await?;

            items.extend(page.items);

            match page.next_cursor {
                Some(cursor) => after = Some(cursor),
                None => break,
            }
        }

        tracing::debug!(count = items.len(), "search complete");
        Ok(items)
    }

    async fn search_page(&self, query: &str, after: Option<&str>) -> Result<SearchPage> {
        let body = serde_json::json!({
            "query": SEARCH_QUERY,
            "variables": {
                "query": query,
                "first": PAGE_SIZE,
                "after": after,
            },
        });

        tracing::debug!(?after, "requesting search page");

        let response = self
            .http
            .post(&self.api_url)
            .header("Authorization", &self.token)
            .json(&body)
            .send()
            .await
            .map_err(ExportError::SearchTransport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::SearchStatus {
                status: status.as_u16(),
            });
        }

        let envelope: GraphqlResponse = response
            .json()
            .await
            .map_err(ExportError::SearchTransport)?;

        if !envelope.errors.is_empty() {
            let messages: Vec<String> =
                envelope.errors.into_iter().map(|e| e.message).collect();
            return Err(ExportError::SearchApi {
                message: messages.join("; "),
            });
        }

        let search = envelope
            .data
            .ok_or_else(|| ExportError::SearchApi {
                message: "empty response".to_string(),
            })?
            .search;

        if !search.error_codes.is_empty() {
            return Err(ExportError::SearchApi {
                message: search.error_codes.join(", "),
            });
        }

        let next_cursor = search
            .page_info
            .filter(|info| info.has_next_page)
            .and_then(|info| info.end_cursor);

        Ok(SearchPage {
            items: search.edges.into_iter().map(|edge| edge.node).collect(),
            next_cursor,
        })
    }
}

struct SearchPage {
    items: Vec<SearchItem>,
    next_cursor: Option<String>,
}
