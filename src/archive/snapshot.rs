//! In-process single-file snapshot engine
//!
//! Fetches a page and rewrites references to its static subresources
//! (stylesheets, scripts, images) into `data:` URIs, producing one
//! self-contained HTML file. Subresource inlining is best effort: a
//! reference whose fetch fails is left pointing at its original URL.

use crate::{ExportError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use flate2::write::GzEncoder;
use flate2::Compression;
use reqwest::Client as HttpClient;
use scraper::{Html, Selector};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// In-process archiver producing self-contained HTML snapshots
#[derive(Debug)]
pub struct SnapshotArchiver {
    http: HttpClient,
    compress: bool,
}

/// A subresource reference found in the page
#[derive(Debug, Clone, PartialEq)]
struct Subresource {
    /// The attribute value exactly as written in the document
    raw: String,
    /// The resolved absolute URL
    url: Url,
    /// Fallback MIME type when the response carries none
    fallback_mime: &'static str,
}

impl SnapshotArchiver {
    /// Builds the archiver and its HTTP client
    pub fn new(compress: bool) -> Result<Self> {
        let user_agent = format!("omnivore-export/{}", env!("CARGO_PKG_VERSION"));

        let http = HttpClient::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { http, compress })
    }

    /// Archives `url` into the file at `dest`
    ///
    /// Writes through a gzip encoder when compression was enabled at
    /// construction time.
    pub async fn archive(&self, url: &str, dest: &Path) -> Result<()> {
        let html = self.snapshot(url).await?;
        write_output(dest, html.as_bytes(), self.compress)
    }

    /// Fetches `url` and returns the inlined snapshot HTML
    pub async fn snapshot(&self, url: &str) -> Result<String> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ExportError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::FetchStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Resolve relative references against the final URL after redirects.
        let base = response.url().clone();

        let html = response
            .text()
            .await
            .map_err(|source| ExportError::Fetch {
                url: url.to_string(),
                source,
            })?;

        Ok(self.inline_subresources(html, &base).await)
    }

    /// Rewrites each fetchable subresource reference to a `data:` URI
    async fn inline_subresources(&self, html: String, base: &Url) -> String {
        let subresources = collect_subresources(&html, base);
        let mut out = html;

        for subresource in subresources {
            match self.fetch_subresource(&subresource).await {
                Ok(data_uri) => {
                    out = replace_reference(&out, &subresource.raw, &data_uri);
                }
                Err(e) => {
                    tracing::debug!(url = %subresource.url, error = %e, "subresource left as-is");
                }
            }
        }

        out
    }

    async fn fetch_subresource(&self, subresource: &Subresource) -> Result<String> {
        let response = self
            .http
            .get(subresource.url.clone())
            .send()
            .await
            .map_err(|source| ExportError::Fetch {
                url: subresource.url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::FetchStatus {
                url: subresource.url.to_string(),
                status: status.as_u16(),
            });
        }

        let mime = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| subresource.fallback_mime.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ExportError::Fetch {
                url: subresource.url.to_string(),
                source,
            })?;

        Ok(format!("data:{};base64,{}", mime, BASE64.encode(&bytes)))
    }
}

/// Collects stylesheet, script, and image references from the document
///
/// Returns each distinct attribute value once, with its resolved URL.
fn collect_subresources(html: &str, base: &Url) -> Vec<Subresource> {
    let document = Html::parse_document(html);
    let mut seen = Vec::new();
    let mut subresources = Vec::new();

    let targets: [(&str, &str, &'static str); 3] = [
        ("link[rel='stylesheet'][href]", "href", "text/css"),
        ("script[src]", "src", "text/javascript"),
        ("img[src]", "src", "image/png"),
    ];

    for (selector_str, attr, fallback_mime) in targets {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };

        for element in document.select(&selector) {
            let Some(raw) = element.value().attr(attr) else {
                continue;
            };

            if let Some(subresource) = resolve_subresource(raw, base, fallback_mime) {
                if !seen.contains(&subresource.raw) {
                    seen.push(subresource.raw.clone());
                    subresources.push(subresource);
                }
            }
        }
    }

    subresources
}

/// Resolves a reference to an absolute HTTP(S) URL, or rejects it
///
/// Already-inlined `data:` URIs, empty references, and non-HTTP schemes are
/// skipped.
fn resolve_subresource(raw: &str, base: &Url, fallback_mime: &'static str) -> Option<Subresource> {
    let trimmed = raw.trim();

    if trimmed.is_empty() || trimmed.starts_with("data:") {
        return None;
    }

    match base.join(trimmed) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Some(Subresource {
            raw: raw.to_string(),
            url,
            fallback_mime,
        }),
        _ => None,
    }
}

/// Replaces a quoted attribute value with its inlined form
fn replace_reference(html: &str, raw: &str, data_uri: &str) -> String {
    html.replace(
        &format!("\"{}\"", raw),
        &format!("\"{}\"", data_uri),
    )
    .replace(&format!("'{}'", raw), &format!("'{}'", data_uri))
}

/// Writes snapshot bytes to `dest`, through gzip when requested
fn write_output(dest: &Path, bytes: &[u8], compress: bool) -> Result<()> {
    let file = File::create(dest).map_err(|source| ExportError::CreateFile {
        path: dest.to_path_buf(),
        source,
    })?;

    if compress {
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(bytes)?;
        encoder.finish()?;
    } else {
        let mut file = file;
        file.write_all(bytes)?;
    }

    Ok(())
}
