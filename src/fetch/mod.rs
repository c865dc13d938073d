// src/fetch/mod.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::fmt;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Where the CSV comes from: an HTTP(S) URL or a path on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Http(Url),
    File(PathBuf),
}

impl Source {
    /// Anything that parses as an `http`/`https` URL is fetched over the
    /// network; everything else is treated as a file path.
    pub fn parse(s: &str) -> Self {
        match Url::parse(s) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Source::Http(url),
            _ => Source::File(PathBuf::from(s)),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Http(url) => write!(f, "{url}"),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetch the whole CSV document as text.
#[instrument(level = "info", skip(client, source), fields(source = %source))]
pub async fn load_source(client: &Client, source: &Source) -> Result<String> {
    let text = match source {
        Source::Http(url) => client
            .get(url.as_str())
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url}"))?
            .text()
            .await
            .with_context(|| format!("reading body from {url}"))?,
        Source::File(path) => fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?,
    };
    info!(bytes = text.len(), "csv loaded");
    Ok(text)
}
