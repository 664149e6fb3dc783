use crate::error::{ErrorType, IntoResult};
use crate::{utils, Result};
use anyhow::Context;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Where a CSV data file is read from: a local file or an HTTP(S) URL.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Source {
    File(PathBuf),
    Url(Url),
}

impl Source {
    /// Interprets `value` as a URL if it starts with `http://` or `https://`, otherwise as a path.
    /// Relative paths are resolved against `root`.
    pub fn resolve(root: &Path, value: &str) -> Result<Self> {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            let url = Url::parse(value).with_context(|| format!("Invalid source URL '{value}'"))?;
            return Ok(Source::Url(url));
        }
        let path = PathBuf::from(value);
        if path.is_absolute() {
            Ok(Source::File(path))
        } else {
            Ok(Source::File(root.join(path)))
        }
    }

    /// The local path, if this is a file source.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Source::File(p) => Some(p),
            Source::Url(_) => None,
        }
    }

    /// Reads the full text of the source. URLs are fetched without caching.
    pub async fn fetch_text(&self) -> Result<String> {
        debug!("Fetching {self}");
        match self {
            Source::File(path) => utils::read(path).await.pub_result(ErrorType::Source),
            Source::Url(url) => fetch_url(url).await.pub_result(ErrorType::Source),
        }
    }
}

async fn fetch_url(url: &Url) -> Result<String> {
    let response = reqwest::Client::new()
        .get(url.clone())
        .header(CACHE_CONTROL, "no-cache")
        .header(PRAGMA, "no-cache")
        .send()
        .await
        .with_context(|| format!("Request to {url} failed"))?;

    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("Request to {url} failed with status {status}");
    }
    response
        .text()
        .await
        .with_context(|| format!("Unable to read the response body from {url}"))
}

impl Display for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::File(p) => write!(f, "{}", p.display()),
            Source::Url(u) => write!(f, "{u}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_type;
    use tempfile::TempDir;

    #[test]
    fn test_resolve() {
        let root = Path::new("/home/me/expense-insights");
        assert_eq!(
            Source::resolve(root, "data/history.csv").unwrap(),
            Source::File(root.join("data/history.csv"))
        );
        assert_eq!(
            Source::resolve(root, "/tmp/x.csv").unwrap(),
            Source::File(PathBuf::from("/tmp/x.csv"))
        );
        let url = Source::resolve(root, "https://example.com/a.csv").unwrap();
        assert!(matches!(url, Source::Url(_)));
        assert_eq!(url.path(), None);
        assert_eq!(url.to_string(), "https://example.com/a.csv");
        assert!(Source::resolve(root, "https://").is_err());
    }

    #[tokio::test]
    async fn test_fetch_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.csv");
        utils::write(&path, "Month,Date\n").await.unwrap();
        let source = Source::File(path);
        assert_eq!(source.fetch_text().await.unwrap(), "Month,Date\n");
    }

    #[tokio::test]
    async fn test_fetch_missing_file() {
        let dir = TempDir::new().unwrap();
        let source = Source::File(dir.path().join("missing.csv"));
        let e = source.fetch_text().await.unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::Source));
    }
}
