use crate::error::FetchError;
use crate::utils::sanitize_filename;
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Downloads an image and persists it at a destination path
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<(), FetchError>;
}

/// Local file name for an image URL.
///
/// Uses the text after the last `%` escape (the tail of an encoded origin
/// URL on CDN links), or the last path segment when the URL has no escapes.
/// `.jpg` is appended unless already present.
pub fn image_file_name(url: &str) -> String {
    let segment = match url.rsplit_once('%') {
        Some((_, tail)) => tail,
        None => {
            let path = url.split(['?', '#']).next().unwrap_or(url);
            path.rsplit('/').next().unwrap_or(path)
        }
    };

    let mut name = sanitize_filename(segment);
    if name.is_empty() {
        name.push_str("image");
    }
    if !name.contains(".jpg") {
        name.push_str(".jpg");
    }
    name
}

/// File names already handed out during one run.
///
/// Two images whose URLs share a tail get `_2`, `_3`, ... before the
/// `.jpg` so neither overwrites the other.
#[derive(Debug, Default)]
pub struct ImageNames {
    used: HashSet<String>,
}

impl ImageNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a file name for `url` that no earlier image in this run uses
    pub fn claim(&mut self, url: &str) -> String {
        let base = image_file_name(url);
        let mut name = base.clone();
        let mut n = 2;
        while !self.used.insert(name.clone()) {
            name = match base.rfind(".jpg") {
                Some(idx) => format!("{}_{}{}", &base[..idx], n, &base[idx..]),
                None => format!("{}_{}", base, n),
            };
            n += 1;
        }
        name
    }
}

/// Image fetcher backed by an HTTP client
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<(), FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(url.to_string()));
        }

        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(destination, &bytes).await?;
        ::log::debug!("Saved {} bytes from {} to {}", bytes.len(), url, destination.display());
        Ok(())
    }
}

/// Download an article image into `image_dir` under a name from `names`.
///
/// Returns the saved path, or `None` when there was no URL or the download
/// failed. Failures are logged, never propagated.
pub async fn save_article_image(
    fetcher: &dyn ImageFetcher,
    image_url: Option<&str>,
    image_dir: &Path,
    names: &mut ImageNames,
) -> Option<PathBuf> {
    let url = image_url?;
    let destination = image_dir.join(names.claim(url));

    match fetcher.fetch(url, &destination).await {
        Ok(()) => Some(destination),
        Err(e) => {
            ::log::warn!("Failed to download image {}: {}", url, e);
            None
        }
    }
}
