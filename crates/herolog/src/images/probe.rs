//! Best-effort image URL probing.
//!
//! A successful probe only means an image decoder accepted the bytes served
//! at the URL. It says nothing about content type headers or permanence.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, trace};

use super::url::DEFAULT_EXTENSION;
use crate::error::Result;

/// Extensions tried, in order, when a `.png` URL fails to load.
const FALLBACK_EXTENSIONS: [&str; 2] = [".jpg", ".gif"];

/// Something that can attempt to load a URL as an image.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    /// Returns `true` if the URL served a decodable image.
    async fn load(&self, url: &str) -> bool;
}

/// Loads images over HTTP and checks that the body decodes.
#[derive(Debug, Clone)]
pub struct HttpImageLoader {
    client: reqwest::Client,
}

impl HttpImageLoader {
    /// Build a loader with an optional per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("herolog/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn load(&self, url: &str) -> bool {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(url = %url, error = %e, "Image request failed");
                return false;
            }
        };

        if !response.status().is_success() {
            debug!(url = %url, status = %response.status(), "Image request rejected");
            return false;
        }

        let Ok(bytes) = response.bytes().await else {
            return false;
        };

        tokio::task::spawn_blocking(move || image::load_from_memory(&bytes).is_ok())
            .await
            .unwrap_or(false)
    }
}

/// Outcome of [`probe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// Whether any candidate URL loaded.
    pub success: bool,
    /// The URL that loaded, or the original URL when none did.
    pub url: String,
}

/// Try to load `url` as an image.
///
/// When the URL ends in `.png` and fails, `.jpg` and then `.gif` are tried in
/// its place.
pub async fn probe<L>(loader: &L, url: &str) -> ProbeResult
where
    L: ImageLoader + ?Sized,
{
    trace!(url = %url, "Probing image");
    if loader.load(url).await {
        return ProbeResult {
            success: true,
            url: url.to_string(),
        };
    }

    if let Some(stem) = url.strip_suffix(DEFAULT_EXTENSION) {
        for extension in FALLBACK_EXTENSIONS {
            let candidate = format!("{stem}{extension}");
            if loader.load(&candidate).await {
                debug!(url = %url, resolved = %candidate, "Image found under fallback extension");
                return ProbeResult {
                    success: true,
                    url: candidate,
                };
            }
        }
    }

    ProbeResult {
        success: false,
        url: url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use super::*;

    /// Accepts a fixed set of URLs and records every attempt.
    struct ScriptedLoader {
        accepts: HashSet<String>,
        attempts: Mutex<Vec<String>>,
    }

    impl ScriptedLoader {
        fn accepting(urls: &[&str]) -> Self {
            Self {
                accepts: urls.iter().map(ToString::to_string).collect(),
                attempts: Mutex::new(Vec::new()),
            }
        }

        fn attempts(&self) -> Vec<String> {
            self.attempts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ImageLoader for ScriptedLoader {
        async fn load(&self, url: &str) -> bool {
            self.attempts.lock().unwrap().push(url.to_string());
            self.accepts.contains(url)
        }
    }

    #[tokio::test]
    async fn test_probe_direct_success() {
        let loader = ScriptedLoader::accepting(&["https://i.imgur.com/a.png"]);

        let result = probe(&loader, "https://i.imgur.com/a.png").await;

        assert!(result.success);
        assert_eq!(result.url, "https://i.imgur.com/a.png");
        assert_eq!(loader.attempts().len(), 1);
    }

    #[tokio::test]
    async fn test_probe_falls_back_to_jpg() {
        let loader = ScriptedLoader::accepting(&["https://i.imgur.com/a.jpg"]);

        let result = probe(&loader, "https://i.imgur.com/a.png").await;

        assert!(result.success);
        assert_eq!(result.url, "https://i.imgur.com/a.jpg");
    }

    #[tokio::test]
    async fn test_probe_falls_back_to_gif_after_jpg() {
        let loader = ScriptedLoader::accepting(&["https://i.imgur.com/a.gif"]);

        let result = probe(&loader, "https://i.imgur.com/a.png").await;

        assert!(result.success);
        assert_eq!(result.url, "https://i.imgur.com/a.gif");
        assert_eq!(
            loader.attempts(),
            vec![
                "https://i.imgur.com/a.png",
                "https://i.imgur.com/a.jpg",
                "https://i.imgur.com/a.gif",
            ]
        );
    }

    #[tokio::test]
    async fn test_probe_total_failure_returns_original() {
        let loader = ScriptedLoader::accepting(&[]);

        let result = probe(&loader, "https://i.imgur.com/a.png").await;

        assert!(!result.success);
        assert_eq!(result.url, "https://i.imgur.com/a.png");
        assert_eq!(loader.attempts().len(), 3);
    }

    #[tokio::test]
    async fn test_probe_no_fallback_for_other_extensions() {
        let loader = ScriptedLoader::accepting(&["https://example.com/a.png"]);

        let result = probe(&loader, "https://example.com/a.jpg").await;

        assert!(!result.success);
        assert_eq!(loader.attempts(), vec!["https://example.com/a.jpg"]);
    }

    #[test]
    fn test_http_loader_builds() {
        assert!(HttpImageLoader::new(Some(Duration::from_secs(1))).is_ok());
        assert!(HttpImageLoader::new(None).is_ok());
    }
}
