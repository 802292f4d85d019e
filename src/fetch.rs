//! Resolving image references to bytes.
//!
//! The EPUB exporter hands every `<img src>` it finds to an [`ImageFetcher`].
//! [`DefaultFetcher`] understands `http(s)://` URLs, `file://` URLs and plain
//! filesystem paths.

use std::path::Path;
use std::sync::OnceLock;

use log::debug;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

use crate::error::{Error, Result};
use crate::util::guess_media_type;

/// Image bytes plus their media type.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub data: Vec<u8>,
    pub media_type: String,
}

/// Source of image bytes for the EPUB exporter.
pub trait ImageFetcher {
    fn fetch(&self, source: &str) -> Result<FetchedImage>;
}

/// Fetches over HTTP(S) with a blocking client, everything else from disk.
///
/// The client is only built on the first HTTP fetch.
#[derive(Debug, Clone, Default)]
pub struct DefaultFetcher {
    client: OnceLock<Client>,
}

impl DefaultFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (timeouts, proxies, user agent).
    pub fn with_client(client: Client) -> Self {
        Self {
            client: OnceLock::from(client),
        }
    }

    fn fetch_http(&self, url: &str) -> Result<FetchedImage> {
        debug!("Downloading image {url}");
        let client = self.client.get_or_init(Client::new);
        let response = client.get(url).send()?.error_for_status()?;

        // Prefer the server's answer, fall back to the URL's extension
        let media_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .filter(|v| v.starts_with("image/"))
            .unwrap_or_else(|| guess_media_type(url_path(url)).to_string());

        let data = response.bytes()?.to_vec();
        Ok(FetchedImage { data, media_type })
    }

    fn fetch_file(&self, path: &str) -> Result<FetchedImage> {
        debug!("Reading image {path}");
        if path.is_empty() {
            return Err(Error::UnsupportedImage(path.to_string()));
        }
        let data = std::fs::read(Path::new(path))?;
        Ok(FetchedImage {
            data,
            media_type: guess_media_type(path).to_string(),
        })
    }
}

impl ImageFetcher for DefaultFetcher {
    fn fetch(&self, source: &str) -> Result<FetchedImage> {
        if source.starts_with("http://") || source.starts_with("https://") {
            self.fetch_http(source)
        } else if let Some(path) = source.strip_prefix("file://") {
            self.fetch_file(path)
        } else if source.starts_with("data:") || source.contains("://") {
            Err(Error::UnsupportedImage(source.to_string()))
        } else {
            self.fetch_file(source)
        }
    }
}

/// Path component of a URL, without query string or fragment.
pub(crate) fn url_path(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_url_path() {
        assert_eq!(url_path("https://x.org/a/b.png?w=10"), "https://x.org/a/b.png");
        assert_eq!(url_path("https://x.org/a.jpg#frag"), "https://x.org/a.jpg");
        assert_eq!(url_path("plain.gif"), "plain.gif");
    }

    #[test]
    fn test_fetch_local_file() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"\x89PNG").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let fetcher = DefaultFetcher::new();
        let image = fetcher.fetch(&path).unwrap();
        assert_eq!(image.data, b"\x89PNG");
        assert_eq!(image.media_type, "image/png");

        let image = fetcher.fetch(&format!("file://{path}")).unwrap();
        assert_eq!(image.data, b"\x89PNG");
    }

    #[test]
    fn test_unsupported_sources() {
        let fetcher = DefaultFetcher::new();
        assert!(matches!(
            fetcher.fetch("data:image/png;base64,AAAA"),
            Err(Error::UnsupportedImage(_))
        ));
        assert!(matches!(
            fetcher.fetch("ftp://host/img.png"),
            Err(Error::UnsupportedImage(_))
        ));
        assert!(matches!(fetcher.fetch(""), Err(Error::UnsupportedImage(_))));
    }

    #[test]
    fn test_client_built_on_first_http_fetch() {
        let fetcher = DefaultFetcher::new();
        assert!(fetcher.client.get().is_none());

        let _ = fetcher.fetch("/definitely/not/here.png");
        let _ = fetcher.fetch("data:image/png;base64,AAAA");
        assert!(fetcher.client.get().is_none());

        let fetcher = DefaultFetcher::with_client(Client::new());
        assert!(fetcher.client.get().is_some());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let fetcher = DefaultFetcher::new();
        assert!(matches!(
            fetcher.fetch("/definitely/not/here.png"),
            Err(Error::Io(_))
        ));
    }
}
