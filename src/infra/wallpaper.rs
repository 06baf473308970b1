use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::app::upstream::UpstreamError;
use crate::app::wallpaper::{Wallpaper, WallpaperFeed};

const SERVICE: &str = "bing";

#[derive(Debug, Deserialize)]
struct Archive {
    images: Vec<ArchiveImage>,
}

#[derive(Debug, Deserialize)]
struct ArchiveImage {
    url: String,
}

/// Bing's daily image archive.
#[derive(Clone)]
pub struct BingClient {
    http: reqwest::Client,
    archive_url: Url,
}

impl BingClient {
    pub fn new(http: reqwest::Client, archive_url: Url) -> Self {
        Self { http, archive_url }
    }
}

#[async_trait]
impl WallpaperFeed for BingClient {
    async fn latest(&self) -> Result<Vec<Wallpaper>, UpstreamError> {
        let response = self
            .http
            .get(self.archive_url.clone())
            .send()
            .await
            .map_err(|err| UpstreamError::transport(SERVICE, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::status(SERVICE, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| UpstreamError::transport(SERVICE, err))?;
        parse_archive(&self.archive_url, &body)
    }
}

/// Archive image URLs are origin-relative; prefix them with the archive's origin.
pub fn parse_archive(archive_url: &Url, body: &[u8]) -> Result<Vec<Wallpaper>, UpstreamError> {
    let archive: Archive = serde_json::from_slice(body)
        .map_err(|err| UpstreamError::invalid_response(SERVICE, err.to_string()))?;
    let origin = archive_url.origin().ascii_serialization();

    Ok(archive
        .images
        .into_iter()
        .map(|image| Wallpaper {
            url: format!("{}{}", origin, image.url),
        })
        .collect())
}
