use async_trait::async_trait;
use axum::http::{HeaderMap, StatusCode};
use bytes::Bytes;
use futures::stream::BoxStream;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

use crate::app::records::{RecordStore, RecordStoreError};
use crate::app::upstream::UpstreamError;
use crate::domain::media::MediaRecord;

pub type ByteStream = BoxStream<'static, Result<Bytes, std::io::Error>>;

/// An upstream response relayed back to the client.
pub struct ProxiedMedia {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ByteStream,
}

#[async_trait]
pub trait MediaOrigin: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<ProxiedMedia, UpstreamError>;
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error(transparent)]
    Store(#[from] RecordStoreError),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("stored url {url} cannot be proxied: {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[derive(Clone)]
pub struct MediaService {
    records: Arc<dyn RecordStore>,
    origin: Arc<dyn MediaOrigin>,
    origin_host: String,
}

impl MediaService {
    pub fn new(
        records: Arc<dyn RecordStore>,
        origin: Arc<dyn MediaOrigin>,
        origin_host: String,
    ) -> Self {
        Self {
            records,
            origin,
            origin_host,
        }
    }

    /// Looks up `key` and relays the provider's copy. `None` when no record matches.
    pub async fn serve(&self, key: &str) -> Result<Option<ProxiedMedia>, MediaError> {
        let Some(record) = self.records.find_by_key(key).await? else {
            return Ok(None);
        };

        let url = origin_url(&record, &self.origin_host)?;
        let media = self.origin.fetch(&url).await?;
        Ok(Some(media))
    }
}

/// The record's public URL with its host swapped for the provider origin.
pub fn origin_url(record: &MediaRecord, origin_host: &str) -> Result<Url, MediaError> {
    let invalid = |reason: String| MediaError::InvalidUrl {
        url: record.url.clone(),
        reason,
    };

    let mut url = Url::parse(&record.url).map_err(|err| invalid(err.to_string()))?;
    url.set_host(Some(origin_host))
        .map_err(|err| invalid(err.to_string()))?;
    url.set_port(None)
        .map_err(|_| invalid("url cannot carry a port".to_string()))?;
    Ok(url)
}
