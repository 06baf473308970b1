use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use thiserror::Error;
use time::OffsetDateTime;

use crate::app::auth::Credentials;
use crate::app::records::{RecordStore, RecordStoreError};
use crate::app::upstream::UpstreamError;
use crate::domain::media::MediaRecord;
use crate::domain::moderation::ModerationScores;

/// Name of the multipart field that carries the uploaded bytes.
pub const FILE_FIELD: &str = "file";

/// One part of an inbound multipart form, kept verbatim for forwarding.
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    fields: Vec<FormField>,
}

impl UploadForm {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// The first `file` field, unless it is an empty text value.
    pub fn file(&self) -> Option<&FormField> {
        self.fields
            .iter()
            .find(|field| field.name == FILE_FIELD)
            .filter(|field| field.file_name.is_some() || !field.data.is_empty())
    }
}

/// Where the provider put an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedMedia {
    /// Provider-assigned resource path, always starting with `/`.
    pub path: String,
    /// Fully qualified URL of the resource on the provider origin.
    pub provider_url: String,
}

#[async_trait]
pub trait UploadForwarder: Send + Sync {
    async fn forward(&self, form: &UploadForm) -> Result<HostedMedia, UpstreamError>;
}

#[async_trait]
pub trait ModerationScorer: Send + Sync {
    async fn score(&self, provider_url: &str) -> Result<ModerationScores, UpstreamError>;
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("missing file")]
    MissingFile,
    #[error("invalid or missing credentials")]
    Unauthorized,
    #[error("content rejected by moderation (score {score} > {threshold})")]
    ContentRejected { score: f64, threshold: f64 },
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error(transparent)]
    Store(#[from] RecordStoreError),
}

/// Moderation settings; absent when no scoring endpoint is configured.
#[derive(Clone)]
pub struct Moderation {
    pub scorer: Arc<dyn ModerationScorer>,
    pub threshold: f64,
}

#[derive(Clone)]
pub struct UploadPipeline {
    forwarder: Arc<dyn UploadForwarder>,
    moderation: Option<Moderation>,
    records: Arc<dyn RecordStore>,
    credentials: Credentials,
    enable_auth: bool,
    domain: String,
}

impl UploadPipeline {
    pub fn new(
        forwarder: Arc<dyn UploadForwarder>,
        moderation: Option<Moderation>,
        records: Arc<dyn RecordStore>,
        credentials: Credentials,
        enable_auth: bool,
        domain: String,
    ) -> Self {
        Self {
            forwarder,
            moderation,
            records,
            credentials,
            enable_auth,
            domain,
        }
    }

    /// Runs one upload through file check, auth, forwarding, moderation and
    /// persistence. Each step is attempted once.
    pub async fn run(
        &self,
        form: &UploadForm,
        authorization: Option<&str>,
    ) -> Result<MediaRecord, UploadError> {
        if form.file().is_none() {
            return Err(UploadError::MissingFile);
        }

        if self.enable_auth && !self.credentials.verify(authorization) {
            return Err(UploadError::Unauthorized);
        }

        let hosted = self.forwarder.forward(form).await?;
        tracing::debug!(key = %hosted.path, "upload forwarded to provider");

        if let Some(ref moderation) = self.moderation {
            let scores = moderation.scorer.score(&hosted.provider_url).await?;
            if scores.exceeds(moderation.threshold) {
                tracing::warn!(
                    key = %hosted.path,
                    score = scores.total(),
                    threshold = moderation.threshold,
                    "upload rejected by moderation"
                );
                return Err(UploadError::ContentRejected {
                    score: scores.total(),
                    threshold: moderation.threshold,
                });
            }
        }

        let record = MediaRecord::new(hosted.path, now_millis(), &self.domain);
        self.records.insert(&record).await?;
        tracing::info!(key = %record.key, url = %record.url, "media record stored");

        Ok(record)
    }
}

pub fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
