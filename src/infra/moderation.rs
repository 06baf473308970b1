use async_trait::async_trait;

use crate::app::upload::ModerationScorer;
use crate::app::upstream::UpstreamError;
use crate::domain::moderation::ModerationScores;

const SERVICE: &str = "moderation";

/// Client for an NSFW scoring endpoint taking the image URL as `?url=`.
#[derive(Clone)]
pub struct NsfwApiClient {
    http: reqwest::Client,
    endpoint: String,
}

impl NsfwApiClient {
    pub fn new(http: reqwest::Client, endpoint: String) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl ModerationScorer for NsfwApiClient {
    async fn score(&self, provider_url: &str) -> Result<ModerationScores, UpstreamError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("url", provider_url)])
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
        serde_json::from_slice(&body)
            .map_err(|err| UpstreamError::invalid_response(SERVICE, err.to_string()))
    }
}
