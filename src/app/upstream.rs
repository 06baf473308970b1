use thiserror::Error;

/// Failure talking to a third-party service (provider, moderation, wallpaper feed).
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request to {service} failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} responded with status {status}")]
    Status { service: &'static str, status: u16 },
    #[error("{service} returned an unexpected response: {reason}")]
    InvalidResponse {
        service: &'static str,
        reason: String,
    },
}

impl UpstreamError {
    pub fn transport(service: &'static str, source: reqwest::Error) -> Self {
        Self::Transport { service, source }
    }

    pub fn status(service: &'static str, status: u16) -> Self {
        Self::Status { service, status }
    }

    pub fn invalid_response(service: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            service,
            reason: reason.into(),
        }
    }
}
