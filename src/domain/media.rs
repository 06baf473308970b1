use serde::{Deserialize, Serialize};

/// One accepted upload. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub key: String,
    /// Milliseconds since the Unix epoch at insertion time.
    pub timestamp: i64,
    pub url: String,
}

impl MediaRecord {
    pub fn new(key: impl Into<String>, timestamp: i64, domain: &str) -> Self {
        let key = key.into();
        let url = public_url(domain, &key);
        Self { key, timestamp, url }
    }

    pub fn is_video(&self) -> bool {
        self.url
            .rsplit('.')
            .next()
            .map(|ext| ext.eq_ignore_ascii_case("mp4"))
            .unwrap_or(false)
    }
}

/// Public URL for a provider key on this service's domain.
pub fn public_url(domain: &str, key: &str) -> String {
    format!("https://{}{}", domain, key)
}
