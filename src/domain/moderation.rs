use serde::{Deserialize, Serialize};

/// Category scores returned by the moderation service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModerationScores {
    #[serde(rename = "Porn")]
    pub porn: f64,
    #[serde(rename = "Sexy")]
    pub sexy: f64,
    #[serde(rename = "Hentai")]
    pub hentai: f64,
}

impl ModerationScores {
    pub fn total(&self) -> f64 {
        self.porn + self.sexy + self.hentai
    }

    /// A score equal to the threshold still passes.
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.total() > threshold
    }
}
