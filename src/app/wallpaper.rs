use async_trait::async_trait;
use serde::Serialize;

use crate::app::upstream::UpstreamError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wallpaper {
    pub url: String,
}

/// Source of landing page background images.
#[async_trait]
pub trait WallpaperFeed: Send + Sync {
    async fn latest(&self) -> Result<Vec<Wallpaper>, UpstreamError>;
}
