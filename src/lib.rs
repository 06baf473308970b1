pub mod app;
pub mod config;
pub mod domain;
pub mod http;
pub mod infra;

use std::sync::Arc;

use crate::app::auth::Credentials;
use crate::app::media::MediaOrigin;
use crate::app::records::RecordStore;
use crate::app::upload::{Moderation, UploadForwarder};
use crate::app::wallpaper::WallpaperFeed;

#[derive(Clone)]
pub struct AppState {
    pub records: Arc<dyn RecordStore>,
    pub forwarder: Arc<dyn UploadForwarder>,
    pub origin: Arc<dyn MediaOrigin>,
    pub moderation: Option<Moderation>,
    pub wallpapers: Arc<dyn WallpaperFeed>,
    pub credentials: Credentials,
    pub enable_auth: bool,
    pub domain: String,
    pub admin_path: String,
    pub provider_origin_host: String,
    pub upload_max_bytes: usize,
}
