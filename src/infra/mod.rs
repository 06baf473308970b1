pub mod client;
pub mod db;
pub mod moderation;
pub mod provider;
pub mod wallpaper;
