pub mod auth;
pub mod media;
pub mod records;
pub mod upload;
pub mod upstream;
pub mod wallpaper;
