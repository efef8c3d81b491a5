pub mod media_uploader;
pub mod post_filter;
pub mod post_service;
