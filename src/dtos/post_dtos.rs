use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One image the client attaches to a new post, base64-encoded the same way
/// the app uploads every picture.
#[derive(Debug, Deserialize)]
pub struct ImagePayload {
    pub file_name: String,
    pub content_type: String,
    /// base64 payload, optionally prefixed with a data URL header
    pub image_data: String,
}

#[derive(Debug, Deserialize)]
pub struct PostWriteRequest {
    #[serde(rename = "type")]
    pub post_type: String,
    pub title: String,
    pub price: i32,
    pub content: String,
    pub distance: String,
    pub category: String,
    pub location_name: String,
    pub location_latitude: f64,
    pub location_longitude: f64,
    #[serde(default)]
    pub images: Vec<ImagePayload>,
}

/// Query string of GET /posts. Only `type` is required; the service layer
/// parses the raw strings into the closed filter enums.
#[derive(Debug, Deserialize)]
pub struct PostListQuery {
    #[serde(rename = "type")]
    pub post_type: String,
    pub category: Option<String>,
    pub radius: Option<String>,
    pub keyword: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostCreateResponse {
    pub post_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct PostDetailResponse {
    pub is_my_post: bool,
    pub writer_id: Uuid,
    pub writer_nickname: String,
    /// empty string when the writer never set one, never null
    pub writer_profile_image: String,
    pub distance: String,
    pub category: String,
    pub title: String,
    pub create_at: NaiveDateTime,
    pub content: String,
    pub price: i32,
    pub location_name: String,
    pub location_latitude: f64,
    pub location_longitude: f64,
    pub image_urls: Vec<String>,
}

/// Preview row for a user's own post history page.
#[derive(Debug, Serialize)]
pub struct PostPreviewResponse {
    pub post_id: Uuid,
    pub title: String,
    pub price: i32,
    pub preview_image: Option<String>,
    pub location_name: String,
    pub post_type: String,
    pub post_status: String,
    pub review_id: Option<Uuid>,
}

/// Preview row for the filtered browse feed.
#[derive(Debug, Serialize)]
pub struct FilteredPostPreviewResponse {
    pub post_id: Uuid,
    pub title: String,
    pub price: i32,
    pub preview_image: Option<String>,
    pub location_name: String,
    pub post_type: String,
    pub post_status: String,
}
