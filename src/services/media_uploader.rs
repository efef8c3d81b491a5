use base64::{Engine as _, engine::general_purpose};
use log::debug;
use reqwest::Client;
use urlencoding::encode;

use crate::dtos::post_dtos::ImagePayload;
use crate::error::ApiError;

const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Writes image payloads to Supabase Storage and hands back public URLs,
/// in the same order the payloads came in.
#[derive(Clone)]
pub struct MediaUploader {
    client: Client,
    storage_url: String,
    service_key: String,
    bucket: String,
}

impl MediaUploader {
    pub fn new(client: Client, supabase_url: &str, service_key: &str, bucket: &str) -> Self {
        Self {
            client,
            storage_url: format!("{}/storage/v1", supabase_url.trim_end_matches('/')),
            service_key: service_key.trim().to_string(),
            bucket: bucket.to_string(),
        }
    }

    pub fn new_from_env(client: Client) -> Self {
        let supabase_url = std::env::var("SUPABASE_URL").expect("SUPABASE_URL must be set");
        let service_key = std::env::var("SUPABASE_SERVICE_ROLE_KEY")
            .expect("SUPABASE_SERVICE_ROLE_KEY must be set");
        let bucket =
            std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| "post-images".to_string());
        Self::new(client, &supabase_url, &service_key, &bucket)
    }

    pub async fn upload_many(
        &self,
        payloads: &[ImagePayload],
        prefix: &str,
    ) -> Result<Vec<String>, ApiError> {
        let mut urls = Vec::with_capacity(payloads.len());
        for (index, payload) in payloads.iter().enumerate() {
            urls.push(self.upload_one(payload, prefix, index + 1).await?);
        }
        Ok(urls)
    }

    async fn upload_one(
        &self,
        payload: &ImagePayload,
        prefix: &str,
        sequence: usize,
    ) -> Result<String, ApiError> {
        let content_type = validate_content_type(&payload.content_type)?;
        let bytes = decode_image_data(&payload.image_data)?;
        let key = format!("{}/{}.{}", prefix, sequence, extension_for(content_type));
        debug!("uploading {} as {}", payload.file_name, key);

        let url = format!(
            "{}/object/{}/{}",
            self.storage_url,
            encode(&self.bucket),
            object_path(&key)
        );

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", &self.service_key))
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Upstream(format!(
                "storage upload failed: {} {}",
                status, body
            )));
        }

        Ok(format!(
            "{}/object/public/{}/{}",
            self.storage_url,
            encode(&self.bucket),
            object_path(&key)
        ))
    }
}

fn object_path(key: &str) -> String {
    key.split('/')
        .map(|segment| encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn validate_content_type(raw: &str) -> Result<&str, ApiError> {
    let parsed: mime::Mime = raw
        .parse()
        .map_err(|_| ApiError::Validation(format!("invalid content type: {}", raw)))?;

    if parsed.type_() != mime::IMAGE || !ALLOWED_IMAGE_TYPES.contains(&raw) {
        return Err(ApiError::Validation(
            "invalid file type, only JPEG, PNG, GIF and WEBP are allowed".to_string(),
        ));
    }
    Ok(raw)
}

fn decode_image_data(data: &str) -> Result<Vec<u8>, ApiError> {
    // clients sometimes send the whole data URL (data:image/jpeg;base64,...)
    let base64_data = match data.split_once(',') {
        Some((head, rest)) if head.starts_with("data:") => rest,
        _ => data,
    };

    general_purpose::STANDARD
        .decode(base64_data)
        .map_err(|_| ApiError::Validation("invalid base64 image data".to_string()))
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "jpg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_follows_content_type() {
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("image/jpg"), "jpg");
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("image/gif"), "gif");
        assert_eq!(extension_for("image/webp"), "webp");
    }

    #[test]
    fn decode_accepts_plain_base64() {
        let decoded = decode_image_data("aGVsbG8=").unwrap();
        assert_eq!(decoded, b"hello");
    }

    #[test]
    fn decode_strips_data_url_prefix() {
        let decoded = decode_image_data("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(decoded, b"hello");
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            decode_image_data("this is not base64!!!"),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn content_type_allow_list() {
        assert!(validate_content_type("image/png").is_ok());
        assert!(validate_content_type("image/webp").is_ok());
        assert!(matches!(
            validate_content_type("image/svg+xml"),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            validate_content_type("application/json"),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            validate_content_type("not a mime"),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn object_path_encodes_segments_but_keeps_separators() {
        assert_eq!(object_path("posts/abc/1.jpg"), "posts/abc/1.jpg");
        assert_eq!(object_path("posts/a b/1.jpg"), "posts/a%20b/1.jpg");
    }
}
