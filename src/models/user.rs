use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Row from `users`. Credentials are not stored here; the auth provider
/// issues the tokens and this service only verifies them.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub nickname: String,
    pub profile_image: Option<String>,
    pub location_latitude: f64,
    pub location_longitude: f64,
    pub created_at: Option<NaiveDateTime>,
}

/// Claims carried by the access tokens the app sends.
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    /// subject / user id
    pub sub: String,
    pub exp: u64,
    pub iat: Option<u64>,
    pub role: Option<String>,
    pub email: Option<String>,
}
