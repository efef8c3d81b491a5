use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures::future::{Ready, ready};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::user::JwtClaims;

/// The authenticated caller, resolved from the Authorization header.
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

/// Verifies HS256 access tokens against the shared signing secret.
/// Registered once in app data so the extractor can reach it per request.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn new_from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set");
        Self::new(&secret)
    }

    pub fn verify(&self, token: &str) -> Result<Uuid, ApiError> {
        let data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| ApiError::Unauthorized("invalid token".to_string()))?;

        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| ApiError::Unauthorized("invalid token subject".to_string()))
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<AuthenticatedUser, ApiError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth_header = match req.headers().get("Authorization") {
            Some(header) => match header.to_str() {
                Ok(h) => h,
                Err(_) => {
                    return ready(Err(ApiError::Unauthorized(
                        "invalid header format".to_string(),
                    )));
                }
            },
            None => {
                return ready(Err(ApiError::Unauthorized(
                    "missing Authorization header".to_string(),
                )));
            }
        };

        if !auth_header.starts_with("Bearer ") {
            return ready(Err(ApiError::Unauthorized(
                "invalid auth header format".to_string(),
            )));
        }
        let token = auth_header.trim_start_matches("Bearer ").trim();

        let verifier = match req.app_data::<web::Data<JwtVerifier>>() {
            Some(v) => v,
            None => {
                return ready(Err(ApiError::Upstream(
                    "jwt verifier not configured".to_string(),
                )));
            }
        };

        ready(
            verifier
                .verify(token)
                .map(|user_id| AuthenticatedUser { user_id }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "test-secret";

    fn token_for(sub: &str, exp_offset_secs: i64, secret: &str) -> String {
        let now = Utc::now().timestamp();
        let claims = JwtClaims {
            sub: sub.to_string(),
            exp: (now + exp_offset_secs).max(0) as u64,
            iat: Some(now as u64),
            role: None,
            email: None,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn verify_accepts_valid_token() {
        let user_id = Uuid::new_v4();
        let verifier = JwtVerifier::new(SECRET);
        let token = token_for(&user_id.to_string(), 3600, SECRET);
        assert_eq!(verifier.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let verifier = JwtVerifier::new(SECRET);
        let token = token_for(&Uuid::new_v4().to_string(), 3600, "other-secret");
        assert!(matches!(
            verifier.verify(&token),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn verify_rejects_expired_token() {
        let verifier = JwtVerifier::new(SECRET);
        let token = token_for(&Uuid::new_v4().to_string(), -7200, SECRET);
        assert!(matches!(
            verifier.verify(&token),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn verify_rejects_non_uuid_subject() {
        let verifier = JwtVerifier::new(SECRET);
        let token = token_for("not-a-uuid", 3600, SECRET);
        assert!(matches!(
            verifier.verify(&token),
            Err(ApiError::Unauthorized(_))
        ));
    }
}
