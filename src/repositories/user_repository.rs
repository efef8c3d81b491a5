use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::user::User;

pub struct UserRepository;

impl UserRepository {
    pub async fn find_by_id(pool: &Pool, id: Uuid) -> Result<Option<User>, ApiError> {
        let client = pool.get().await?;
        let row = client
            .query_opt(
                "SELECT id, nickname, profile_image, location_latitude, location_longitude, \
                 created_at FROM users WHERE id = $1",
                &[&id],
            )
            .await?;

        Ok(row.map(|r| User {
            id: r.get("id"),
            nickname: r.get("nickname"),
            profile_image: r.get("profile_image"),
            location_latitude: r.get("location_latitude"),
            location_longitude: r.get("location_longitude"),
            created_at: r.get("created_at"),
        }))
    }
}
