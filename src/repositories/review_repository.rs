use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::review::Review;

pub struct ReviewRepository;

impl ReviewRepository {
    pub async fn find_by_post_and_reviewee(
        pool: &Pool,
        post_id: Uuid,
        reviewee_id: Uuid,
    ) -> Result<Option<Review>, ApiError> {
        let client = pool.get().await?;
        let row = client
            .query_opt(
                "SELECT id, post_id, reviewer_id, reviewee_id, created_at FROM reviews \
                 WHERE post_id = $1 AND reviewee_id = $2",
                &[&post_id, &reviewee_id],
            )
            .await?;

        Ok(row.map(|r| Review {
            id: r.get("id"),
            post_id: r.get("post_id"),
            reviewer_id: r.get("reviewer_id"),
            reviewee_id: r.get("reviewee_id"),
            created_at: r.get("created_at"),
        }))
    }
}
