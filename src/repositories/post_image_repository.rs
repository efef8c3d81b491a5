use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::post::PostImage;

pub struct PostImageRepository;

impl PostImageRepository {
    pub async fn insert(pool: &Pool, image: &PostImage) -> Result<(), ApiError> {
        let client = pool.get().await?;
        client
            .execute(
                "INSERT INTO post_images (id, post_id, image_url, order_sequence) \
                 VALUES ($1, $2, $3, $4)",
                &[
                    &image.id,
                    &image.post_id,
                    &image.image_url,
                    &image.order_sequence,
                ],
            )
            .await?;
        Ok(())
    }

    /// All images of a post in display order.
    pub async fn find_all_by_post(pool: &Pool, post_id: Uuid) -> Result<Vec<PostImage>, ApiError> {
        let client = pool.get().await?;
        let rows = client
            .query(
                "SELECT id, post_id, image_url, order_sequence FROM post_images \
                 WHERE post_id = $1 ORDER BY order_sequence ASC",
                &[&post_id],
            )
            .await?;
        Ok(rows.iter().map(map_image_row).collect())
    }

    /// Representative image: the lowest order_sequence, if any.
    pub async fn find_top_by_post(pool: &Pool, post_id: Uuid) -> Result<Option<PostImage>, ApiError> {
        let client = pool.get().await?;
        let row = client
            .query_opt(
                "SELECT id, post_id, image_url, order_sequence FROM post_images \
                 WHERE post_id = $1 ORDER BY order_sequence ASC LIMIT 1",
                &[&post_id],
            )
            .await?;
        Ok(row.as_ref().map(map_image_row))
    }

    pub async fn delete_by_post(pool: &Pool, post_id: Uuid) -> Result<(), ApiError> {
        let client = pool.get().await?;
        client
            .execute("DELETE FROM post_images WHERE post_id = $1", &[&post_id])
            .await?;
        Ok(())
    }
}

fn map_image_row(row: &Row) -> PostImage {
    PostImage {
        id: row.get("id"),
        post_id: row.get("post_id"),
        image_url: row.get("image_url"),
        order_sequence: row.get("order_sequence"),
    }
}
