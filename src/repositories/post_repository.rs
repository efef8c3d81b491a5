use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::post::{Category, Distance, Post, PostStatus, PostType};

const POST_COLUMNS: &str = "id, writer_id, post_type, category, title, content, price, distance, \
     location_name, location_latitude, location_longitude, status, create_at, expiration_date";

pub struct PostRepository;

impl PostRepository {
    pub async fn insert(pool: &Pool, post: &Post) -> Result<(), ApiError> {
        let client = pool.get().await?;
        let post_type = post.post_type.as_str();
        let category = post.category.as_str();
        let distance = post.distance.as_str();
        let status = post.status.as_str();

        client
            .execute(
                "INSERT INTO posts (id, writer_id, post_type, category, title, content, price, \
                 distance, location_name, location_latitude, location_longitude, status, \
                 create_at, expiration_date) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
                &[
                    &post.id,
                    &post.writer_id,
                    &post_type,
                    &category,
                    &post.title,
                    &post.content,
                    &post.price,
                    &distance,
                    &post.location_name,
                    &post.location_latitude,
                    &post.location_longitude,
                    &status,
                    &post.create_at,
                    &post.expiration_date,
                ],
            )
            .await?;
        Ok(())
    }

    pub async fn find_by_id(pool: &Pool, id: Uuid) -> Result<Option<Post>, ApiError> {
        let client = pool.get().await?;
        let stmt = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);
        let row = client.query_opt(stmt.as_str(), &[&id]).await?;
        row.map(|r| map_post_row(&r)).transpose()
    }

    pub async fn find_by_writer(pool: &Pool, writer_id: Uuid) -> Result<Vec<Post>, ApiError> {
        let client = pool.get().await?;
        let stmt = format!(
            "SELECT {} FROM posts WHERE writer_id = $1 ORDER BY create_at DESC",
            POST_COLUMNS
        );
        let rows = client.query(stmt.as_str(), &[&writer_id]).await?;
        rows.iter().map(map_post_row).collect()
    }

    pub async fn find_all(pool: &Pool) -> Result<Vec<Post>, ApiError> {
        let client = pool.get().await?;
        let stmt = format!("SELECT {} FROM posts ORDER BY create_at DESC", POST_COLUMNS);
        let rows = client.query(stmt.as_str(), &[]).await?;
        rows.iter().map(map_post_row).collect()
    }

    pub async fn delete(pool: &Pool, id: Uuid) -> Result<(), ApiError> {
        let client = pool.get().await?;
        client.execute("DELETE FROM posts WHERE id = $1", &[&id]).await?;
        Ok(())
    }
}

fn map_post_row(row: &Row) -> Result<Post, ApiError> {
    let post_type: String = row.get("post_type");
    let category: String = row.get("category");
    let distance: String = row.get("distance");
    let status: String = row.get("status");

    // an enum column holding a value outside the closed set is store
    // corruption, not a caller error
    let corrupt = |e: String| ApiError::Upstream(format!("corrupt post row: {}", e));

    Ok(Post {
        id: row.get("id"),
        writer_id: row.get("writer_id"),
        post_type: PostType::parse(&post_type).map_err(corrupt)?,
        category: Category::parse(&category).map_err(corrupt)?,
        title: row.get("title"),
        content: row.get("content"),
        price: row.get("price"),
        distance: Distance::from_value(&distance).map_err(corrupt)?,
        location_name: row.get("location_name"),
        location_latitude: row.get("location_latitude"),
        location_longitude: row.get("location_longitude"),
        status: PostStatus::parse(&status).map_err(corrupt)?,
        create_at: row.get("create_at"),
        expiration_date: row.get("expiration_date"),
    })
}
