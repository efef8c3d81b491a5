use chrono::Utc;
use deadpool_postgres::Pool;
use log::{info, warn};
use uuid::Uuid;

use crate::dtos::post_dtos::{
    FilteredPostPreviewResponse, ImagePayload, PostDetailResponse, PostListQuery,
    PostPreviewResponse, PostWriteRequest,
};
use crate::error::ApiError;
use crate::models::post::{Category, Distance, Post, PostImage, PostStatus, PostType};
use crate::models::user::User;
use crate::repositories::post_image_repository::PostImageRepository;
use crate::repositories::post_repository::PostRepository;
use crate::repositories::review_repository::ReviewRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::media_uploader::MediaUploader;
use crate::services::post_filter::{PostQuery, filter_posts};

pub struct PostService;

impl PostService {
    pub async fn create_post(
        pool: &Pool,
        uploader: &MediaUploader,
        request: PostWriteRequest,
        writer_id: Uuid,
    ) -> Result<Post, ApiError> {
        let writer = UserRepository::find_by_id(pool, writer_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

        if request.price < 0 {
            return Err(ApiError::Validation("price must be non-negative".to_string()));
        }

        let now = Utc::now().naive_utc();
        let post = Post {
            id: Uuid::new_v4(),
            writer_id: writer.id,
            post_type: PostType::parse(&request.post_type).map_err(ApiError::Validation)?,
            category: Category::parse(&request.category).map_err(ApiError::Validation)?,
            title: request.title,
            content: request.content,
            price: request.price,
            distance: Distance::from_value(&request.distance).map_err(ApiError::Validation)?,
            location_name: request.location_name,
            location_latitude: request.location_latitude,
            location_longitude: request.location_longitude,
            status: PostStatus::Active,
            create_at: now,
            expiration_date: Post::expiration_from(now),
        };

        PostRepository::insert(pool, &post).await?;

        // Storage objects are namespaced by the post id, so the row has to
        // exist before the first upload. Row commit and uploads are therefore
        // not atomic; a failure past this point rolls the post back instead
        // of leaving a partially-imaged one behind.
        if !request.images.is_empty() {
            let prefix = format!("posts/{}", post.id);
            if let Err(e) = attach_images(pool, uploader, post.id, &request.images, &prefix).await {
                warn!("image attach failed for post {}, rolling back: {}", post.id, e);
                if let Err(cleanup) = PostImageRepository::delete_by_post(pool, post.id).await {
                    warn!("image row cleanup failed for post {}: {}", post.id, cleanup);
                }
                if let Err(cleanup) = PostRepository::delete(pool, post.id).await {
                    warn!("post row cleanup failed for post {}: {}", post.id, cleanup);
                }
                return Err(e);
            }
        }

        info!("created post {} for user {}", post.id, writer.id);
        Ok(post)
    }

    pub async fn get_post_detail(
        pool: &Pool,
        post_id: Uuid,
        viewer_id: Uuid,
    ) -> Result<PostDetailResponse, ApiError> {
        let post = PostRepository::find_by_id(pool, post_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("post not found".to_string()))?;
        let writer = UserRepository::find_by_id(pool, post.writer_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

        let image_urls = PostImageRepository::find_all_by_post(pool, post.id)
            .await?
            .into_iter()
            .map(|image| image.image_url)
            .collect();

        Ok(to_detail(&post, &writer, image_urls, viewer_id))
    }

    /// Everything a user has posted, newest first. No expiration filter:
    /// authors still see their own expired posts.
    pub async fn get_posts_by_user(
        pool: &Pool,
        user_id: Uuid,
    ) -> Result<Vec<PostPreviewResponse>, ApiError> {
        info!("fetching posts for user {}", user_id);
        let posts = PostRepository::find_by_writer(pool, user_id).await?;

        let mut previews = Vec::with_capacity(posts.len());
        for post in posts {
            let preview_image = PostImageRepository::find_top_by_post(pool, post.id)
                .await?
                .map(|image| image.image_url);

            let review_id = if post.status.is_completed() {
                ReviewRepository::find_by_post_and_reviewee(pool, post.id, user_id)
                    .await?
                    .map(|review| review.id)
            } else {
                None
            };

            previews.push(to_preview(&post, preview_image, review_id));
        }
        Ok(previews)
    }

    pub async fn get_filtered_posts(
        pool: &Pool,
        query: &PostListQuery,
        viewer_id: Uuid,
    ) -> Result<Vec<FilteredPostPreviewResponse>, ApiError> {
        info!(
            "filtering posts type={} category={:?} radius={:?} keyword={:?} viewer={}",
            query.post_type, query.category, query.radius, query.keyword, viewer_id
        );

        let viewer = UserRepository::find_by_id(pool, viewer_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

        let parsed = PostQuery::parse(
            &query.post_type,
            query.category.as_deref(),
            query.radius.as_deref(),
            query.keyword.as_deref(),
        )?;

        let posts = PostRepository::find_all(pool).await?;
        let filtered = filter_posts(
            posts,
            &parsed,
            viewer.location_latitude,
            viewer.location_longitude,
            Utc::now().naive_utc(),
        );

        let mut previews = Vec::with_capacity(filtered.len());
        for post in filtered {
            let preview_image = PostImageRepository::find_top_by_post(pool, post.id)
                .await?
                .map(|image| image.image_url);
            previews.push(to_filtered_preview(&post, preview_image));
        }
        Ok(previews)
    }
}

async fn attach_images(
    pool: &Pool,
    uploader: &MediaUploader,
    post_id: Uuid,
    images: &[ImagePayload],
    prefix: &str,
) -> Result<(), ApiError> {
    let image_urls = uploader.upload_many(images, prefix).await?;

    for image in build_post_images(post_id, image_urls) {
        PostImageRepository::insert(pool, &image).await?;
    }
    Ok(())
}

/// One row per uploaded URL, order_sequence 1..N in upload-return order.
fn build_post_images(post_id: Uuid, image_urls: Vec<String>) -> Vec<PostImage> {
    image_urls
        .into_iter()
        .enumerate()
        .map(|(index, image_url)| PostImage {
            id: Uuid::new_v4(),
            post_id,
            image_url,
            order_sequence: index as i32 + 1,
        })
        .collect()
}

fn to_detail(
    post: &Post,
    writer: &User,
    image_urls: Vec<String>,
    viewer_id: Uuid,
) -> PostDetailResponse {
    PostDetailResponse {
        is_my_post: post.writer_id == viewer_id,
        writer_id: writer.id,
        writer_nickname: writer.nickname.clone(),
        writer_profile_image: writer.profile_image.clone().unwrap_or_default(),
        distance: post.distance.as_str().to_string(),
        category: post.category.as_str().to_string(),
        title: post.title.clone(),
        create_at: post.create_at,
        content: post.content.clone(),
        price: post.price,
        location_name: post.location_name.clone(),
        location_latitude: post.location_latitude,
        location_longitude: post.location_longitude,
        image_urls,
    }
}

fn to_preview(
    post: &Post,
    preview_image: Option<String>,
    review_id: Option<Uuid>,
) -> PostPreviewResponse {
    PostPreviewResponse {
        post_id: post.id,
        title: post.title.clone(),
        price: post.price,
        preview_image,
        location_name: post.location_name.clone(),
        post_type: post.post_type.as_str().to_string(),
        post_status: post.status.as_str().to_string(),
        review_id,
    }
}

fn to_filtered_preview(post: &Post, preview_image: Option<String>) -> FilteredPostPreviewResponse {
    FilteredPostPreviewResponse {
        post_id: post.id,
        title: post.title.clone(),
        price: post.price,
        preview_image,
        location_name: post.location_name.clone(),
        post_type: post.post_type.as_str().to_string(),
        post_status: post.status.as_str().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_post(writer_id: Uuid) -> Post {
        let created = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Post {
            id: Uuid::new_v4(),
            writer_id,
            post_type: PostType::Share,
            category: Category::Furniture,
            title: "Folding chair".to_string(),
            content: "good condition".to_string(),
            price: 3000,
            distance: Distance::Within3Km,
            location_name: "Mapo-gu".to_string(),
            location_latitude: 37.55,
            location_longitude: 126.90,
            status: PostStatus::Active,
            create_at: created,
            expiration_date: Post::expiration_from(created),
        }
    }

    fn sample_writer(id: Uuid, profile_image: Option<&str>) -> User {
        User {
            id,
            nickname: "happy".to_string(),
            profile_image: profile_image.map(|s| s.to_string()),
            location_latitude: 37.55,
            location_longitude: 126.90,
            created_at: None,
        }
    }

    #[test]
    fn detail_marks_owner_only_for_the_writer() {
        let writer_id = Uuid::new_v4();
        let post = sample_post(writer_id);
        let writer = sample_writer(writer_id, Some("https://img.example/me.png"));

        let own = to_detail(&post, &writer, vec![], writer_id);
        assert!(own.is_my_post);

        let other = to_detail(&post, &writer, vec![], Uuid::new_v4());
        assert!(!other.is_my_post);
    }

    #[test]
    fn detail_renders_missing_profile_image_as_empty_string() {
        let writer_id = Uuid::new_v4();
        let post = sample_post(writer_id);
        let writer = sample_writer(writer_id, None);

        let detail = to_detail(&post, &writer, vec![], writer_id);
        assert_eq!(detail.writer_profile_image, "");
    }

    #[test]
    fn detail_carries_enum_labels_and_ordered_images() {
        let writer_id = Uuid::new_v4();
        let post = sample_post(writer_id);
        let writer = sample_writer(writer_id, None);
        let urls = vec!["a.jpg".to_string(), "b.jpg".to_string()];

        let detail = to_detail(&post, &writer, urls.clone(), writer_id);
        assert_eq!(detail.distance, "3km");
        assert_eq!(detail.category, "FURNITURE");
        assert_eq!(detail.image_urls, urls);
    }

    #[test]
    fn preview_carries_review_id_only_when_present() {
        let post = sample_post(Uuid::new_v4());
        let review_id = Uuid::new_v4();

        let with_review = to_preview(&post, None, Some(review_id));
        assert_eq!(with_review.review_id, Some(review_id));

        let without_review = to_preview(&post, None, None);
        assert!(without_review.review_id.is_none());
    }

    #[test]
    fn image_rows_are_sequenced_in_upload_order() {
        let post_id = Uuid::new_v4();
        let urls = vec![
            "https://cdn.example/posts/p/1.jpg".to_string(),
            "https://cdn.example/posts/p/2.png".to_string(),
            "https://cdn.example/posts/p/3.webp".to_string(),
        ];

        let images = build_post_images(post_id, urls.clone());

        assert_eq!(images.len(), 3);
        for (index, image) in images.iter().enumerate() {
            assert_eq!(image.post_id, post_id);
            assert_eq!(image.order_sequence, index as i32 + 1);
            assert_eq!(image.image_url, urls[index]);
        }
    }

    #[test]
    fn previews_carry_representative_image_or_none() {
        let post = sample_post(Uuid::new_v4());

        let with_image = to_filtered_preview(&post, Some("cover.jpg".to_string()));
        assert_eq!(with_image.preview_image.as_deref(), Some("cover.jpg"));
        assert_eq!(with_image.post_type, "SHARE");
        assert_eq!(with_image.post_status, "ACTIVE");

        let without_image = to_filtered_preview(&post, None);
        assert!(without_image.preview_image.is_none());
    }
}
