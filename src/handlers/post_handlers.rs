use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;
use uuid::Uuid;

use crate::AppState;
use crate::dtos::post_dtos::{PostCreateResponse, PostListQuery, PostWriteRequest};
use crate::error::ApiError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::services::media_uploader::MediaUploader;
use crate::services::post_service::PostService;

#[derive(Serialize)]
struct ApiResponse<T: serde::Serialize> {
    status: String,
    message: String,
    data: Option<T>,
}

fn ok_response<T: Serialize>(message: &str, data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse {
        status: "success".to_string(),
        message: message.to_string(),
        data: Some(data),
    })
}

#[get("/posts/{id}")]
pub async fn get_post_detail(
    app_state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let detail =
        PostService::get_post_detail(&app_state.pg_pool, path.into_inner(), user.user_id).await?;
    Ok(ok_response("Post retrieved successfully", detail))
}

#[post("/posts")]
pub async fn create_post(
    app_state: web::Data<AppState>,
    uploader: web::Data<MediaUploader>,
    user: AuthenticatedUser,
    body: web::Json<PostWriteRequest>,
) -> Result<HttpResponse, ApiError> {
    let created =
        PostService::create_post(&app_state.pg_pool, &uploader, body.into_inner(), user.user_id)
            .await?;

    Ok(HttpResponse::Created().json(ApiResponse {
        status: "success".to_string(),
        message: "Post created successfully".to_string(),
        data: Some(PostCreateResponse {
            post_id: created.id,
        }),
    }))
}

#[get("/posts")]
pub async fn get_filtered_posts(
    app_state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<PostListQuery>,
) -> Result<HttpResponse, ApiError> {
    let posts =
        PostService::get_filtered_posts(&app_state.pg_pool, &query, user.user_id).await?;
    Ok(ok_response("Posts retrieved successfully", posts))
}

#[get("/users/{id}/posts")]
pub async fn get_user_posts(
    app_state: web::Data<AppState>,
    _user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let posts = PostService::get_posts_by_user(&app_state.pg_pool, path.into_inner()).await?;
    Ok(ok_response("Posts retrieved successfully", posts))
}
