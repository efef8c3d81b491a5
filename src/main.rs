mod config;
mod dtos;
mod error;
mod handlers;
mod middleware;
mod models;
mod repositories;
mod services;

use std::env;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use deadpool_postgres::Pool;
use log::{error, info};
use reqwest::Client;

use crate::handlers::health_handlers::health;
use crate::handlers::post_handlers::{
    create_post, get_filtered_posts, get_post_detail, get_user_posts,
};
use crate::middleware::auth_extractor::JwtVerifier;
use crate::services::media_uploader::MediaUploader;

#[derive(Clone)]
pub struct AppState {
    pub pg_pool: Pool,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    dotenv::dotenv().ok();

    let pg_pool = match config::get_pg_pool() {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to create PG pool: {}", e);
            std::process::exit(1);
        }
    };

    let http_client = Client::builder()
        .user_agent("biling-be/0.1")
        .build()
        .expect("failed to build http client");

    let uploader = web::Data::new(MediaUploader::new_from_env(http_client));
    let jwt_verifier = web::Data::new(JwtVerifier::new_from_env());
    let state = web::Data::new(AppState { pg_pool });

    let allowed_origins = env::var("ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".into());

    let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_address = format!("0.0.0.0:{}", port);

    info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec!["authorization", "content-type", "accept"])
            .supports_credentials()
            .max_age(3600);

        for origin in allowed_origins.split(',').map(|s| s.trim()).filter(|s| !s.is_empty()) {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .app_data(uploader.clone())
            .app_data(jwt_verifier.clone())
            .service(get_filtered_posts) // GET  /posts
            .service(create_post)        // POST /posts
            .service(get_post_detail)    // GET  /posts/{id}
            .service(get_user_posts)     // GET  /users/{id}/posts
            .service(health)             // GET  /health
    })
    .bind(&bind_address)?
    .run()
    .await
}
