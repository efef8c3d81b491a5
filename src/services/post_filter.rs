use chrono::NaiveDateTime;
use regex::Regex;

use crate::error::ApiError;
use crate::models::post::{Category, Post, PostType};

/// Category sentinel that turns the category filter off.
pub const CATEGORY_ALL: &str = "all";
/// Radius sentinel that turns the distance filter off.
pub const RADIUS_UNLIMITED: &str = "unlimited";

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(Category),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadiusFilter {
    Unlimited,
    WithinKm(u32),
}

impl RadiusFilter {
    /// Boundary is inclusive: a post at exactly the cutoff distance passes.
    pub fn contains(&self, distance_km: f64) -> bool {
        match self {
            RadiusFilter::Unlimited => true,
            RadiusFilter::WithinKm(km) => distance_km <= f64::from(*km),
        }
    }
}

/// Parsed, validated browse query. Raw wire strings never reach the filter.
#[derive(Debug)]
pub struct PostQuery {
    pub post_type: PostType,
    pub category: CategoryFilter,
    pub keyword: Option<String>,
    pub radius: RadiusFilter,
}

impl PostQuery {
    pub fn parse(
        post_type: &str,
        category: Option<&str>,
        radius: Option<&str>,
        keyword: Option<&str>,
    ) -> Result<Self, ApiError> {
        let post_type = PostType::parse(post_type).map_err(ApiError::Validation)?;

        let category = match category {
            None => CategoryFilter::All,
            Some(raw) if raw.eq_ignore_ascii_case(CATEGORY_ALL) => CategoryFilter::All,
            Some(raw) => CategoryFilter::Only(Category::parse(raw).map_err(ApiError::Validation)?),
        };

        let radius = parse_radius(radius)?;
        let keyword = keyword.map(|k| k.to_lowercase());

        Ok(Self {
            post_type,
            category,
            keyword,
            radius,
        })
    }
}

/// A malformed radius is a caller error, never silently widened to
/// unlimited or narrowed to zero.
fn parse_radius(raw: Option<&str>) -> Result<RadiusFilter, ApiError> {
    let raw = match raw {
        None => return Ok(RadiusFilter::Unlimited),
        Some(r) => r,
    };
    if raw.eq_ignore_ascii_case(RADIUS_UNLIMITED) {
        return Ok(RadiusFilter::Unlimited);
    }

    let re = Regex::new(r"^([0-9]+)km$").unwrap();
    let caps = re
        .captures(raw)
        .ok_or_else(|| ApiError::Validation(format!("invalid radius: {}", raw)))?;
    let km = caps[1]
        .parse::<u32>()
        .map_err(|_| ApiError::Validation(format!("invalid radius: {}", raw)))?;
    Ok(RadiusFilter::WithinKm(km))
}

/// Great-circle distance in kilometers (haversine).
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// The browse filter: a conjunction of five pure predicates. Relative input
/// order is preserved, so results keep the store's newest-first order.
pub fn filter_posts(
    posts: Vec<Post>,
    query: &PostQuery,
    viewer_lat: f64,
    viewer_lon: f64,
    now: NaiveDateTime,
) -> Vec<Post> {
    posts
        .into_iter()
        .filter(|post| post.post_type == query.post_type)
        .filter(|post| matches_category(post, &query.category))
        .filter(|post| {
            query.radius.contains(haversine_km(
                viewer_lat,
                viewer_lon,
                post.location_latitude,
                post.location_longitude,
            ))
        })
        .filter(|post| matches_keyword(post, query.keyword.as_deref()))
        .filter(|post| post.expiration_date > now)
        .collect()
}

fn matches_category(post: &Post, filter: &CategoryFilter) -> bool {
    match filter {
        CategoryFilter::All => true,
        CategoryFilter::Only(category) => post.category == *category,
    }
}

/// Keyword searches the title only, never the body content.
fn matches_keyword(post: &Post, keyword: Option<&str>) -> bool {
    match keyword {
        None => true,
        Some(keyword) => post.title.to_lowercase().contains(keyword),
    }
}
