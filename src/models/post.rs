use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Posts stay visible in browse results for this many days after creation.
pub const EXPIRATION_DAYS: i64 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostType {
    Share,
    Borrow,
}

impl PostType {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.to_ascii_uppercase().as_str() {
            "SHARE" => Ok(PostType::Share),
            "BORROW" => Ok(PostType::Borrow),
            _ => Err(format!("unknown post type: {}", value)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Share => "SHARE",
            PostType::Borrow => "BORROW",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Electronics,
    Furniture,
    Clothing,
    Books,
    Sports,
    Living,
    Etc,
}

impl Category {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.to_ascii_uppercase().as_str() {
            "ELECTRONICS" => Ok(Category::Electronics),
            "FURNITURE" => Ok(Category::Furniture),
            "CLOTHING" => Ok(Category::Clothing),
            "BOOKS" => Ok(Category::Books),
            "SPORTS" => Ok(Category::Sports),
            "LIVING" => Ok(Category::Living),
            "ETC" => Ok(Category::Etc),
            _ => Err(format!("unknown category: {}", value)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Electronics => "ELECTRONICS",
            Category::Furniture => "FURNITURE",
            Category::Clothing => "CLOTHING",
            Category::Books => "BOOKS",
            Category::Sports => "SPORTS",
            Category::Living => "LIVING",
            Category::Etc => "ETC",
        }
    }
}

/// Preferred transaction distance a writer attaches to their post.
/// Wire values match what the app sends for the distance picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Distance {
    Within3Km,
    Within5Km,
    Within10Km,
    Anywhere,
}

impl Distance {
    pub fn from_value(value: &str) -> Result<Self, String> {
        match value.to_ascii_lowercase().as_str() {
            "3km" => Ok(Distance::Within3Km),
            "5km" => Ok(Distance::Within5Km),
            "10km" => Ok(Distance::Within10Km),
            "unlimited" => Ok(Distance::Anywhere),
            _ => Err(format!("unknown distance: {}", value)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Distance::Within3Km => "3km",
            Distance::Within5Km => "5km",
            Distance::Within10Km => "10km",
            Distance::Anywhere => "unlimited",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostStatus {
    Active,
    Reserved,
    Completed,
}

impl PostStatus {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(PostStatus::Active),
            "RESERVED" => Ok(PostStatus::Reserved),
            "COMPLETED" => Ok(PostStatus::Completed),
            _ => Err(format!("unknown post status: {}", value)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Active => "ACTIVE",
            PostStatus::Reserved => "RESERVED",
            PostStatus::Completed => "COMPLETED",
        }
    }

    /// Terminal transacted state; the only one that triggers review lookups.
    pub fn is_completed(&self) -> bool {
        matches!(self, PostStatus::Completed)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: Uuid,
    pub writer_id: Uuid,
    pub post_type: PostType,
    pub category: Category,
    pub title: String,
    pub content: String,
    pub price: i32,
    pub distance: Distance,
    pub location_name: String,
    pub location_latitude: f64,
    pub location_longitude: f64,
    pub status: PostStatus,
    pub create_at: NaiveDateTime,
    pub expiration_date: NaiveDateTime,
}

impl Post {
    pub fn expiration_from(create_at: NaiveDateTime) -> NaiveDateTime {
        create_at + Duration::days(EXPIRATION_DAYS)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostImage {
    pub id: Uuid,
    pub post_id: Uuid,
    pub image_url: String,
    pub order_sequence: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn post_type_parse_is_case_insensitive() {
        assert_eq!(PostType::parse("share").unwrap(), PostType::Share);
        assert_eq!(PostType::parse("SHARE").unwrap(), PostType::Share);
        assert_eq!(PostType::parse("Borrow").unwrap(), PostType::Borrow);
    }

    #[test]
    fn post_type_rejects_unknown_values() {
        assert!(PostType::parse("sell").is_err());
        assert!(PostType::parse("").is_err());
    }

    #[test]
    fn category_round_trips_through_as_str() {
        let all = [
            Category::Electronics,
            Category::Furniture,
            Category::Clothing,
            Category::Books,
            Category::Sports,
            Category::Living,
            Category::Etc,
        ];
        for category in all {
            assert_eq!(Category::parse(category.as_str()).unwrap(), category);
        }
    }

    #[test]
    fn category_rejects_unknown_values() {
        assert!(Category::parse("VEHICLES").is_err());
    }

    #[test]
    fn distance_parses_wire_values() {
        assert_eq!(Distance::from_value("3km").unwrap(), Distance::Within3Km);
        assert_eq!(Distance::from_value("10KM").unwrap(), Distance::Within10Km);
        assert_eq!(Distance::from_value("UNLIMITED").unwrap(), Distance::Anywhere);
        assert!(Distance::from_value("7km").is_err());
    }

    #[test]
    fn status_parse_and_completed_flag() {
        assert_eq!(PostStatus::parse("active").unwrap(), PostStatus::Active);
        assert!(PostStatus::parse("DONE").is_err());
        assert!(PostStatus::Completed.is_completed());
        assert!(!PostStatus::Reserved.is_completed());
    }

    #[test]
    fn expiration_is_180_days_after_creation() {
        let created = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let expiration = Post::expiration_from(created);
        assert_eq!((expiration - created).num_days(), 180);
    }
}
