//! Row types for the five backend tables, plus the insert and joined shapes
//! the application works with.
//!
//! The backend owns and validates all of this data; these structs are
//! transient in-memory copies of whatever the last fetch returned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user profile, created by the backend when the user signs up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub district: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An ad category. Read-only from the application's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub icon: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

/// A location (district within a city). Read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub district: String,
    pub city: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
}

/// How an ad's price is to be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PriceType {
    #[default]
    Fixed,
    Negotiable,
    OnRequest,
}

impl PriceType {
    /// The wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            PriceType::Fixed => "fixed",
            PriceType::Negotiable => "negotiable",
            PriceType::OnRequest => "on_request",
        }
    }

    /// Lenient parse for CLI and query-string input; unknown values fall
    /// back to `Fixed`
    pub fn parse(input: Option<&str>) -> Self {
        match input.unwrap_or("fixed") {
            "negotiable" => PriceType::Negotiable,
            "on_request" => PriceType::OnRequest,
            _ => PriceType::Fixed,
        }
    }
}

/// Moderation state of an ad.
///
/// This application only ever writes the initial `Pending`; every
/// transition happens in the backend's moderation process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdStatus {
    Pending,
    Approved,
    Rejected,
    Expired,
}

impl AdStatus {
    /// The wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            AdStatus::Pending => "pending",
            AdStatus::Approved => "approved",
            AdStatus::Rejected => "rejected",
            AdStatus::Expired => "expired",
        }
    }

    /// The label shown on the dashboard
    pub fn label(self) -> &'static str {
        match self {
            AdStatus::Pending => "Pending",
            AdStatus::Approved => "Active",
            AdStatus::Rejected => "Rejected",
            AdStatus::Expired => "Expired",
        }
    }
}

/// A classified listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ad {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: Option<f64>,
    pub price_type: PriceType,
    pub category_id: Uuid,
    pub location_id: Uuid,
    pub user_id: Uuid,
    pub images: Vec<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub status: AdStatus,
    pub is_featured: bool,
    pub featured_until: Option<DateTime<Utc>>,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// A user's saved bookmark of an ad
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ad_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// The fields written when creating an ad. The sequencer forces `status`
/// and computes `expires_at`; everything else comes from the form.
#[derive(Debug, Clone, Serialize)]
pub struct NewAd {
    pub title: String,
    pub description: String,
    pub price: Option<f64>,
    pub price_type: PriceType,
    pub category_id: Uuid,
    pub location_id: Uuid,
    pub user_id: Uuid,
    pub images: Vec<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub status: AdStatus,
    pub expires_at: DateTime<Utc>,
}

/// The fields written when saving a favorite
#[derive(Debug, Clone, Serialize)]
pub struct NewFavorite {
    pub user_id: Uuid,
    pub ad_id: Uuid,
}

/// The slice of a category embedded in listing results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRef {
    pub name: String,
    pub slug: Option<String>,
}

/// The slice of a location embedded in listing results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRef {
    pub city: String,
    pub district: String,
}

/// The slice of a profile embedded in listing results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRef {
    pub full_name: Option<String>,
}

/// An ad joined with its category, location, and seller for display.
///
/// The embedded resources arrive under their table names, next to the
/// flattened ad columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdSummary {
    #[serde(flatten)]
    pub ad: Ad,
    #[serde(default)]
    pub categories: Option<CategoryRef>,
    #[serde(default)]
    pub locations: Option<LocationRef>,
    #[serde(default)]
    pub profiles: Option<ProfileRef>,
}

/// A favorite joined with its ad for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteWithAd {
    #[serde(flatten)]
    pub favorite: Favorite,
    #[serde(default)]
    pub ads: Option<AdSummary>,
}
