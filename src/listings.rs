//! Listing search: translates the UI's filter and sort state into one
//! backend query, plus the category and location lookups the filter bar
//! is populated from.

use tracing::debug;
use uuid::Uuid;

use crate::error::Error;
use crate::models::{AdStatus, AdSummary, Category, Location};
use crate::postgrest::SelectBuilder;
use crate::Marketplace;

/// Columns fetched for listing cards: every ad column plus the embedded
/// category, location, and seller slices
const AD_SUMMARY_COLUMNS: &str =
    "*,categories(name,slug),locations(city,district),profiles(full_name)";

/// Sort order for listing searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    PriceLow,
    PriceHigh,
}

impl SortKey {
    /// The query-string value for this sort order
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::PriceLow => "price_low",
            SortKey::PriceHigh => "price_high",
        }
    }

    /// Lenient parse of a query-string value; unknown or absent input falls
    /// back to `Newest`
    pub fn parse(input: Option<&str>) -> SortKey {
        match input.unwrap_or("newest") {
            "oldest" => SortKey::Oldest,
            "price_low" => SortKey::PriceLow,
            "price_high" => SortKey::PriceHigh,
            _ => SortKey::Newest,
        }
    }
}

/// The filter and sort state of the listings view
#[derive(Debug, Clone, Default)]
pub struct ListingQuery {
    /// Free-text search over title and description
    pub search: Option<String>,

    /// Restrict to one category
    pub category_id: Option<Uuid>,

    /// Restrict to one location
    pub location_id: Option<Uuid>,

    /// Sort order
    pub sort: SortKey,
}

/// Listing search and lookup operations
pub struct Listings<'a> {
    app: &'a Marketplace,
}

impl<'a> Listings<'a> {
    pub(crate) fn new(app: &'a Marketplace) -> Self {
        Self { app }
    }

    /// Search approved ads with the given filters.
    ///
    /// On failure the backend's message is returned and the caller keeps
    /// whatever it was showing before.
    pub async fn search(&self, query: &ListingQuery) -> Result<Vec<AdSummary>, Error> {
        let client = self.app.from("ads");
        let mut select = client.select(AD_SUMMARY_COLUMNS);
        apply(query, &mut select);

        let ads = select.execute::<AdSummary>().await?;
        debug!(count = ads.len(), sort = query.sort.as_str(), "fetched listings");
        Ok(ads)
    }

    /// One approved ad by id, for the detail view
    pub async fn get(&self, ad_id: Uuid) -> Result<Option<AdSummary>, Error> {
        let client = self.app.from("ads");
        let mut select = client.select(AD_SUMMARY_COLUMNS);
        select
            .eq("id", ad_id)
            .eq("status", AdStatus::Approved.as_str());
        select.execute_one::<AdSummary>().await
    }

    /// Active categories in display order
    pub async fn categories(&self) -> Result<Vec<Category>, Error> {
        let client = self.app.from("categories");
        let mut select = client.select("*");
        select.eq("is_active", true).order("sort_order", true);
        select.execute::<Category>().await
    }

    /// All locations, alphabetical by district
    pub async fn locations(&self) -> Result<Vec<Location>, Error> {
        let client = self.app.from("locations");
        let mut select = client.select("*");
        select.order("district", true);
        select.execute::<Location>().await
    }
}

/// Translate the filter state onto a select builder.
///
/// The approved-status restriction is unconditional and applied before any
/// user-supplied filter; the trailing `id` order is the explicit tie-break
/// so equal prices or timestamps come back in a stable order.
fn apply(query: &ListingQuery, select: &mut SelectBuilder) {
    select.eq("status", AdStatus::Approved.as_str());

    if let Some(text) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = ilike_pattern(text);
        select.or(&format!(
            "title.ilike.{},description.ilike.{}",
            pattern, pattern
        ));
    }

    if let Some(category_id) = query.category_id {
        select.eq("category_id", category_id);
    }

    if let Some(location_id) = query.location_id {
        select.eq("location_id", location_id);
    }

    match query.sort {
        SortKey::Newest => select.order("created_at", false),
        SortKey::Oldest => select.order("created_at", true),
        SortKey::PriceLow => select.order("price", true),
        SortKey::PriceHigh => select.order("price", false),
    };
    select.order("id", true);
}

/// A case-insensitive containment pattern for the `or=` disjunction.
/// Text containing characters PostgREST reserves inside the disjunction is
/// emitted in the double-quoted form.
fn ilike_pattern(text: &str) -> String {
    let reserved = |c: char| matches!(c, ',' | '(' | ')' | '"');
    if text.contains(reserved) {
        let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"%{}%\"", escaped)
    } else {
        format!("%{}%", text)
    }
}
