//! Saving and unsaving ads, keyed by (user, ad).
//!
//! The favorites table carries a uniqueness constraint on
//! `(user_id, ad_id)`, so the toggle is an atomic pair: a predicate delete
//! that doubles as the existence check, and a merge-on-conflict insert.
//! Concurrent toggles cannot produce duplicate rows.

use tracing::debug;
use uuid::Uuid;

use crate::auth::Session;
use crate::error::Error;
use crate::models::{Favorite, FavoriteWithAd, NewFavorite};
use crate::Marketplace;

/// Columns fetched for the dashboard's favorites tab
const FAVORITE_COLUMNS: &str =
    "*,ads(*,categories(name,slug),locations(city,district),profiles(full_name))";

/// The effect a toggle had
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteToggle {
    /// The ad was saved
    Added,

    /// The ad was unsaved
    Removed,
}

/// Favorite operations
pub struct Favorites<'a> {
    app: &'a Marketplace,
}

impl<'a> Favorites<'a> {
    pub(crate) fn new(app: &'a Marketplace) -> Self {
        Self { app }
    }

    /// Save the ad if it is not a favorite yet, unsave it otherwise.
    ///
    /// Without a session this fails immediately and issues no request.
    pub async fn toggle(
        &self,
        session: Option<&Session>,
        ad_id: Uuid,
    ) -> Result<FavoriteToggle, Error> {
        let session = session.ok_or(Error::SignInRequired("save favorites"))?;

        let removed: Vec<Favorite> = self
            .app
            .from("favorites")
            .delete()
            .auth(&session.access_token)
            .eq("user_id", session.user_id)
            .eq("ad_id", ad_id)
            .execute()
            .await?;

        if !removed.is_empty() {
            debug!(%ad_id, "removed from favorites");
            return Ok(FavoriteToggle::Removed);
        }

        self.app
            .from("favorites")
            .upsert(NewFavorite {
                user_id: session.user_id,
                ad_id,
            })
            .on_conflict("user_id,ad_id")
            .auth(&session.access_token)
            .execute_no_return()
            .await?;

        debug!(%ad_id, "added to favorites");
        Ok(FavoriteToggle::Added)
    }

    /// The user's favorites with their ads embedded, for the dashboard
    pub async fn list(&self, session: &Session) -> Result<Vec<FavoriteWithAd>, Error> {
        let client = self.app.from("favorites");
        let mut select = client.select(FAVORITE_COLUMNS);
        select
            .auth(&session.access_token)
            .eq("user_id", session.user_id);
        select.execute::<FavoriteWithAd>().await
    }

    /// Remove one favorite by its row id
    pub async fn remove(&self, session: &Session, favorite_id: Uuid) -> Result<(), Error> {
        self.app
            .from("favorites")
            .delete()
            .auth(&session.access_token)
            .eq("id", favorite_id)
            .execute_no_return()
            .await
    }
}
