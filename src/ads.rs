//! Posting, listing, and deleting the user's own ads.
//!
//! Posting is a fixed sequence: validate the form, upload the images,
//! insert the row. Images upload concurrently; if any of them fails the
//! objects that did make it are removed and the ad row is never created.

use chrono::{Duration, Utc};
use futures::future::join_all;
use tracing::{debug, warn};
use uuid::Uuid;
use validator::Validate;

use crate::auth::Session;
use crate::error::Error;
use crate::forms::AdForm;
use crate::models::{Ad, AdStatus, AdSummary, NewAd};
use crate::storage::FileOptions;
use crate::Marketplace;

/// Bucket holding ad images
const AD_IMAGES_BUCKET: &str = "ad-images";

/// Maximum number of images per ad
pub const MAX_AD_IMAGES: usize = 5;

/// Days until a newly posted ad expires
const AD_LIFETIME_DAYS: i64 = 30;

/// Columns fetched for the dashboard's own-ads tab
const MY_ADS_COLUMNS: &str = "*,categories(name,slug),locations(city,district)";

/// One image attached to the ad form
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// The original file name; only its extension survives into the stored
    /// path
    pub file_name: String,

    /// MIME type, when known
    pub content_type: Option<String>,

    /// The file contents
    pub data: Vec<u8>,
}

impl ImageUpload {
    fn extension(&self) -> &str {
        self.file_name.rsplit('.').next().unwrap_or("bin")
    }
}

/// Operations on the user's own ads
pub struct Ads<'a> {
    app: &'a Marketplace,
}

impl<'a> Ads<'a> {
    pub(crate) fn new(app: &'a Marketplace) -> Self {
        Self { app }
    }

    /// Post a new ad.
    ///
    /// The row is created in `pending` status with a 30-day expiry; the
    /// contact email falls back to the signed-in address when the form
    /// leaves it blank. Moderation takes it from there.
    pub async fn post(
        &self,
        session: &Session,
        form: &AdForm,
        images: &[ImageUpload],
    ) -> Result<Ad, Error> {
        form.validate()?;

        if images.len() > MAX_AD_IMAGES {
            return Err(Error::TooManyImages(MAX_AD_IMAGES));
        }

        let image_urls = if images.is_empty() {
            Vec::new()
        } else {
            self.upload_images(session, images).await?
        };

        let record = NewAd {
            title: form.title.clone(),
            description: form.description.clone(),
            price: form.parsed_price(),
            price_type: form.price_type,
            category_id: form.category_id,
            location_id: form.location_id,
            user_id: session.user_id,
            images: image_urls,
            contact_phone: form.contact_phone.clone(),
            contact_email: form.contact_email.clone().or_else(|| session.email.clone()),
            status: AdStatus::Pending,
            expires_at: Utc::now() + Duration::days(AD_LIFETIME_DAYS),
        };

        let rows: Vec<Ad> = self
            .app
            .from("ads")
            .insert(&record)
            .auth(&session.access_token)
            .execute()
            .await?;

        let ad = rows
            .into_iter()
            .next()
            .ok_or_else(|| Error::database("insert returned no rows"))?;
        debug!(ad_id = %ad.id, "posted ad");
        Ok(ad)
    }

    /// Upload every image concurrently and return the public URLs in the
    /// order the images were attached. On any failure the successfully
    /// uploaded objects are removed before the error is reported.
    async fn upload_images(
        &self,
        session: &Session,
        images: &[ImageUpload],
    ) -> Result<Vec<String>, Error> {
        let storage = self.app.storage().with_auth(&session.access_token);
        let bucket = storage.from(AD_IMAGES_BUCKET);

        let stamp = Utc::now().timestamp_millis();
        let paths: Vec<String> = images
            .iter()
            .enumerate()
            .map(|(index, image)| {
                format!("{}/{}-{}.{}", session.user_id, stamp, index, image.extension())
            })
            .collect();

        let uploads = images.iter().zip(&paths).map(|(image, path)| {
            let bucket = &bucket;
            let options = match &image.content_type {
                Some(content_type) => FileOptions::default().with_content_type(content_type),
                None => FileOptions::default(),
            };
            async move { bucket.upload(path, image.data.clone(), options).await }
        });
        let results = join_all(uploads).await;

        let mut uploaded = Vec::new();
        let mut failure = None;
        for (path, result) in paths.iter().zip(results) {
            match result {
                Ok(_) => uploaded.push(path.clone()),
                Err(error) if failure.is_none() => failure = Some(error),
                Err(_) => {}
            }
        }

        if let Some(error) = failure {
            if !uploaded.is_empty() {
                if let Err(cleanup) = bucket.remove(&uploaded).await {
                    warn!(%cleanup, "could not remove partially uploaded images");
                }
            }
            return Err(error);
        }

        Ok(paths.iter().map(|path| bucket.get_public_url(path)).collect())
    }

    /// The user's own ads, newest first, for the dashboard
    pub async fn mine(&self, session: &Session) -> Result<Vec<AdSummary>, Error> {
        let client = self.app.from("ads");
        let mut select = client.select(MY_ADS_COLUMNS);
        select
            .auth(&session.access_token)
            .eq("user_id", session.user_id)
            .order("created_at", false);
        select.execute::<AdSummary>().await
    }

    /// Delete one of the user's own ads. Row-level security enforces that
    /// only the owner's delete matches.
    pub async fn delete(&self, session: &Session, ad_id: Uuid) -> Result<(), Error> {
        self.app
            .from("ads")
            .delete()
            .auth(&session.access_token)
            .eq("id", ad_id)
            .execute_no_return()
            .await
    }
}
