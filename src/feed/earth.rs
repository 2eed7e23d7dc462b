//! EPIC Earth imagery: a random photo from the last week.
//!
//! The listing endpoint only answers "what was taken on day D", so the feed
//! asks about each day of the window, pools every descriptor it gets back
//! and draws one uniformly. Days that fail are treated as days with no
//! photos.

use chrono::{Datelike, Duration, NaiveDate};
use futures::future::join_all;
use rand::Rng;
use serde::Deserialize;
use tracing::{info, warn};

use super::{pick_uniform, FeedOutcome, PhotoRecord, SourceMetadata};
use crate::client::{FetchError, JsonGet};
use crate::config::EARTH_WINDOW_DAYS;

const LISTING_PATH: &str = "/EPIC/api/natural/date";

/// One entry of a daily listing.
#[derive(Debug, Clone, Deserialize)]
struct Descriptor {
    image: String,
    caption: Option<String>,
    #[serde(default)]
    identifier: String,
}

/// The days covered by the window, today first.
pub fn window(today: NaiveDate) -> Vec<NaiveDate> {
    (0..EARTH_WINDOW_DAYS)
        .map(|i| today - Duration::days(i))
        .collect()
}

/// `{archive}/{year}/{month}/{day}/jpg/{image}.jpg`, month and day
/// zero-padded.
pub fn archive_url(archive_base: &str, day: NaiveDate, image: &str) -> String {
    format!(
        "{}/{:04}/{:02}/{:02}/jpg/{}.jpg",
        archive_base.trim_end_matches('/'),
        day.year(),
        day.month(),
        day.day(),
        image
    )
}

/// A day's listing, each entry tagged with the day it was listed under.
async fn list_day<A>(api: &A, day: NaiveDate) -> Result<Vec<(NaiveDate, Descriptor)>, FetchError>
where
    A: JsonGet + ?Sized,
{
    let path = format!("{}/{}", LISTING_PATH, day.format("%Y-%m-%d"));
    let body = api.get_json(&path, &[]).await?;
    let listed: Vec<Descriptor> =
        serde_json::from_value(body).map_err(|e| FetchError::decode(&path, e))?;
    Ok(listed.into_iter().map(|d| (day, d)).collect())
}

/// Pool the window's listings and pick one photo.
///
/// Never fails: an all-failing window is reported as [`FeedOutcome::Empty`].
pub async fn fetch<A, R>(
    api: &A,
    archive_base: &str,
    today: NaiveDate,
    rng: &mut R,
) -> Result<FeedOutcome, FetchError>
where
    A: JsonGet + ?Sized,
    R: Rng + ?Sized,
{
    let days = window(today);
    info!("Fetching EPIC listings for {} days up to {}", days.len(), today);

    let listings = join_all(days.iter().map(|&day| list_day(api, day))).await;

    let mut pool = Vec::new();
    for (day, listing) in days.iter().zip(listings) {
        match listing {
            Ok(found) => pool.extend(found),
            Err(e) => warn!("Skipping EPIC day {}: {}", day, e),
        }
    }

    let Some((day, chosen)) = pick_uniform(&pool, rng) else {
        info!("No EPIC imagery in the last {} days", EARTH_WINDOW_DAYS);
        return Ok(FeedOutcome::Empty);
    };
    info!("Picked EPIC image {} out of {}", chosen.image, pool.len());

    let day = *day;
    Ok(FeedOutcome::Photo(PhotoRecord {
        image_url: archive_url(archive_base, day, &chosen.image),
        caption: chosen.caption.clone(),
        date: day.format("%Y-%m-%d").to_string(),
        source: SourceMetadata::Earth {
            identifier: chosen.identifier.clone(),
        },
    }))
}
