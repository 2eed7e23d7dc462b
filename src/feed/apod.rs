//! Astronomy Picture of the Day.
//!
//! One GET per date, no retry: whatever the endpoint returns for that date
//! is mapped straight into a [`PhotoRecord`].

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use super::{PhotoRecord, SourceMetadata};
use crate::client::{FetchError, JsonGet};

pub const PATH: &str = "/planetary/apod";

#[derive(Debug, Deserialize)]
struct ApodResponse {
    title: String,
    #[serde(default)]
    explanation: String,
    /// Absent for some non-image entries.
    #[serde(default)]
    url: String,
    media_type: String,
    date: String,
}

impl From<ApodResponse> for PhotoRecord {
    fn from(r: ApodResponse) -> Self {
        PhotoRecord {
            image_url: r.url,
            caption: Some(r.title.clone()),
            date: r.date,
            source: SourceMetadata::Apod {
                title: r.title,
                explanation: r.explanation,
                media_type: r.media_type,
            },
        }
    }
}

/// The `date` query value for a calendar day.
pub fn date_param(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub async fn fetch<A>(api: &A, date: NaiveDate) -> Result<PhotoRecord, FetchError>
where
    A: JsonGet + ?Sized,
{
    info!("Fetching APOD for {}", date);

    let body = api.get_json(PATH, &[("date", date_param(date))]).await?;
    let response: ApodResponse =
        serde_json::from_value(body).map_err(|e| FetchError::decode(PATH, e))?;

    Ok(response.into())
}
