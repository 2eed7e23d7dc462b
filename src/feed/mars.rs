//! Curiosity rover photos: a random photo from a random sol.
//!
//! Most sols have no usable photos, so the feed samples a sol, keeps only
//! JPEG/PNG images and tries again with a new sol when nothing is left, up
//! to [`MARS_MAX_ATTEMPTS`] times.

use rand::Rng;
use serde::Deserialize;
use tracing::{info, warn};

use super::{pick_uniform, FeedOutcome, PhotoRecord, SourceMetadata};
use crate::client::{FetchError, JsonGet};
use crate::config::{MARS_MAX_ATTEMPTS, MARS_SOL_MAX, MARS_SOL_MIN};

pub const PATH: &str = "/mars-photos/api/v1/rovers/curiosity/photos";

#[derive(Debug, Clone, Deserialize)]
struct RoverPhotos {
    photos: Vec<RoverPhoto>,
}

#[derive(Debug, Clone, Deserialize)]
struct RoverPhoto {
    img_src: String,
    camera: Camera,
    rover: Rover,
    sol: u32,
    earth_date: String,
}

#[derive(Debug, Clone, Deserialize)]
struct Camera {
    full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct Rover {
    name: String,
}

impl From<RoverPhoto> for PhotoRecord {
    fn from(p: RoverPhoto) -> Self {
        PhotoRecord {
            image_url: p.img_src,
            caption: None,
            date: p.earth_date,
            source: SourceMetadata::Mars {
                camera: p.camera.full_name,
                rover: p.rover.name,
                sol: p.sol,
            },
        }
    }
}

/// Whether an image URL is in a format the screens can show.
pub fn is_supported_image(url: &str) -> bool {
    let url = url.to_ascii_lowercase();
    url.ends_with(".jpg") || url.ends_with(".png")
}

fn supported(photos: Vec<RoverPhoto>) -> Vec<RoverPhoto> {
    photos
        .into_iter()
        .filter(|p| is_supported_image(&p.img_src))
        .collect()
}

pub fn random_sol<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(MARS_SOL_MIN..MARS_SOL_MAX)
}

async fn photos_for_sol<A>(api: &A, sol: u32) -> Result<Vec<RoverPhoto>, FetchError>
where
    A: JsonGet + ?Sized,
{
    let body = api.get_json(PATH, &[("sol", sol.to_string())]).await?;
    let listing: RoverPhotos =
        serde_json::from_value(body).map_err(|e| FetchError::decode(PATH, e))?;
    Ok(listing.photos)
}

/// Sample sols until one has a usable photo.
///
/// A failed request uses up an attempt exactly like an empty sol does; the
/// loop never aborts early on an error.
pub async fn fetch<A, R>(api: &A, rng: &mut R) -> Result<FeedOutcome, FetchError>
where
    A: JsonGet + ?Sized,
    R: Rng + ?Sized,
{
    for attempt in 1..=MARS_MAX_ATTEMPTS {
        let sol = random_sol(rng);

        let candidates = match photos_for_sol(api, sol).await {
            Ok(photos) => supported(photos),
            Err(e) => {
                warn!("Mars attempt {}/{} (sol {}) failed: {}", attempt, MARS_MAX_ATTEMPTS, sol, e);
                continue;
            }
        };

        if let Some(photo) = pick_uniform(&candidates, rng) {
            info!(
                "Picked Mars photo from sol {} on attempt {}/{} ({} candidates)",
                sol,
                attempt,
                MARS_MAX_ATTEMPTS,
                candidates.len()
            );
            return Ok(FeedOutcome::Photo(photo.clone().into()));
        }

        info!("Sol {} has no usable photos, attempt {}/{}", sol, attempt, MARS_MAX_ATTEMPTS);
    }

    Ok(FeedOutcome::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::testing::{Reply, ScriptedApi};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn photo(src: &str) -> serde_json::Value {
        json!({
            "id": 102693,
            "sol": 1000,
            "camera": { "id": 20, "name": "FHAZ", "rover_id": 5, "full_name": "Front Hazard Avoidance Camera" },
            "img_src": src,
            "earth_date": "2015-05-30",
            "rover": { "id": 5, "name": "Curiosity", "status": "active" }
        })
    }

    fn listing(srcs: &[&str]) -> Reply {
        Reply::Json(json!({ "photos": srcs.iter().map(|s| photo(s)).collect::<Vec<_>>() }))
    }

    #[test]
    fn filter_keeps_jpg_and_png_any_case() {
        let listed: RoverPhotos = serde_json::from_value(json!({
            "photos": [
                photo("http://mars.test/a.jpg"),
                photo("http://mars.test/b.PNG"),
                photo("http://mars.test/c.gif"),
            ]
        }))
        .unwrap();

        let kept: Vec<String> = supported(listed.photos).into_iter().map(|p| p.img_src).collect();
        assert_eq!(kept, vec!["http://mars.test/a.jpg", "http://mars.test/b.PNG"]);
    }

    #[test]
    fn extension_must_be_at_the_end() {
        assert!(is_supported_image("http://mars.test/x.JPG"));
        assert!(!is_supported_image("http://mars.test/x.jpg.gif"));
        assert!(!is_supported_image("http://mars.test/x.jpeg"));
    }

    #[test]
    fn sampled_sols_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            let sol = random_sol(&mut rng);
            assert!((MARS_SOL_MIN..MARS_SOL_MAX).contains(&sol), "sol {sol} out of range");
        }
    }

    #[tokio::test]
    async fn succeeds_on_fifth_attempt() {
        let api = ScriptedApi::with_default(listing(&["http://mars.test/late.jpg"])).queue([
            listing(&[]),
            listing(&["http://mars.test/a.gif"]),
            listing(&[]),
            listing(&["http://mars.test/b.tif"]),
        ]);
        let mut rng = StdRng::seed_from_u64(9);

        let outcome = fetch(&api, &mut rng).await.unwrap();

        let FeedOutcome::Photo(record) = outcome else {
            panic!("expected a photo");
        };
        assert_eq!(record.image_url, "http://mars.test/late.jpg");
        assert_eq!(record.date, "2015-05-30");
        assert_eq!(
            record.source,
            SourceMetadata::Mars {
                camera: "Front Hazard Avoidance Camera".into(),
                rover: "Curiosity".into(),
                sol: 1000,
            }
        );
        assert_eq!(api.calls().len(), MARS_MAX_ATTEMPTS);
    }

    #[tokio::test]
    async fn stops_as_soon_as_a_photo_qualifies() {
        let api = ScriptedApi::with_default(listing(&[]))
            .queue([listing(&["http://mars.test/first.png"])]);
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = fetch(&api, &mut rng).await.unwrap();
        assert!(matches!(outcome, FeedOutcome::Photo(_)));
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let api = ScriptedApi::with_default(listing(&["http://mars.test/only.gif"]));
        let mut rng = StdRng::seed_from_u64(5);

        let outcome = fetch(&api, &mut rng).await.unwrap();

        assert_eq!(outcome, FeedOutcome::Empty);
        assert_eq!(api.calls().len(), MARS_MAX_ATTEMPTS);
    }

    #[tokio::test]
    async fn transport_errors_use_up_attempts_without_aborting() {
        let api = ScriptedApi::with_default(Reply::Fail)
            .queue([Reply::Fail, Reply::Fail, listing(&["http://mars.test/ok.jpg"])]);
        let mut rng = StdRng::seed_from_u64(11);

        let outcome = fetch(&api, &mut rng).await.unwrap();
        assert!(matches!(outcome, FeedOutcome::Photo(ref r) if r.image_url == "http://mars.test/ok.jpg"));
        assert_eq!(api.calls().len(), 3);
    }

    #[tokio::test]
    async fn only_failures_end_empty() {
        let api = ScriptedApi::with_default(Reply::Fail);
        let mut rng = StdRng::seed_from_u64(11);

        let outcome = fetch(&api, &mut rng).await.unwrap();
        assert_eq!(outcome, FeedOutcome::Empty);
        assert_eq!(api.calls().len(), MARS_MAX_ATTEMPTS);
    }

    #[tokio::test]
    async fn each_attempt_sends_a_sampled_sol() {
        let api = ScriptedApi::with_default(listing(&[]));
        let mut rng = StdRng::seed_from_u64(2);

        fetch(&api, &mut rng).await.unwrap();

        for call in api.calls() {
            assert_eq!(call.path, PATH);
            let sol: u32 = call.param("sol").unwrap().parse().unwrap();
            assert!((MARS_SOL_MIN..MARS_SOL_MAX).contains(&sol));
        }
    }
}
