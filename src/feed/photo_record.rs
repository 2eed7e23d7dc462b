//! The normalized result every feed produces.
//!
//! Each feed maps its own JSON shape into a [`PhotoRecord`] so the screens
//! only ever deal with one type. Feed-specific details travel in
//! [`SourceMetadata`].

/// A single photo, normalized from any of the three feeds.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PhotoRecord {
    /// Where the image (or, for APOD videos, the embed) lives.
    pub image_url: String,

    /// Short description, when the feed provides one.
    pub caption: Option<String>,

    /// ISO calendar date (`YYYY-MM-DD`) the photo belongs to.
    ///
    /// For Mars this is the Earth date of the sol.
    pub date: String,

    pub source: SourceMetadata,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SourceMetadata {
    Apod {
        title: String,
        explanation: String,
        media_type: String,
    },
    Earth {
        identifier: String,
    },
    Mars {
        camera: String,
        rover: String,
        sol: u32,
    },
}

impl PhotoRecord {
    /// Whether the record points at a still image.
    ///
    /// Only APOD ever serves anything else (videos); Earth and Mars records
    /// are always images.
    pub fn is_image(&self) -> bool {
        match &self.source {
            SourceMetadata::Apod { media_type, .. } => media_type == "image",
            _ => true,
        }
    }
}

/// What a fetch produced when it did not fail.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FeedOutcome {
    Photo(PhotoRecord),
    /// The queries went through but nothing eligible was found.
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apod(media_type: &str) -> PhotoRecord {
        PhotoRecord {
            image_url: "https://apod.nasa.gov/apod/image/x.jpg".into(),
            caption: Some("Title".into()),
            date: "2024-01-01".into(),
            source: SourceMetadata::Apod {
                title: "Title".into(),
                explanation: "Text".into(),
                media_type: media_type.into(),
            },
        }
    }

    #[test]
    fn apod_video_is_not_an_image() {
        assert!(apod("image").is_image());
        assert!(!apod("video").is_image());
        assert!(!apod("other").is_image());
    }

    #[test]
    fn mars_and_earth_are_always_images() {
        let mars = PhotoRecord {
            image_url: "https://mars.nasa.gov/x.JPG".into(),
            caption: None,
            date: "2015-05-30".into(),
            source: SourceMetadata::Mars {
                camera: "Mast Camera".into(),
                rover: "Curiosity".into(),
                sol: 1000,
            },
        };
        assert!(mars.is_image());

        let earth = PhotoRecord {
            image_url: "https://epic.gsfc.nasa.gov/x.jpg".into(),
            caption: None,
            date: "2024-01-01".into(),
            source: SourceMetadata::Earth {
                identifier: "20240101003633".into(),
            },
        };
        assert!(earth.is_image());
    }
}
