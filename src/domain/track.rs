use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::TrackId;

/// Represent a music track in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genres: Vec<String>,
    pub slug: String,
    pub cover_image: String,
    /// url of the uploaded audio, empty when nothing is uploaded
    pub audio_file: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Track {
    pub fn has_audio_file(&self) -> bool {
        !self.audio_file.is_empty()
    }

    /// Merges the patch into the track. `id` and `created_at` are left alone.
    pub fn apply(&mut self, patch: TrackPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(artist) = patch.artist {
            self.artist = artist;
        }
        if let Some(album) = patch.album {
            self.album = album;
        }
        if let Some(genres) = patch.genres {
            self.genres = dedup_genres(genres);
        }
        if let Some(slug) = patch.slug {
            self.slug = slug;
        }
        if let Some(cover_image) = patch.cover_image {
            self.cover_image = cover_image;
        }
    }
}

/// Fields accepted when creating a track
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrack {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub genres: Vec<String>,
    pub slug: String,
    #[serde(default)]
    pub cover_image: String,
}

impl NewTrack {
    pub fn validate(&self) -> Result<(), TrackValidationError> {
        require("title", &self.title)?;
        require("artist", &self.artist)?;
        require("slug", &self.slug)?;
        Ok(())
    }

    pub fn into_track(self, id: TrackId, now: DateTime<Utc>) -> Track {
        Track {
            id,
            title: self.title,
            artist: self.artist,
            album: self.album,
            genres: dedup_genres(self.genres),
            slug: self.slug,
            cover_image: self.cover_image,
            audio_file: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a track, absent fields are kept as they are
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackPatch {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genres: Option<Vec<String>>,
    pub slug: Option<String>,
    pub cover_image: Option<String>,
}

impl TrackPatch {
    pub fn validate(&self) -> Result<(), TrackValidationError> {
        for (field, value) in [
            ("title", &self.title),
            ("artist", &self.artist),
            ("slug", &self.slug),
        ] {
            if let Some(value) = value {
                require(field, value)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackValidationError {
    #[error("{0} must not be empty")]
    MissingField(&'static str),
}

fn require(field: &'static str, value: &str) -> Result<(), TrackValidationError> {
    if value.trim().is_empty() {
        Err(TrackValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

/// genres behave like a set, but keep the order they were given in
fn dedup_genres(genres: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(genres.len());
    for genre in genres {
        if !unique.contains(&genre) {
            unique.push(genre);
        }
    }
    unique
}

/// Turns a title into a url friendly slug.
///
/// "Bohemian Rhapsody (Live)" -> "bohemian-rhapsody-live"
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_track() -> NewTrack {
        NewTrack {
            title: "Paranoid".to_string(),
            artist: "Black Sabbath".to_string(),
            album: "Paranoid".to_string(),
            genres: vec!["Metal".to_string(), "Rock".to_string(), "Metal".to_string()],
            slug: "paranoid".to_string(),
            cover_image: String::new(),
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Bohemian Rhapsody (Live)"), "bohemian-rhapsody-live");
        assert_eq!(slugify("  AC/DC -- Thunderstruck!  "), "ac-dc-thunderstruck");
        assert_eq!(slugify("Sigur Rós"), "sigur-rós");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        assert_eq!(new_track().validate(), Ok(()));

        let blank_title = NewTrack {
            title: "   ".to_string(),
            ..new_track()
        };
        assert_eq!(
            blank_title.validate(),
            Err(TrackValidationError::MissingField("title"))
        );

        let no_slug = NewTrack {
            slug: String::new(),
            ..new_track()
        };
        assert_eq!(
            no_slug.validate(),
            Err(TrackValidationError::MissingField("slug"))
        );
    }

    #[test]
    fn test_into_track_dedups_genres() {
        let now = Utc::now();
        let track = new_track().into_track(TrackId::from("1"), now);

        assert_eq!(track.genres, vec!["Metal", "Rock"]);
        assert_eq!(track.created_at, now);
        assert_eq!(track.updated_at, now);
        assert!(!track.has_audio_file());
    }

    #[test]
    fn test_apply_patch_keeps_untouched_fields() {
        let mut track = new_track().into_track(TrackId::from("1"), Utc::now());

        track.apply(TrackPatch {
            album: Some("Master of Reality".to_string()),
            genres: Some(vec!["Rock".to_string(), "Rock".to_string()]),
            ..Default::default()
        });

        assert_eq!(track.id, TrackId::from("1"));
        assert_eq!(track.title, "Paranoid");
        assert_eq!(track.album, "Master of Reality");
        assert_eq!(track.genres, vec!["Rock"]);
    }

    #[test]
    fn test_patch_validate() {
        let patch = TrackPatch {
            artist: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            patch.validate(),
            Err(TrackValidationError::MissingField("artist"))
        );
        assert_eq!(TrackPatch::default().validate(), Ok(()));
    }

    #[test]
    fn test_track_json_uses_camel_case() -> anyhow::Result<()> {
        let track = new_track().into_track(TrackId::from("42"), Utc::now());
        let json = serde_json::to_value(&track)?;

        assert_eq!(json["id"], "42");
        assert_eq!(json["coverImage"], "");
        assert_eq!(json["audioFile"], "");
        assert!(json.get("createdAt").is_some());

        Ok(())
    }
}
