use rusqlite::{OptionalExtension, Row, params, params_from_iter, types::Type};
use serde::Serialize;

use crate::{
    config,
    domain::{
        genre,
        id::TrackId,
        track::{NewTrack, Track, TrackPatch},
    },
    media::{self, MediaError, MediaKey, MediaStore},
    storage::{
        db::{self, format_timestamp, parse_timestamp},
        error::StorageError,
        query::{Page, TrackQuery},
        schema::{columns, tables},
    },
};

use columns::*;
use tables::*;

/// Outcome of deleting several tracks at once
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BatchDeleteReport {
    /// ids that were deleted, in input order
    pub success: Vec<TrackId>,
    /// ids that were missing or could not be deleted, in input order
    pub failed: Vec<TrackId>,
}

/// Main structure that implements all catalog logic.
///
/// Owns the track database and the media store; every change to a track
/// and to its uploaded audio goes through here.
pub struct TrackRepository {
    pub(crate) db: rusqlite::Connection,
    media: Box<dyn MediaStore>,
    media_folder: String,
}

impl TrackRepository {
    /// when called, opens a data base connection
    pub fn new(
        db_config: &config::Database,
        media_config: &config::MediaConfig,
    ) -> Result<Self, StorageError> {
        let db = db::open(db_config)?;
        Ok(Self::from_existing_conn(
            db,
            media::from_config(media_config),
            media_config.folder.clone(),
        ))
    }

    /// expects a connection already prepared with [`db::prepare`]
    pub fn from_existing_conn(
        db: rusqlite::Connection,
        media: Box<dyn MediaStore>,
        media_folder: String,
    ) -> Self {
        Self {
            db,
            media,
            media_folder,
        }
    }

    fn media_key(&self, id: &TrackId) -> MediaKey {
        MediaKey::new(&self.media_folder, id)
    }

    pub fn create_track(&mut self, fields: NewTrack) -> Result<Track, StorageError> {
        fields.validate()?;
        let track = fields.into_track(TrackId::generate(), db::now());

        self.db.execute(
            &format!(
                "INSERT INTO {TRACKS} ({TRACK_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
            ),
            params![
                track.id.as_str(),
                track.title,
                track.artist,
                track.album,
                serde_json::to_string(&track.genres)?,
                track.slug,
                track.cover_image,
                track.audio_file,
                format_timestamp(&track.created_at),
                format_timestamp(&track.updated_at),
            ],
        )?;

        log::debug!("created track {} ({})", track.id, track.slug);
        Ok(track)
    }

    /// Merges `patch` into the stored track.
    ///
    /// Returns `None` if there is no track with this id.
    pub fn update_track(
        &mut self,
        id: &TrackId,
        patch: TrackPatch,
    ) -> Result<Option<Track>, StorageError> {
        patch.validate()?;

        let tx = self.db.transaction()?;

        let Some(mut track) = find_one(&tx, ID, id.as_str())? else {
            return Ok(None);
        };

        track.apply(patch);
        // never move backwards, even if the clock does
        track.updated_at = db::now().max(track.updated_at);

        tx.execute(
            &format!(
                "UPDATE {TRACKS} SET {TITLE} = ?1, {ARTIST} = ?2, {ALBUM} = ?3, {GENRES} = ?4, \
                 {SLUG} = ?5, {COVER_IMAGE} = ?6, {UPDATED_AT} = ?7 WHERE {ID} = ?8"
            ),
            params![
                track.title,
                track.artist,
                track.album,
                serde_json::to_string(&track.genres)?,
                track.slug,
                track.cover_image,
                format_timestamp(&track.updated_at),
                track.id.as_str(),
            ],
        )?;

        tx.commit()?;

        log::debug!("updated track {}", track.id);
        Ok(Some(track))
    }

    pub fn get_track_by_id(&self, id: &TrackId) -> Result<Option<Track>, StorageError> {
        find_one(&self.db, ID, id.as_str())
    }

    pub fn get_track_by_slug(&self, slug: &str) -> Result<Option<Track>, StorageError> {
        find_one(&self.db, SLUG, slug)
    }

    /// One page of the tracks matching `query`, plus the number of all matches
    pub fn get_tracks(&self, query: &TrackQuery) -> Result<Page<Track>, StorageError> {
        let (filter, mut values) = query.filter();

        let total: i64 = self.db.query_row(
            &format!("SELECT COUNT(*) FROM {TRACKS} {filter}"),
            params_from_iter(values.iter()),
            |row| row.get(0),
        )?;

        values.push(i64::from(query.limit).into());
        values.push(i64::try_from(query.offset()).unwrap_or(i64::MAX).into());

        let mut stmt = self.db.prepare(&format!(
            "SELECT {TRACK_COLUMNS} FROM {TRACKS} {filter} {} LIMIT ? OFFSET ?",
            query.order_by()
        ))?;

        let tracks = stmt
            .query_map(params_from_iter(values.iter()), track_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(tracks, total.max(0) as u64, query))
    }

    /// Deletes the track and its uploaded audio.
    ///
    /// The record is removed even if the media store fails to delete the
    /// audio; the failure is only logged. Returns `false` if there is no such track.
    pub fn delete_track(&mut self, id: &TrackId) -> Result<bool, StorageError> {
        let Some(track) = self.get_track_by_id(id)? else {
            return Ok(false);
        };

        if track.has_audio_file() {
            match self.media.delete(&self.media_key(id)) {
                Ok(()) | Err(MediaError::NotFound(_)) => {}
                Err(e) => log::warn!(
                    "failed to delete audio of track {id}, media object is left behind: {e}"
                ),
            }
        }

        let deleted = self
            .db
            .execute(&format!("DELETE FROM {TRACKS} WHERE {ID} = ?1"), [id.as_str()])?;

        log::debug!("deleted track {id}");
        Ok(deleted > 0)
    }

    /// Deletes tracks one after another. A failing id never stops the batch.
    pub fn delete_multiple_tracks(&mut self, ids: &[TrackId]) -> BatchDeleteReport {
        ids.iter()
            .fold(BatchDeleteReport::default(), |mut report, id| {
                match self.delete_track(id) {
                    Ok(true) => report.success.push(id.clone()),
                    Ok(false) => report.failed.push(id.clone()),
                    Err(e) => {
                        log::warn!("failed to delete track {id}: {e}");
                        report.failed.push(id.clone());
                    }
                }
                report
            })
    }

    /// Uploads audio for the track id and returns its url.
    ///
    /// Does not touch the track record, see [`Self::attach_audio_file`].
    pub fn save_audio_file(
        &self,
        id: &TrackId,
        file_name: &str,
        data: &[u8],
    ) -> Result<String, StorageError> {
        Ok(self.media.upload(&self.media_key(id), file_name, data)?)
    }

    /// Uploads audio and links it to the track.
    ///
    /// Returns `None` without uploading anything if the track does not exist.
    pub fn attach_audio_file(
        &mut self,
        id: &TrackId,
        file_name: &str,
        data: &[u8],
    ) -> Result<Option<Track>, StorageError> {
        let Some(mut track) = self.get_track_by_id(id)? else {
            return Ok(None);
        };

        track.audio_file = self.save_audio_file(id, file_name, data)?;
        self.store_audio_file(&mut track)?;

        Ok(Some(track))
    }

    /// Removes the uploaded audio of a track and clears the link to it.
    ///
    /// Returns `false` if the track does not exist or has no audio.
    pub fn delete_audio_file(&mut self, id: &TrackId) -> Result<bool, StorageError> {
        let Some(mut track) = self.get_track_by_id(id)? else {
            return Ok(false);
        };
        if !track.has_audio_file() {
            return Ok(false);
        }

        match self.media.delete(&self.media_key(id)) {
            Ok(()) => {}
            Err(MediaError::NotFound(key)) => {
                log::debug!("media object {key} was already gone");
            }
            Err(e) => return Err(e.into()),
        }

        track.audio_file.clear();
        self.store_audio_file(&mut track)?;

        Ok(true)
    }

    fn store_audio_file(&self, track: &mut Track) -> Result<(), StorageError> {
        track.updated_at = db::now().max(track.updated_at);
        self.db.execute(
            &format!("UPDATE {TRACKS} SET {AUDIO_FILE} = ?1, {UPDATED_AT} = ?2 WHERE {ID} = ?3"),
            params![
                track.audio_file,
                format_timestamp(&track.updated_at),
                track.id.as_str()
            ],
        )?;
        Ok(())
    }

    pub fn get_genres(&self) -> &'static [&'static str] {
        genre::genres()
    }
}

fn find_one(
    db: &rusqlite::Connection,
    column: &str,
    value: &str,
) -> Result<Option<Track>, StorageError> {
    Ok(db
        .query_row(
            &format!("SELECT {TRACK_COLUMNS} FROM {TRACKS} WHERE {column} = ?1"),
            [value],
            track_from_row,
        )
        .optional()?)
}

/// expects the columns in [`TRACK_COLUMNS`] order
fn track_from_row(row: &Row<'_>) -> rusqlite::Result<Track> {
    let genres: String = row.get(4)?;
    let genres = serde_json::from_str(&genres)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    let timestamp = |idx: usize| -> rusqlite::Result<_> {
        let text: String = row.get(idx)?;
        parse_timestamp(&text)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    };

    Ok(Track {
        id: TrackId::from(row.get::<_, String>(0)?),
        title: row.get(1)?,
        artist: row.get(2)?,
        album: row.get(3)?,
        genres,
        slug: row.get(5)?,
        cover_image: row.get(6)?,
        audio_file: row.get(7)?,
        created_at: timestamp(8)?,
        updated_at: timestamp(9)?,
    })
}
