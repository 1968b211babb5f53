use rusqlite::Connection;

pub mod tables {
    pub const TRACKS: &str = "tracks";

    pub const ALL_TABLES: &[&str] = &[TRACKS];
}

pub mod columns {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const ARTIST: &str = "artist";
    pub const ALBUM: &str = "album";
    pub const GENRES: &str = "genres";
    pub const SLUG: &str = "slug";
    pub const COVER_IMAGE: &str = "cover_image";
    pub const AUDIO_FILE: &str = "audio_file";
    pub const CREATED_AT: &str = "created_at";
    pub const UPDATED_AT: &str = "updated_at";

    /// column order used by every `SELECT` that builds a `Track`
    pub const TRACK_COLUMNS: &str = "id, title, artist, album, genres, slug, cover_image, audio_file, created_at, updated_at";
}

// genres hold a JSON array of strings,
// timestamps are fixed width RFC 3339 so text order is time order
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS tracks (
    id TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    artist TEXT NOT NULL,
    album TEXT NOT NULL DEFAULT '',
    genres TEXT NOT NULL DEFAULT '[]',
    slug TEXT NOT NULL UNIQUE,
    cover_image TEXT NOT NULL DEFAULT '',
    audio_file TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS tracks_created_at ON tracks (created_at);
"#;

pub fn init(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA)
}
