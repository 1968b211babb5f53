use log::info;
use rouille::{Request, Response, input::post::BufferedFile};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::{
    config::HttpConfig,
    domain::{
        id::TrackId,
        track::{NewTrack, Track, TrackPatch, slugify},
    },
    http::error::ApiError,
    media::fs::{MUSIC_EXTENSIONS, is_music_file},
    storage::{
        error::StorageError,
        operations::{BatchDeleteReport, TrackRepository},
        query::{Page, TrackQuery},
    },
};

pub struct HttpServer {
    repository: Arc<Mutex<TrackRepository>>,
    pub config: HttpConfig,
    /// set when uploads are kept on local disk and served by this server
    media_root: Option<PathBuf>,
}

impl HttpServer {
    pub fn new(repository: TrackRepository, config: HttpConfig, media_root: Option<PathBuf>) -> Self {
        Self {
            repository: Arc::new(Mutex::new(repository)),
            config,
            media_root,
        }
    }

    pub fn run(self) {
        let addr = format!("{}:{}", self.config.bind_addr, self.config.port);
        rouille::start_server(addr, move |request| self.handle_request(request));
    }

    fn handle_request(&self, request: &Request) -> Response {
        Self::log_request(request);

        let result = rouille::router!(request,
            (GET) (/health) => {
                Ok(Response::json(&serde_json::json!({ "status": "ok" })))
            },

            (GET) (/api/genres) => {
                self.with_repository(|r| Ok(r.get_genres()))
                    .map(|genres| Response::json(&genres))
            },

            (GET) (/api/tracks) => {
                self.handle_list_tracks(request)
            },
            (POST) (/api/tracks) => {
                self.handle_create_track(request)
            },
            (POST) (/api/tracks/delete) => {
                self.handle_delete_tracks(request)
            },
            (GET) (/api/tracks/{slug: String}) => {
                self.handle_get_track(&slug)
            },
            (PUT) (/api/tracks/{id: String}) => {
                self.handle_update_track(request, TrackId::from(id))
            },
            (DELETE) (/api/tracks/{id: String}) => {
                self.handle_delete_track(TrackId::from(id))
            },

            (POST) (/api/tracks/{id: String}/upload) => {
                self.handle_upload(request, TrackId::from(id))
            },
            (DELETE) (/api/tracks/{id: String}/file) => {
                self.handle_delete_file(TrackId::from(id))
            },

            (GET) (/media/{folder: String}/{file: String}) => {
                self.handle_media(&folder, &file)
            },

            _ => Err(ApiError::NotFound("no such route".into()))
        );

        let response = match result {
            Ok(r) => r,
            Err(e) => e.into_response(),
        };

        info!("Response: {} {}", request.method(), response.status_code);
        response
    }

    fn log_request(request: &Request) {
        info!("{} {}", request.method(), request.raw_url());
    }

    /// runs `f` with exclusive access to the repository
    fn with_repository<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut TrackRepository) -> Result<T, StorageError>,
    {
        let mut repository = self.repository.lock().map_err(|e| {
            log::error!("Could not access track repository under lock: {e}");
            ApiError::Internal("internal server error".into())
        })?;
        f(&mut repository).map_err(ApiError::from)
    }

    fn handle_list_tracks(&self, request: &Request) -> Result<Response, ApiError> {
        let query = TrackQuery::from_params(|name| request.get_param(name))
            .map_err(StorageError::from)?;

        let page = self.with_repository(|r| r.get_tracks(&query))?;

        Ok(Response::json(&TrackListResponse::from(page)))
    }

    fn handle_get_track(&self, slug: &str) -> Result<Response, ApiError> {
        match self.with_repository(|r| r.get_track_by_slug(slug))? {
            Some(track) => Ok(Response::json(&track)),
            None => Err(ApiError::NotFound(format!("track '{slug}' not found"))),
        }
    }

    fn handle_create_track(&self, request: &Request) -> Result<Response, ApiError> {
        let body: CreateTrackRequest = rouille::input::json_input(request)
            .map_err(|e| ApiError::BadRequest(format!("invalid track: {e}")))?;

        let track = self.with_repository(|r| r.create_track(body.into_new_track()))?;

        Ok(Response::json(&track).with_status_code(201))
    }

    fn handle_update_track(&self, request: &Request, id: TrackId) -> Result<Response, ApiError> {
        let patch: TrackPatch = rouille::input::json_input(request)
            .map_err(|e| ApiError::BadRequest(format!("invalid track: {e}")))?;

        match self.with_repository(|r| r.update_track(&id, patch))? {
            Some(track) => Ok(Response::json(&track)),
            None => Err(ApiError::NotFound(format!("track {id} not found"))),
        }
    }

    fn handle_delete_track(&self, id: TrackId) -> Result<Response, ApiError> {
        if self.with_repository(|r| r.delete_track(&id))? {
            Ok(Response::empty_204())
        } else {
            Err(ApiError::NotFound(format!("track {id} not found")))
        }
    }

    fn handle_delete_tracks(&self, request: &Request) -> Result<Response, ApiError> {
        let body: BatchDeleteRequest = rouille::input::json_input(request)
            .map_err(|e| ApiError::BadRequest(format!("invalid id list: {e}")))?;

        let report: BatchDeleteReport =
            self.with_repository(|r| Ok(r.delete_multiple_tracks(&body.ids)))?;

        Ok(Response::json(&report))
    }

    fn handle_upload(&self, request: &Request, id: TrackId) -> Result<Response, ApiError> {
        let limit = self.config.max_upload_bytes;
        let too_large =
            || ApiError::PayloadTooLarge(format!("uploads are limited to {limit} bytes"));

        let declared_len = request
            .header("Content-Length")
            .and_then(|len| len.parse::<u64>().ok());
        if declared_len.is_some_and(|len| len > limit) {
            return Err(too_large());
        }

        let input = rouille::post_input!(request, { file: BufferedFile })
            .map_err(|e| ApiError::BadRequest(format!("invalid upload: {e}")))?;
        let file = input.file;

        if file.data.len() as u64 > limit {
            return Err(too_large());
        }

        let file_name = file.filename.unwrap_or_default();
        if !is_music_file(&file_name) {
            return Err(ApiError::BadRequest(format!(
                "only audio files are accepted ({})",
                MUSIC_EXTENSIONS.join(", ")
            )));
        }

        log::debug!(
            "UPLOAD {id} <- {file_name}, {} bytes, MIME type: {}",
            file.data.len(),
            file.mime
        );

        match self.with_repository(|r| r.attach_audio_file(&id, &file_name, &file.data))? {
            Some(track) => Ok(Response::json(&track)),
            None => Err(ApiError::NotFound(format!("track {id} not found"))),
        }
    }

    fn handle_delete_file(&self, id: TrackId) -> Result<Response, ApiError> {
        let track = self.with_repository(|r| {
            if r.get_track_by_id(&id)?.is_none() {
                return Ok(None);
            }
            r.delete_audio_file(&id)?;
            r.get_track_by_id(&id)
        })?;

        match track {
            Some(track) => Ok(Response::json(&track)),
            None => Err(ApiError::NotFound(format!("track {id} not found"))),
        }
    }

    /// serves files uploaded to the local media store
    fn handle_media(&self, folder: &str, file: &str) -> Result<Response, ApiError> {
        let not_found = || ApiError::NotFound(format!("media {folder}/{file} not found"));

        let root = self.media_root.as_ref().ok_or_else(not_found)?;
        if [folder, file]
            .iter()
            .any(|part| part.starts_with('.') || part.contains(['/', '\\']))
        {
            return Err(not_found());
        }

        let path = root.join(folder).join(file);
        if !path.is_file() {
            return Err(not_found());
        }

        let mime = Self::mime_for_file(&path);
        let opened = std::fs::File::open(&path).map_err(|e| {
            log::error!("failed to open {}: {e}", path.to_string_lossy());
            ApiError::Internal("internal server error".into())
        })?;

        log::debug!(
            "MEDIA {folder}/{file} -> 200 OK, path: {}, MIME type: {mime}",
            path.to_string_lossy()
        );
        Ok(Response::from_file(mime, opened))
    }

    fn mime_for_file(path: &Path) -> String {
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy())
            .map(|s| s.to_lowercase());
        let default = || {
            mime_guess::from_path(path)
                .first_or_octet_stream()
                .to_string()
        };
        ext.and_then(|ext| Self::mime_from_ext(ext.as_str()))
            .unwrap_or_else(default)
    }

    /// Map file extension (without dot) to proper MIME type for browser playback.
    /// Returns None if the extension is not recognized.
    pub fn mime_from_ext(ext: &str) -> Option<String> {
        match ext {
            "m4a" => Some("audio/x-m4a".to_string()), // Safari iOS compatible
            "aac" => Some("audio/aac".to_string()),
            "mp3" => Some("audio/mpeg".to_string()),
            "wav" => Some("audio/wav".to_string()),
            "ogg" => Some("audio/ogg".to_string()),
            "flac" => Some("audio/flac".to_string()),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTrackRequest {
    title: String,
    artist: String,
    #[serde(default)]
    album: String,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default)]
    cover_image: String,
    /// derived from the title when left out
    slug: Option<String>,
}

impl CreateTrackRequest {
    fn into_new_track(self) -> NewTrack {
        let slug = self
            .slug
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| slugify(&self.title));

        NewTrack {
            title: self.title,
            artist: self.artist,
            album: self.album,
            genres: self.genres,
            slug,
            cover_image: self.cover_image,
        }
    }
}

#[derive(Deserialize)]
struct BatchDeleteRequest {
    ids: Vec<TrackId>,
}

#[derive(Serialize, Deserialize)]
struct TrackListResponse {
    data: Vec<Track>,
    meta: ListMeta,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListMeta {
    total: u64,
    page: u32,
    limit: u32,
    total_pages: u64,
}

impl From<Page<Track>> for TrackListResponse {
    fn from(page: Page<Track>) -> Self {
        Self {
            data: page.items,
            meta: ListMeta {
                total: page.total,
                page: page.page,
                limit: page.limit,
                total_pages: page.total_pages,
            },
        }
    }
}

#[cfg(test)]
pub fn parse_json_response<T: serde::de::DeserializeOwned>(
    response: rouille::Response,
) -> anyhow::Result<T> {
    Ok(serde_json::from_reader(
        response.data.into_reader_and_size().0,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        media::{MediaKey, memory::MemoryMediaStore},
        storage::db,
    };

    use rouille::Request;
    use rusqlite::Connection;
    use std::{fs, io::Read};
    use tempfile::tempdir;

    const MAX_UPLOAD: u64 = 1024;

    fn create_server(media_root: Option<PathBuf>) -> anyhow::Result<(HttpServer, MemoryMediaStore)> {
        let conn = Connection::open_in_memory()?;
        db::prepare(&conn)?;
        let media = MemoryMediaStore::default();
        let repository =
            TrackRepository::from_existing_conn(conn, Box::new(media.clone()), "tracks".into());

        let server = HttpServer::new(
            repository,
            HttpConfig {
                bind_addr: "0.0.0.0".to_string(),
                port: 8000,
                max_upload_bytes: MAX_UPLOAD,
            },
            media_root,
        );
        Ok((server, media))
    }

    fn json_request(method: &'static str, url: &str, body: serde_json::Value) -> Request {
        Request::fake_http(
            method,
            url,
            vec![("Content-Type".to_string(), "application/json".to_string())],
            body.to_string().into_bytes(),
        )
    }

    fn get(url: &str) -> Request {
        Request::fake_http("GET", url, vec![], vec![])
    }

    fn multipart_request(url: &str, file_name: &str, data: &[u8]) -> Request {
        let boundary = "trackshelfboundary";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::fake_http(
            "POST",
            url,
            vec![(
                "Content-Type".to_string(),
                format!("multipart/form-data; boundary={boundary}"),
            )],
            body,
        )
    }

    fn parse_text_response(response: rouille::Response) -> anyhow::Result<String> {
        let mut buf = String::new();
        let mut reader = response.data.into_reader_and_size().0;
        reader.read_to_string(&mut buf)?;
        Ok(buf)
    }

    fn create_track(server: &HttpServer, title: &str) -> anyhow::Result<Track> {
        let response = server.handle_request(&json_request(
            "POST",
            "/api/tracks",
            serde_json::json!({ "title": title, "artist": "Artist", "genres": ["Rock"] }),
        ));
        assert_eq!(response.status_code, 201);
        parse_json_response(response)
    }

    // --------------------------------------------------
    // ✅ SUCCESS
    // --------------------------------------------------

    #[test]
    fn test_http_health() -> anyhow::Result<()> {
        let (server, _) = create_server(None)?;

        let response = server.handle_request(&get("/health"));

        assert_eq!(response.status_code, 200);
        Ok(())
    }

    #[test]
    fn test_http_genres() -> anyhow::Result<()> {
        let (server, _) = create_server(None)?;

        let response = server.handle_request(&get("/api/genres"));

        assert_eq!(response.status_code, 200);
        let genres: Vec<String> = parse_json_response(response)?;
        assert_eq!(genres.len(), 13);
        assert_eq!(genres[6], "R&B");
        Ok(())
    }

    #[test]
    fn test_http_create_and_get_track() -> anyhow::Result<()> {
        let (server, _) = create_server(None)?;

        let created = create_track(&server, "Smells Like Teen Spirit")?;
        assert_eq!(created.slug, "smells-like-teen-spirit");
        assert_eq!(created.genres, vec!["Rock"]);

        let response = server.handle_request(&get("/api/tracks/smells-like-teen-spirit"));
        assert_eq!(response.status_code, 200);

        let fetched: Track = parse_json_response(response)?;
        assert_eq!(fetched, created);

        Ok(())
    }

    #[test]
    fn test_http_create_with_explicit_slug() -> anyhow::Result<()> {
        let (server, _) = create_server(None)?;

        let response = server.handle_request(&json_request(
            "POST",
            "/api/tracks",
            serde_json::json!({ "title": "Song 2", "artist": "Blur", "slug": "woo-hoo" }),
        ));

        assert_eq!(response.status_code, 201);
        let track: Track = parse_json_response(response)?;
        assert_eq!(track.slug, "woo-hoo");
        Ok(())
    }

    #[test]
    fn test_http_list_tracks_with_meta() -> anyhow::Result<()> {
        let (server, _) = create_server(None)?;
        for i in 1..=7 {
            create_track(&server, &format!("Song {i}"))?;
        }

        let response = server.handle_request(&get("/api/tracks?page=2&limit=5&sort=title&order=asc"));
        assert_eq!(response.status_code, 200);

        let body: TrackListResponse = parse_json_response(response)?;
        assert_eq!(body.meta.total, 7);
        assert_eq!(body.meta.page, 2);
        assert_eq!(body.meta.limit, 5);
        assert_eq!(body.meta.total_pages, 2);
        let titles = body.data.iter().map(|t| t.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, vec!["Song 6", "Song 7"]);

        Ok(())
    }

    #[test]
    fn test_http_list_tracks_search() -> anyhow::Result<()> {
        let (server, _) = create_server(None)?;
        create_track(&server, "Purple Rain")?;
        create_track(&server, "Yellow Submarine")?;

        let response = server.handle_request(&get("/api/tracks?search=RAIN"));
        let body: TrackListResponse = parse_json_response(response)?;

        assert_eq!(body.meta.total, 1);
        assert_eq!(body.data[0].title, "Purple Rain");
        Ok(())
    }

    #[test]
    fn test_http_update_track() -> anyhow::Result<()> {
        let (server, _) = create_server(None)?;
        let created = create_track(&server, "Africa")?;

        let response = server.handle_request(&json_request(
            "PUT",
            &format!("/api/tracks/{}", created.id),
            serde_json::json!({ "artist": "Toto", "album": "Toto IV" }),
        ));

        assert_eq!(response.status_code, 200);
        let updated: Track = parse_json_response(response)?;
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.artist, "Toto");
        assert_eq!(updated.album, "Toto IV");
        assert_eq!(updated.title, "Africa");

        Ok(())
    }

    #[test]
    fn test_http_delete_track() -> anyhow::Result<()> {
        let (server, _) = create_server(None)?;
        let created = create_track(&server, "Africa")?;

        let url = format!("/api/tracks/{}", created.id);
        let response = server.handle_request(&Request::fake_http("DELETE", &url, vec![], vec![]));
        assert_eq!(response.status_code, 204);

        let response = server.handle_request(&Request::fake_http("DELETE", &url, vec![], vec![]));
        assert_eq!(response.status_code, 404);

        Ok(())
    }

    #[test]
    fn test_http_delete_multiple_tracks() -> anyhow::Result<()> {
        let (server, _) = create_server(None)?;
        let a = create_track(&server, "A")?;
        let b = create_track(&server, "B")?;

        let response = server.handle_request(&json_request(
            "POST",
            "/api/tracks/delete",
            serde_json::json!({ "ids": [a.id, "missing", b.id] }),
        ));

        assert_eq!(response.status_code, 200);
        let body: serde_json::Value = parse_json_response(response)?;
        assert_eq!(
            body,
            serde_json::json!({ "success": [a.id, b.id], "failed": ["missing"] })
        );

        Ok(())
    }

    #[test]
    fn test_http_upload_and_delete_file() -> anyhow::Result<()> {
        let (server, media) = create_server(None)?;
        let created = create_track(&server, "Take Five")?;

        let response = server.handle_request(&multipart_request(
            &format!("/api/tracks/{}/upload", created.id),
            "take-five.mp3",
            b"ID3 not really an mp3",
        ));
        assert_eq!(response.status_code, 200);

        let uploaded: Track = parse_json_response(response)?;
        assert_eq!(
            uploaded.audio_file,
            format!("memory://tracks/{}/take-five.mp3", created.id)
        );
        assert!(media.contains(&MediaKey::new("tracks", &created.id)));

        let response = server.handle_request(&Request::fake_http(
            "DELETE",
            format!("/api/tracks/{}/file", created.id),
            vec![],
            vec![],
        ));
        assert_eq!(response.status_code, 200);

        let cleared: Track = parse_json_response(response)?;
        assert!(cleared.audio_file.is_empty());
        assert_eq!(media.len(), 0);

        Ok(())
    }

    #[test]
    fn test_http_serves_local_media() -> anyhow::Result<()> {
        let dir = tempdir()?;
        fs::create_dir(dir.path().join("tracks"))?;
        fs::write(dir.path().join("tracks/abc.mp3"), b"x")?;
        let (server, _) = create_server(Some(dir.path().to_path_buf()))?;

        let response = server.handle_request(&get("/media/tracks/abc.mp3"));
        assert_eq!(response.status_code, 200);
        assert!(
            response
                .headers
                .iter()
                .any(|(name, value)| name.eq_ignore_ascii_case("Content-Type")
                    && value == "audio/mpeg")
        );

        let mut body = Vec::new();
        response
            .data
            .into_reader_and_size()
            .0
            .read_to_end(&mut body)?;
        assert_eq!(body, b"x");

        Ok(())
    }

    // --------------------------------------------------
    // ❌ ERRORS
    // --------------------------------------------------

    #[test]
    fn test_http_get_track_not_found() -> anyhow::Result<()> {
        let (server, _) = create_server(None)?;

        let response = server.handle_request(&get("/api/tracks/nothing-here"));

        assert_eq!(response.status_code, 404);
        let body = parse_text_response(response)?;
        assert!(body.contains("not found"), "got: {body}");
        Ok(())
    }

    #[test]
    fn test_http_create_duplicate_slug_conflict() -> anyhow::Result<()> {
        let (server, _) = create_server(None)?;
        create_track(&server, "Halo")?;

        let response = server.handle_request(&json_request(
            "POST",
            "/api/tracks",
            serde_json::json!({ "title": "Halo", "artist": "Depeche Mode" }),
        ));

        assert_eq!(response.status_code, 409);
        Ok(())
    }

    #[test]
    fn test_http_create_invalid_body() -> anyhow::Result<()> {
        let (server, _) = create_server(None)?;

        let missing_artist = server.handle_request(&json_request(
            "POST",
            "/api/tracks",
            serde_json::json!({ "title": "Halo" }),
        ));
        assert_eq!(missing_artist.status_code, 400);

        let blank_title = server.handle_request(&json_request(
            "POST",
            "/api/tracks",
            serde_json::json!({ "title": " ", "artist": "Beyonce", "slug": "halo" }),
        ));
        assert_eq!(blank_title.status_code, 400);

        Ok(())
    }

    #[test]
    fn test_http_list_invalid_query() -> anyhow::Result<()> {
        let (server, _) = create_server(None)?;

        for url in [
            "/api/tracks?sort=password",
            "/api/tracks?order=random",
            "/api/tracks?page=0",
            "/api/tracks?limit=abc",
        ] {
            let response = server.handle_request(&get(url));
            assert_eq!(response.status_code, 400, "for {url}");
        }

        Ok(())
    }

    #[test]
    fn test_http_update_missing_track() -> anyhow::Result<()> {
        let (server, _) = create_server(None)?;

        let response = server.handle_request(&json_request(
            "PUT",
            "/api/tracks/missing",
            serde_json::json!({ "title": "x" }),
        ));

        assert_eq!(response.status_code, 404);
        Ok(())
    }

    #[test]
    fn test_http_upload_rejects_non_audio() -> anyhow::Result<()> {
        let (server, media) = create_server(None)?;
        let created = create_track(&server, "Take Five")?;

        let response = server.handle_request(&multipart_request(
            &format!("/api/tracks/{}/upload", created.id),
            "cover.jpg",
            b"\xff\xd8",
        ));

        assert_eq!(response.status_code, 400);
        assert_eq!(media.len(), 0);
        Ok(())
    }

    #[test]
    fn test_http_upload_too_large() -> anyhow::Result<()> {
        let (server, media) = create_server(None)?;
        let created = create_track(&server, "Take Five")?;

        let response = server.handle_request(&multipart_request(
            &format!("/api/tracks/{}/upload", created.id),
            "take-five.mp3",
            &vec![0u8; MAX_UPLOAD as usize + 1],
        ));

        assert_eq!(response.status_code, 413);
        assert_eq!(media.len(), 0);
        Ok(())
    }

    #[test]
    fn test_http_upload_to_missing_track() -> anyhow::Result<()> {
        let (server, media) = create_server(None)?;

        let response = server.handle_request(&multipart_request(
            "/api/tracks/missing/upload",
            "take-five.mp3",
            b"ID3",
        ));

        assert_eq!(response.status_code, 404);
        assert_eq!(media.len(), 0);
        Ok(())
    }

    #[test]
    fn test_http_upload_media_failure() -> anyhow::Result<()> {
        let (server, media) = create_server(None)?;
        let created = create_track(&server, "Take Five")?;
        media.set_failing(true);

        let response = server.handle_request(&multipart_request(
            &format!("/api/tracks/{}/upload", created.id),
            "take-five.mp3",
            b"ID3",
        ));

        assert_eq!(response.status_code, 502);
        Ok(())
    }

    #[test]
    fn test_http_delete_file_of_missing_track() -> anyhow::Result<()> {
        let (server, _) = create_server(None)?;

        let response = server.handle_request(&Request::fake_http(
            "DELETE",
            "/api/tracks/missing/file",
            vec![],
            vec![],
        ));

        assert_eq!(response.status_code, 404);
        Ok(())
    }

    #[test]
    fn test_http_media_without_local_store() -> anyhow::Result<()> {
        let (server, _) = create_server(None)?;

        let response = server.handle_request(&get("/media/tracks/abc.mp3"));

        assert_eq!(response.status_code, 404);
        Ok(())
    }

    #[test]
    fn test_http_media_rejects_hidden_paths() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let (server, _) = create_server(Some(dir.path().to_path_buf()))?;

        let response = server.handle_request(&get("/media/../secret"));

        assert_eq!(response.status_code, 404);
        Ok(())
    }

    #[test]
    fn test_http_unknown_route() -> anyhow::Result<()> {
        let (server, _) = create_server(None)?;

        let response = server.handle_request(&get("/nope"));

        assert_eq!(response.status_code, 404);
        Ok(())
    }
}
