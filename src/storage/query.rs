//! Filter, sort and pagination parameters for track listings

use std::{fmt::Display, str::FromStr};

use rusqlite::types::Value;
use serde::Serialize;
use thiserror::Error;

use crate::storage::schema::columns;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("unknown sort field '{0}'")]
    UnknownSortField(String),

    #[error("sort order must be 'asc' or 'desc', got '{0}'")]
    InvalidOrder(String),

    #[error("{name} must be a positive integer, got '{value}'")]
    NotPositive { name: &'static str, value: String },
}

/// Every stored track field can be used as a sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Id,
    Title,
    Artist,
    Album,
    Genres,
    Slug,
    CoverImage,
    AudioFile,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn column(self) -> &'static str {
        match self {
            SortField::Id => columns::ID,
            SortField::Title => columns::TITLE,
            SortField::Artist => columns::ARTIST,
            SortField::Album => columns::ALBUM,
            SortField::Genres => columns::GENRES,
            SortField::Slug => columns::SLUG,
            SortField::CoverImage => columns::COVER_IMAGE,
            SortField::AudioFile => columns::AUDIO_FILE,
            SortField::CreatedAt => columns::CREATED_AT,
            SortField::UpdatedAt => columns::UPDATED_AT,
        }
    }
}

impl FromStr for SortField {
    type Err = QueryError;

    /// accepts the field names used in the JSON representation of a track
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortField::Id),
            "title" => Ok(SortField::Title),
            "artist" => Ok(SortField::Artist),
            "album" => Ok(SortField::Album),
            "genres" => Ok(SortField::Genres),
            "slug" => Ok(SortField::Slug),
            "coverImage" => Ok(SortField::CoverImage),
            "audioFile" => Ok(SortField::AudioFile),
            "createdAt" => Ok(SortField::CreatedAt),
            "updatedAt" => Ok(SortField::UpdatedAt),
            other => Err(QueryError::UnknownSortField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    fn sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(QueryError::InvalidOrder(s.to_string())),
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

/// Describes which tracks to list and how to page through them.
///
/// Empty `search`, `genre` or `artist` strings are the same as leaving them out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackQuery {
    /// case-insensitive substring of title, artist or album
    pub search: Option<String>,
    /// exact genre name
    pub genre: Option<String>,
    /// case-insensitive substring of the artist
    pub artist: Option<String>,
    pub sort: SortField,
    pub order: SortOrder,
    /// 1-indexed
    pub page: u32,
    pub limit: u32,
}

impl Default for TrackQuery {
    fn default() -> Self {
        Self {
            search: None,
            genre: None,
            artist: None,
            sort: SortField::default(),
            order: SortOrder::default(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl TrackQuery {
    /// Builds a query from string parameters, e.g. an url query string.
    ///
    /// `param` is asked for each known parameter name and returns its raw value.
    pub fn from_params<F>(param: F) -> Result<Self, QueryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| param(name).filter(|v| !v.is_empty());

        let sort = match non_empty("sort") {
            Some(sort) => sort.parse()?,
            None => SortField::default(),
        };
        let order = match non_empty("order") {
            Some(order) => order.parse()?,
            None => SortOrder::default(),
        };

        Ok(Self {
            search: non_empty("search"),
            genre: non_empty("genre"),
            artist: non_empty("artist"),
            sort,
            order,
            page: positive("page", non_empty("page"), DEFAULT_PAGE)?,
            limit: positive("limit", non_empty("limit"), DEFAULT_LIMIT)?,
        })
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// `WHERE` clause (possibly empty) and its positional parameters
    pub(crate) fn filter(&self) -> (String, Vec<Value>) {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = substring_pattern(search);
            conditions.push(format!(
                "({} REGEXP ? OR {} REGEXP ? OR {} REGEXP ?)",
                columns::TITLE,
                columns::ARTIST,
                columns::ALBUM
            ));
            params.extend(std::iter::repeat_n(Value::Text(pattern), 3));
        }

        if let Some(genre) = self.genre.as_deref().filter(|s| !s.is_empty()) {
            conditions.push(format!(
                "EXISTS (SELECT 1 FROM json_each({}) WHERE json_each.value = ?)",
                columns::GENRES
            ));
            params.push(Value::Text(genre.to_string()));
        }

        if let Some(artist) = self.artist.as_deref().filter(|s| !s.is_empty()) {
            conditions.push(format!("{} REGEXP ?", columns::ARTIST));
            params.push(Value::Text(substring_pattern(artist)));
        }

        let clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (clause, params)
    }

    /// ties are broken by insertion order, in the same direction
    pub(crate) fn order_by(&self) -> String {
        let direction = self.order.sql();
        format!(
            "ORDER BY {} {direction}, rowid {direction}",
            self.sort.column()
        )
    }
}

/// user input is matched literally, never as a pattern
fn substring_pattern(needle: &str) -> String {
    format!("(?i){}", regex::escape(needle))
}

fn positive(name: &'static str, value: Option<String>, default: u32) -> Result<u32, QueryError> {
    match value {
        None => Ok(default),
        Some(value) => match value.parse::<u32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(QueryError::NotPositive { name, value }),
        },
    }
}

/// One page of results together with the size of the whole result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// number of matches across all pages
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, query: &TrackQuery) -> Self {
        let limit = u64::from(query.limit.max(1));
        Self {
            items,
            total,
            page: query.page,
            limit: query.limit,
            total_pages: total.div_ceil(limit),
        }
    }
}
