use std::{path::Path, sync::Arc};

use anyhow::anyhow;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use regex::Regex;
use rusqlite::{
    Connection,
    functions::{Context, FunctionFlags},
};

use crate::{
    config::Database,
    storage::{error::StorageError, schema},
};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

fn open_in_memory() -> Result<rusqlite::Connection, rusqlite::Error> {
    Connection::open_in_memory()
}

fn open_from_file(path: &Path) -> Result<rusqlite::Connection, rusqlite::Error> {
    Connection::open(path)
}

pub fn open(config: &Database) -> Result<rusqlite::Connection, StorageError> {
    let db = if config.in_memory {
        open_in_memory()?
    } else {
        let path = config.path.as_ref().ok_or_else(|| {
            StorageError::Internal(anyhow!("database path is required unless in_memory = true"))
        })?;
        log::debug!("opening database at {}", path.to_string_lossy());
        open_from_file(path)?
    };
    prepare(&db)?;
    Ok(db)
}

/// registers the sql functions the queries rely on and creates the schema
pub fn prepare(db: &Connection) -> Result<(), rusqlite::Error> {
    add_regexp_function(db)?;
    schema::init(db)
}

/// `x REGEXP pattern`, backed by the `regex` crate.
///
/// The compiled pattern is cached for the duration of one statement.
fn add_regexp_function(db: &Connection) -> Result<(), rusqlite::Error> {
    db.create_scalar_function(
        "regexp",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        move |ctx: &Context<'_>| {
            let regexp: Arc<Regex> = ctx.get_or_create_aux(0, |vr| -> Result<_, BoxError> {
                Ok(Regex::new(vr.as_str()?)?)
            })?;
            let is_match = {
                let text = ctx
                    .get_raw(1)
                    .as_str()
                    .map_err(|e| rusqlite::Error::UserFunctionError(e.into()))?;
                regexp.is_match(text)
            };
            Ok(is_match)
        },
    )
}

/// current time, truncated to what survives a round trip through the database
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// converts time to the fixed width text stored in timestamp columns
pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    Ok(DateTime::parse_from_rfc3339(text)?.with_timezone(&Utc))
}
