/// Genres offered to clients when tagging tracks.
///
/// This is static reference data: it does not depend on what the catalog contains.
pub const GENRES: [&str; 13] = [
    "Rock",
    "Pop",
    "Hip Hop",
    "Jazz",
    "Classical",
    "Electronic",
    "R&B",
    "Country",
    "Folk",
    "Reggae",
    "Metal",
    "Blues",
    "Indie",
];

pub fn genres() -> &'static [&'static str] {
    &GENRES
}
