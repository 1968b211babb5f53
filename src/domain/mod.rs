pub mod genre;
pub mod id;
pub mod track;
