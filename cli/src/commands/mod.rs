pub mod discover;
pub mod info;
