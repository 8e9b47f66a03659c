pub mod app;
pub mod config;
pub mod debounce;
pub mod details;
pub mod discover;
pub mod media;
pub mod person;
pub mod rating;
pub mod seasons;
pub mod tmdb;
