pub mod api;
pub mod config;
pub mod fetcher;
pub mod scrapper;
pub mod search;
