// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod open_meteo_client;
pub mod response_cache;
pub mod retry;
