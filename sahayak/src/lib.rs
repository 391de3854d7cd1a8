pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod llm;
pub mod market;
pub mod models;
pub mod soil;
pub mod weather;
