//! User CRUD service: axum handlers over a service layer over a
//! PostgreSQL-backed repository.

pub mod app_state;
pub mod config;
pub mod database;
pub mod models;
pub mod routes;
pub mod service;
pub mod templates;

pub use app_state::AppState;
pub use config::Config;
