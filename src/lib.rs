//! Inventra IT Asset Inventory System
//!
//! A Rust implementation of the Inventra inventory and scheduling server,
//! providing a REST JSON API for managing IT equipment, consumable stock,
//! users, reservations, tasks and the audit trail.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
