//! # Resource Service Module
//!
//! Registers and retrieves resource configurations under `/api/resources`.
//! A resource must exist, with its sources declared, before any of its data
//! schema mappings can be built.
//!
//! ## Sub-modules:
//! - `get`: returns a stored resource configuration.
//! - `save`: creates or replaces a resource configuration.

mod get;
mod save;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

/// The base path for all resource endpoints.
const API_PATH: &str = "/api/resources";

/// Configures and returns the Actix `Scope` for resource routes.
///
/// # Registered Routes:
///
/// *   **`POST /save`**: stores the JSON `Resource` in the payload, replacing
///     any configuration with the same short name.
/// *   **`GET /{short_name}`**: returns the stored configuration.
///
/// Must be registered after the scopes nested below `/api/resources/{short_name}`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/save", post().to(save::process))
        .route("/{short_name}", get().to(get::process))
}
