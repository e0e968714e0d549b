//! Read-only access to the installed data schemas, used to offer the schema
//! selection that starts the mapping wizard.

use crate::error::{MappingError, Result};
use crate::state::AppState;
use actix_web::web::{get, scope};
use actix_web::{web, HttpResponse, Scope};

const API_PATH: &str = "/api/data-schemas";

/// # Registered Routes:
///
/// *   **`GET ""`**: all installed schemas.
/// *   **`GET /{identifier}`**: one schema, by identifier or name. Identifiers
///     are usually URLs, so the segment may contain slashes.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list))
        .route("/{identifier:.*}", get().to(get_one))
}

async fn list(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.schemas.list())
}

async fn get_one(identifier: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let identifier = identifier.into_inner();
    match state.schemas.get(&identifier) {
        Some(schema) => Ok(HttpResponse::Ok().json(schema)),
        None => Err(MappingError::NotFound(format!("data schema {}", identifier))),
    }
}
