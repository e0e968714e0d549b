use crate::error::{MappingError, Result};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::model::resource::Resource;

/// Handler for `GET /api/resources/{short_name}`.
///
/// # Returns
/// - `200 OK` with the `Resource` as JSON.
/// - `404 Not Found` when no resource has that short name.
pub async fn process(
    short_name: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let state = state.get_ref().clone();
    let short_name = short_name.into_inner();
    let resource = tokio::task::spawn_blocking(move || get_resource(&state, &short_name)).await??;
    Ok(HttpResponse::Ok().json(resource))
}

pub fn get_resource(state: &AppState, short_name: &str) -> Result<Resource> {
    state
        .resources
        .get(short_name)?
        .ok_or_else(|| MappingError::NotFound(format!("resource {}", short_name)))
}
