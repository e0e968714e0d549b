//! # Data Schema Mapping Service
//!
//! HTTP endpoints of the mapping wizard, mounted under
//! `/api/resources/{short_name}/mappings`. The wizard logic itself lives in
//! `wizard`; the handlers here load the resource, run the wizard on a
//! blocking thread and turn the resulting `WizardView` into a response.
//!
//! ## Sub-modules:
//! - `prepare`: shows the current wizard step for a schema and mapping.
//! - `save`: applies submitted field mappings and persists the resource.
//! - `delete`: removes a stored mapping from the resource.

mod delete;
mod prepare;
mod save;
pub mod wizard;

use actix_web::web::{get, post, scope};
use actix_web::{HttpResponse, Scope};
use common::views::{WizardResult, WizardView};

const API_PATH: &str = "/api/resources/{short_name}/mappings";

/// Configures and returns the Actix `Scope` for the mapping wizard.
///
/// # Registered Routes:
///
/// *   **`GET /data-schema?id=&mid=&source=`**: prepares the wizard step for
///     schema `id` and, when given, the stored mapping `mid`.
/// *   **`POST /data-schema/save?id=&mid=&source=`**: prepares, then saves
///     the JSON `SaveMappingForm` body into the mapping.
/// *   **`POST /data-schema/delete?id=&mid=`**: deletes stored mapping `mid`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/data-schema", get().to(prepare::process))
        .route("/data-schema/save", post().to(save::process))
        .route("/data-schema/delete", post().to(delete::process))
}

/// Serializes a wizard view with the status code matching its result.
fn respond(view: WizardView) -> HttpResponse {
    match view.result {
        WizardResult::Input | WizardResult::Source | WizardResult::Success => {
            HttpResponse::Ok().json(view)
        }
        WizardResult::Error => HttpResponse::BadRequest().json(view),
        WizardResult::NotFound => HttpResponse::NotFound().json(view),
    }
}
