//! Previews of a resource's sources, mounted under
//! `/api/resources/{short_name}/sources`.

mod peek;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/resources/{short_name}/sources";

/// # Registered Routes:
///
/// *   **`GET /{name}/peek?rows=`**: column names and the first rows of
///     source `name`.
pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/{name}/peek", get().to(peek::process))
}
