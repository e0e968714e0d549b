pub mod mappings;
pub mod resources;
pub mod schemas;
pub mod sources;

use actix_web::web;

/// Registers every API scope. Scopes nested below a resource go first so the
/// plain `/api/resources` scope does not swallow their requests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(mappings::configure_routes())
        .service(sources::configure_routes())
        .service(resources::configure_routes())
        .service(schemas::configure_routes());
}
