use super::respond;
use super::wizard::{self, WizardContext};
use crate::error::Result;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::EarlyParams;
use common::views::WizardView;

/// Handler for `GET /api/resources/{short_name}/mappings/data-schema`.
///
/// Runs the wizard step addressed by the query parameters without changing
/// anything.
///
/// # Arguments
/// * `short_name` - The resource owning the mapping, taken from the URL path.
/// * `params` - `id` (schema identifier or name), and optionally `mid` and `source`.
///
/// # Returns
/// - `200 OK` with the `WizardView` for the `input`, `source` and `success` steps.
/// - `400 Bad Request` when the schema cannot be used (`error`).
/// - `404 Not Found` for an unknown resource, schema id or mapping (`not_found`).
pub(crate) async fn process(
    short_name: web::Path<String>,
    params: web::Query<EarlyParams>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let state = state.get_ref().clone();
    let short_name = short_name.into_inner();
    let params = params.into_inner();
    let view = tokio::task::spawn_blocking(move || prepare_view(&state, &short_name, &params)).await??;
    Ok(respond(view))
}

fn prepare_view(state: &AppState, short_name: &str, params: &EarlyParams) -> Result<WizardView> {
    let Some(resource) = state.resources.get(short_name)? else {
        return Ok(wizard::not_found_view(short_name));
    };
    let mut ctx = WizardContext::new(resource);
    wizard::prepare(&mut ctx, params, state.schemas.as_ref(), state.sources.as_ref());
    Ok(ctx.into_view())
}
