use super::respond;
use super::wizard::{self, WizardContext};
use crate::error::Result;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::EarlyParams;
use common::views::WizardView;

/// Handler for `POST /api/resources/{short_name}/mappings/data-schema/delete`.
///
/// # Arguments
/// * `short_name` - The resource owning the mapping, taken from the URL path.
/// * `params` - `id` (schema identifier or name) and the `mid` to remove.
///
/// # Returns
/// - `200 OK` with the `WizardView` holding the removed mapping.
/// - `404 Not Found` if the resource or the mapping does not exist.
/// - `500 Internal Server Error` if the resource cannot be stored.
pub(crate) async fn process(
    short_name: web::Path<String>,
    params: web::Query<EarlyParams>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let state = state.get_ref().clone();
    let short_name = short_name.into_inner();
    let params = params.into_inner();
    let view =
        tokio::task::spawn_blocking(move || delete_mapping(&state, &short_name, &params)).await??;
    Ok(respond(view))
}

fn delete_mapping(state: &AppState, short_name: &str, params: &EarlyParams) -> Result<WizardView> {
    let Some(resource) = state.resources.get(short_name)? else {
        return Ok(wizard::not_found_view(short_name));
    };
    let mut ctx = WizardContext::new(resource);
    wizard::delete(&mut ctx, params, state.schemas.as_ref(), state.resources.as_ref())?;
    Ok(ctx.into_view())
}
