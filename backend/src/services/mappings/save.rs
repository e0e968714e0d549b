//! Saving a data schema mapping.
//!
//! The request is handled in two phases. The query parameters are extracted
//! first and used to prepare the wizard, exactly as for displaying it; only
//! then is the JSON body decoded into a `SaveMappingForm` and applied to the
//! prepared mapping.

use super::respond;
use super::wizard::{self, WizardContext};
use crate::error::{MappingError, Result};
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use common::requests::{EarlyParams, SaveMappingForm};
use common::views::WizardView;

/// Handler for `POST /api/resources/{short_name}/mappings/data-schema/save`.
///
/// Prepares the wizard from the query parameters, then applies the
/// `SaveMappingForm` carried in the body and persists the resource.
///
/// # Arguments
/// * `short_name` - The resource owning the mapping, taken from the URL path.
/// * `params` - `id`, `mid` and `source`, as for displaying the wizard.
/// * `body` - The JSON form; an empty body submits no fields.
///
/// # Returns
/// - `200 OK` with the `WizardView`; `result` is `success` and `mid` names the
///   stored mapping once it has been saved.
/// - `400 Bad Request` for a malformed form or an unusable schema.
/// - `404 Not Found` for an unknown resource or mapping.
/// - `500 Internal Server Error` if the resource cannot be stored.
pub(crate) async fn process(
    short_name: web::Path<String>,
    params: web::Query<EarlyParams>,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let state = state.get_ref().clone();
    let short_name = short_name.into_inner();
    let params = params.into_inner();
    let view =
        tokio::task::spawn_blocking(move || save_mapping(&state, &short_name, &params, &body)).await??;
    Ok(respond(view))
}

fn save_mapping(
    state: &AppState,
    short_name: &str,
    params: &EarlyParams,
    body: &[u8],
) -> Result<WizardView> {
    let Some(resource) = state.resources.get(short_name)? else {
        return Ok(wizard::not_found_view(short_name));
    };
    let mut ctx = WizardContext::new(resource);
    wizard::prepare(&mut ctx, params, state.schemas.as_ref(), state.sources.as_ref());

    let form: SaveMappingForm = if body.iter().all(u8::is_ascii_whitespace) {
        SaveMappingForm::default()
    } else {
        serde_json::from_slice(body)
            .map_err(|e| MappingError::Validation(format!("invalid mapping form: {}", e)))?
    };

    wizard::save(&mut ctx, form, state.schemas.as_ref(), state.resources.as_ref())?;
    Ok(ctx.into_view())
}
