use crate::error::{MappingError, Result};
use crate::services::mappings::wizard::PEEK_ROWS;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

/// Upper bound on the rows a single preview may request.
const MAX_PEEK_ROWS: usize = 100;

#[derive(Debug, Deserialize)]
pub struct PeekQuery {
    pub rows: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SourcePreview {
    pub source: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub(crate) async fn process(
    path: web::Path<(String, String)>,
    query: web::Query<PeekQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let (short_name, name) = path.into_inner();
    let rows = query.rows.unwrap_or(PEEK_ROWS).min(MAX_PEEK_ROWS);
    let state = state.get_ref().clone();
    let preview =
        tokio::task::spawn_blocking(move || peek_source(&state, &short_name, &name, rows)).await??;
    Ok(HttpResponse::Ok().json(preview))
}

fn peek_source(state: &AppState, short_name: &str, name: &str, rows: usize) -> Result<SourcePreview> {
    let resource = state
        .resources
        .get(short_name)?
        .ok_or_else(|| MappingError::NotFound(format!("resource {}", short_name)))?;
    let source = resource
        .get_source(name)
        .ok_or_else(|| MappingError::NotFound(format!("source {} of {}", name, short_name)))?;

    Ok(SourcePreview {
        source: source.name.clone(),
        columns: state.sources.columns(source)?,
        rows: state.sources.peek(source, rows)?,
    })
}
