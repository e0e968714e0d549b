use crate::error::{MappingError, Result};
use crate::managers::sources::check_source_path;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use common::model::resource::Resource;
use common::model::source::SourceKind;
use log::info;
use regex::Regex;
use std::collections::HashSet;

/// Handler for `POST /api/resources/save`.
///
/// - On success: `200 OK` with the stored resource.
/// - On an invalid configuration: `400 Bad Request` with the reason.
pub async fn process(payload: web::Json<Resource>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let state = state.get_ref().clone();
    let resource = payload.into_inner();
    let saved = tokio::task::spawn_blocking(move || save_resource(&state, resource)).await??;
    Ok(HttpResponse::Ok().json(saved))
}

/// Validates and stores a resource configuration, stamping it as modified.
///
/// Mappings are maintained through the wizard, so a payload without any
/// keeps the mappings already stored for the resource. Posted mappings get
/// their fields ordered and deduplicated like wizard saves.
pub fn save_resource(state: &AppState, mut resource: Resource) -> Result<Resource> {
    let short_name_re = Regex::new(r"^[a-zA-Z0-9_-]+$")
        .map_err(|e| MappingError::Validation(format!("Regex error: {}", e)))?;
    if !short_name_re.is_match(&resource.short_name) {
        return Err(MappingError::Validation(format!(
            "resource short name '{}' may only contain letters, digits, '-' and '_'",
            resource.short_name
        )));
    }

    let mut names = HashSet::new();
    for source in &resource.sources {
        if source.name.trim().is_empty() {
            return Err(MappingError::Validation("source names must not be empty".to_string()));
        }
        if !names.insert(source.name.as_str()) {
            return Err(MappingError::Validation(format!(
                "source '{}' is declared more than once",
                source.name
            )));
        }
        let path = match &source.kind {
            SourceKind::File { file, .. } | SourceKind::Url { file, .. } => file,
            SourceKind::Sql { database, .. } => database,
        };
        check_source_path(path)?;
    }

    if resource.data_schema_mappings.is_empty() {
        if let Some(stored) = state.resources.get(&resource.short_name)? {
            resource.data_schema_mappings = stored.data_schema_mappings;
            resource.mappings_modified = stored.mappings_modified;
        }
    } else {
        for mapping in &mut resource.data_schema_mappings {
            let fields = mapping.fields().to_vec();
            mapping.set_fields(fields);
        }
    }

    resource.set_modified(Utc::now());
    state.resources.save(&resource)?;
    info!("Registered resource {} with {} sources", resource.short_name, resource.sources.len());
    Ok(resource)
}
