//! The data schema mapping wizard.
//!
//! A mapping is built in steps across several requests: a data schema is
//! selected, then one of the resource's sources, then source columns (or
//! literal defaults) are assigned to the schema's fields and saved. Which step
//! a request lands on follows from what the query parameters and the stored
//! mapping already provide.
//!
//! All per-request state lives in a [`WizardContext`]. [`prepare`] fills it
//! from the early query parameters before the request body is looked at;
//! [`save`] then applies the submitted field mappings and persists the whole
//! resource.

use crate::error::Result;
use crate::managers::{DataSchemaManager, ResourceManager, SourceManager};
use crate::messages;
use chrono::{DateTime, Utc};
use common::model::data_schema::{DataSchema, DataSchemaField};
use common::model::mapping::{DataSchemaFieldMapping, DataSchemaMapping};
use common::model::resource::Resource;
use common::requests::{EarlyParams, SaveMappingForm};
use common::views::{WizardResult, WizardView};
use log::{debug, info, warn};

/// Number of source rows read to derive columns and show examples.
pub const PEEK_ROWS: usize = 5;

/// Request-scoped state of the mapping wizard.
#[derive(Debug, Clone)]
pub struct WizardContext {
    pub resource: Resource,
    pub schema_id: Option<String>,
    pub mid: Option<usize>,
    pub data_schema: Option<DataSchema>,
    pub mapping: Option<DataSchemaMapping>,
    pub columns: Vec<String>,
    pub peek: Vec<Vec<String>>,
    pub fields: Vec<DataSchemaFieldMapping>,
    pub result: WizardResult,
    pub action_errors: Vec<String>,
    pub action_warnings: Vec<String>,
}

impl WizardContext {
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            schema_id: None,
            mid: None,
            data_schema: None,
            mapping: None,
            columns: Vec::new(),
            peek: Vec::new(),
            fields: Vec::new(),
            result: WizardResult::Input,
            action_errors: Vec::new(),
            action_warnings: Vec::new(),
        }
    }

    fn fail(&mut self, result: WizardResult, message: String) {
        debug!("Mapping wizard on {} ends in {:?}: {}", self.resource.short_name, result, message);
        self.result = result;
        self.action_errors.push(message);
    }

    pub fn into_view(self) -> WizardView {
        WizardView {
            result: self.result,
            sources: self.resource.sources.iter().map(|s| s.name.clone()).collect(),
            resource: self.resource.short_name,
            mid: self.mid,
            data_schema: self.data_schema,
            mapping: self.mapping,
            fields: self.fields,
            columns: self.columns,
            peek: self.peek,
            action_errors: self.action_errors,
            action_warnings: self.action_warnings,
        }
    }
}

/// View returned when the resource itself does not exist.
pub fn not_found_view(short_name: &str) -> WizardView {
    let mut ctx = WizardContext::new(Resource::new(short_name));
    ctx.result = WizardResult::NotFound;
    ctx.into_view()
}

/// A `mid` parameter that is present must be a non-negative integer.
fn parse_mid(raw: Option<&str>) -> std::result::Result<Option<usize>, String> {
    match raw {
        None => Ok(None),
        Some(raw) => raw.parse::<usize>().map(Some).map_err(|_| raw.to_string()),
    }
}

/// Stored mappings always reference the schema identifier, so a schema given
/// by name is translated before looking one up. Unknown schemas keep the raw
/// value.
fn stored_schema_id(schemas: &dyn DataSchemaManager, schema_id: &str) -> String {
    schemas
        .get(schema_id)
        .map(|schema| schema.identifier)
        .unwrap_or_else(|| schema_id.to_string())
}

/// Loads or creates the mapping addressed by `params` and prepares whatever
/// the current wizard step displays.
pub fn prepare(
    ctx: &mut WizardContext,
    params: &EarlyParams,
    schemas: &dyn DataSchemaManager,
    sources: &dyn SourceManager,
) {
    let Some(schema_id) = params.schema_id() else {
        ctx.result = WizardResult::NotFound;
        return;
    };
    ctx.schema_id = Some(schema_id.to_string());

    let mid = match parse_mid(params.mid()) {
        Ok(mid) => mid,
        Err(raw) => {
            ctx.fail(WizardResult::NotFound, messages::mapping_not_found(schema_id, &raw));
            return;
        }
    };
    ctx.mid = mid;

    match mid {
        None => match schemas.get(schema_id) {
            Some(schema) => {
                debug!("Starting new {} mapping for {}", schema.identifier, ctx.resource.short_name);
                ctx.schema_id = Some(schema.identifier.clone());
                ctx.mapping = Some(DataSchemaMapping::new(schema.identifier.clone()));
                ctx.data_schema = Some(schema);
            }
            None => {
                ctx.fail(WizardResult::Error, messages::invalid_schema_selection());
                return;
            }
        },
        Some(mid) => {
            let lookup_id = stored_schema_id(schemas, schema_id);
            ctx.schema_id = Some(lookup_id.clone());
            let Some(mapping) = ctx.resource.get_data_schema_mapping(&lookup_id, mid).cloned() else {
                ctx.fail(
                    WizardResult::NotFound,
                    messages::mapping_not_found(schema_id, &mid.to_string()),
                );
                return;
            };
            let Some(schema) = schemas.get(&mapping.data_schema) else {
                ctx.fail(WizardResult::Error, messages::schema_not_installed(&mapping.data_schema));
                return;
            };
            ctx.mapping = Some(mapping);
            ctx.data_schema = Some(schema);
        }
    }

    let Some(mapping) = ctx.mapping.as_mut() else {
        return;
    };
    if mapping.source.is_none() {
        match params.source() {
            Some(name) if ctx.resource.get_source(name).is_some() => {
                mapping.source = Some(name.to_string());
            }
            Some(name) => {
                let message = messages::source_not_found(name);
                ctx.fail(WizardResult::Source, message);
                return;
            }
            None => {
                ctx.result = WizardResult::Source;
                return;
            }
        }
    }

    read_source(ctx, sources);

    if let (Some(schema), Some(mapping)) = (&ctx.data_schema, &ctx.mapping) {
        ctx.fields = build_field_slots(schema, mapping);
    }
}

/// Fills the preview rows and column labels from the mapping's source.
///
/// Text sources without a header line get positional labels derived from
/// the preview; everything else reports its own column names. Problems
/// reading the source only produce warnings.
pub fn read_source(ctx: &mut WizardContext, sources: &dyn SourceManager) {
    ctx.columns.clear();
    ctx.peek.clear();

    let Some(mapping) = &ctx.mapping else {
        return;
    };
    let Some(name) = mapping.source.as_deref() else {
        return;
    };
    let Some(source) = ctx.resource.get_source(name) else {
        ctx.action_warnings.push(messages::source_not_found(name));
        return;
    };

    let read = sources.peek(source, PEEK_ROWS).and_then(|peek| {
        let columns = if source.is_headerless() {
            mapping.get_columns(&peek)
        } else {
            sources.columns(source)?
        };
        Ok((peek, columns))
    });

    match read {
        Ok((peek, columns)) => {
            ctx.peek = peek;
            ctx.columns = columns;
            if ctx.columns.is_empty() {
                ctx.action_warnings.push(messages::source_no_columns(name));
            }
        }
        Err(e) => {
            warn!("Reading source {} of {} failed: {}", name, ctx.resource.short_name, e);
            ctx.action_warnings
                .push(messages::source_unreadable(name, &e.to_string()));
        }
    }
}

/// One slot per field of the schema's first sub-schema. Fields that are
/// already mapped keep their stored binding.
pub fn build_field_slots(
    schema: &DataSchema,
    mapping: &DataSchemaMapping,
) -> Vec<DataSchemaFieldMapping> {
    // TODO: offer the fields of the remaining sub-schemas as well.
    schema
        .primary_sub_schema()
        .map(|sub| {
            sub.fields
                .iter()
                .map(|field| populate_field_mapping(mapping, field))
                .collect()
        })
        .unwrap_or_default()
}

fn populate_field_mapping(
    mapping: &DataSchemaMapping,
    field: &DataSchemaField,
) -> DataSchemaFieldMapping {
    let mut slot = mapping
        .get_field(&field.name)
        .cloned()
        .unwrap_or_else(|| DataSchemaFieldMapping::unmapped(field.clone()));
    slot.field = field.clone();
    slot
}

/// Stamp for a save, never earlier than the stamps already recorded.
fn next_timestamp(previous: &[Option<DateTime<Utc>>]) -> DateTime<Utc> {
    previous
        .iter()
        .flatten()
        .copied()
        .fold(Utc::now(), |latest, ts| latest.max(ts))
}

/// Persists the prepared mapping.
///
/// A mapping not yet stored in the resource is appended and gets its
/// sequence id. A stored one has its field mappings replaced by the
/// submitted slots that are bound to a column or carry a default. Both the
/// mapping and the resource are stamped and the whole resource configuration
/// is saved.
///
/// Requests that did not prepare a mapping with a source are left untouched.
pub fn save(
    ctx: &mut WizardContext,
    form: SaveMappingForm,
    schemas: &dyn DataSchemaManager,
    resources: &dyn ResourceManager,
) -> Result<()> {
    match ctx.result {
        WizardResult::NotFound | WizardResult::Error => return Ok(()),
        WizardResult::Source => {
            if ctx.action_errors.is_empty() {
                ctx.action_errors.push(messages::source_required());
            }
            return Ok(());
        }
        WizardResult::Input | WizardResult::Success => {}
    }

    if ctx.data_schema.is_none() {
        ctx.data_schema = form.schema_name.as_deref().and_then(|name| schemas.get(name));
    }

    let Some(mapping) = ctx.mapping.as_mut() else {
        return Ok(());
    };
    let schema_id = mapping.data_schema.clone();

    let stored = ctx
        .mid
        .filter(|mid| ctx.resource.get_data_schema_mapping(&schema_id, *mid).is_some());

    let now = next_timestamp(&[mapping.last_modified, ctx.resource.mappings_modified]);
    mapping.last_modified = Some(now);

    match stored {
        None => {
            let mid = ctx.resource.add_data_schema_mapping(mapping.clone());
            info!("Added {} mapping {} to {}", schema_id, mid, ctx.resource.short_name);
            ctx.mid = Some(mid);
        }
        Some(mid) => {
            mapping.set_fields(form.fields.into_iter().filter(|f| f.is_mapped()));
            let replaced = ctx
                .resource
                .replace_data_schema_mapping(&schema_id, mid, mapping.clone());
            if !replaced {
                warn!("{} mapping {} of {} was not replaced", schema_id, mid, ctx.resource.short_name);
                ctx.fail(
                    WizardResult::NotFound,
                    messages::mapping_not_found(&schema_id, &mid.to_string()),
                );
                return Ok(());
            }
            info!(
                "Saved {} mapped fields of {} mapping {} in {}",
                mapping.fields().len(),
                schema_id,
                mid,
                ctx.resource.short_name
            );
        }
    }

    ctx.resource.set_mappings_modified(now);
    ctx.resource.set_modified(now);
    resources.save(&ctx.resource)?;

    if let (Some(schema), Some(mapping)) = (&ctx.data_schema, &ctx.mapping) {
        ctx.fields = build_field_slots(schema, mapping);
    }
    ctx.result = WizardResult::Success;
    Ok(())
}

/// Removes the stored mapping addressed by `params` and persists the
/// resource.
pub fn delete(
    ctx: &mut WizardContext,
    params: &EarlyParams,
    schemas: &dyn DataSchemaManager,
    resources: &dyn ResourceManager,
) -> Result<()> {
    let Some(schema_id) = params.schema_id() else {
        ctx.result = WizardResult::NotFound;
        return Ok(());
    };
    ctx.schema_id = Some(schema_id.to_string());

    let mid = match parse_mid(params.mid()) {
        Ok(Some(mid)) => mid,
        Ok(None) => {
            ctx.fail(WizardResult::NotFound, messages::mapping_not_found(schema_id, "none"));
            return Ok(());
        }
        Err(raw) => {
            ctx.fail(WizardResult::NotFound, messages::mapping_not_found(schema_id, &raw));
            return Ok(());
        }
    };

    let lookup_id = stored_schema_id(schemas, schema_id);
    ctx.schema_id = Some(lookup_id.clone());
    let Some(removed) = ctx.resource.delete_data_schema_mapping(&lookup_id, mid) else {
        ctx.fail(
            WizardResult::NotFound,
            messages::mapping_not_found(schema_id, &mid.to_string()),
        );
        return Ok(());
    };

    let now = next_timestamp(&[ctx.resource.mappings_modified]);
    ctx.resource.set_mappings_modified(now);
    ctx.resource.set_modified(now);
    resources.save(&ctx.resource)?;
    info!("Deleted {} mapping {} from {}", removed.data_schema, mid, ctx.resource.short_name);

    ctx.mapping = Some(removed);
    ctx.result = WizardResult::Success;
    Ok(())
}
