use crate::model::data_schema::DataSchema;
use crate::model::mapping::{DataSchemaFieldMapping, DataSchemaMapping};
use serde::Serialize;

/// Where the mapping wizard ends up after handling a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardResult {
    /// Schema and source are bound; the field mapping form is shown.
    Input,
    /// A source has to be chosen before fields can be mapped.
    Source,
    /// The request was rejected with a validation error.
    Error,
    /// The resource or mapping does not exist.
    NotFound,
    /// The mapping was persisted.
    Success,
}

/// Everything a client needs to render the current wizard step.
#[derive(Debug, Clone, Serialize)]
pub struct WizardView {
    pub result: WizardResult,
    pub resource: String,
    pub mid: Option<usize>,
    pub data_schema: Option<DataSchema>,
    pub mapping: Option<DataSchemaMapping>,
    /// One slot per field of the schema's first sub-schema.
    pub fields: Vec<DataSchemaFieldMapping>,
    pub columns: Vec<String>,
    pub peek: Vec<Vec<String>>,
    /// Names of the resource's sources, offered on the source selection step.
    pub sources: Vec<String>,
    pub action_errors: Vec<String>,
    pub action_warnings: Vec<String>,
}
