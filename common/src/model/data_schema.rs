use serde::{Deserialize, Serialize};

/// A named, versioned definition of the fields a published dataset is expected
/// to carry.
///
/// Schemas are installed from JSON definitions and never change while the
/// server runs. Fields are grouped into one or more sub-schemas, each of which
/// corresponds to one table of the published data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSchema {
    /// Stable identifier used in request parameters and stored mappings.
    pub identifier: String,
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sub_schemas: Vec<DataSubSchema>,
}

impl DataSchema {
    /// The sub-schema whose fields the mapping wizard currently offers.
    ///
    /// Only the first sub-schema can be mapped for now.
    pub fn primary_sub_schema(&self) -> Option<&DataSubSchema> {
        self.sub_schemas.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSubSchema {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<DataSchemaField>,
}

/// A single field of a sub-schema, identified by its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSchemaField {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub field_type: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub constraints: FieldConstraints,
}

impl DataSchemaField {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            field_type: None,
            format: None,
            example: None,
            constraints: FieldConstraints::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConstraints {
    #[serde(default)]
    pub required: bool,
}
