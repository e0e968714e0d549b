use crate::model::mapping::DataSchemaFieldMapping;
use serde::Deserialize;

/// Query parameters read before the request body is bound.
///
/// The wizard needs these to load the mapping the body will be applied to, so
/// they are extracted on their own and kept as raw strings.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct EarlyParams {
    /// Data schema identifier.
    pub id: Option<String>,
    /// Mapping sequence id within the schema's mappings.
    pub mid: Option<String>,
    /// Name of the source to bind to a new mapping.
    pub source: Option<String>,
}

impl EarlyParams {
    pub fn schema_id(&self) -> Option<&str> {
        trim_to_none(self.id.as_deref())
    }

    pub fn mid(&self) -> Option<&str> {
        trim_to_none(self.mid.as_deref())
    }

    pub fn source(&self) -> Option<&str> {
        trim_to_none(self.source.as_deref())
    }
}

fn trim_to_none(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Body of a mapping save request.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SaveMappingForm {
    #[serde(default)]
    pub schema_name: Option<String>,
    #[serde(default)]
    pub fields: Vec<DataSchemaFieldMapping>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_parameters_are_absent() {
        let params = EarlyParams {
            id: Some("  dwc-dp ".to_string()),
            mid: Some("   ".to_string()),
            source: None,
        };
        assert_eq!(params.schema_id(), Some("dwc-dp"));
        assert_eq!(params.mid(), None);
        assert_eq!(params.source(), None);
    }

    #[test]
    fn save_form_accepts_missing_sections() {
        let form: SaveMappingForm = serde_json::from_str("{}").unwrap();
        assert!(form.schema_name.is_none());
        assert!(form.fields.is_empty());

        let form: SaveMappingForm = serde_json::from_str(
            r#"{ "fields": [ { "field": { "name": "eventID" }, "index": 3 } ] }"#,
        )
        .unwrap();
        assert_eq!(form.fields[0].index, Some(3));
        assert_eq!(form.fields[0].default_value, None);
    }
}
