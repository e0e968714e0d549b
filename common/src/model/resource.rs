use crate::model::mapping::DataSchemaMapping;
use crate::model::source::Source;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The publishable dataset configuration. It owns its sources and the data
/// schema mappings built on top of them.
///
/// Mappings are addressed by schema identifier plus a sequence id `mid`, the
/// position of the mapping among the resource's mappings for that schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub short_name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub data_schema_mappings: Vec<DataSchemaMapping>,
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub mappings_modified: Option<DateTime<Utc>>,
}

impl Resource {
    pub fn new(short_name: impl Into<String>) -> Self {
        Self {
            short_name: short_name.into(),
            title: None,
            sources: Vec::new(),
            data_schema_mappings: Vec::new(),
            modified: None,
            mappings_modified: None,
        }
    }

    pub fn get_source(&self, name: &str) -> Option<&Source> {
        self.sources.iter().find(|s| s.name == name)
    }

    /// All mappings for the given schema, in stored order.
    pub fn get_data_schema_mappings(&self, schema_id: &str) -> Vec<&DataSchemaMapping> {
        self.data_schema_mappings
            .iter()
            .filter(|m| m.data_schema == schema_id)
            .collect()
    }

    pub fn get_data_schema_mapping(&self, schema_id: &str, mid: usize) -> Option<&DataSchemaMapping> {
        self.data_schema_mappings
            .iter()
            .filter(|m| m.data_schema == schema_id)
            .nth(mid)
    }

    fn position_of(&self, schema_id: &str, mid: usize) -> Option<usize> {
        self.data_schema_mappings
            .iter()
            .enumerate()
            .filter(|(_, m)| m.data_schema == schema_id)
            .nth(mid)
            .map(|(i, _)| i)
    }

    /// Appends a mapping and returns its sequence id among the mappings of
    /// its schema.
    pub fn add_data_schema_mapping(&mut self, mapping: DataSchemaMapping) -> usize {
        let schema_id = mapping.data_schema.clone();
        self.data_schema_mappings.push(mapping);
        self.get_data_schema_mappings(&schema_id).len() - 1
    }

    /// Replaces the stored mapping at `mid`. Returns false when there is no
    /// such mapping.
    pub fn replace_data_schema_mapping(
        &mut self,
        schema_id: &str,
        mid: usize,
        mapping: DataSchemaMapping,
    ) -> bool {
        match self.position_of(schema_id, mid) {
            Some(pos) => {
                self.data_schema_mappings[pos] = mapping;
                true
            }
            None => false,
        }
    }

    pub fn delete_data_schema_mapping(
        &mut self,
        schema_id: &str,
        mid: usize,
    ) -> Option<DataSchemaMapping> {
        self.position_of(schema_id, mid)
            .map(|pos| self.data_schema_mappings.remove(pos))
    }

    pub fn set_mappings_modified(&mut self, modified: DateTime<Utc>) {
        self.mappings_modified = Some(modified);
    }

    pub fn set_modified(&mut self, modified: DateTime<Utc>) {
        self.modified = Some(modified);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource_with_mappings() -> Resource {
        let mut resource = Resource::new("birds");
        let mut a0 = DataSchemaMapping::new("a");
        a0.source = Some("first".to_string());
        let b0 = DataSchemaMapping::new("b");
        let mut a1 = DataSchemaMapping::new("a");
        a1.source = Some("second".to_string());
        resource.data_schema_mappings = vec![a0, b0, a1];
        resource
    }

    #[test]
    fn sequence_ids_are_per_schema() {
        let resource = resource_with_mappings();

        assert_eq!(resource.get_data_schema_mappings("a").len(), 2);
        assert_eq!(
            resource.get_data_schema_mapping("a", 1).unwrap().source.as_deref(),
            Some("second")
        );
        assert!(resource.get_data_schema_mapping("a", 2).is_none());
        assert!(resource.get_data_schema_mapping("c", 0).is_none());
    }

    #[test]
    fn add_returns_position_within_schema() {
        let mut resource = resource_with_mappings();
        assert_eq!(resource.add_data_schema_mapping(DataSchemaMapping::new("b")), 1);
        assert_eq!(resource.add_data_schema_mapping(DataSchemaMapping::new("c")), 0);
        assert_eq!(resource.data_schema_mappings.len(), 5);
    }

    #[test]
    fn replace_and_delete_address_the_same_slot() {
        let mut resource = resource_with_mappings();

        let mut replacement = DataSchemaMapping::new("a");
        replacement.source = Some("third".to_string());
        assert!(resource.replace_data_schema_mapping("a", 1, replacement));
        assert!(!resource.replace_data_schema_mapping("a", 5, DataSchemaMapping::new("a")));
        assert_eq!(resource.data_schema_mappings[2].source.as_deref(), Some("third"));

        let removed = resource.delete_data_schema_mapping("a", 0).unwrap();
        assert_eq!(removed.source.as_deref(), Some("first"));
        assert_eq!(
            resource.get_data_schema_mapping("a", 0).unwrap().source.as_deref(),
            Some("third")
        );
        assert!(resource.delete_data_schema_mapping("a", 1).is_none());
    }
}
