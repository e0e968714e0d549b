use crate::model::data_schema::DataSchemaField;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Index value submitted for a field slot that is not bound to any column.
pub const UNSET_INDEX: i32 = -9999;

/// Longest example value shown in a synthesized column label.
const EXAMPLE_MAX_CHARS: usize = 30;

/// Maps the columns of one of a resource's sources onto the fields of a data
/// schema.
///
/// The schema is referenced by identifier and the source by name; both are
/// resolved against the installed schemas and the owning resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSchemaMapping {
    pub data_schema: String,
    #[serde(default)]
    pub source: Option<String>,
    /// Sorted by field name, at most one entry per field.
    #[serde(default)]
    fields: Vec<DataSchemaFieldMapping>,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
}

impl DataSchemaMapping {
    pub fn new(data_schema: impl Into<String>) -> Self {
        Self {
            data_schema: data_schema.into(),
            source: None,
            fields: Vec::new(),
            last_modified: None,
        }
    }

    pub fn fields(&self) -> &[DataSchemaFieldMapping] {
        &self.fields
    }

    /// Replaces the field mappings. Entries are ordered by field name and
    /// only the first entry submitted for a given field is kept.
    pub fn set_fields(&mut self, fields: impl IntoIterator<Item = DataSchemaFieldMapping>) {
        let mut fields: Vec<DataSchemaFieldMapping> = fields.into_iter().collect();
        fields.sort_by(|a, b| a.field.name.cmp(&b.field.name));
        fields.dedup_by(|later, first| later.field.name == first.field.name);
        self.fields = fields;
    }

    /// The stored mapping for the schema field called `name`, if any.
    pub fn get_field(&self, name: &str) -> Option<&DataSchemaFieldMapping> {
        self.fields.iter().find(|f| f.field.name == name)
    }

    /// Synthesizes positional column labels for preview rows that have no
    /// header line.
    ///
    /// One label is produced per value of the first row. Each label carries
    /// the first non-empty value found in that column as an example.
    pub fn get_columns(&self, peek: &[Vec<String>]) -> Vec<String> {
        let Some(first) = peek.first() else {
            return Vec::new();
        };

        (0..first.len())
            .map(|i| {
                let example = peek
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|v| v.trim())
                    .find(|v| !v.is_empty());
                match example {
                    Some(value) => format!("Column #{} - {}", i + 1, abbreviate(value)),
                    None => format!("Column #{}", i + 1),
                }
            })
            .collect()
    }
}

fn abbreviate(value: &str) -> String {
    if value.chars().count() <= EXAMPLE_MAX_CHARS {
        return value.to_string();
    }
    let mut short: String = value.chars().take(EXAMPLE_MAX_CHARS - 3).collect();
    short.push_str("...");
    short
}

/// Binds one schema field to either a source column index or a literal
/// default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSchemaFieldMapping {
    pub field: DataSchemaField,
    #[serde(default)]
    pub index: Option<i32>,
    #[serde(default)]
    pub default_value: Option<String>,
}

impl DataSchemaFieldMapping {
    /// An empty slot for `field`, bound to nothing.
    pub fn unmapped(field: DataSchemaField) -> Self {
        Self {
            field,
            index: None,
            default_value: None,
        }
    }

    pub fn effective_index(&self) -> i32 {
        self.index.unwrap_or(UNSET_INDEX)
    }

    /// Whether this slot is worth persisting: it points at a column or
    /// carries a non-blank default.
    pub fn is_mapped(&self) -> bool {
        self.effective_index() >= 0
            || self
                .default_value
                .as_deref()
                .is_some_and(|v| !v.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(name: &str, index: Option<i32>, default_value: Option<&str>) -> DataSchemaFieldMapping {
        DataSchemaFieldMapping {
            field: DataSchemaField::named(name),
            index,
            default_value: default_value.map(str::to_string),
        }
    }

    #[test]
    fn mapped_requires_index_or_default() {
        assert!(slot("a", Some(0), None).is_mapped());
        assert!(slot("a", Some(UNSET_INDEX), Some("X")).is_mapped());
        assert!(!slot("a", Some(UNSET_INDEX), Some("   ")).is_mapped());
        assert!(!slot("a", None, None).is_mapped());
        assert!(!slot("a", Some(-1), Some("")).is_mapped());
    }

    #[test]
    fn set_fields_orders_by_name_and_keeps_first_duplicate() {
        let mut mapping = DataSchemaMapping::new("schema");
        mapping.set_fields(vec![
            slot("eventID", Some(2), None),
            slot("basisOfRecord", None, Some("HumanObservation")),
            slot("eventID", Some(7), None),
        ]);

        let names: Vec<&str> = mapping.fields().iter().map(|f| f.field.name.as_str()).collect();
        assert_eq!(names, vec!["basisOfRecord", "eventID"]);
        assert_eq!(mapping.get_field("eventID").unwrap().index, Some(2));
        assert!(mapping.get_field("missing").is_none());
    }

    #[test]
    fn synthesized_columns_follow_first_row_width() {
        let mapping = DataSchemaMapping::new("schema");
        let peek = vec![
            vec!["".to_string(), "Puma concolor".to_string(), "x".to_string()],
            vec!["e-2".to_string(), "".to_string()],
        ];

        let columns = mapping.get_columns(&peek);
        assert_eq!(
            columns,
            vec![
                "Column #1 - e-2".to_string(),
                "Column #2 - Puma concolor".to_string(),
                "Column #3 - x".to_string(),
            ]
        );
    }

    #[test]
    fn synthesized_columns_without_examples() {
        let mapping = DataSchemaMapping::new("schema");
        assert!(mapping.get_columns(&[]).is_empty());

        let long = "a".repeat(40);
        let columns = mapping.get_columns(&[vec![String::new(), long]]);
        assert_eq!(columns[0], "Column #1");
        assert_eq!(columns[1], format!("Column #2 - {}...", "a".repeat(27)));
    }
}
