use crate::error::Result;
use common::model::data_schema::DataSchema;
use log::{info, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub trait DataSchemaManager: Send + Sync {
    /// Looks a schema up by identifier, falling back to its short name.
    fn get(&self, identifier: &str) -> Option<DataSchema>;

    fn list(&self) -> Vec<DataSchema>;
}

/// Schemas installed as JSON definitions in a directory, loaded once.
#[derive(Debug, Default)]
pub struct DirectorySchemaManager {
    schemas: BTreeMap<String, DataSchema>,
}

impl DirectorySchemaManager {
    /// Loads every `*.json` file in `dir`. A missing directory yields no
    /// schemas; files that fail to parse are skipped.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut schemas = BTreeMap::new();
        if !dir.is_dir() {
            warn!("Schema directory {} does not exist, no data schemas installed", dir.display());
            return Ok(Self { schemas });
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let parsed = fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|text| serde_json::from_str::<DataSchema>(&text).map_err(|e| e.to_string()));
            match parsed {
                Ok(schema) => {
                    info!("Installed data schema {} from {}", schema.identifier, path.display());
                    schemas.insert(schema.identifier.clone(), schema);
                }
                Err(e) => warn!("Skipping data schema {}: {}", path.display(), e),
            }
        }

        Ok(Self { schemas })
    }

    pub fn from_schemas(schemas: impl IntoIterator<Item = DataSchema>) -> Self {
        Self {
            schemas: schemas
                .into_iter()
                .map(|s| (s.identifier.clone(), s))
                .collect(),
        }
    }
}

impl DataSchemaManager for DirectorySchemaManager {
    fn get(&self, identifier: &str) -> Option<DataSchema> {
        self.schemas
            .get(identifier)
            .or_else(|| self.schemas.values().find(|s| s.name == identifier))
            .cloned()
    }

    fn list(&self) -> Vec<DataSchema> {
        self.schemas.values().cloned().collect()
    }
}
