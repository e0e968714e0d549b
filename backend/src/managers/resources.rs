use crate::error::Result;
use common::model::resource::Resource;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;

pub trait ResourceManager: Send + Sync {
    fn get(&self, short_name: &str) -> Result<Option<Resource>>;

    /// Persists the entire resource configuration, replacing the stored one.
    fn save(&self, resource: &Resource) -> Result<()>;
}

/// Keeps one JSON configuration document per resource in an SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteResourceManager {
    db_path: PathBuf,
}

impl SqliteResourceManager {
    /// Opens (creating if needed) the database at `db_path`.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self> {
        let manager = Self {
            db_path: db_path.into(),
        };
        if let Some(parent) = manager.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        manager.connect()?.execute_batch(
            "CREATE TABLE IF NOT EXISTS resources (
                short_name TEXT PRIMARY KEY,
                config TEXT NOT NULL,
                modified TEXT
            )",
        )?;
        Ok(manager)
    }

    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.db_path)?)
    }
}

impl ResourceManager for SqliteResourceManager {
    fn get(&self, short_name: &str) -> Result<Option<Resource>> {
        let conn = self.connect()?;
        let config: Option<String> = conn
            .query_row(
                "SELECT config FROM resources WHERE short_name = ?1",
                params![short_name],
                |row| row.get(0),
            )
            .optional()?;

        match config {
            Some(config) => Ok(Some(serde_json::from_str(&config)?)),
            None => Ok(None),
        }
    }

    fn save(&self, resource: &Resource) -> Result<()> {
        let config = serde_json::to_string(resource)?;
        let modified = resource.modified.map(|m| m.to_rfc3339());
        let conn = self.connect()?;
        conn.execute(
            "INSERT OR REPLACE INTO resources (short_name, config, modified) VALUES (?1, ?2, ?3)",
            params![&resource.short_name, &config, &modified],
        )?;
        debug!("Saved configuration of resource {}", resource.short_name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::model::mapping::DataSchemaMapping;

    #[test]
    fn saved_resource_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SqliteResourceManager::open(dir.path().join("nested/resources.sqlite")).unwrap();

        assert!(manager.get("birds").unwrap().is_none());

        let mut resource = Resource::new("birds");
        resource.add_data_schema_mapping(DataSchemaMapping::new("dwc-dp"));
        resource.set_modified(Utc::now());
        manager.save(&resource).unwrap();

        assert_eq!(manager.get("birds").unwrap(), Some(resource.clone()));

        resource.title = Some("Birds of the valley".to_string());
        manager.save(&resource).unwrap();
        assert_eq!(
            manager.get("birds").unwrap().unwrap().title.as_deref(),
            Some("Birds of the valley")
        );
    }
}
