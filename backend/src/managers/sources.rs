use crate::error::{MappingError, Result};
use common::model::source::{Source, SourceKind};
use csv::{ReaderBuilder, StringRecord};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags};
use std::path::{Component, Path, PathBuf};

pub trait SourceManager: Send + Sync {
    /// Up to `rows` data rows, header lines excluded.
    fn peek(&self, source: &Source, rows: usize) -> Result<Vec<Vec<String>>>;

    /// Column names as declared by the source itself.
    fn columns(&self, source: &Source) -> Result<Vec<String>>;
}

/// Checks that a source's file or database path stays inside the data
/// directory: it must be relative and must not climb out with `..`.
pub fn check_source_path(path: &str) -> Result<()> {
    let confined = !path.trim().is_empty()
        && Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if confined {
        Ok(())
    } else {
        Err(MappingError::Validation(format!(
            "source path '{}' must be relative to the data directory",
            path
        )))
    }
}

/// Reads delimited text sources with `csv` and SQL sources with `rusqlite`.
/// Paths are resolved against `base_dir` and may not leave it.
#[derive(Debug, Clone)]
pub struct FileSourceManager {
    base_dir: PathBuf,
}

impl FileSourceManager {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn resolve(&self, file: &str) -> Result<PathBuf> {
        check_source_path(file)?;
        Ok(self.base_dir.join(file))
    }

    fn text_records(
        &self,
        file: &str,
        delimiter: char,
    ) -> Result<impl Iterator<Item = csv::Result<StringRecord>>> {
        if !delimiter.is_ascii() {
            return Err(MappingError::Validation(format!(
                "field delimiter '{}' is not a single byte character",
                delimiter
            )));
        }
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter as u8)
            .from_path(self.resolve(file)?)?;
        Ok(reader.into_records())
    }

    fn open_database(&self, database: &str) -> Result<Connection> {
        Ok(Connection::open_with_flags(
            self.resolve(database)?,
            OpenFlags::SQLITE_OPEN_READ_ONLY,
        )?)
    }
}

fn record_values(record: &StringRecord) -> Vec<String> {
    record.iter().map(|v| v.trim().to_string()).collect()
}

fn value_to_string(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

impl SourceManager for FileSourceManager {
    fn peek(&self, source: &Source, rows: usize) -> Result<Vec<Vec<String>>> {
        match &source.kind {
            SourceKind::File {
                file,
                ignore_header_lines,
                field_delimiter,
            }
            | SourceKind::Url {
                file,
                ignore_header_lines,
                field_delimiter,
                ..
            } => self
                .text_records(file, *field_delimiter)?
                .skip(*ignore_header_lines as usize)
                .take(rows)
                .map(|record| -> Result<Vec<String>> { Ok(record_values(&record?)) })
                .collect(),
            SourceKind::Sql { database, sql } => {
                let conn = self.open_database(database)?;
                let query = format!("SELECT * FROM ({}) LIMIT ?1", sql.trim().trim_end_matches(';'));
                let mut stmt = conn.prepare(&query)?;
                let width = stmt.column_count();
                let mut result = Vec::new();
                let mut found = stmt.query(params![rows as i64])?;
                while let Some(row) = found.next()? {
                    let mut values = Vec::with_capacity(width);
                    for i in 0..width {
                        values.push(value_to_string(row.get_ref(i)?));
                    }
                    result.push(values);
                }
                Ok(result)
            }
        }
    }

    fn columns(&self, source: &Source) -> Result<Vec<String>> {
        match &source.kind {
            SourceKind::File {
                file,
                field_delimiter,
                ..
            }
            | SourceKind::Url {
                file,
                field_delimiter,
                ..
            } => match self.text_records(file, *field_delimiter)?.next() {
                Some(header) => Ok(record_values(&header?)),
                None => Ok(Vec::new()),
            },
            SourceKind::Sql { database, sql } => {
                let conn = self.open_database(database)?;
                let stmt = conn.prepare(sql.trim().trim_end_matches(';'))?;
                Ok(stmt.column_names().into_iter().map(str::to_string).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn file_source(name: &str, ignore_header_lines: u32, field_delimiter: char) -> Source {
        Source {
            name: name.to_string(),
            kind: SourceKind::File {
                file: format!("{}.txt", name),
                ignore_header_lines,
                field_delimiter,
            },
        }
    }

    #[test]
    fn text_source_skips_header_lines() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("events.txt"),
            "eventID;eventDate\ne1;2020-01-01\ne2;2020-01-02\ne3 ; 2020-01-03\n",
        )
        .unwrap();
        let manager = FileSourceManager::new(dir.path());
        let source = file_source("events", 1, ';');

        assert_eq!(manager.columns(&source).unwrap(), vec!["eventID", "eventDate"]);

        let peek = manager.peek(&source, 2).unwrap();
        assert_eq!(peek.len(), 2);
        assert_eq!(peek[0], vec!["e1", "2020-01-01"]);

        let all = manager.peek(&source, 5).unwrap();
        assert_eq!(all[2], vec!["e3", "2020-01-03"]);
    }

    #[test]
    fn headerless_source_peeks_from_first_line() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("raw.txt"), "a,b,c\nd,e\n").unwrap();
        let manager = FileSourceManager::new(dir.path());

        let peek = manager.peek(&file_source("raw", 0, ','), 5).unwrap();
        assert_eq!(peek, vec![vec!["a", "b", "c"], vec!["d", "e"]]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let manager = FileSourceManager::new(dir.path());
        assert!(manager.peek(&file_source("absent", 0, ','), 5).is_err());
    }

    #[test]
    fn sql_source_reads_columns_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let conn = Connection::open(dir.path().join("occ.sqlite")).unwrap();
        conn.execute_batch(
            "CREATE TABLE occurrence (id INTEGER, name TEXT, lat REAL);
             INSERT INTO occurrence VALUES (1, 'Puma concolor', 10.5);
             INSERT INTO occurrence VALUES (2, NULL, 11.0);
             INSERT INTO occurrence VALUES (3, 'Lynx rufus', 12.25);",
        )
        .unwrap();
        drop(conn);

        let manager = FileSourceManager::new(dir.path());
        let source = Source {
            name: "db".to_string(),
            kind: SourceKind::Sql {
                database: "occ.sqlite".to_string(),
                sql: "SELECT id, name, lat FROM occurrence ORDER BY id;".to_string(),
            },
        };

        assert_eq!(manager.columns(&source).unwrap(), vec!["id", "name", "lat"]);
        let peek = manager.peek(&source, 2).unwrap();
        assert_eq!(peek, vec![vec!["1", "Puma concolor", "10.5"], vec!["2", "", "11"]]);
    }

    #[test]
    fn paths_outside_the_data_directory_are_refused() {
        let root = tempfile::tempdir().unwrap();
        let data = root.path().join("data");
        fs::create_dir(&data).unwrap();
        fs::write(root.path().join("secret.txt"), "TOPSECRET,hunter2\n").unwrap();
        let manager = FileSourceManager::new(&data);

        let absolute = root.path().join("secret.txt").to_string_lossy().into_owned();
        for file in ["../secret.txt", "nested/../../secret.txt", absolute.as_str()] {
            let source = Source {
                name: "leak".to_string(),
                kind: SourceKind::File {
                    file: file.to_string(),
                    ignore_header_lines: 0,
                    field_delimiter: ',',
                },
            };
            assert!(matches!(manager.peek(&source, 5), Err(MappingError::Validation(_))), "{}", file);
            assert!(matches!(manager.columns(&source), Err(MappingError::Validation(_))), "{}", file);
        }

        let database = Source {
            name: "db".to_string(),
            kind: SourceKind::Sql {
                database: "/etc/passwd".to_string(),
                sql: "SELECT 1".to_string(),
            },
        };
        assert!(matches!(manager.columns(&database), Err(MappingError::Validation(_))));
    }

    #[test]
    fn source_path_check() {
        assert!(check_source_path("events.csv").is_ok());
        assert!(check_source_path("./sub/events.csv").is_ok());
        assert!(check_source_path("").is_err());
        assert!(check_source_path("../secret.txt").is_err());
        assert!(check_source_path("sub/../../secret.txt").is_err());
        assert!(check_source_path("/etc/passwd").is_err());
    }
}
