use serde::{Deserialize, Serialize};

/// A resource's raw tabular data origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    #[serde(flatten)]
    pub kind: SourceKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceKind {
    /// Delimited text file uploaded into the resource.
    File {
        file: String,
        #[serde(default)]
        ignore_header_lines: u32,
        #[serde(default = "default_delimiter")]
        field_delimiter: char,
    },
    /// Delimited text fetched from a URL. `file` is the local copy taken when
    /// the source was registered.
    Url {
        url: String,
        file: String,
        #[serde(default)]
        ignore_header_lines: u32,
        #[serde(default = "default_delimiter")]
        field_delimiter: char,
    },
    /// Result of an SQL statement run against an SQLite database file.
    Sql { database: String, sql: String },
}

fn default_delimiter() -> char {
    ','
}

impl Source {
    pub fn is_file_source(&self) -> bool {
        matches!(self.kind, SourceKind::File { .. })
    }

    pub fn is_url_source(&self) -> bool {
        matches!(self.kind, SourceKind::Url { .. })
    }

    pub fn is_sql_source(&self) -> bool {
        matches!(self.kind, SourceKind::Sql { .. })
    }

    /// Number of leading lines that are headers rather than data. `None` for
    /// sources that are not line based.
    pub fn ignore_header_lines(&self) -> Option<u32> {
        match &self.kind {
            SourceKind::File {
                ignore_header_lines,
                ..
            }
            | SourceKind::Url {
                ignore_header_lines,
                ..
            } => Some(*ignore_header_lines),
            SourceKind::Sql { .. } => None,
        }
    }

    /// True for text sources whose first line is already data, so column
    /// names have to be synthesized from the values.
    pub fn is_headerless(&self) -> bool {
        (self.is_file_source() || self.is_url_source()) && self.ignore_header_lines() == Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_tagged_source_definitions() {
        let json = r#"[
            { "name": "events", "type": "file", "file": "events.csv", "ignore_header_lines": 1 },
            { "name": "remote", "type": "url", "url": "https://example.org/o.txt", "file": "remote.txt", "field_delimiter": "\t" },
            { "name": "db", "type": "sql", "database": "occ.sqlite", "sql": "SELECT * FROM occurrence" }
        ]"#;

        let sources: Vec<Source> = serde_json::from_str(json).unwrap();

        assert!(sources[0].is_file_source());
        assert_eq!(sources[0].ignore_header_lines(), Some(1));
        assert!(!sources[0].is_headerless());

        assert!(sources[1].is_url_source());
        assert!(sources[1].is_headerless());
        match &sources[1].kind {
            SourceKind::Url {
                field_delimiter, ..
            } => assert_eq!(*field_delimiter, '\t'),
            other => panic!("unexpected kind {:?}", other),
        }

        assert!(sources[2].is_sql_source());
        assert_eq!(sources[2].ignore_header_lines(), None);
        assert!(!sources[2].is_headerless());
    }
}
