//! User-facing texts shown by the mapping wizard.

pub fn invalid_schema_selection() -> String {
    "No data schema could be found for the selection. Please select a data schema to map.".to_string()
}

pub fn schema_not_installed(identifier: &str) -> String {
    format!("The data schema '{}' is not installed.", identifier)
}

pub fn mapping_not_found(identifier: &str, mid: &str) -> String {
    format!("No mapping {} exists for data schema '{}'.", mid, identifier)
}

pub fn source_not_found(name: &str) -> String {
    format!("The source '{}' does not exist in this resource.", name)
}

pub fn source_required() -> String {
    "A source has to be selected before fields can be mapped.".to_string()
}

pub fn source_no_columns(name: &str) -> String {
    format!(
        "No columns could be read from source '{}'. Please check the source is readable.",
        name
    )
}

pub fn source_unreadable(name: &str, reason: &str) -> String {
    format!("Source '{}' could not be read: {}", name, reason)
}
