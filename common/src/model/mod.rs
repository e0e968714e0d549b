pub mod data_schema;
pub mod mapping;
pub mod resource;
pub mod source;
