//! Collaborators the mapping wizard delegates to: installed data schemas,
//! source readers and resource persistence.
//!
//! Each concern is a trait so request handling can be exercised against
//! in-memory implementations; the concrete types here are what `main` wires
//! into the application state.

pub mod resources;
pub mod schemas;
pub mod sources;

pub use resources::{ResourceManager, SqliteResourceManager};
pub use schemas::{DataSchemaManager, DirectorySchemaManager};
pub use sources::{FileSourceManager, SourceManager};
