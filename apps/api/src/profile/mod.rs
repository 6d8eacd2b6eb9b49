//! Profile-level operations: building canonical records from form input,
//! loading external documents into the flat edit layout, and merging
//! proposed revisions back into an original record.

pub mod builder;
pub mod document;
pub mod entries;
pub mod error;
pub mod handlers;
pub mod loader;
pub mod merge;
pub mod models;

pub use builder::{build_from_flat, build_profile, build_section};
pub use document::{read_document, read_document_file, DocumentEncoding};
pub use error::ProfileError;
pub use loader::{load_from_bytes, load_from_external};
pub use merge::merge_revision;
pub use models::{CanonicalRecord, FlatFormValues, ProfileForm};
