//! Service modules for the VIAF resolution pipeline

pub mod record_resolver;
pub mod viaf_client;

pub use record_resolver::{resolve_record, ResolveError, ResolvedRecord};
pub use viaf_client::{ViafClient, ViafError};
