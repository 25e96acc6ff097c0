pub mod archive;
pub mod asset;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use archive::{MutationOutcome, ReadableArchive};
pub use asset::{Asset, EntryStream};
pub use error::{ApiError, ApiResult};
pub use models::*;
