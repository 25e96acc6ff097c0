pub mod asset;
pub mod error;
pub mod loader;
pub mod logging;
pub mod store;
pub mod view;

pub use asset::{BytesAsset, FileAsset, LazyAsset};
pub use error::{CoreError, Result};
pub use loader::{LoadOptions, load_dir, load_zip};
pub use store::{ContentStore, Node, NodeKind};
pub use view::{ArchiveView, PrefixMode, ViewOptions};
