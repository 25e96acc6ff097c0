pub mod manifest;
pub mod path;

pub use manifest::*;
pub use path::*;
