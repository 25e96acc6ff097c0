#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("{path} is a {kind}, not a nested archive")]
    WrongHandleKind { path: String, kind: &'static str },
    #[error("No content at {0}")]
    NoContent(String),
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        ApiError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
