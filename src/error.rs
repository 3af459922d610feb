use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("`{program}` failed (exit code {code:?}) with output: {output}")]
    CommandFailed {
        program: String,
        code: Option<i32>,
        output: String,
    },

    #[error("{manager} does not support `{operation}` yet")]
    Unsupported {
        manager: &'static str,
        operation: &'static str,
    },

    #[error("no supported package manager found on this system")]
    NoPackageManager,

    #[error("unknown package manager: {0}")]
    UnknownPackageManager(String),

    #[error("failed to parse config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
