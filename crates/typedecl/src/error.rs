use thiserror::Error;
use typedecl_core::ResolveError;
use typedecl_frontend::LowerError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{source} in file {file}")]
    Lower { file: String, source: LowerError },

    #[error("{source} in file {file}")]
    Resolve { file: String, source: ResolveError },

    #[error("renderer {renderer} failed: {message} in file {file}")]
    Render {
        file: String,
        renderer: String,
        message: String,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<typedecl_frontend::LowerFileError> for Error {
    fn from(err: typedecl_frontend::LowerFileError) -> Self {
        Error::Lower {
            file: err.file,
            source: err.source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
