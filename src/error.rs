use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{context}: {source}")]
    IoAt {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("{context}: {source}")]
    Zip {
        context: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("get modlinks: {0}")]
    RepositoryFetch(String),

    #[error("get mod {name:?}: {reason}")]
    RecordNotFound { name: String, reason: String },

    #[error("{0:?} matches no mods")]
    NoMatch(String),

    #[error("{requested:?} is ambiguous: matches {}", .candidates.join(", "))]
    Ambiguous {
        requested: String,
        candidates: Vec<String>,
    },

    #[error("{requested:?} is ambiguous: {count} mods with that exact name exist")]
    DuplicateName { requested: String, count: usize },

    #[error("required mods do not exist: {}", .0.join(","))]
    MissingDependencies(Vec<String>),

    #[error("download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("download {url}: response status was {status}")]
    DownloadStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("download {url}: sha256 does not match manifest\n\
             Expected: {expected}\n\
             Computed: {actual}")]
    IntegrityMismatch {
        url: String,
        expected: String,
        actual: String,
    },

    #[error("invalid sha256 digest {digest:?} for {name}: {reason}")]
    InvalidDigest {
        name: String,
        digest: String,
        reason: String,
    },

    #[error("unsafe path: {reason}")]
    UnsafePath { name: String, reason: String },

    #[error("setup not done yet\n\n\
             Hint: tell Raven where the game is installed first:\n\
                raven setup \"/path/to/Death's Door\"")]
    NotConfigured,

    #[error("game not found at {}", .0.display())]
    GameNotFound(PathBuf),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wraps an I/O error with the file or mod it concerns.
    pub fn io_at(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::IoAt {
            context: context.into(),
            source,
        }
    }

    /// Wraps a zip error with the archive it concerns.
    pub fn zip_at(context: impl Into<String>, source: zip::result::ZipError) -> Self {
        Error::Zip {
            context: context.into(),
            source,
        }
    }
}
