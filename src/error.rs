use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// What an out-of-range index was addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Exercise,
    Set,
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexKind::Exercise => write!(f, "exercise"),
            IndexKind::Set => write!(f, "set"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// A mutation addressed an exercise or set that does not exist.
    #[error("{kind} index {index} out of range (len {len})")]
    Index {
        kind: IndexKind,
        index: usize,
        len: usize,
    },

    /// Persisted or imported data does not have the workout history shape.
    #[error("unexpected data shape: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet write failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("spreadsheet read failed: {0}")]
    Workbook(String),
}

impl From<calamine::Error> for Error {
    fn from(e: calamine::Error) -> Self {
        Error::Workbook(e.to_string())
    }
}
