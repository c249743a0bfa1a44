use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset has no header row")]
    MissingHeader,

    #[error("Dataset row {row} has no column {column}")]
    MissingColumn { row: u64, column: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid service address: {0}")]
    Url(#[from] url::ParseError),

    #[error("Request to inference service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Inference service answered {0}")]
    Status(reqwest::StatusCode),

    #[error("Malformed response from inference service: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
