use thiserror::Error;

/// Failure to retrieve one dashboard resource. Scoped to that resource; the
/// other panels keep whatever they already have.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server responded with {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Invalid API url: {0}")]
    Url(#[from] url::ParseError),

    #[error("Data source error: {0}")]
    Source(String),

    #[error("Fetch task panicked: {0}")]
    Panicked(String),
}

/// Export refused or failed. Unavailable data is reported instead of writing
/// an empty or malformed file.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Cannot export {0}: data has not been loaded yet")]
    Unavailable(&'static str),

    #[error("No {0} to export")]
    Empty(&'static str),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A query value that does not name anything the pipeline knows about.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Unknown campaign status: {0}")]
    UnknownStatus(String),

    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),

    #[error("Unknown sort direction: {0}")]
    UnknownSortDirection(String),

    #[error("Unknown date range preset: {0}")]
    UnknownPreset(String),

    #[error("Malformed date (expected YYYY-MM-DD): {0}")]
    InvalidDate(String),

    #[error("Unknown export kind: {0}")]
    UnknownExport(String),

    #[error("{0} must be at least 1")]
    NotPositive(&'static str),
}
