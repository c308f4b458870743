use thiserror::Error;

/// Failures surfaced when turning uploaded text into a dataset.
///
/// All of them are recoverable: the caller reports the message and resets to
/// an empty dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The document parsed but its root is not a GeoJSON `FeatureCollection`.
    #[error("Invalid GeoJSON file. Must be a FeatureCollection: {0}")]
    InvalidFormat(String),

    /// The text could not be tokenised as JSON or CSV.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unsupported file type '{0}'. Please upload a CSV or GeoJSON file.")]
    UnsupportedFileType(String),
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Parse(format!("JSON: {e}"))
    }
}

impl From<csv::Error> for LoadError {
    fn from(e: csv::Error) -> Self {
        LoadError::Parse(format!("CSV: {e}"))
    }
}
