//! Error types for pipeline and model operations.

use std::fmt;

/// Error type for data loading, preprocessing, training and persistence.
#[derive(Debug)]
pub enum PipelineError {
    /// Empty data provided where non-empty was required.
    EmptyData(String),
    /// A column the operation requires is absent from the input.
    MissingColumn(String),
    /// Column names or order differ between fit-time and transform-time schemas.
    SchemaMismatch { expected: String, got: String },
    /// A cell held a value of the wrong kind for its column.
    TypeMismatch { column: String, expected: &'static str },
    /// Invalid hyperparameter or configuration value.
    InvalidParameter(String),
    /// Serialization or deserialization error.
    Serialization(String),
    /// I/O error during file operations.
    Io(String),
    /// CSV parsing error.
    Csv(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::EmptyData(msg) => write!(f, "Empty data: {}", msg),
            PipelineError::MissingColumn(col) => write!(f, "Missing column: {}", col),
            PipelineError::SchemaMismatch { expected, got } => {
                write!(f, "Schema mismatch: expected {}, got {}", expected, got)
            }
            PipelineError::TypeMismatch { column, expected } => {
                write!(f, "Type mismatch in column {}: expected {}", column, expected)
            }
            PipelineError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            PipelineError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            PipelineError::Io(msg) => write!(f, "I/O error: {}", msg),
            PipelineError::Csv(msg) => write!(f, "CSV error: {}", msg),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Io(err.to_string())
    }
}

impl From<bincode::Error> for PipelineError {
    fn from(err: bincode::Error) -> Self {
        PipelineError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        PipelineError::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Serialization(err.to_string())
    }
}

/// Error type for per-record serving failures.
///
/// Serving errors are isolated per record: one malformed record in a batch
/// produces one `ServeError` entry while the rest of the batch still predicts.
#[derive(Debug)]
pub enum ServeError {
    /// The record could not be parsed into the known field set.
    MalformedRecord(String),
    /// The fitted pipeline rejected the record.
    Pipeline(PipelineError),
}

impl fmt::Display for ServeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServeError::MalformedRecord(msg) => write!(f, "Malformed record: {}", msg),
            ServeError::Pipeline(err) => write!(f, "Prediction failed: {}", err),
        }
    }
}

impl std::error::Error for ServeError {}

impl From<PipelineError> for ServeError {
    fn from(err: PipelineError) -> Self {
        ServeError::Pipeline(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_missing_column() {
        let err = PipelineError::MissingColumn("SalePrice".to_string());
        assert!(err.to_string().contains("SalePrice"));
    }

    #[test]
    fn test_error_display_schema_mismatch() {
        let err = PipelineError::SchemaMismatch {
            expected: "182 features".to_string(),
            got: "180 features".to_string(),
        };
        assert!(err.to_string().contains("Schema mismatch"));
    }

    #[test]
    fn test_error_display_type_mismatch() {
        let err = PipelineError::TypeMismatch {
            column: "GrLivArea".to_string(),
            expected: "numeric",
        };
        assert!(err.to_string().contains("GrLivArea"));
        assert!(err.to_string().contains("numeric"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: PipelineError = io_err.into();
        assert!(matches!(err, PipelineError::Io(_)));
    }

    #[test]
    fn test_error_is_std_error() {
        let err = PipelineError::InvalidParameter("test".to_string());
        let _: &dyn std::error::Error = &err;
    }

    #[test]
    fn test_serve_error_wraps_pipeline_error() {
        let err: ServeError = PipelineError::MissingColumn("MoSold".to_string()).into();
        assert!(matches!(err, ServeError::Pipeline(_)));
        assert!(err.to_string().contains("MoSold"));
    }
}
