use thiserror::Error;

/// Core error type for Parquet operations
#[derive(Error, Debug)]
pub enum ParquetError {
    /// IO errors from sink/source operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata serialization errors from the Thrift layer
    #[error("Metadata error: {0}")]
    Thrift(#[from] thrift::Error),

    /// Schema-related errors: invalid declarations, unknown types, bad
    /// DECIMAL precision
    #[error("Schema error: {0}")]
    Schema(String),

    /// Type conversion errors: a record value that cannot be coerced to its
    /// column's primitive type
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// Data validation errors: a record that violates the schema shape
    #[error("Data validation error: {0}")]
    DataValidation(String),

    /// Unsupported operation errors
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Corrupt or malformed file errors
    #[error("Format error: {0}")]
    Format(String),

    /// Compression or decompression failures
    #[error("Codec error: {0}")]
    Codec(String),

    /// UTF-8 decoding errors
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Result type alias for Parquet operations
pub type Result<T> = std::result::Result<T, ParquetError>;

impl ParquetError {
    /// Create a new schema error
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        ParquetError::Schema(msg.into())
    }

    /// Create a new conversion error
    pub fn conversion<S: Into<String>>(msg: S) -> Self {
        ParquetError::Conversion(msg.into())
    }

    /// Create a new data validation error
    pub fn data_validation<S: Into<String>>(msg: S) -> Self {
        ParquetError::DataValidation(msg.into())
    }

    /// Create a new unsupported operation error
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        ParquetError::Unsupported(msg.into())
    }

    /// Create a new format error
    pub fn format<S: Into<String>>(msg: S) -> Self {
        ParquetError::Format(msg.into())
    }

    /// Create a new codec error
    pub fn codec<S: Into<String>>(msg: S) -> Self {
        ParquetError::Codec(msg.into())
    }
}

/// Extension trait to add context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context<S: Into<String>>(self, ctx: S) -> Result<T>;

    /// Add context with a closure that's only called on error
    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, f: F) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<ParquetError>,
{
    fn context<S: Into<String>>(self, ctx: S) -> Result<T> {
        self.map_err(|e| {
            let base_error = e.into();
            ParquetError::Format(format!("{}: {}", ctx.into(), base_error))
        })
    }

    fn with_context<S: Into<String>, F: FnOnce() -> S>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let base_error = e.into();
            ParquetError::Format(format!("{}: {}", f().into(), base_error))
        })
    }
}
