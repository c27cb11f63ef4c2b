use std::path::PathBuf;

use thiserror::Error;

/// Broad classification of an [`EmxError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required key is absent from a document, entity or attribute.
    MissingField,
    /// An attribute declares a `dataType` outside the vocabulary.
    TypeValidation,
    /// A value has the wrong shape for its key.
    InvalidValue,
    /// Output format, write arguments or target paths are unusable.
    Configuration,
    /// A source document could not be decoded.
    Parse,
    /// Reading or writing a file failed.
    Io,
}

#[derive(Debug, Error)]
pub enum EmxError {
    #[error("missing required attribute \"{field}\" in {location}")]
    MissingField { location: String, field: String },

    #[error("in entity {entity}, attribute {attribute} has invalid dataType \"{value}\"")]
    InvalidDataType {
        entity: String,
        attribute: String,
        value: String,
    },

    #[error("invalid value for \"{field}\" in {location}: {message}")]
    InvalidValue {
        location: String,
        field: String,
        message: String,
    },

    #[error("unsupported output format \"{format}\" (expected csv or xlsx)")]
    UnsupportedFormat { format: String },

    #[error("missing required write argument \"{argument}\"")]
    MissingArgument { argument: String },

    #[error("output directory {path} does not exist")]
    DirectoryNotFound { path: PathBuf },

    #[error("unable to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },
}

impl EmxError {
    pub fn missing_field(location: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            location: location.into(),
            field: field.into(),
        }
    }

    pub fn invalid_value(
        location: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            location: location.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Write {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EmxError::MissingField { .. } => ErrorKind::MissingField,
            EmxError::InvalidDataType { .. } => ErrorKind::TypeValidation,
            EmxError::InvalidValue { .. } => ErrorKind::InvalidValue,
            EmxError::UnsupportedFormat { .. }
            | EmxError::MissingArgument { .. }
            | EmxError::DirectoryNotFound { .. } => ErrorKind::Configuration,
            EmxError::Parse { .. } => ErrorKind::Parse,
            EmxError::Io { .. } | EmxError::Write { .. } => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, EmxError>;
