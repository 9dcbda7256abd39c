//! GeoJSON loading error types.

use std::fmt;

/// Category of a GeoJSON problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The text is not valid JSON.
    InvalidJson,
    /// A required member is absent.
    MissingField,
    /// A member has the wrong JSON type.
    InvalidType,
    /// A value has the right type but is out of range.
    InvalidValue,
    /// A structural rule is broken (too few positions, unclosed ring).
    ConstraintViolation,
    /// The `type` member names something this loader does not know.
    UnknownType,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidJson => "invalid JSON",
            ErrorKind::MissingField => "missing field",
            ErrorKind::InvalidType => "invalid type",
            ErrorKind::InvalidValue => "invalid value",
            ErrorKind::ConstraintViolation => "constraint violation",
            ErrorKind::UnknownType => "unknown type",
        };
        f.write_str(name)
    }
}

/// A problem found at a specific JSON path.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{kind} at {path}: {message}")]
pub struct FeatureError {
    /// Index of the feature in its collection, when the problem is inside one.
    pub index: Option<usize>,
    pub kind: ErrorKind,
    /// JSONPath-style location, e.g. `$.features[2].geometry.coordinates[0]`.
    pub path: String,
    pub message: String,
}

impl FeatureError {
    pub(crate) fn new(
        kind: ErrorKind,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            index: None,
            kind,
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn at_feature(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

/// Errors that abort loading a whole document.
#[derive(Debug, thiserror::Error)]
pub enum GeoJsonError {
    /// Failed to read the file from disk.
    #[error("failed to read GeoJSON: {0}")]
    Read(#[source] std::io::Error),

    /// The text is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The top-level object is not usable (wrong type, no `features` array).
    #[error("invalid GeoJSON document: {0}")]
    Document(#[source] FeatureError),
}

impl GeoJsonError {
    /// The error category, when there is one.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            GeoJsonError::Read(_) => None,
            GeoJsonError::InvalidJson(_) => Some(ErrorKind::InvalidJson),
            GeoJsonError::Document(e) => Some(e.kind),
        }
    }
}
