use thiserror::Error;

use crate::listing::filesystem::PatternMode;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring or rendering markup.
#[derive(Debug, Error)]
pub enum Error {
    /// A property required for rendering was never configured.
    #[error("property not set: {0}")]
    PropertyNotSet(&'static str),

    /// A setter or parser was given a value outside its allowed range.
    #[error("invalid value for {name}: {value:?}")]
    InvalidArgument { name: &'static str, value: String },

    /// Two tree nodes resolved to the same selection token.
    #[error("duplicate selection token {0}")]
    DuplicateToken(u64),

    /// A row did not match the configured column count.
    #[error("row has {actual} values, expected {expected}")]
    RowShape { expected: usize, actual: usize },

    /// The remote filesystem does not support a wildcard mode.
    #[error("pattern mode {0} not supported by remote system")]
    UnsupportedPatternMode(PatternMode),

    /// A root directory given on the command line does not exist.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// I/O errors from the filesystem collaborator.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, value: impl Into<String>) -> Self {
        Error::InvalidArgument {
            name,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn property_not_set_display() {
        let err = Error::PropertyNotSet("icon_link");
        assert_eq!(err.to_string(), "property not set: icon_link");
    }

    #[test]
    fn invalid_argument_display() {
        let err = Error::invalid("direction", "sideways");
        assert_eq!(err.to_string(), "invalid value for direction: \"sideways\"");
    }

    #[test]
    fn invalid_path_error_display() {
        let err = Error::InvalidPath("/nonexistent".into());
        assert_eq!(err.to_string(), "Invalid path: /nonexistent");
    }

    #[test]
    fn row_shape_display() {
        let err = Error::RowShape {
            expected: 4,
            actual: 2,
        };
        assert_eq!(err.to_string(), "row has 2 values, expected 4");
    }
}
