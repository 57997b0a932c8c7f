// License: MIT
// Copyright © 2024 esm-metrics contributors

//! This module defines the `Error` struct and the `ErrorKind` enum, which are
//! used to represent errors that can occur in the library.

/// A macro for defining the `ErrorKind` enum, the `Display` implementation for
/// it, and the constructors for the `Error` struct.
macro_rules! ErrorKind {
    ($(
        ($kind:ident, $ctor:ident)
    ),*) => {
        /// The kind of error that occurred.
        #[derive(Clone, Copy, Debug, PartialEq, Eq)]
        pub enum ErrorKind {
            $(
                $kind,
            )*
        }

        impl std::fmt::Display for ErrorKind {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        Self::$kind => write!(f, "{}", stringify!($kind)),
                    )*
                }
            }
        }

        /// Constructors for [`Error`].
        impl Error {
            $(
                #[doc = concat!(
                    "Creates a new [`Error`] with the `",
                    stringify!($kind),
                    "` kind and the given description."
                )]
                pub(crate) fn $ctor(desc: impl Into<String>) -> crate::Error {
                    Self {
                        kind: ErrorKind::$kind,
                        desc: desc.into(),
                    }
                }
            )*
        }
    };
}

ErrorKind!(
    (Internal, internal),
    (InvalidFormat, invalid_format),
    (InvalidValue, invalid_value),
    (MissingKey, missing_key),
    (SchemaMismatch, schema_mismatch)
);

/// An error that can occur while building, transforming or validating a
/// [MetricTable][crate::MetricTable].
#[derive(Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    desc: String,
}

impl Error {
    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the description of the error.
    pub fn message(&self) -> &str {
        &self.desc
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.desc)
    }
}

impl std::error::Error for Error {}

/// Polars failures are internal errors, the frame layout of a table is checked
/// when the table is created.
impl From<polars::prelude::PolarsError> for Error {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::internal(format!("Table operation failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::missing_key("Unknown unit symbol: 'MJ'.");
        assert_eq!(err.kind(), ErrorKind::MissingKey);
        assert_eq!(err.to_string(), "MissingKey: Unknown unit symbol: 'MJ'.");
        assert_eq!(err.message(), "Unknown unit symbol: 'MJ'.");
    }

    #[test]
    fn test_from_polars_error() {
        let err = Error::from(polars::prelude::PolarsError::ColumnNotFound(
            "__value_3".into(),
        ));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.message().starts_with("Table operation failed: "));
        assert!(err.message().contains("__value_3"));
    }
}
