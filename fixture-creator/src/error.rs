//! Error types raised while introspecting a target type or emitting its fixture.

use std::fmt;

use crate::config::ConfigError;

/// Error type for every stage of fixture generation
///
/// All variants are fatal: generation stops at the first error and no
/// partial fixture text is produced.
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureError {
    /// The target type's schema could not be resolved or read
    Introspection { target: String, message: String },

    /// A generation template needed a class name the type could not provide
    UnresolvableType {
        type_name: String,
        field: Option<String>,
    },

    /// Invalid generator configuration
    Config(ConfigError),

    /// Reading a schema or writing generated output failed
    Io {
        message: String,
        path: Option<String>,
    },

    /// Internal error in the generator (e.g. a worker thread panicked)
    Internal { message: String },
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixtureError::Introspection { target, message } => {
                write!(f, "Introspection of '{}' failed: {}", target, message)
            }
            FixtureError::UnresolvableType { type_name, field } => {
                write!(
                    f,
                    "Cannot determine a class name for type '{}'",
                    type_name
                )?;
                if let Some(field_name) = field {
                    write!(f, " (field: {})", field_name)?;
                }
                Ok(())
            }
            FixtureError::Config(err) => write!(f, "Configuration error: {}", err),
            FixtureError::Io { message, path } => {
                write!(f, "I/O error: {}", message)?;
                if let Some(p) = path {
                    write!(f, " (path: {})", p)?;
                }
                Ok(())
            }
            FixtureError::Internal { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for FixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FixtureError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for FixtureError {
    fn from(err: ConfigError) -> Self {
        FixtureError::Config(err)
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, FixtureError>;

impl FixtureError {
    /// Create an introspection error for the given target
    pub fn introspection(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Introspection {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create an unresolvable type error without field context
    pub fn unresolvable_type(type_name: impl Into<String>) -> Self {
        Self::UnresolvableType {
            type_name: type_name.into(),
            field: None,
        }
    }

    /// Attach the offending field to an unresolvable type error
    ///
    /// Other variants are returned unchanged.
    pub fn with_field(self, field_name: impl Into<String>) -> Self {
        match self {
            Self::UnresolvableType { type_name, .. } => Self::UnresolvableType {
                type_name,
                field: Some(field_name.into()),
            },
            other => other,
        }
    }

    /// Create an I/O error, optionally naming the path involved
    pub fn io(message: impl Into<String>, path: Option<impl Into<String>>) -> Self {
        Self::Io {
            message: message.into(),
            path: path.map(|p| p.into()),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error was raised before any field was examined
    pub fn is_introspection(&self) -> bool {
        matches!(self, Self::Introspection { .. })
    }
}
