//! Typed error variants for the glyphrun-config crate.
//!
//! Option decoding is deliberately lenient: unknown keys and ill-typed values
//! are logged and skipped. Only input that cannot be read as an option object
//! at all produces a `ConfigError`.

use std::fmt;

/// Errors that can occur when decoding font options.
///
/// # Example
///
/// ```rust
/// use glyphrun_config::{ConfigError, FontOptions};
///
/// match FontOptions::from_json("[1, 2, 3]") {
///     Err(ConfigError::NotAnObject(kind)) => assert_eq!(kind, "array"),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
#[derive(Debug)]
pub enum ConfigError {
    /// The options text was not valid JSON.
    Parse(serde_json::Error),

    /// The options text was valid JSON but not an object.
    ///
    /// The inner string names the JSON kind that was found instead.
    NotAnObject(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "JSON parse error in font options: {e}"),
            ConfigError::NotAnObject(kind) => {
                write!(f, "font options must be a JSON object, found {kind}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::NotAnObject(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}
