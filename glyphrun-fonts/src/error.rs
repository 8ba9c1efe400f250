//! Error types for font loading.

use rustybuzz::ttf_parser::FaceParsingError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FontError {
    /// The bytes are not a font ttf-parser can read.
    #[error("Font data could not be parsed: {0}")]
    Parse(FaceParsingError),

    /// The font parsed but lacks a table the engine relies on.
    #[error("Font is missing required table '{0}'")]
    MissingTable(&'static str),
}

impl From<FaceParsingError> for FontError {
    fn from(e: FaceParsingError) -> Self {
        FontError::Parse(e)
    }
}

pub type Result<T> = std::result::Result<T, FontError>;
