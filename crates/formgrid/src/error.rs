//! Error types for the formgrid engine

use std::path::PathBuf;

use thiserror::Error;

/// First line of every configuration error report
pub const CONFIGURATION_ERROR_HEADER: &str = "Invalid configuration:";

/// Errors raised while building fields, tables and forms
#[derive(Debug, Error)]
pub enum FormError {
    /// One or more builder parameters are missing or inconsistent.
    ///
    /// Every violation found during a single `build()` is collected here.
    #[error("{}", render_violations(.errors))]
    Configuration { errors: Vec<String> },

    /// Font resolution failed while building a field
    #[error(transparent)]
    Font(#[from] FontError),

    /// Engine configuration could not be read or parsed
    #[error("Configuration file error: {0}")]
    Config(String),

    /// Iced backend error
    #[error("Iced error: {0}")]
    Iced(String),
}

impl FormError {
    /// Build a configuration error from collected violations
    #[must_use]
    pub fn configuration(errors: Vec<String>) -> Self {
        Self::Configuration { errors }
    }

    /// The individual violations of a configuration error
    #[must_use]
    pub fn violations(&self) -> &[String] {
        match self {
            Self::Configuration { errors } => errors,
            _ => &[],
        }
    }
}

fn render_violations(errors: &[String]) -> String {
    let mut out = String::from(CONFIGURATION_ERROR_HEADER);
    for error in errors {
        out.push('\n');
        out.push_str(error);
    }
    out
}

/// Errors from the font-loading collaborator
#[derive(Debug, Error)]
pub enum FontError {
    /// No font file for the family exists in the search directory
    #[error("Font '{family}' not found in {}", .dir.display())]
    NotFound { family: String, dir: PathBuf },

    /// The font file exists but could not be read
    #[error("Failed to read font file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a TrueType/OpenType font
    #[error("Invalid font file {}: {reason}", .path.display())]
    InvalidFormat { path: PathBuf, reason: String },
}

/// Result type alias for form operations
pub type FormResult<T> = Result<T, FormError>;
