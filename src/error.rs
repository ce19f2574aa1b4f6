// src/error.rs

//! Error types for pantry

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while cooking a recipe
#[derive(Error, Debug)]
pub enum Error {
    /// Expected source archive is missing from the source repository
    #[error("source archive not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// A setting has no known mapping for the wrapped build tool
    #[error("unsupported configuration: {what} '{value}'")]
    UnsupportedConfiguration { what: String, value: String },

    /// A lifecycle step exited with a non-zero status
    #[error("build step '{step}' failed with {}", describe_exit(*exit_code))]
    BuildStepFailed { step: String, exit_code: Option<i32> },

    /// A lifecycle step could not be started at all
    #[error("failed to start build step '{step}': {source}")]
    Spawn {
        step: String,
        #[source]
        source: io::Error,
    },

    /// An option override that the recipe does not declare
    #[error("recipe '{recipe}' has no option '{option}'")]
    InvalidOption { recipe: String, option: String },

    /// No recipe registered under this name
    #[error("unknown recipe: {0}")]
    UnknownRecipe(String),

    /// Archive could not be read or unpacked
    #[error("archive error: {0}")]
    Archive(String),

    /// Profile or kitchen configuration could not be parsed
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialization error while writing package metadata
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create an unsupported configuration error
    pub fn unsupported(what: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UnsupportedConfiguration {
            what: what.into(),
            value: value.into(),
        }
    }
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_step_failed_message() {
        let err = Error::BuildStepFailed {
            step: "build".to_string(),
            exit_code: Some(2),
        };
        assert_eq!(err.to_string(), "build step 'build' failed with exit code 2");

        let err = Error::BuildStepFailed {
            step: "install".to_string(),
            exit_code: None,
        };
        assert!(err.to_string().contains("terminated by signal"));
    }

    #[test]
    fn test_unsupported_message() {
        let err = Error::unsupported("architecture", "wasm");
        assert_eq!(
            err.to_string(),
            "unsupported configuration: architecture 'wasm'"
        );
    }
}
