//! Error handling for the svdot CLI

use std::path::PathBuf;
use thiserror::Error;

use svdot_core::{AlignError, DotplotError, ModelError};

/// Main error type for svdot CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Input/Output error: {message}")]
    Io { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Rendering error: {message}")]
    Rendering { message: String },

    #[error("External tool error: {tool} - {message}")]
    ExternalTool { tool: String, message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl CliError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into() }
    }

    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    pub fn invalid_format<S: Into<String>>(message: S) -> Self {
        Self::InvalidFormat { message: message.into() }
    }

    pub fn rendering<S: Into<String>>(message: S) -> Self {
        Self::Rendering { message: message.into() }
    }

    pub fn external_tool<S: Into<String>>(tool: S, message: S) -> Self {
        Self::ExternalTool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into() }
    }

    /// Map a variant loading failure for `path`
    pub fn from_model(path: PathBuf, err: ModelError) -> Self {
        match err {
            ModelError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => Self::file_not_found(path),
            ModelError::Io(e) => Self::io(format!("{}: {}", path.display(), e)),
            ModelError::Json(e) => Self::invalid_format(format!("{}: {}", path.display(), e)),
            ModelError::Invalid(message) => Self::validation(format!("{}: {}", path.display(), message)),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for CliError {
    fn from(err: toml::ser::Error) -> Self {
        Self::config(format!("TOML serialization error: {}", err))
    }
}

impl From<DotplotError> for CliError {
    fn from(err: DotplotError) -> Self {
        match err {
            DotplotError::PairAlignment { part1, part2, source } => match source {
                AlignError::Io(e) => Self::io(format!("{} : {}: {}", part1, part2, e)),
                other => Self::external_tool(
                    svdot_core::align::yass::YASS_BINARY.to_string(),
                    format!("{} : {}: {}", part1, part2, other),
                ),
            },
            DotplotError::Canvas(e) => Self::rendering(e.to_string()),
            DotplotError::Io(e) => Self::io(e.to_string()),
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Provide helpful error messages and suggestions
pub fn format_error_with_suggestions(error: &CliError) -> String {
    let mut message = error.to_string();

    match error {
        CliError::FileNotFound { path } => {
            message.push_str(&format!(
                "\n\nSuggestions:\n\
                 • Check that the file path is correct: {}\n\
                 • Ensure you have read permissions for the file",
                path.display()
            ));
        }

        CliError::InvalidFormat { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Variant files are JSON objects with short_name, alt and ref\n\
                 • Sequence inputs for 'svdot pair' must be FASTA or FASTQ",
            );
        }

        CliError::ExternalTool { tool, .. } => match tool.as_str() {
            "yass" => {
                message.push_str(
                    "\n\nSuggestions:\n\
                     • Install yass: conda install -c bioconda yass\n\
                     • Ensure yass is in your PATH\n\
                     • Or point [aligner] binary in svdot.toml at the executable\n\
                     • Run 'svdot check' to see what svdot can find",
                );
            }
            _ => {
                message.push_str(&format!(
                    "\n\nSuggestions:\n\
                     • Install {}\n\
                     • Ensure {} is in your PATH",
                    tool, tool
                ));
            }
        },

        CliError::Config { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check your svdot.toml configuration file\n\
                 • Use 'svdot config --example' to generate a sample configuration",
            );
        }

        CliError::Rendering { .. } => {
            message.push_str(
                "\n\nSuggestions:\n\
                 • Check that the output directory is writable\n\
                 • Try --format svg if PDF support was not compiled in",
            );
        }

        _ => {}
    }

    message
}

/// Print error with helpful suggestions and exit
pub fn print_error_and_exit(error: &CliError) -> ! {
    eprintln!("Error: {}", format_error_with_suggestions(error));
    std::process::exit(1);
}
