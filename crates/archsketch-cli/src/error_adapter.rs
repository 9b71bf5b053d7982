//! Error adapter for converting ArchsketchError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Errors carry no
//! source spans, so the adapter contributes a code and a help line.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use archsketch::{ArchsketchError, GenerationError};

/// Adapter rendering an [`ArchsketchError`] through miette.
pub struct ErrorAdapter<'a>(pub &'a ArchsketchError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            ArchsketchError::Io(_) => "archsketch::io",
            ArchsketchError::EmptyRequirements => "archsketch::input",
            ArchsketchError::Generation(_) => "archsketch::generation",
            ArchsketchError::Config(_) => "archsketch::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            ArchsketchError::Io(_) => return None,
            ArchsketchError::EmptyRequirements => {
                "describe the architecture or system you want to design"
            }
            ArchsketchError::Generation(GenerationError::Start(_)) => {
                "check the [generator] command in the configuration, or pass --replay <FILE>"
            }
            ArchsketchError::Generation(_) => "the model response was interrupted; try again",
            ArchsketchError::Config(_) => {
                "fix the configuration file or environment and run again"
            }
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let err = ArchsketchError::EmptyRequirements;
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.code().unwrap().to_string(), "archsketch::input");
        assert_eq!(
            adapter.to_string(),
            "Please enter architecture requirements first"
        );
    }

    #[test]
    fn test_generation_start_help() {
        let err = ArchsketchError::Generation(GenerationError::Start("boom".to_string()));
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.code().unwrap().to_string(), "archsketch::generation");
        assert!(adapter.help().unwrap().to_string().contains("--replay"));
    }

    #[test]
    fn test_io_has_no_help() {
        let err = ArchsketchError::Io(std::io::Error::other("disk full"));
        let adapter = ErrorAdapter(&err);

        assert!(adapter.help().is_none());
        assert_eq!(adapter.to_string(), "I/O error: disk full");
    }

    #[test]
    fn test_source_is_forwarded() {
        let err = ArchsketchError::Generation(GenerationError::Stream("cut".to_string()));
        let adapter = ErrorAdapter(&err);

        let source = std::error::Error::source(&adapter).unwrap();
        assert_eq!(source.to_string(), "generation stream failed: cut");
    }
}
