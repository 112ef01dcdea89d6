//! Error types for net persistence.

use std::fmt;
use std::io;

/// Errors that can occur while encoding, decoding, reading or writing nets.
///
/// Recoverable problems inside otherwise well-formed documents (a
/// non-numeric marking, a dangling arc) are not errors: they are
/// defaulted and reported as import warnings.
#[derive(Debug)]
pub enum CodecError {
    /// An I/O error occurred during read or write.
    Io(io::Error),
    /// The native JSON document could not be parsed or produced.
    Json(serde_json::Error),
    /// The PNML document is not well-formed XML.
    Xml {
        /// Human-readable description from the XML layer.
        detail: String,
    },
    /// A required PNML element or attribute is absent.
    Missing {
        /// What was expected, e.g. `<pnml>` or `net@id`.
        what: String,
    },
    /// PNML options are unusable.
    InvalidOptions {
        /// What is wrong with them.
        reason: &'static str,
    },
    /// The path's extension does not name a supported format.
    UnsupportedFormat {
        /// The extension found (empty when there is none).
        extension: String,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "invalid native document: {e}"),
            Self::Xml { detail } => write!(f, "invalid PNML document: {detail}"),
            Self::Missing { what } => write!(f, "PNML document lacks {what}"),
            Self::InvalidOptions { reason } => write!(f, "invalid PNML options: {reason}"),
            Self::UnsupportedFormat { extension } => {
                write!(f, "unsupported file extension '{extension}'")
            }
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CodecError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<quick_xml::Error> for CodecError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml {
            detail: e.to_string(),
        }
    }
}
