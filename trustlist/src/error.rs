//! Error types

use core::fmt;

/// Result type
pub type Result<T> = core::result::Result<T, Error>;

/// Error type
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// MalformedXml occurs when a trust list document is not well-formed XML. Processing of the
    /// affected country is abandoned; other countries are unaffected.
    MalformedXml(String),
    /// MalformedJson occurs when a tl-browser API response does not parse as JSON or does not
    /// match the expected envelope shape.
    MalformedJson(String),
    /// Encoding occurs when a base64 payload (i.e., the trust list document inside the download
    /// envelope) cannot be decoded.
    Encoding(String),
    /// Fetch occurs when an HTTP request fails outright or returns a non-success status. For the
    /// country list this is fatal to the run; for a per-country document it skips that country;
    /// for a chain hop it terminates that chain.
    Fetch {
        /// The URL that was requested
        url: String,
        /// Why the request failed
        reason: String,
    },
    /// MissingElement occurs when an accessor is asked for text content of a node that has
    /// element children instead.
    MissingElement(String),
    /// A configuration error was detected, e.g., a settings file that cannot be read.
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedXml(details) => write!(f, "malformed XML: {}", details),
            Error::MalformedJson(details) => write!(f, "malformed JSON: {}", details),
            Error::Encoding(details) => write!(f, "encoding error: {}", details),
            Error::Fetch { url, reason } => write!(f, "failed to fetch {}: {}", url, reason),
            Error::MissingElement(details) => write!(f, "missing element: {}", details),
            Error::Config(details) => write!(f, "configuration error: {}", details),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedJson(err.to_string())
    }
}
