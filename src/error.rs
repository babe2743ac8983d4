//! Typed error hierarchy for the jss-static-group crate.
//!
//! Every failure the tool can hit is one variant of [`JssError`]. The
//! variants map to real system boundaries: the command line, the local
//! filesystem, the network transport, the JSS HTTP status, and the XML
//! body. Transport and parse failures are converted into this enum in one
//! place (`JssClient::send`), and `main` maps each variant to a process
//! exit code exactly once via [`JssError::exit_code`].

use reqwest::StatusCode;

/// Exit code for any failure other than an empty match set.
pub const EXIT_FAILURE: u8 = 1;

/// Exit code when the searches matched no devices.
pub const EXIT_NO_RESULTS: u8 = 2;

/// Unified error type for all jss-static-group operations.
#[derive(Debug, thiserror::Error)]
pub enum JssError {
    /// Bad or conflicting command-line input that clap could not reject
    /// on its own (e.g. a term file with no usable rows).
    #[error("usage error: {0}")]
    Usage(String),

    /// A local I/O failure: unreadable term file or a failed prompt.
    #[error("{context}: {source}")]
    Io {
        /// What was being attempted, including the path when there is one.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The request never produced an HTTP status (DNS, TCP, TLS, timeout).
    #[error("could not reach the JSS: {0}")]
    Unreachable(#[from] reqwest::Error),

    /// The response body was not the XML document we expected.
    #[error("failed to parse JSS response: {0}")]
    MalformedResponse(#[from] quick_xml::de::DeError),

    /// The JSS answered with a non-2xx status other than 409.
    ///
    /// The body is preserved because the JSS puts its explanation there
    /// (e.g. an HTML page naming the invalid field).
    #[error("JSS rejected the request with {status}: {body}")]
    ServerRejected {
        /// The HTTP status returned by the JSS.
        status: StatusCode,
        /// The raw response body, or an empty string if it was unreadable.
        body: String,
    },

    /// The JSS answered 409: a group with the requested name already exists.
    #[error("a conflict with an existing group was encountered (choose a different group name): {body}")]
    Conflict {
        /// The raw response body.
        body: String,
    },

    /// The searches matched no devices, so no group was created.
    #[error("the JSS matched no results to the provided search value")]
    NoResults,
}

impl JssError {
    /// Builds an [`JssError::Io`] with a short description of the attempt.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        JssError::Io {
            context: context.into(),
            source,
        }
    }

    /// Process exit code for this outcome.
    ///
    /// An empty match set is a distinguished outcome (2); everything else,
    /// including a name conflict, is a plain failure (1).
    pub fn exit_code(&self) -> u8 {
        match self {
            JssError::NoResults => EXIT_NO_RESULTS,
            _ => EXIT_FAILURE,
        }
    }
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, JssError>;
