//! Error taxonomy for XCALIBRATE client operations
//!
//! Every operation surfaces failures directly to its caller; there is no
//! retry anywhere in this layer. Declining a foreign event is not an error
//! and is expressed through [`super::EventMatch::NotMine`] instead.

use std::error::Error as StdError;
use std::fmt;
use std::io;

/// Errors surfaced by XCALIBRATE client calls.
#[derive(Debug)]
pub enum Error {
    /// The server never offered the extension on this connection. Checked
    /// before any request is sent.
    ExtensionAbsent,
    /// The reply was not received: the transport failed while waiting for
    /// it. Carries the transport's own error.
    NoReply(io::Error),
    /// A reply arrived but its payload does not match the fixed layout.
    ProtocolViolation { expected: usize, got: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ExtensionAbsent => {
                write!(f, "the XCALIBRATE extension is not present on this connection")
            }
            Error::NoReply(err) => {
                write!(f, "transport failed while waiting for a reply: {}", err)
            }
            Error::ProtocolViolation { expected, got } => {
                write!(
                    f,
                    "malformed reply: expected {} payload bytes, got {}",
                    expected, got
                )
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::NoReply(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::NoReply(err)
    }
}

/// Result type for XCALIBRATE operations.
pub type Result<T> = std::result::Result<T, Error>;
