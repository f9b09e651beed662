//! Connection boundary
//!
//! The host windowing library owns the connection: the byte stream, the
//! synchronous request/reply discipline, and the extension directory. This
//! module defines the trait this crate programs against and the identity
//! used to key per-connection extension state.

use std::fmt;
use std::io;

use crate::protocol::{ByteOrder, ExtensionCodes};

/// Identity of a live connection. The host library must hand out a value
/// that is stable for the connection's lifetime and never reused while the
/// connection is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        ConnectionId(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connection 0x{:x}", self.0)
    }
}

/// Transport supplied by the host windowing library.
///
/// Implementations must provide connection-wide exclusion: `round_trip`
/// sends a request and blocks the calling thread until the matching reply
/// has been read back, and at most one request of this protocol may be in
/// flight per connection at a time. There is no timeout at this layer; a
/// reply that never arrives blocks until the transport surfaces a
/// connection-level error.
pub trait Transport {
    /// Stable identity of this connection.
    fn connection_id(&self) -> ConnectionId;

    /// Byte order the connection negotiated at setup.
    fn byte_order(&self) -> ByteOrder;

    /// Look up a named extension in the server's extension directory.
    /// Returns `None` when the server does not offer it.
    fn query_extension(&self, name: &str) -> io::Result<Option<ExtensionCodes>>;

    /// Send a request frame and block until the matching reply payload has
    /// been read back.
    fn round_trip(&self, request: &[u8]) -> io::Result<Vec<u8>>;

    /// Serial of the last request the server is known to have processed on
    /// this connection.
    fn last_request_serial(&self) -> u32;
}
