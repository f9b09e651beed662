//! Core protocol types
//!
//! These types are kept minimal and close to the wire protocol.

use std::fmt;

/// Byte order of a connection's wire stream. X clients pick their order at
/// connection setup, so every codec in this crate is parameterized by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    LSBFirst = 0,
    MSBFirst = 1,
}

impl ByteOrder {
    pub fn native() -> Self {
        if cfg!(target_endian = "little") {
            ByteOrder::LSBFirst
        } else {
            ByteOrder::MSBFirst
        }
    }
}

/// Codes the server assigned to the extension at discovery time.
///
/// Immutable for the lifetime of the connection: the server never renumbers
/// an extension mid-session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionCodes {
    /// Major request opcode identifying the extension's request frames.
    pub major_opcode: u8,
    /// First event code in the range assigned to the extension.
    pub first_event: u8,
    /// First error code in the range assigned to the extension.
    pub first_error: u8,
}

/// A protocol version pair, as negotiated with the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
}

impl Version {
    pub fn new(major: u16, minor: u16) -> Self {
        Version { major, minor }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

// Helper functions for reading and writing with correct byte order

pub(crate) fn write_u16(buf: &mut [u8], value: u16, byte_order: ByteOrder) {
    let bytes = match byte_order {
        ByteOrder::MSBFirst => value.to_be_bytes(),
        ByteOrder::LSBFirst => value.to_le_bytes(),
    };
    buf[0] = bytes[0];
    buf[1] = bytes[1];
}

pub(crate) fn write_i16(buf: &mut [u8], value: i16, byte_order: ByteOrder) {
    let bytes = match byte_order {
        ByteOrder::MSBFirst => value.to_be_bytes(),
        ByteOrder::LSBFirst => value.to_le_bytes(),
    };
    buf[0] = bytes[0];
    buf[1] = bytes[1];
}

pub(crate) fn read_u16(buf: &[u8], byte_order: ByteOrder) -> u16 {
    let bytes = [buf[0], buf[1]];
    match byte_order {
        ByteOrder::MSBFirst => u16::from_be_bytes(bytes),
        ByteOrder::LSBFirst => u16::from_le_bytes(bytes),
    }
}

pub(crate) fn read_i16(buf: &[u8], byte_order: ByteOrder) -> i16 {
    let bytes = [buf[0], buf[1]];
    match byte_order {
        ByteOrder::MSBFirst => i16::from_be_bytes(bytes),
        ByteOrder::LSBFirst => i16::from_le_bytes(bytes),
    }
}
