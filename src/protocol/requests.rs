//! XCALIBRATE request encoding
//!
//! Every request frame is prefixed by the major opcode the server assigned
//! to the extension on this connection, followed by the extension-local
//! sub-request code and a fixed-width payload.

use super::types::{write_i16, write_u16, ByteOrder};
use super::{X_QUERY_VERSION, X_SCREEN_TO_COORD, X_SET_RAW_MODE};

/// A request to the XCALIBRATE extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Advertise the client's supported version, asking for the server's.
    QueryVersion { client_major: u16, client_minor: u16 },
    /// Switch between calibrated and raw touchscreen sample delivery.
    SetRawMode { on: bool },
    /// Ask the server to transform a coordinate pair.
    ScreenToCoord { x: i16, y: i16 },
}

impl Request {
    /// Extension-local sub-request code.
    pub fn sub_opcode(&self) -> u8 {
        match self {
            Request::QueryVersion { .. } => X_QUERY_VERSION,
            Request::SetRawMode { .. } => X_SET_RAW_MODE,
            Request::ScreenToCoord { .. } => X_SCREEN_TO_COORD,
        }
    }

    /// Encode the request frame. The major opcode is always the one cached
    /// from discovery, never a hardcoded value.
    pub fn encode(&self, major_opcode: u8, byte_order: ByteOrder) -> Vec<u8> {
        match *self {
            Request::QueryVersion {
                client_major,
                client_minor,
            } => {
                let mut buf = vec![0u8; 6];
                buf[0] = major_opcode;
                buf[1] = X_QUERY_VERSION;
                write_u16(&mut buf[2..4], client_major, byte_order);
                write_u16(&mut buf[4..6], client_minor, byte_order);
                buf
            }
            Request::SetRawMode { on } => {
                let mut buf = vec![0u8; 3];
                buf[0] = major_opcode;
                buf[1] = X_SET_RAW_MODE;
                buf[2] = if on { 1 } else { 0 };
                buf
            }
            Request::ScreenToCoord { x, y } => {
                let mut buf = vec![0u8; 6];
                buf[0] = major_opcode;
                buf[1] = X_SCREEN_TO_COORD;
                write_i16(&mut buf[2..4], x, byte_order);
                write_i16(&mut buf[4..6], y, byte_order);
                buf
            }
        }
    }
}
