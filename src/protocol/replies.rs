//! XCALIBRATE reply parsing
//!
//! Replies are fixed-width payloads with no variable-length fields. A
//! payload of any other size is a protocol violation, never a truncated
//! partial result.

use super::errors::{Error, Result};
use super::types::{read_i16, read_u16, ByteOrder, Version};

/// Parse a QueryVersion reply: serverMajor:u16, serverMinor:u16.
pub fn parse_query_version_reply(payload: &[u8], byte_order: ByteOrder) -> Result<Version> {
    if payload.len() != 4 {
        return Err(Error::ProtocolViolation {
            expected: 4,
            got: payload.len(),
        });
    }
    Ok(Version {
        major: read_u16(&payload[0..2], byte_order),
        minor: read_u16(&payload[2..4], byte_order),
    })
}

/// Parse a SetRawMode reply: status only, no payload.
pub fn parse_set_raw_mode_reply(payload: &[u8]) -> Result<()> {
    if !payload.is_empty() {
        return Err(Error::ProtocolViolation {
            expected: 0,
            got: payload.len(),
        });
    }
    Ok(())
}

/// Parse a ScreenToCoord reply: transformed x:i16, y:i16.
pub fn parse_screen_to_coord_reply(payload: &[u8], byte_order: ByteOrder) -> Result<(i16, i16)> {
    if payload.len() != 4 {
        return Err(Error::ProtocolViolation {
            expected: 4,
            got: payload.len(),
        });
    }
    Ok((
        read_i16(&payload[0..2], byte_order),
        read_i16(&payload[2..4], byte_order),
    ))
}
