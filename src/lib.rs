//! Client library for the XCALIBRATE touchscreen calibration X extension.
//!
//! This crate speaks the XCALIBRATE wire protocol on top of a connection
//! owned by the host windowing library: it encodes requests, decodes replies
//! and events, and caches the per-connection extension codes and negotiated
//! version so repeated calls avoid redundant round trips. The connection
//! itself (byte stream, request/reply synchronization, extension directory)
//! is supplied by the caller through the [`Transport`] trait.

pub mod client;
pub mod connection;
pub mod protocol;
pub mod registry;

pub use client::XCalibrate;
pub use connection::{ConnectionId, Transport};
pub use protocol::{
    ByteOrder, Error, EventMatch, ExtensionCodes, RawTouchscreenEvent, Result, Version, WireEvent,
};

/// Name the extension registers in the server's extension directory.
pub const XCALIBRATE_NAME: &str = "XCALIBRATE";

/// Protocol version this library speaks, advertised in QueryVersion.
pub const XCALIBRATE_MAJOR_VERSION: u16 = 0;
pub const XCALIBRATE_MINOR_VERSION: u16 = 1;
