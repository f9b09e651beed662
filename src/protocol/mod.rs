//! XCALIBRATE wire protocol
//!
//! This module implements the extension's wire protocol: request encoding,
//! reply parsing, and translation between the generic wire-event
//! representation and the typed touchscreen event.

pub mod errors;
pub mod events;
pub mod replies;
pub mod requests;
pub mod types;

pub use errors::*;
pub use events::*;
pub use replies::*;
pub use requests::*;
pub use types::*;

/// Extension-local sub-request codes, carried in the second byte of every
/// request frame.
pub const X_QUERY_VERSION: u8 = 0;
pub const X_SET_RAW_MODE: u8 = 1;
pub const X_SCREEN_TO_COORD: u8 = 2;

/// Number of event codes the extension occupies past its event base.
pub const NUMBER_EVENTS: u8 = 1;
