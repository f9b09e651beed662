//! XCALIBRATE client API
//!
//! Three synchronous request operations (QueryVersion, SetRawMode,
//! ScreenToCoord) and translation between the generic wire-event
//! representation and the typed RawTouchscreen event. Every call resolves
//! the connection's extension state first; an absent extension never reaches
//! the codec layer.

use crate::connection::{ConnectionId, Transport};
use crate::protocol::{
    decode_raw_touchscreen, encode_raw_touchscreen, parse_query_version_reply,
    parse_screen_to_coord_reply, parse_set_raw_mode_reply, EventKind, EventMatch, ExtensionCodes,
    RawTouchscreenEvent, Request, Result, Version, WireEvent,
};
use crate::registry::ExtensionRegistry;
use crate::{XCALIBRATE_MAJOR_VERSION, XCALIBRATE_MINOR_VERSION};

/// Client handle for the XCALIBRATE extension.
///
/// One handle serves any number of connections; per-connection state is
/// keyed by [`ConnectionId`] and released through [`XCalibrate::connection_closed`].
#[derive(Default)]
pub struct XCalibrate {
    registry: ExtensionRegistry,
}

impl XCalibrate {
    pub fn new() -> Self {
        XCalibrate {
            registry: ExtensionRegistry::new(),
        }
    }

    /// Check whether the server offers the extension, returning the codes it
    /// assigned. The directory lookup happens on the first call per
    /// connection and is cached afterwards.
    pub fn query_extension(&self, transport: &dyn Transport) -> Result<ExtensionCodes> {
        Ok(self.registry.resolve(transport)?.codes())
    }

    /// Version of the protocol the server speaks, negotiated at most once
    /// per connection. The first successful call sends this library's own
    /// supported version and caches the server's answer; later calls return
    /// the cached pair without any wire traffic.
    pub fn query_version(&self, transport: &dyn Transport) -> Result<Version> {
        let state = self.registry.resolve(transport)?;
        let codes = state.codes();
        state.version_or_negotiate(|| {
            let request = Request::QueryVersion {
                client_major: XCALIBRATE_MAJOR_VERSION,
                client_minor: XCALIBRATE_MINOR_VERSION,
            }
            .encode(codes.major_opcode, transport.byte_order());
            let reply = transport.round_trip(&request)?;
            let version = parse_query_version_reply(&reply, transport.byte_order())?;
            log::debug!(
                "{}: server speaks XCALIBRATE {}",
                transport.connection_id(),
                version
            );
            Ok(version)
        })
    }

    /// Switch the server between calibrated and raw touchscreen sample
    /// delivery. Every call is a full round trip; the current mode is not
    /// cached locally.
    pub fn set_raw_mode(&self, transport: &dyn Transport, enable: bool) -> Result<()> {
        let state = self.registry.resolve(transport)?;
        let request = Request::SetRawMode { on: enable }
            .encode(state.codes().major_opcode, transport.byte_order());
        let reply = transport.round_trip(&request)?;
        parse_set_raw_mode_reply(&reply)
    }

    /// Ask the server to transform a coordinate pair. On success the pair is
    /// overwritten with the transformed coordinates; on failure it is left
    /// untouched. Whether the transform maps pixels to raw samples or the
    /// reverse is server policy, opaque to this layer.
    pub fn screen_to_coord(
        &self,
        transport: &dyn Transport,
        x: &mut i16,
        y: &mut i16,
    ) -> Result<()> {
        let state = self.registry.resolve(transport)?;
        let request = Request::ScreenToCoord { x: *x, y: *y }
            .encode(state.codes().major_opcode, transport.byte_order());
        let reply = transport.round_trip(&request)?;
        let (tx, ty) = parse_screen_to_coord_reply(&reply, transport.byte_order())?;
        *x = tx;
        *y = ty;
        Ok(())
    }

    /// Translate a generic wire event into a typed event.
    ///
    /// Runs inside the transport's event-dispatch path and only reads
    /// registry state. Events whose code lies outside the extension's range
    /// are declined with [`EventMatch::NotMine`] so the dispatcher can offer
    /// them to other extensions; a connection with no registry entry at all
    /// fails with `ExtensionAbsent`.
    pub fn wire_to_event(
        &self,
        transport: &dyn Transport,
        wire: &WireEvent,
    ) -> Result<EventMatch<RawTouchscreenEvent>> {
        let state = self.registry.lookup(transport.connection_id())?;
        let offset = (wire.type_code() & 0x7F).wrapping_sub(state.codes().first_event);
        match EventKind::from_offset(offset) {
            Some(EventKind::RawTouchscreen) => Ok(EventMatch::Matched(decode_raw_touchscreen(
                wire,
                transport.byte_order(),
                transport.last_request_serial(),
                transport.connection_id(),
            ))),
            None => {
                log::debug!(
                    "{}: declining event code {}",
                    transport.connection_id(),
                    wire.type_code() & 0x7F
                );
                Ok(EventMatch::NotMine)
            }
        }
    }

    /// Encode a typed event back into its wire frame, the exact inverse of
    /// [`XCalibrate::wire_to_event`]. Declines events whose kind is outside
    /// the extension's code range.
    pub fn event_to_wire(
        &self,
        transport: &dyn Transport,
        event: &RawTouchscreenEvent,
    ) -> Result<EventMatch<WireEvent>> {
        let state = self.registry.lookup(transport.connection_id())?;
        let offset = (event.kind & 0x7F).wrapping_sub(state.codes().first_event);
        match EventKind::from_offset(offset) {
            Some(EventKind::RawTouchscreen) => Ok(EventMatch::Matched(encode_raw_touchscreen(
                event,
                transport.byte_order(),
            ))),
            None => Ok(EventMatch::NotMine),
        }
    }

    /// Teardown hook. The connection owner must call this from its close
    /// path; the connection's extension state is discarded.
    pub fn connection_closed(&self, id: ConnectionId) {
        self.registry.remove(id);
    }
}
