//! End-to-end tests of the client API against a scripted transport.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io;

use xcalibrate::protocol::WIRE_EVENT_SIZE;
use xcalibrate::{
    ByteOrder, ConnectionId, Error, EventMatch, ExtensionCodes, RawTouchscreenEvent, Transport,
    WireEvent, XCalibrate,
};

const CODES: ExtensionCodes = ExtensionCodes {
    major_opcode: 130,
    first_event: 100,
    first_error: 150,
};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Transport double: records every frame sent and plays back queued replies.
struct MockTransport {
    id: ConnectionId,
    byte_order: ByteOrder,
    codes: Option<ExtensionCodes>,
    serial: Cell<u32>,
    requests: RefCell<Vec<Vec<u8>>>,
    replies: RefCell<VecDeque<io::Result<Vec<u8>>>>,
    lookups: Cell<u32>,
}

impl MockTransport {
    fn supported(id: u64) -> Self {
        MockTransport {
            id: ConnectionId::new(id),
            byte_order: ByteOrder::LSBFirst,
            codes: Some(CODES),
            serial: Cell::new(0),
            requests: RefCell::new(Vec::new()),
            replies: RefCell::new(VecDeque::new()),
            lookups: Cell::new(0),
        }
    }

    fn unsupported(id: u64) -> Self {
        MockTransport {
            codes: None,
            ..MockTransport::supported(id)
        }
    }

    fn queue_reply(&self, payload: &[u8]) {
        self.replies.borrow_mut().push_back(Ok(payload.to_vec()));
    }

    fn queue_failure(&self) {
        self.replies
            .borrow_mut()
            .push_back(Err(io::Error::from(io::ErrorKind::BrokenPipe)));
    }

    fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    fn request(&self, index: usize) -> Vec<u8> {
        self.requests.borrow()[index].clone()
    }
}

impl Transport for MockTransport {
    fn connection_id(&self) -> ConnectionId {
        self.id
    }

    fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    fn query_extension(&self, name: &str) -> io::Result<Option<ExtensionCodes>> {
        assert_eq!(name, "XCALIBRATE");
        self.lookups.set(self.lookups.get() + 1);
        Ok(self.codes)
    }

    fn round_trip(&self, request: &[u8]) -> io::Result<Vec<u8>> {
        self.requests.borrow_mut().push(request.to_vec());
        self.serial.set(self.serial.get() + 1);
        self.replies
            .borrow_mut()
            .pop_front()
            .expect("test sent a request with no scripted reply")
    }

    fn last_request_serial(&self) -> u32 {
        self.serial.get()
    }
}

fn raw_touchscreen_wire(type_code: u8, sequence: u16, x: i16, y: i16, pressure: u16) -> WireEvent {
    let mut bytes = [0u8; WIRE_EVENT_SIZE];
    bytes[0] = type_code;
    bytes[2..4].copy_from_slice(&sequence.to_le_bytes());
    bytes[4..6].copy_from_slice(&x.to_le_bytes());
    bytes[6..8].copy_from_slice(&y.to_le_bytes());
    bytes[8..10].copy_from_slice(&pressure.to_le_bytes());
    WireEvent::new(bytes)
}

#[test]
fn scenario_discovery_version_and_transform() {
    init_logs();
    let client = XCalibrate::new();
    let transport = MockTransport::supported(1);

    let codes = client.query_extension(&transport).unwrap();
    assert_eq!(codes.major_opcode, 130);
    assert_eq!(codes.first_event, 100);

    // First QueryVersion negotiates: the frame carries the cached opcode and
    // this library's advertised version (0.1).
    transport.queue_reply(&[0x00, 0x00, 0x01, 0x00]);
    let version = client.query_version(&transport).unwrap();
    assert_eq!((version.major, version.minor), (0, 1));
    assert_eq!(transport.request_count(), 1);
    assert_eq!(transport.request(0), vec![130, 0, 0x00, 0x00, 0x01, 0x00]);

    // Second call is served from the cache: identical pair, zero traffic.
    let again = client.query_version(&transport).unwrap();
    assert_eq!(again, version);
    assert_eq!(transport.request_count(), 1);
    assert_eq!(transport.lookups.get(), 1);

    // ScreenToCoord sends the input pair and overwrites it with the reply.
    let mut reply = [0u8; 4];
    reply[0..2].copy_from_slice(&120i16.to_le_bytes());
    reply[2..4].copy_from_slice(&80i16.to_le_bytes());
    transport.queue_reply(&reply);

    let (mut x, mut y) = (500i16, 300i16);
    client.screen_to_coord(&transport, &mut x, &mut y).unwrap();
    assert_eq!((x, y), (120, 80));

    let frame = transport.request(1);
    assert_eq!(frame[0..2], [130, 2]);
    assert_eq!(i16::from_le_bytes([frame[2], frame[3]]), 500);
    assert_eq!(i16::from_le_bytes([frame[4], frame[5]]), 300);
}

#[test]
fn absent_extension_short_circuits() {
    init_logs();
    let client = XCalibrate::new();
    let transport = MockTransport::unsupported(2);

    let (mut x, mut y) = (500i16, 300i16);
    assert!(matches!(
        client.screen_to_coord(&transport, &mut x, &mut y),
        Err(Error::ExtensionAbsent)
    ));
    assert_eq!((x, y), (500, 300));
    assert_eq!(transport.request_count(), 0);

    // Absence is cached: further calls fail without another lookup.
    assert!(matches!(
        client.set_raw_mode(&transport, true),
        Err(Error::ExtensionAbsent)
    ));
    assert!(matches!(
        client.query_version(&transport),
        Err(Error::ExtensionAbsent)
    ));
    assert_eq!(transport.lookups.get(), 1);
    assert_eq!(transport.request_count(), 0);
}

#[test]
fn mode_calls_are_independent_round_trips() {
    let client = XCalibrate::new();
    let transport = MockTransport::supported(3);

    transport.queue_reply(&[]);
    transport.queue_reply(&[]);
    client.set_raw_mode(&transport, true).unwrap();
    client.set_raw_mode(&transport, false).unwrap();

    assert_eq!(transport.request_count(), 2);
    assert_eq!(transport.request(0), vec![130, 1, 1]);
    assert_eq!(transport.request(1), vec![130, 1, 0]);
}

#[test]
fn failed_negotiation_is_retried_later() {
    let client = XCalibrate::new();
    let transport = MockTransport::supported(4);

    transport.queue_failure();
    assert!(matches!(
        client.query_version(&transport),
        Err(Error::NoReply(_))
    ));

    // The cache stayed unset, so the next call goes back to the wire.
    transport.queue_reply(&[0x00, 0x00, 0x01, 0x00]);
    let version = client.query_version(&transport).unwrap();
    assert_eq!((version.major, version.minor), (0, 1));
    assert_eq!(transport.request_count(), 2);
}

#[test]
fn garbled_reply_is_a_protocol_violation() {
    let client = XCalibrate::new();
    let transport = MockTransport::supported(5);

    transport.queue_reply(&[1, 2, 3]);
    let (mut x, mut y) = (10i16, 20i16);
    let err = client.screen_to_coord(&transport, &mut x, &mut y).unwrap_err();
    assert!(matches!(
        err,
        Error::ProtocolViolation {
            expected: 4,
            got: 3
        }
    ));
    // Outputs untouched on failure.
    assert_eq!((x, y), (10, 20));
}

#[test]
fn wire_event_translation_round_trips() {
    init_logs();
    let client = XCalibrate::new();
    let transport = MockTransport::supported(6);
    client.query_extension(&transport).unwrap();
    transport.serial.set(42);

    let wire = raw_touchscreen_wire(100 | 0x80, 42, 500, 300, 255);
    let event = match client.wire_to_event(&transport, &wire).unwrap() {
        EventMatch::Matched(event) => event,
        EventMatch::NotMine => panic!("event code 100 belongs to this extension"),
    };
    assert_eq!(event.kind, 100);
    assert!(event.send_event);
    assert_eq!(event.serial, 42);
    assert_eq!(event.connection, transport.id);
    assert_eq!(event.connection.get(), 6);
    assert_eq!((event.x, event.y, event.pressure), (500, 300, 255));

    match client.event_to_wire(&transport, &event).unwrap() {
        EventMatch::Matched(back) => assert_eq!(back, wire),
        EventMatch::NotMine => panic!("typed event must encode"),
    }
}

#[test]
fn foreign_event_codes_are_declined() {
    let client = XCalibrate::new();
    let transport = MockTransport::supported(7);
    client.query_extension(&transport).unwrap();

    // One code past the extension's range, and one below the event base.
    for code in [101u8, 99] {
        let wire = raw_touchscreen_wire(code, 0, 0, 0, 0);
        assert_eq!(
            client.wire_to_event(&transport, &wire).unwrap(),
            EventMatch::NotMine
        );
    }

    let foreign = RawTouchscreenEvent {
        kind: 105,
        serial: 0,
        send_event: false,
        connection: transport.id,
        x: 0,
        y: 0,
        pressure: 0,
    };
    assert_eq!(
        client.event_to_wire(&transport, &foreign).unwrap(),
        EventMatch::NotMine
    );
}

#[test]
fn event_decode_requires_a_registry_entry() {
    let client = XCalibrate::new();
    let transport = MockTransport::supported(8);

    // No resolve yet: decoding must not trigger discovery.
    let wire = raw_touchscreen_wire(100, 0, 0, 0, 0);
    assert!(matches!(
        client.wire_to_event(&transport, &wire),
        Err(Error::ExtensionAbsent)
    ));
    assert_eq!(transport.lookups.get(), 0);
}

#[test]
fn teardown_discards_connection_state() {
    let client = XCalibrate::new();
    let transport = MockTransport::supported(9);

    transport.queue_reply(&[0x00, 0x00, 0x01, 0x00]);
    client.query_version(&transport).unwrap();
    client.connection_closed(transport.id);

    let wire = raw_touchscreen_wire(100, 0, 0, 0, 0);
    assert!(matches!(
        client.wire_to_event(&transport, &wire),
        Err(Error::ExtensionAbsent)
    ));

    // A new connection under the same identity renegotiates from scratch.
    transport.queue_reply(&[0x00, 0x00, 0x01, 0x00]);
    client.query_version(&transport).unwrap();
    assert_eq!(transport.lookups.get(), 2);
    assert_eq!(transport.request_count(), 2);
}

#[test]
fn big_endian_connections_encode_accordingly() {
    let client = XCalibrate::new();
    let transport = MockTransport {
        byte_order: ByteOrder::MSBFirst,
        ..MockTransport::supported(10)
    };

    transport.queue_reply(&[0x00, 0x00, 0x00, 0x01]);
    let version = client.query_version(&transport).unwrap();
    assert_eq!((version.major, version.minor), (0, 1));
    assert_eq!(transport.request(0), vec![130, 0, 0x00, 0x00, 0x00, 0x01]);

    let mut reply = [0u8; 4];
    reply[0..2].copy_from_slice(&120i16.to_be_bytes());
    reply[2..4].copy_from_slice(&(-80i16).to_be_bytes());
    transport.queue_reply(&reply);

    let (mut x, mut y) = (-500i16, 300i16);
    client.screen_to_coord(&transport, &mut x, &mut y).unwrap();
    assert_eq!((x, y), (120, -80));
}
