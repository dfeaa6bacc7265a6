//! Codec Tests
//!
//! Tests for request and response encoding/decoding.

use std::io::Cursor;

use kvlink::protocol::{
    Codec, Command, FrameLimits, Request, Response, ResponseFormat, Status, TagScheme,
    MAX_RESPONSE_SIZE,
};
use kvlink::{KvError, ProtocolError, TransportError};

// =============================================================================
// Helper Functions
// =============================================================================

fn decode_request(codec: &Codec, bytes: &[u8]) -> kvlink::Result<Request> {
    codec.read_request(&mut Cursor::new(bytes))
}

fn round_trip(request: &Request) -> Request {
    let codec = Codec::default();
    let encoded = codec.encode_request(request).unwrap();
    decode_request(&codec, &encoded).unwrap()
}

fn status_frame(status: u8, body: &[u8]) -> Vec<u8> {
    let mut frame = vec![status];
    frame.extend_from_slice(&(body.len() as u32).to_be_bytes());
    frame.extend_from_slice(body);
    frame
}

// =============================================================================
// Request Wire Format Tests
// =============================================================================

#[test]
fn test_wire_format_set() {
    let encoded = Codec::default()
        .encode_request(&Request::set("foo", "bar"))
        .unwrap();

    // [0x00][0 0 0 3][f o o][0 0 0 3][b a r]
    assert_eq!(encoded[0], 0x00);
    assert_eq!(&encoded[1..5], &[0, 0, 0, 3]);
    assert_eq!(&encoded[5..8], b"foo");
    assert_eq!(&encoded[8..12], &[0, 0, 0, 3]);
    assert_eq!(&encoded[12..], b"bar");
}

#[test]
fn test_wire_format_get_carries_zero_value_length() {
    let encoded = Codec::default().encode_request(&Request::get("test")).unwrap();

    assert_eq!(encoded.len(), 1 + 4 + 4 + 4);
    assert_eq!(encoded[0], 0x01);
    assert_eq!(&encoded[1..5], &[0, 0, 0, 4]);
    assert_eq!(&encoded[5..9], b"test");
    assert_eq!(&encoded[9..13], &[0, 0, 0, 0]);
}

#[test]
fn test_wire_format_del() {
    let encoded = Codec::default().encode_request(&Request::del("k")).unwrap();
    assert_eq!(&encoded[..], &[0x02, 0, 0, 0, 1, b'k', 0, 0, 0, 0]);
}

#[test]
fn test_get_first_tag_scheme() {
    let codec = Codec::new(
        ResponseFormat::StatusCoded,
        TagScheme::GetFirst,
        FrameLimits::default(),
    );

    assert_eq!(codec.encode_request(&Request::get("k")).unwrap()[0], 0);
    assert_eq!(codec.encode_request(&Request::set("k", "v")).unwrap()[0], 1);
    assert_eq!(codec.encode_request(&Request::del("k")).unwrap()[0], 2);
}

#[test]
fn test_tag_scheme_lookup() {
    assert_eq!(TagScheme::Canonical.command(0), Some(Command::Set));
    assert_eq!(TagScheme::Canonical.command(1), Some(Command::Get));
    assert_eq!(TagScheme::GetFirst.command(0), Some(Command::Get));
    assert_eq!(TagScheme::GetFirst.command(2), Some(Command::Del));
    assert_eq!(TagScheme::Canonical.command(3), None);
}

// =============================================================================
// Request Round-Trip Tests
// =============================================================================

#[test]
fn test_round_trip_each_command() {
    for request in [
        Request::set("mykey", "myvalue"),
        Request::get("mykey"),
        Request::del("mykey"),
    ] {
        assert_eq!(round_trip(&request), request);
    }
}

#[test]
fn test_round_trip_empty_key_and_value() {
    let request = Request::set("", "");
    let decoded = round_trip(&request);

    assert_eq!(decoded, request);
    assert_eq!(decoded.value(), Some(&b""[..]));
}

#[test]
fn test_round_trip_large_key_and_value() {
    let key = vec![0xAB; 65535];
    let value: Vec<u8> = (0..65535u32).map(|i| (i % 251) as u8).collect();

    let request = Request::set(key.clone(), value);
    assert_eq!(round_trip(&request), request);
    assert_eq!(round_trip(&Request::get(key.clone())), Request::get(key));
}

#[test]
fn test_round_trip_binary_data() {
    let key: Vec<u8> = vec![0x00, 0x01, 0xFF, 0xFE, 0x80];
    let value: Vec<u8> = (0..=255).collect();

    let request = Request::set(key, value);
    assert_eq!(round_trip(&request), request);
}

#[test]
fn test_stream_multiple_requests() {
    let codec = Codec::default();
    let requests = vec![
        Request::set("k1", "v1"),
        Request::get("k1"),
        Request::del("k1"),
    ];

    let mut buffer = Vec::new();
    for request in &requests {
        codec.write_request(&mut buffer, request).unwrap();
    }

    let mut cursor = Cursor::new(buffer);
    for expected in &requests {
        assert_eq!(&codec.read_request(&mut cursor).unwrap(), expected);
    }
}

// =============================================================================
// Request Error Tests
// =============================================================================

#[test]
fn test_unknown_command_tag() {
    let result = decode_request(&Codec::default(), &[0x07, 0, 0, 0, 0, 0, 0, 0, 0]);
    assert!(matches!(
        result,
        Err(KvError::Protocol(ProtocolError::UnknownCommand(0x07)))
    ));
}

#[test]
fn test_get_with_value_rejected() {
    let bytes = [0x01, 0, 0, 0, 1, b'k', 0, 0, 0, 2, b'v', b'v'];
    let result = decode_request(&Codec::default(), &bytes);
    assert!(matches!(
        result,
        Err(KvError::Protocol(ProtocolError::UnexpectedValue { command: "get", len: 2 }))
    ));
}

#[test]
fn test_truncated_request() {
    // Key length says 10, only 2 key bytes follow
    let bytes = [0x01, 0, 0, 0, 10, b'h', b'i'];
    match decode_request(&Codec::default(), &bytes) {
        Err(KvError::Transport(TransportError::UnexpectedEof {
            step,
            expected,
            received,
        })) => {
            assert_eq!(step, "read key data");
            assert_eq!(expected, 10);
            assert_eq!(received, 2);
        }
        other => panic!("Expected UnexpectedEof, got {other:?}"),
    }
}

#[test]
fn test_oversized_request_rejected_before_encoding() {
    let limits = FrameLimits {
        max_key_size: 4,
        max_value_size: 8,
        ..FrameLimits::default()
    };
    let codec = Codec::new(ResponseFormat::StatusCoded, TagScheme::Canonical, limits);

    assert_eq!(
        codec.encode_request(&Request::get("toolong")),
        Err(ProtocolError::OversizedRequest {
            field: "key",
            len: 7,
            max: 4
        })
    );
    assert_eq!(
        codec.encode_request(&Request::set("k", "ninebytes")),
        Err(ProtocolError::OversizedRequest {
            field: "value",
            len: 9,
            max: 8
        })
    );

    let mut sink = Vec::new();
    assert!(codec.write_request(&mut sink, &Request::get("toolong")).is_err());
    assert!(sink.is_empty());
}

#[test]
fn test_oversized_key_rejected_before_read() {
    let limits = FrameLimits {
        max_key_size: 4,
        ..FrameLimits::default()
    };
    let codec = Codec::new(ResponseFormat::StatusCoded, TagScheme::Canonical, limits);

    // Announces a 1 GiB key with no key bytes behind it
    let mut cursor = Cursor::new(vec![0x01, 0x40, 0, 0, 0]);
    let result = codec.read_request(&mut cursor);

    assert!(matches!(
        result,
        Err(KvError::Protocol(ProtocolError::OversizedRequest { field: "key", .. }))
    ));
    assert_eq!(cursor.position(), 5);
}

// =============================================================================
// Status-Coded Response Tests
// =============================================================================

#[test]
fn test_read_response_ok_with_body() {
    let mut cursor = Cursor::new(status_frame(200, b"value"));
    let response = Codec::default().read_response(&mut cursor).unwrap();

    assert_eq!(response.status, Status::OK);
    assert_eq!(response.body, Some(b"value".to_vec()));
    assert!(response.is_success());
}

#[test]
fn test_read_response_other_payload_statuses() {
    for code in [201u8, 202] {
        let mut cursor = Cursor::new(status_frame(code, b"x"));
        let response = Codec::default().read_response(&mut cursor).unwrap();
        assert_eq!(response.status, Status(code));
        assert_eq!(response.body, Some(b"x".to_vec()));
    }
}

#[test]
fn test_status_only_response_stops_after_status_byte() {
    for code in [0u8, 1, 4, 199, 203, 255] {
        let mut cursor = Cursor::new(vec![code, 0xAA, 0xBB, 0xCC, 0xDD]);
        let response = Codec::default().read_response(&mut cursor).unwrap();

        assert_eq!(response.status, Status(code));
        assert_eq!(response.body, None);
        assert_eq!(cursor.position(), 1);
    }
}

#[test]
fn test_response_at_cap_accepted() {
    let body = vec![0u8; MAX_RESPONSE_SIZE as usize];
    let mut cursor = Cursor::new(status_frame(200, &body));

    let response = Codec::default().read_response(&mut cursor).unwrap();
    assert_eq!(response.body.map(|b| b.len()), Some(10 * 1024 * 1024));
}

#[test]
fn test_response_over_cap_rejected_before_body() {
    let mut frame = vec![200];
    frame.extend_from_slice(&(MAX_RESPONSE_SIZE + 1).to_be_bytes());
    frame.extend_from_slice(b"trailing");
    let mut cursor = Cursor::new(frame);

    let result = Codec::default().read_response(&mut cursor);

    assert!(matches!(
        result,
        Err(KvError::Protocol(ProtocolError::OversizedResponse {
            len,
            max: MAX_RESPONSE_SIZE,
        })) if len == 10 * 1024 * 1024 + 1
    ));
    // Nothing past the length prefix was consumed
    assert_eq!(cursor.position(), 5);
}

#[test]
fn test_early_eof_after_status() {
    let mut cursor = Cursor::new(vec![200]);
    match Codec::default().read_response(&mut cursor) {
        Err(KvError::Transport(TransportError::UnexpectedEof { step, received, .. })) => {
            assert_eq!(step, "read resp size");
            assert_eq!(received, 0);
        }
        other => panic!("Expected UnexpectedEof, got {other:?}"),
    }
}

#[test]
fn test_truncated_body() {
    let mut frame = status_frame(200, b"hello");
    frame.truncate(frame.len() - 2);

    let result = Codec::default().read_response(&mut Cursor::new(frame));
    assert!(matches!(
        result,
        Err(KvError::Transport(TransportError::UnexpectedEof {
            step: "read resp data",
            expected: 5,
            received: 3,
        }))
    ));
}

#[test]
fn test_empty_stream() {
    let result = Codec::default().read_response(&mut Cursor::new(Vec::new()));
    assert!(matches!(
        result,
        Err(KvError::Transport(TransportError::UnexpectedEof {
            step: "read resp status",
            ..
        }))
    ));
}

#[test]
fn test_stream_multiple_responses() {
    let codec = Codec::default();
    let responses = vec![
        Response::ok("data"),
        Response::status_only(Status(4)).unwrap(),
        Response::with_body(Status::CREATED, "").unwrap(),
        Response::status_only(Status(1)).unwrap(),
    ];

    let mut buffer = Vec::new();
    for response in &responses {
        codec.write_response(&mut buffer, response).unwrap();
    }

    let mut cursor = Cursor::new(buffer);
    for expected in &responses {
        assert_eq!(&codec.read_response(&mut cursor).unwrap(), expected);
    }
}

#[test]
fn test_response_constructors_check_status() {
    let response = Response::with_body(Status::ACCEPTED, "later").unwrap();
    assert_eq!(response.body, Some(b"later".to_vec()));
    assert_eq!(Response::status_only(Status(4)).unwrap().body, None);

    assert_eq!(
        Response::with_body(Status(4), "body"),
        Err(ProtocolError::StatusWithoutBody(4))
    );
    assert_eq!(
        Response::status_only(Status::OK),
        Err(ProtocolError::StatusRequiresBody(200))
    );
    assert_eq!(
        ProtocolError::StatusWithoutBody(4).to_string(),
        "status 4 carries no body"
    );
}

#[test]
fn test_encode_status_only_drops_body() {
    let response = Response {
        status: Status(4),
        body: Some(b"ignored".to_vec()),
    };
    let encoded = Codec::default().encode_response(&response).unwrap();
    assert_eq!(&encoded[..], &[4]);
}

// =============================================================================
// Legacy Response Tests
// =============================================================================

fn legacy_codec() -> Codec {
    Codec::new(ResponseFormat::Legacy, TagScheme::Canonical, FrameLimits::default())
}

#[test]
fn test_legacy_response() {
    let mut frame = 2u32.to_be_bytes().to_vec();
    frame.extend_from_slice(b"hi");

    let response = legacy_codec().read_response(&mut Cursor::new(frame)).unwrap();
    assert_eq!(response.status, Status::OK);
    assert_eq!(response.body, Some(b"hi".to_vec()));
}

#[test]
fn test_legacy_empty_body() {
    let encoded = legacy_codec()
        .encode_response(&Response::status_only(Status(4)).unwrap())
        .unwrap();
    assert_eq!(&encoded[..], &[0, 0, 0, 0]);

    let response = legacy_codec().read_response(&mut Cursor::new(encoded)).unwrap();
    assert_eq!(response.body, Some(Vec::new()));
}

#[test]
fn test_legacy_over_cap() {
    let frame = (MAX_RESPONSE_SIZE + 1).to_be_bytes().to_vec();
    let result = legacy_codec().read_response(&mut Cursor::new(frame));
    assert!(matches!(
        result,
        Err(KvError::Protocol(ProtocolError::OversizedResponse { .. }))
    ));
}
