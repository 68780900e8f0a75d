use std::sync::Arc;

use oxcrops_rop::dispatch::decode_as;
use oxcrops_rop::rops::{
    BackoffRop, RopBackoffResponse, RopBufferTooSmallResponse, RopGetPermissionsTableResponse,
    RopModifyPermissionsResponse,
};
use oxcrops_rop::{
    RawRopResponse, RopDecode, RopDispatchTable, RopEncode, RopError, RopId, RopResponse,
};

const BACKOFF_WIRE: [u8; 19] = [
    0xF9, 0x00, 0xE8, 0x03, 0x00, 0x00, 0x02, 0x10, 0x10, 0x00, 0x00, 0x00, 0x20, 0x64, 0x00,
    0x00, 0x00, 0x00, 0x00,
];

// ---------------------------------------------------------------------------
// Single record
// ---------------------------------------------------------------------------

#[test]
fn backoff_end_to_end() {
    let table = RopDispatchTable::with_default_decoders();
    let rop = table.decode_one(&BACKOFF_WIRE).unwrap();
    let RopResponse::Backoff(backoff) = &rop else {
        panic!("expected backoff, got {rop:?}");
    };
    assert_eq!(backoff.rop_id, 0xF9);
    assert_eq!(backoff.logon_id, 0);
    assert_eq!(backoff.duration, 1000);
    assert_eq!(backoff.backoff_rop_count, 2);
    assert_eq!(
        backoff.backoff_rop_data,
        [
            BackoffRop {
                rop_id_backoff: 0x10,
                duration: 16
            },
            BackoffRop {
                rop_id_backoff: 0x20,
                duration: 100
            },
        ]
    );
    assert_eq!(backoff.additional_data_size, 0);
    assert_eq!(rop.size(), BACKOFF_WIRE.len());
    assert_eq!(rop.serialize().unwrap(), BACKOFF_WIRE);
}

#[test]
fn decode_one_ignores_following_records() {
    let table = RopDispatchTable::with_default_decoders();
    let mut bytes = BACKOFF_WIRE.to_vec();
    bytes.extend([0x40, 0x00, 0x00, 0x00, 0x00, 0x00]);
    assert_eq!(table.decode_one(&bytes).unwrap().rop_id(), RopId::Backoff as u8);
}

// ---------------------------------------------------------------------------
// Streams
// ---------------------------------------------------------------------------

#[test]
fn stream_preserves_order() {
    let r1 = RopResponse::from(RopModifyPermissionsResponse {
        input_handle_index: 1,
        return_value: 0,
        ..Default::default()
    });
    let r2 = RopResponse::from(RopBackoffResponse::new(0, 5, Vec::new(), vec![0xAB]).unwrap());
    let r3 = RopResponse::from(RopGetPermissionsTableResponse {
        output_handle_index: 2,
        return_value: 0x8004_0102,
        ..Default::default()
    });

    let mut bytes = Vec::new();
    for rop in [&r1, &r2, &r3] {
        bytes.extend(rop.serialize().unwrap());
    }

    let table = RopDispatchTable::with_default_decoders();
    assert_eq!(table.decode_all(&bytes).unwrap(), vec![r1, r2, r3]);
}

#[test]
fn buffer_too_small_is_terminal() {
    let table = RopDispatchTable::with_default_decoders();
    let mut bytes = vec![0x40, 0x00, 0x00, 0x00, 0x00, 0x00];
    // The echoed request bytes look like further responses but are not decoded.
    bytes.extend([0xFF, 0x00, 0x20, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00]);
    let records = table.decode_all(&bytes).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(
        records[1],
        RopResponse::BufferTooSmall(RopBufferTooSmallResponse {
            rop_id: 0xFF,
            size_needed: 0x2000,
            request_buffers: vec![0x40, 0x00, 0x00, 0x00, 0x00, 0x00],
        })
    );
}

#[test]
fn buffer_too_small_consumes_remaining_length() {
    for start in 0..4usize {
        for tail in 0..8usize {
            let mut bytes = vec![0xEE; start];
            bytes.extend([0xFF, 0x10, 0x00]);
            bytes.extend(std::iter::repeat(0x5A).take(tail));
            let (_, consumed) = RopBufferTooSmallResponse::deserialize(&bytes, start).unwrap();
            assert_eq!(consumed, bytes.len() - start);
        }
    }
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn unknown_opcode_fails_without_changing_table() {
    let table = RopDispatchTable::with_default_decoders();
    let before = table.len();
    let mut bytes = BACKOFF_WIRE.to_vec();
    bytes.push(0x02);
    assert_eq!(
        table.decode_all(&bytes),
        Err(RopError::UnknownOpcode {
            opcode: 0x02,
            offset: BACKOFF_WIRE.len()
        })
    );
    assert_eq!(table.len(), before);
    assert!(!table.is_registered(0x02));

    let partial = table.decode_partial(&bytes);
    assert_eq!(partial.records.len(), 1);
    assert_eq!(partial.consumed, BACKOFF_WIRE.len());
}

#[test]
fn truncated_record_fails() {
    let table = RopDispatchTable::with_default_decoders();
    for len in 1..BACKOFF_WIRE.len() {
        assert!(
            matches!(
                table.decode_all(&BACKOFF_WIRE[..len]),
                Err(RopError::OutOfBounds { .. })
            ),
            "prefix of {len} bytes"
        );
    }
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[test]
fn custom_registration() {
    let mut table = RopDispatchTable::new();
    assert!(table.is_empty());
    table.register(0x7C, decode_as::<RawRopResponse>);
    let records = table.decode_all(&[0x7C, 0x01, 0x02]).unwrap();
    assert_eq!(
        records,
        vec![RopResponse::Raw(RawRopResponse {
            rop_id: 0x7C,
            data: vec![0x01, 0x02],
        })]
    );
}

#[test]
fn shared_table_decodes_fresh_records() {
    let table = Arc::new(RopDispatchTable::with_default_decoders());
    let first = table.decode_one(&BACKOFF_WIRE).unwrap();
    let mut other = BACKOFF_WIRE;
    other[2] = 0x01;
    let second = table.decode_one(&other).unwrap();
    assert_ne!(first, second);
    assert_eq!(first, table.decode_one(&BACKOFF_WIRE).unwrap());
}
