//! MAPI remote operation (ROP) codec.
//!
//! Every ROP structure knows its exact wire layout through the
//! [`RopEncode`] and [`RopDecode`] traits. A [`RopDispatchTable`] decodes a
//! buffer of back-to-back responses by looking up a decoder for each
//! leading RopId byte, and [`rpc_header`] handles the RPC_HEADER_EXT framing
//! around those buffers.
//!
//! # Example
//!
//! ```
//! use oxcrops_rop::{RopDispatchTable, RopResponse};
//!
//! let bytes = [
//!     0xF9, 0x00, 0xE8, 0x03, 0x00, 0x00, 0x02, 0x10, 0x10, 0x00, 0x00, 0x00, 0x20, 0x64,
//!     0x00, 0x00, 0x00, 0x00, 0x00,
//! ];
//! let table = RopDispatchTable::with_default_decoders();
//! match table.decode_one(&bytes).unwrap() {
//!     RopResponse::Backoff(backoff) => assert_eq!(backoff.backoff_rop_data.len(), 2),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

pub mod cli;
mod codec;
mod config;
pub mod dispatch;
mod error;
pub mod property;
mod response;
mod rop_id;
pub mod rops;
pub mod rpc_header;

pub use codec::{RopDecode, RopEncode};
pub use config::{CodecConfig, DEFAULT_MAX_RESPONSE_SIZE};
pub use dispatch::{PartialDecode, RopDecoder, RopDispatchTable};
pub use error::RopError;
pub use response::{RawRopResponse, RopResponse};
pub use rop_id::{is_reserved_rop_id, RopId};
