//! Payload encoding for AuFS payment transfers.
//!
//! A transfer-with-instruction carries an opaque byte payload. When the
//! receiver is the registry, that payload is a CBOR-encoded
//! [`PurchaseOrder`]:
//!
//! ```text
//! {
//!   "path":          text,       # path to buy access to
//!   "beneficiary":   bytes(20),  # principal receiving the grant
//!   "duration_secs": uint32      # seconds added to the grant
//! }
//! ```
//!
//! Payloads larger than `MAX_PAYLOAD_SIZE` are rejected in both directions.

mod encoding;
mod error;
mod payload;

pub use encoding::{decode_payload, decode_purchase_order, encode_payload, encode_purchase_order};
pub use error::{DecodeError, EncodeError};
pub use payload::PurchaseOrder;
