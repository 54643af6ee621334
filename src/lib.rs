//! This library decodes the PDF417 barcode printed on South African driving
//! licence cards.
//!
//! The barcode carries 720 bytes: a format version tag followed by blocks
//! transformed with the public keys of that version. Decoding reverses the
//! transform ([`transform::decrypt`]) and reads the licence fields from the
//! resulting plaintext ([`DriversLicense::decode`]).
//!
//! The keys are published by the issuing authority and must be provided by
//! the caller through a [`KeyRing`].
use log::debug;

pub mod encoding;
mod error;
pub mod keys;
pub mod license;
pub mod transform;

pub use chrono::NaiveDate;
pub use encoding::InputEncoding;
pub use error::DecodeError;
pub use keys::{FormatVersion, KeyPair, KeyRing, KeySet};
pub use license::{DriversLicense, ImageDimensions};
pub use transform::Plaintext;

/// Decodes a barcode payload given as text.
pub fn decode(
    input: &str,
    encoding: InputEncoding,
    keys: &KeyRing,
) -> Result<DriversLicense, DecodeError> {
    let payload = encoding.decode(input)?;
    debug!("decoded {} payload bytes from {encoding:?} input", payload.len());
    decode_bytes(&payload, keys)
}

/// Decodes raw barcode payload bytes.
pub fn decode_bytes(payload: &[u8], keys: &KeyRing) -> Result<DriversLicense, DecodeError> {
    let plaintext = transform::decrypt(payload, keys)?;
    DriversLicense::decode(&plaintext)
}
