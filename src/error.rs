use crate::encoding::InvalidInput;

/// Error returned when a licence barcode cannot be decoded.
///
/// Every variant aborts the whole decoding: no partially populated record is
/// ever returned.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    InvalidEncoding(#[from] InvalidInput),

    #[error("invalid input length: expected {expected} bytes, found {found}")]
    InvalidInputLength { expected: usize, found: usize },

    #[error("unsupported licence version {0:02x?}")]
    UnsupportedVersion([u8; 4]),

    #[error("malformed ciphertext in block {block}")]
    MalformedCiphertext { block: usize },

    #[error("malformed plaintext: field start marker not found")]
    MalformedPlaintext,

    #[error("unexpected end of data at offset {offset}")]
    UnexpectedEndOfData { offset: usize },

    #[error("invalid date `{0}`")]
    InvalidDate(String),
}
