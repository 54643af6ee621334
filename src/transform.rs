//! Block transform between a barcode payload and its 720 byte plaintext.
use std::{fmt, ops::Deref};

use log::{debug, trace};
use rsa::BigUint;

use crate::{
    keys::{FormatVersion, KeyRing, KeySet},
    DecodeError,
};

/// Size of an encoded payload, version tag and separator included.
pub const PAYLOAD_SIZE: usize = 720;

/// Size of the decrypted licence data.
pub const PLAINTEXT_SIZE: usize = 720;

const TAG_SIZE: usize = 4;

const HEADER_SIZE: usize = TAG_SIZE + 1;

const BLOCK_COUNT: usize = 6;

const FIRST_BLOCK_SIZE: usize = 129;

const BLOCK_SIZE: usize = 128;

const SMALL_BLOCK_OUTPUT_SIZE: usize = 74;

/// Plaintext bytes that [`decrypt`] leaves untouched at the end of the buffer.
const TAIL_START: usize = (BLOCK_COUNT - 1) * BLOCK_SIZE + SMALL_BLOCK_OUTPUT_SIZE;

fn nominal_block_size(index: usize) -> usize {
    if index == 0 {
        FIRST_BLOCK_SIZE
    } else {
        BLOCK_SIZE
    }
}

/// Decrypted licence data.
#[derive(Clone, PartialEq, Eq)]
pub struct Plaintext([u8; PLAINTEXT_SIZE]);

impl Plaintext {
    pub fn new(bytes: [u8; PLAINTEXT_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        let bytes = bytes
            .try_into()
            .map_err(|_| DecodeError::InvalidInputLength {
                expected: PLAINTEXT_SIZE,
                found: bytes.len(),
            })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; PLAINTEXT_SIZE] {
        &self.0
    }

    pub fn into_bytes(self) -> [u8; PLAINTEXT_SIZE] {
        self.0
    }
}

impl Deref for Plaintext {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for Plaintext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Plaintext({})", hex::encode(self.0))
    }
}

/// Reverses the block transform of a barcode payload.
///
/// The payload is a 4 byte version tag, one ignored separator byte and six
/// ciphertext blocks: one of 129 bytes, four of 128 bytes and a final short
/// block. Blocks of at least 128 bytes go through the large key of the
/// selected version and keep their size. The short block goes through the
/// small key and yields 74 bytes.
///
/// Block `i` is written at `i` times its nominal size, so the last byte of
/// the first block is overwritten by the second one.
pub fn decrypt(payload: &[u8], keys: &KeyRing) -> Result<Plaintext, DecodeError> {
    if payload.len() != PAYLOAD_SIZE {
        return Err(DecodeError::InvalidInputLength {
            expected: PAYLOAD_SIZE,
            found: payload.len(),
        });
    }

    let (version, key_set) = keys.select(&payload[..TAG_SIZE])?;
    debug!("decrypting {version} licence payload");

    let mut buffer = [0u8; PLAINTEXT_SIZE];
    let mut ciphertext = &payload[HEADER_SIZE..];

    for i in 0..BLOCK_COUNT {
        let end = nominal_block_size(i);
        let (block, rest) = ciphertext.split_at(end.min(ciphertext.len()));
        ciphertext = rest;

        let (key, size) = if block.len() >= BLOCK_SIZE {
            (&key_set.large, block.len())
        } else {
            (&key_set.small, SMALL_BLOCK_OUTPUT_SIZE)
        };

        let output = key
            .apply(block, size)
            .ok_or(DecodeError::MalformedCiphertext { block: i })?;

        let offset = i * end;
        trace!(
            "block {i}: {} ciphertext bytes, {size} plaintext bytes at offset {offset}",
            block.len()
        );

        buffer
            .get_mut(offset..offset + output.len())
            .ok_or(DecodeError::MalformedCiphertext { block: i })?
            .copy_from_slice(&output);
    }

    Ok(Plaintext(buffer))
}

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("the first plaintext byte must be zero")]
    NonZeroLead,

    #[error("plaintext bytes past offset 714 must be zero")]
    NonZeroTail,

    #[error("block {0} is not below its key modulus")]
    BlockOutOfRange(usize),
}

/// Builds the payload that [`decrypt`] maps back to `plaintext`.
///
/// `keys` must hold the private exponents matching the public keys used
/// for decoding. Only plaintexts whose first byte and last six bytes are
/// zero can be represented, since [`decrypt`] never writes anything else
/// there.
pub fn encrypt(
    plaintext: &Plaintext,
    version: FormatVersion,
    keys: &KeySet,
) -> Result<Vec<u8>, EncodeError> {
    let bytes = plaintext.as_bytes();

    if bytes[0] != 0 {
        return Err(EncodeError::NonZeroLead);
    }

    if bytes[TAIL_START..].iter().any(|b| *b != 0) {
        return Err(EncodeError::NonZeroTail);
    }

    let mut payload = Vec::with_capacity(PAYLOAD_SIZE);
    payload.extend(version.tag());
    payload.push(0);

    for i in 0..BLOCK_COUNT {
        let (key, data, size) = if i == 0 {
            // The leading zero byte is implied by padding to 129 bytes.
            (&keys.large, &bytes[1..=BLOCK_SIZE], FIRST_BLOCK_SIZE)
        } else if i < BLOCK_COUNT - 1 {
            let offset = i * BLOCK_SIZE;
            (&keys.large, &bytes[offset..offset + BLOCK_SIZE], BLOCK_SIZE)
        } else {
            let offset = i * BLOCK_SIZE;
            (
                &keys.small,
                &bytes[offset..TAIL_START],
                SMALL_BLOCK_OUTPUT_SIZE,
            )
        };

        if BigUint::from_bytes_be(data) >= key.modulus {
            return Err(EncodeError::BlockOutOfRange(i));
        }

        let block = key.apply(data, size).ok_or(EncodeError::BlockOutOfRange(i))?;
        payload.extend(block);
    }

    Ok(payload)
}
