//! Key material of the two known licence format versions.
use std::{collections::HashMap, fmt};

use lazy_static::lazy_static;
use rsa::{pkcs1::DecodeRsaPublicKey, traits::PublicKeyParts, BigUint, RsaPublicKey};

use crate::DecodeError;

/// Tag opening a version 1 payload.
pub const VERSION_1_TAG: [u8; 4] = [0x01, 0xe1, 0x02, 0x45];

/// Tag opening a version 2 payload.
pub const VERSION_2_TAG: [u8; 4] = [0x01, 0x9b, 0x09, 0x45];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormatVersion {
    V1,
    V2,
}

impl FormatVersion {
    pub const LIST: [Self; 2] = [Self::V1, Self::V2];

    pub fn from_tag(tag: &[u8]) -> Option<Self> {
        let tag: [u8; 4] = tag.try_into().ok()?;
        VERSIONS_BY_TAG.get(&tag).copied()
    }

    pub fn tag(&self) -> [u8; 4] {
        match self {
            Self::V1 => VERSION_1_TAG,
            Self::V2 => VERSION_2_TAG,
        }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => f.write_str("version 1"),
            Self::V2 => f.write_str("version 2"),
        }
    }
}

lazy_static! {
    static ref VERSIONS_BY_TAG: HashMap<[u8; 4], FormatVersion> = {
        let mut map = HashMap::new();

        for v in FormatVersion::LIST {
            map.insert(v.tag(), v);
        }

        map
    };
}

#[derive(Debug, thiserror::Error)]
#[error("invalid key: {0}")]
pub struct InvalidKey(#[from] rsa::pkcs1::Error);

/// Exponent and modulus of one block key.
///
/// Decoding uses the published (public) exponent. Fixture generation uses the
/// same type with a private exponent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub exponent: BigUint,
    pub modulus: BigUint,
}

impl KeyPair {
    pub fn new(exponent: BigUint, modulus: BigUint) -> Self {
        Self { exponent, modulus }
    }

    pub fn from_be_bytes(exponent: &[u8], modulus: &[u8]) -> Self {
        Self::new(
            BigUint::from_bytes_be(exponent),
            BigUint::from_bytes_be(modulus),
        )
    }

    /// Reads a PKCS#1 `RSA PUBLIC KEY` PEM document.
    pub fn from_pkcs1_pem(pem: &str) -> Result<Self, InvalidKey> {
        let key = RsaPublicKey::from_pkcs1_pem(pem)?;
        Ok(Self::from(&key))
    }

    /// Raises the big-endian integer `block` to the exponent and returns the
    /// big-endian result left-padded with zeros to `size` bytes.
    ///
    /// Returns `None` if the modulus is zero or if the result does not fit in
    /// `size` bytes.
    pub fn apply(&self, block: &[u8], size: usize) -> Option<Vec<u8>> {
        if self.modulus.bits() == 0 {
            return None;
        }

        let value = BigUint::from_bytes_be(block).modpow(&self.exponent, &self.modulus);
        let bytes = value.to_bytes_be();
        let bytes = strip_leading_zeros(&bytes);

        if bytes.len() > size {
            return None;
        }

        let mut result = vec![0u8; size];
        result[size - bytes.len()..].copy_from_slice(bytes);
        Some(result)
    }
}

impl From<&RsaPublicKey> for KeyPair {
    fn from(value: &RsaPublicKey) -> Self {
        Self::new(value.e().clone(), value.n().clone())
    }
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

/// Keys of one format version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySet {
    /// Key of the 128 and 129 byte blocks.
    pub large: KeyPair,

    /// Key of the short final block.
    pub small: KeyPair,
}

impl KeySet {
    pub fn new(large: KeyPair, small: KeyPair) -> Self {
        Self { large, small }
    }

    pub fn from_pkcs1_pem(large: &str, small: &str) -> Result<Self, InvalidKey> {
        Ok(Self::new(
            KeyPair::from_pkcs1_pem(large)?,
            KeyPair::from_pkcs1_pem(small)?,
        ))
    }
}

/// Key sets of both format versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRing {
    v1: KeySet,
    v2: KeySet,
}

impl KeyRing {
    pub fn new(v1: KeySet, v2: KeySet) -> Self {
        Self { v1, v2 }
    }

    pub fn get(&self, version: FormatVersion) -> &KeySet {
        match version {
            FormatVersion::V1 => &self.v1,
            FormatVersion::V2 => &self.v2,
        }
    }

    /// Selects the key set matching a payload's version tag.
    pub fn select(&self, tag: &[u8]) -> Result<(FormatVersion, &KeySet), DecodeError> {
        match FormatVersion::from_tag(tag) {
            Some(version) => Ok((version, self.get(version))),
            None => {
                let mut unknown = [0u8; 4];
                let len = tag.len().min(4);
                unknown[..len].copy_from_slice(&tag[..len]);
                Err(DecodeError::UnsupportedVersion(unknown))
            }
        }
    }
}
