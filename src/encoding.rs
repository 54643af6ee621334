//! Text encodings in which a barcode payload may be handed to the decoder.
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use serde::{Deserialize, Serialize};

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

const BASE64: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

const BASE64_URL: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

#[derive(Debug, thiserror::Error)]
pub enum InvalidInput {
    #[error("invalid base64 input: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid hex input: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("character {0:?} is outside the latin1 range")]
    NotLatin1(char),
}

/// Encoding of the payload bytes inside the input string.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputEncoding {
    /// Standard base64 alphabet, padding optional, whitespace ignored.
    #[default]
    Base64,

    /// URL-safe base64 alphabet, padding optional, whitespace ignored.
    Base64Url,

    /// Hexadecimal digits, either case.
    Hex,

    /// One byte per character (ISO 8859-1), as produced by most barcode
    /// scanner SDKs when reading binary PDF417 data.
    Latin1,

    /// The UTF-8 bytes of the string itself.
    ///
    /// Payloads are binary, so most of them are not valid UTF-8 and cannot be
    /// written back with [`InputEncoding::encode`] without loss.
    Utf8,
}

impl InputEncoding {
    pub fn decode(&self, input: &str) -> Result<Vec<u8>, InvalidInput> {
        match self {
            Self::Base64 => Ok(BASE64.decode(strip_whitespace(input))?),
            Self::Base64Url => Ok(BASE64_URL.decode(strip_whitespace(input))?),
            Self::Hex => Ok(hex::decode(input.trim())?),
            Self::Latin1 => input
                .chars()
                .map(|c| u8::try_from(c).map_err(|_| InvalidInput::NotLatin1(c)))
                .collect(),
            Self::Utf8 => Ok(input.as_bytes().to_vec()),
        }
    }

    /// Writes `bytes` as text in this encoding.
    ///
    /// Every encoding except [`InputEncoding::Utf8`] is reversed exactly by
    /// [`InputEncoding::decode`]. With `Utf8`, each invalid sequence becomes
    /// U+FFFD, so the text decodes back to different bytes.
    pub fn encode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Base64 => BASE64.encode(bytes),
            Self::Base64Url => BASE64_URL.encode(bytes),
            Self::Hex => hex::encode(bytes),
            Self::Latin1 => bytes.iter().copied().map(char::from).collect(),
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

fn strip_whitespace(input: &str) -> String {
    input.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}
