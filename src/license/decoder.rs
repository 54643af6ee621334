use log::debug;

use super::NibbleQueue;
use crate::{transform::Plaintext, DecodeError};

/// Byte preceding the licence fields.
const FIELD_START_MARKER: u8 = 0x82;

/// Plain field terminator.
pub const FIELD_DELIMITER: u8 = 0xe0;

/// Field terminator that, inside a list, also stands for the next slot.
pub const COMPRESSING_DELIMITER: u8 = 0xe1;

/// Byte ending the nibble encoded section.
pub const NIBBLE_SECTION_END: u8 = 0x57;

/// Cursor over the licence fields of a plaintext.
pub struct FieldDecoder<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> FieldDecoder<'a> {
    /// Positions the cursor right after the first field start marker.
    pub fn new(plaintext: &'a Plaintext) -> Result<Self, DecodeError> {
        Self::from_bytes(plaintext)
    }

    pub(crate) fn from_bytes(data: &'a [u8]) -> Result<Self, DecodeError> {
        let marker = data
            .iter()
            .position(|b| *b == FIELD_START_MARKER)
            .ok_or(DecodeError::MalformedPlaintext)?;

        debug!("licence fields start at offset {}", marker + 1);

        Ok(Self {
            data,
            offset: marker + 1,
        })
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
        let b = *self
            .data
            .get(self.offset)
            .ok_or(DecodeError::UnexpectedEndOfData {
                offset: self.offset,
            })?;
        self.offset += 1;
        Ok(b)
    }

    pub fn skip(&mut self, count: usize) -> Result<(), DecodeError> {
        for _ in 0..count {
            self.read_byte()?;
        }

        Ok(())
    }

    /// Reads one byte as a latin1 character.
    pub fn read_character(&mut self) -> Result<char, DecodeError> {
        self.read_byte().map(char::from)
    }

    /// Reads exactly `len` characters, delimiters included.
    pub fn read_fixed(&mut self, len: usize) -> Result<String, DecodeError> {
        (0..len).map(|_| self.read_character()).collect()
    }

    /// Reads characters up to the next delimiter, which is dropped.
    pub fn read_string(&mut self) -> Result<String, DecodeError> {
        self.read_delimited().map(|(value, _)| value)
    }

    /// Reads a list field of `slots` entries.
    ///
    /// The first [`COMPRESSING_DELIMITER`] met by the call also consumes the
    /// following slot. Later ones act as plain delimiters. Empty entries are
    /// left out, so the result may hold fewer than `slots` strings.
    pub fn read_string_list(&mut self, slots: usize) -> Result<Vec<String>, DecodeError> {
        let mut values = Vec::new();
        let mut compressed = false;
        let mut slot = 0;

        while slot < slots {
            let (value, delimiter) = self.read_delimited()?;

            if delimiter == COMPRESSING_DELIMITER && !compressed {
                compressed = true;
                slot += 1;
            }

            if !value.is_empty() {
                values.push(value);
            }

            slot += 1;
        }

        Ok(values)
    }

    /// Splits bytes into nibbles until `until` is read.
    pub fn read_nibbles(&mut self, until: u8) -> Result<NibbleQueue, DecodeError> {
        let mut queue = NibbleQueue::new();

        loop {
            match self.read_byte()? {
                b if b == until => break Ok(queue),
                b => queue.push_byte(b),
            }
        }
    }

    fn read_delimited(&mut self) -> Result<(String, u8), DecodeError> {
        let mut value = String::new();

        loop {
            match self.read_byte()? {
                d @ (FIELD_DELIMITER | COMPRESSING_DELIMITER) => break Ok((value, d)),
                b => value.push(char::from(b)),
            }
        }
    }
}
