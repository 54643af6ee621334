use std::{collections::VecDeque, fmt};

use chrono::NaiveDate;

use crate::DecodeError;

/// Half of a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nibble(u8);

impl Nibble {
    /// First nibble of a date token standing for "no date".
    pub const ABSENT_DATE: Self = Self(0x0a);

    pub fn new(value: u8) -> Self {
        Self(value & 0x0f)
    }

    /// Splits a byte into its high and low nibbles, in that order.
    pub fn split(byte: u8) -> [Self; 2] {
        [Self(byte >> 4), Self(byte & 0x0f)]
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Lowercase hexadecimal digit of the nibble.
    pub fn to_char(&self) -> char {
        char::from_digit(self.0 as u32, 16).unwrap_or('0')
    }
}

impl fmt::Display for Nibble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

enum DateToken {
    Absent,
    Present(String),
}

/// Nibbles read from a run of plaintext bytes, consumed front to back.
///
/// Reading past the end is not an error: missing nibbles read as nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NibbleQueue(VecDeque<Nibble>);

impl NibbleQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_byte(&mut self, byte: u8) {
        self.0.extend(Nibble::split(byte));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn read_nibble(&mut self) -> Option<Nibble> {
        self.0.pop_front()
    }

    /// Reads up to `len` nibbles as a string of hexadecimal digits.
    pub fn read_code(&mut self, len: usize) -> String {
        (0..len)
            .filter_map(|_| self.read_nibble())
            .map(|n| n.to_char())
            .collect()
    }

    /// Reads one date token.
    ///
    /// A token is either the single [`Nibble::ABSENT_DATE`] nibble, or eight
    /// digits laid out as `yyyymmdd`.
    pub fn read_date(&mut self) -> Result<Option<NaiveDate>, DecodeError> {
        match self.read_date_token() {
            DateToken::Absent => Ok(None),
            DateToken::Present(token) => NaiveDate::parse_from_str(&token, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| DecodeError::InvalidDate(token)),
        }
    }

    /// Reads `count` consecutive date tokens.
    pub fn read_dates(&mut self, count: usize) -> Result<Vec<Option<NaiveDate>>, DecodeError> {
        (0..count).map(|_| self.read_date()).collect()
    }

    fn read_date_token(&mut self) -> DateToken {
        let first = match self.read_nibble() {
            None | Some(Nibble::ABSENT_DATE) => return DateToken::Absent,
            Some(n) => n,
        };

        let year = format!("{first}{}", self.read_code(3));
        let month = self.read_code(2);
        let day = self.read_code(2);
        DateToken::Present(format!("{year}-{month}-{day}"))
    }
}
