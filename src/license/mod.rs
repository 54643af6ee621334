//! South African driving licence record.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{transform::Plaintext, DecodeError};

mod decoder;
pub use decoder::*;
mod nibble;
pub use nibble::*;

const LIST_SLOTS: usize = 4;

const IDENTITY_NUMBER_LEN: usize = 13;

/// Licence data read from a barcode.
///
/// Codes are kept as read. [`DriversLicense::gender`],
/// [`DriversLicense::identity_number_kind`] and
/// [`DriversLicense::driver_restrictions`] interpret them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriversLicense {
    pub surname: String,

    pub initials: String,

    /// Identity number, always 13 characters.
    pub identity_number: String,

    /// Two digit identity number type, `02` for South African numbers.
    pub identity_number_type: String,

    pub identity_country_of_issue: String,

    pub license_country_of_issue: String,

    pub license_number: String,

    /// Up to 4 licence codes.
    pub license_codes: Vec<String>,

    /// Issue date of each licence code slot.
    pub license_code_issue_dates: Vec<Option<NaiveDate>>,

    /// Up to 4 vehicle restrictions.
    pub vehicle_restrictions: Vec<String>,

    /// One digit per restriction, `00` when there is none.
    pub driver_restriction_codes: String,

    pub professional_driving_permit_expiry_date: Option<NaiveDate>,

    pub license_issue_number: String,

    pub date_of_birth: Option<NaiveDate>,

    pub license_issue_date: Option<NaiveDate>,

    pub license_expiry_date: Option<NaiveDate>,

    /// Two digit gender code, `01` male and `02` female.
    pub gender: String,

    pub image: ImageDimensions,
}

/// Dimensions of the photo embedded after the licence fields.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u8,
    pub height: u8,
}

impl DriversLicense {
    /// Reads the licence fields of a decrypted barcode.
    ///
    /// Dates are all or nothing: a single present date token that is not a
    /// valid calendar date (a month of 13, say) fails the whole record with
    /// [`DecodeError::InvalidDate`], even if every other field is readable.
    /// Absent dates decode to `None`.
    pub fn decode(plaintext: &Plaintext) -> Result<Self, DecodeError> {
        let mut decoder = FieldDecoder::new(plaintext)?;

        decoder.skip(1)?;

        let license_codes = decoder.read_string_list(LIST_SLOTS)?;
        let surname = decoder.read_string()?;
        let initials = decoder.read_string()?;
        let identity_country_of_issue = decoder.read_string()?;
        let license_country_of_issue = decoder.read_string()?;
        let vehicle_restrictions = decoder.read_string_list(LIST_SLOTS)?;
        let license_number = decoder.read_string()?;
        let identity_number = decoder.read_fixed(IDENTITY_NUMBER_LEN)?;
        let identity_number_type = format!("{:02}", decoder.read_byte()?);

        let mut nibbles = decoder.read_nibbles(NIBBLE_SECTION_END)?;
        let license_code_issue_dates = nibbles.read_dates(LIST_SLOTS)?;
        let driver_restriction_codes = nibbles.read_code(2);
        let professional_driving_permit_expiry_date = nibbles.read_date()?;
        let license_issue_number = nibbles.read_code(2);
        let date_of_birth = nibbles.read_date()?;
        let license_issue_date = nibbles.read_date()?;
        let license_expiry_date = nibbles.read_date()?;
        let gender = nibbles.read_code(2);

        decoder.skip(3)?;
        let width = decoder.read_byte()?;
        decoder.skip(1)?;
        let height = decoder.read_byte()?;

        Ok(Self {
            surname,
            initials,
            identity_number,
            identity_number_type,
            identity_country_of_issue,
            license_country_of_issue,
            license_number,
            license_codes,
            license_code_issue_dates,
            vehicle_restrictions,
            driver_restriction_codes,
            professional_driving_permit_expiry_date,
            license_issue_number,
            date_of_birth,
            license_issue_date,
            license_expiry_date,
            gender,
            image: ImageDimensions { width, height },
        })
    }

    pub fn gender(&self) -> Gender {
        Gender::from_code(&self.gender)
    }

    pub fn identity_number_kind(&self) -> IdentityNumberKind {
        IdentityNumberKind::from_code(&self.identity_number_type)
    }

    /// Restrictions listed in [`Self::driver_restriction_codes`], without the
    /// `0` placeholders.
    pub fn driver_restrictions(&self) -> Vec<DriverRestriction> {
        self.driver_restriction_codes
            .chars()
            .map(DriverRestriction::from_digit)
            .filter(|r| *r != DriverRestriction::None)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    pub fn from_code(code: &str) -> Self {
        match code {
            "01" => Self::Male,
            "02" => Self::Female,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdentityNumberKind {
    SouthAfrican,
    Other,
}

impl IdentityNumberKind {
    pub fn from_code(code: &str) -> Self {
        match code {
            "02" => Self::SouthAfrican,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DriverRestriction {
    None,
    Glasses,
    ArtificialLimb,
    Unknown(char),
}

impl DriverRestriction {
    pub fn from_digit(digit: char) -> Self {
        match digit {
            '0' => Self::None,
            '1' => Self::Glasses,
            '2' => Self::ArtificialLimb,
            c => Self::Unknown(c),
        }
    }
}
