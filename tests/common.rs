#![allow(dead_code)]
use std::{fs, path::Path};

use lazy_static::lazy_static;
use rsa::BigUint;
use sadl::{
    license::NIBBLE_SECTION_END, DriversLicense, ImageDimensions, KeyPair, KeyRing, KeySet,
    NaiveDate, Plaintext,
};

// Test keys. The real ones are published by the issuing authority, which keeps
// the private exponents; these were generated for the fixtures.

const PUBLIC_EXPONENT: u32 = 65537;

const V1_LARGE_MODULUS: &str = "c50c2db63a3a5231f5228410b561ea0fe01666ba9f758a9b1d0e35ff9ae1fddd1f1515fe3bb9177415e7a48855087882df89c39b514b1393e40c61ec1ddb385927467f058298d504426b35aabceb716e2af3b21f9d886701cddc11b29243fb03a13456cd2ac7a30dc3b3280eae9fc3bb42c95af3f7f7e4cd14f920deaa521f9f";

const V1_LARGE_PRIVATE_EXPONENT: &str = "b5ae36ef8fdc7a30c9be9b59f4836516621d057708d38d8adb4d61085dbc051fbe2ae8ee520ea4cb49ef1ccafeec228138ae83064ffc12ff07034bbe33010f7fb4576dc9f682dae8253d5d000c6c41a35bbcb052c850e8f5635758834c4c636de21c4292ca8fbc75cc0120a90dab436e509eacae03de3e285a683120e6beca41";

const V1_SMALL_MODULUS: &str = "b9ba0a6903fc2d0e99bc66be32f64bb09a31869551ea97d718bcca28b8b43dc7da1bb1dc45008732d6c307bfbd1b531632f3efae9b64c6cdfe3fb593101129050818bd8411cdcca7239f";

const V1_SMALL_PRIVATE_EXPONENT: &str = "9cf09329683fa88744eb89da40d014e7777450284f5f2fcd87cec7f91f12d77dd05544b73e79ed67a2d8757a5d941075e55aa02a1a50034533d608b097ee5843763a7abec21acefe0ff1";

const V2_LARGE_MODULUS: &str = "f3a34da7ad58135c0a597985a916006a03364cccc240bb922624811bbef4d4dd4d8b9028181c91740c862d1f3842127938e9900414cd555e840eb5a38165b12f49f528aa8cbbcda422ea60044328088393b4bf17e5af6ddc4f2fd437edf84905351abf78723cdac1a92def7525b2f420495c246472e7305f0be511cef2d8744f";

const V2_LARGE_PRIVATE_EXPONENT: &str = "bbd37d9e73089f84298669251e0194382659ca4360ce3ecca1132b659485734558eeeb27bdcee863aaf415fd2785e87003ec2bd6b9a2c2d9a6bd2052f902c8e0c6f35633a0996ff0791703072775358c751c93874a3933a2732147187a5dd5b2dd028f1637479e350aa9b908765c38d1a84f73cfcb4d6e61b85765eb7fe5cec1";

const V2_SMALL_MODULUS: &str = "97d1d68cd78e91d6256065b129bff409bb04b74222e8400e04d2acf37595ed6348ca26e99a73fa98940239367c23d0747a065c1feda4968f8bc1a1c961fe717808e9d5ee393a0484c689";

const V2_SMALL_PRIVATE_EXPONENT: &str = "349b4481d72b92c3267e699e62fe1d9cc58e13c639fc4a3dd1540313f579b7214116b3371c82557a09269f5f1d12bf9b54dcb82611606a42d227a8ef67b4dfbaf9c16668c54d856b2a15";

fn key_pair(exponent: BigUint, modulus: &str) -> KeyPair {
    KeyPair::new(exponent, BigUint::from_bytes_be(&hex::decode(modulus).unwrap()))
}

fn public_set(large: &str, small: &str) -> KeySet {
    KeySet::new(
        key_pair(BigUint::from(PUBLIC_EXPONENT), large),
        key_pair(BigUint::from(PUBLIC_EXPONENT), small),
    )
}

fn private_set(large: (&str, &str), small: (&str, &str)) -> KeySet {
    KeySet::new(
        key_pair(BigUint::from_bytes_be(&hex::decode(large.1).unwrap()), large.0),
        key_pair(BigUint::from_bytes_be(&hex::decode(small.1).unwrap()), small.0),
    )
}

lazy_static! {
    pub static ref KEY_RING: KeyRing = KeyRing::new(
        public_set(V1_LARGE_MODULUS, V1_SMALL_MODULUS),
        public_set(V2_LARGE_MODULUS, V2_SMALL_MODULUS),
    );
    pub static ref V1_PRIVATE_KEYS: KeySet = private_set(
        (V1_LARGE_MODULUS, V1_LARGE_PRIVATE_EXPONENT),
        (V1_SMALL_MODULUS, V1_SMALL_PRIVATE_EXPONENT),
    );
    pub static ref V2_PRIVATE_KEYS: KeySet = private_set(
        (V2_LARGE_MODULUS, V2_LARGE_PRIVATE_EXPONENT),
        (V2_SMALL_MODULUS, V2_SMALL_PRIVATE_EXPONENT),
    );
}

pub fn load_fixture(path: impl AsRef<Path>) -> String {
    fs::read_to_string(Path::new("tests/fixtures").join(path)).unwrap()
}

/// Lays out licence fields the way they appear in a decrypted barcode.
pub struct PlaintextBuilder {
    bytes: Vec<u8>,
}

impl PlaintextBuilder {
    /// Starts with the zero lead byte, the field start marker and the byte
    /// following it.
    pub fn new() -> Self {
        Self {
            bytes: vec![0x00, 0x00, 0x82, 0x5a],
        }
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Latin1 string followed by the plain delimiter.
    pub fn string(mut self, value: &str) -> Self {
        self.bytes.extend(value.chars().map(|c| u8::try_from(c).unwrap()));
        self.bytes.push(0xe0);
        self
    }

    /// Hexadecimal digits packed two per byte, followed by the section end.
    pub fn nibbles(mut self, digits: &str) -> Self {
        let mut values: Vec<u8> = digits
            .chars()
            .map(|c| c.to_digit(16).unwrap() as u8)
            .collect();
        if values.len() % 2 == 1 {
            values.push(0);
        }

        for pair in values.chunks(2) {
            let b = pair[0] << 4 | pair[1];
            assert_ne!(b, NIBBLE_SECTION_END);
            self.bytes.push(b);
        }

        self.bytes.push(NIBBLE_SECTION_END);
        self
    }

    pub fn build(self) -> Plaintext {
        let mut bytes = [0u8; 720];
        bytes[..self.bytes.len()].copy_from_slice(&self.bytes);
        Plaintext::new(bytes)
    }
}

/// Plaintext encoded in the `tests/fixtures` payloads.
pub fn sample_plaintext() -> Plaintext {
    PlaintextBuilder::new()
        .string("EB")
        .raw(b"A1\xe0\xe1")
        .string("SMITH")
        .string("JD")
        .string("ZA")
        .string("ZA")
        .raw(b"1\xe0\xe1\xe0")
        .string("40140004RKXM")
        .raw(b"8507215800088")
        .raw(&[0x02])
        .nibbles(concat!(
            "20050315", "20101102", "a", "a", // licence code issue dates
            "00",       // driver restrictions
            "a",        // professional driving permit expiry
            "02",       // licence issue number
            "19850721", // birth
            "20190110", // issue
            "20240109", // expiry
            "01",       // gender
        ))
        .raw(&[0x01, 0x02, 0x03, 250, 0x00, 200])
        .build()
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

pub fn sample_license() -> DriversLicense {
    DriversLicense {
        surname: "SMITH".to_owned(),
        initials: "JD".to_owned(),
        identity_number: "8507215800088".to_owned(),
        identity_number_type: "02".to_owned(),
        identity_country_of_issue: "ZA".to_owned(),
        license_country_of_issue: "ZA".to_owned(),
        license_number: "40140004RKXM".to_owned(),
        license_codes: vec!["EB".to_owned(), "A1".to_owned()],
        license_code_issue_dates: vec![date(2005, 3, 15), date(2010, 11, 2), None, None],
        vehicle_restrictions: vec!["1".to_owned()],
        driver_restriction_codes: "00".to_owned(),
        professional_driving_permit_expiry_date: None,
        license_issue_number: "02".to_owned(),
        date_of_birth: date(1985, 7, 21),
        license_issue_date: date(2019, 1, 10),
        license_expiry_date: date(2024, 1, 9),
        gender: "01".to_owned(),
        image: ImageDimensions {
            width: 250,
            height: 200,
        },
    }
}
