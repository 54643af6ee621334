use sadl::{decode, InputEncoding, KeyRing, KeySet};

/// Barcode payload as returned by a scanner SDK, base64 encoded.
const PAYLOAD: &str = include_str!("../tests/fixtures/v1.b64");

fn main() {
    // First we load the public keys of both format versions.
    let keys = KeyRing::new(
        KeySet::from_pkcs1_pem(
            include_str!("../tests/fixtures/v1_large.pem"),
            include_str!("../tests/fixtures/v1_small.pem"),
        )
        .unwrap(),
        KeySet::from_pkcs1_pem(
            include_str!("../tests/fixtures/v2_large.pem"),
            include_str!("../tests/fixtures/v2_small.pem"),
        )
        .unwrap(),
    );

    // Then we decode the payload. The version tag picks the key set.
    let license = decode(PAYLOAD, InputEncoding::Base64, &keys).unwrap();

    // Finally we print the record.
    println!("{}", serde_json::to_string_pretty(&license).unwrap());
    eprintln!("gender: {:?}", license.gender());
}
