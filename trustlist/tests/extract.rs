//! Tests for PEM extraction and certificate metadata parsing against a real certificate pair.

use trustlist::extract::{extract_pem, parse_certificate, record_from_der};

/// DOD EMAIL CA-59, issued by DoD Root CA 3; valid 2019-04-02 through 2025-04-02.
const LEAF_B64: &str = include_str!("examples/dod_email_ca_59.b64");
const LEAF_DER: &[u8] = include_bytes!("examples/dod_email_ca_59.der");

/// A harvest time inside the leaf's validity window.
const MID_2024: u64 = 1_720_000_000;

#[test]
fn extract_pem_wraps_at_64_columns() {
    let pem = extract_pem(LEAF_B64);
    assert!(pem.starts_with("-----BEGIN CERTIFICATE-----\n"));
    assert!(pem.ends_with("\n-----END CERTIFICATE-----\n"));
    for line in pem.lines().filter(|l| !l.starts_with("-----")) {
        assert!(line.len() <= 64);
        assert!(!line.is_empty());
    }
}

#[test]
fn extract_pem_is_idempotent_under_whitespace() {
    let padded = format!("  \n\t{}\n  ", LEAF_B64);
    assert_eq!(extract_pem(LEAF_B64), extract_pem(&padded));
    assert_eq!(extract_pem(LEAF_B64), extract_pem(LEAF_B64.trim()));
}

#[test]
fn parses_certificate_metadata() {
    let record = parse_certificate(&extract_pem(LEAF_B64), MID_2024);
    assert!(!record.parse_failed);
    assert_eq!(record.subject_cn, "DOD EMAIL CA-59");
    assert_eq!(record.serial_hex.as_deref(), Some("0304"));
    assert_eq!(record.public_key_algorithm, "RSA-2048");
    assert_eq!(record.signature_algorithm, "SHA-256");
    assert_eq!(record.valid_from, Some(1_554_212_245));
    assert_eq!(record.valid_until, Some(1_743_601_045));
    assert!(!record.expired);
    assert_eq!(
        record.crl_urls,
        vec!["http://crl.disa.mil/crl/DODROOTCA3.crl".to_string()]
    );
    assert_eq!(
        record.ca_issuers_url.as_deref(),
        Some("http://crl.disa.mil/issuedto/DODROOTCA3_IT.p7c")
    );
    assert_eq!(record.raw_base64, LEAF_B64);
}

#[test]
fn expiry_is_fixed_at_parse_time() {
    let after_expiry = 1_743_601_045; // exactly notAfter counts as expired
    let record = parse_certificate(&extract_pem(LEAF_B64), after_expiry);
    assert!(record.expired);
    let record = parse_certificate(&extract_pem(LEAF_B64), after_expiry - 1);
    assert!(!record.expired);
}

#[test]
fn record_from_der_matches_pem_path() {
    let from_der = record_from_der(LEAF_DER, MID_2024);
    let from_pem = parse_certificate(&extract_pem(LEAF_B64), MID_2024);
    assert_eq!(from_der.subject_cn, from_pem.subject_cn);
    assert_eq!(from_der.serial_hex, from_pem.serial_hex);
    assert_eq!(from_der.pem, from_pem.pem);
}

#[test]
fn malformed_payload_yields_parse_failed_record() {
    let record = parse_certificate(&extract_pem("bm90IGEgY2VydGlmaWNhdGU="), MID_2024);
    assert!(record.parse_failed);
    assert_eq!(record.public_key_algorithm, "unknown");
    assert_eq!(record.signature_algorithm, "unknown");
    assert!(record.serial_hex.is_none());
    assert!(record.valid_from.is_none());
    assert!(record.valid_until.is_none());
    assert!(record.crl_urls.is_empty());
}

#[test]
fn invalid_base64_yields_parse_failed_record() {
    let record = parse_certificate(&extract_pem("!!!not base64!!!"), MID_2024);
    assert!(record.parse_failed);
}
