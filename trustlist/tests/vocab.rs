//! Tests for the vocabulary translator.

use trustlist::vocab::{algorithm_label, signature_digest_label, type_label, ServiceStatus};

#[test]
fn known_type_uris_translate() {
    assert_eq!(
        type_label("http://uri.etsi.org/TrstSvc/Svctype/CA/QC"),
        "qualified certificate issuing trust service"
    );
    assert_eq!(
        type_label("http://uri.etsi.org/TrstSvc/Svctype/TSA/QTST"),
        "qualified electronic time stamp generation service"
    );
    assert_eq!(
        type_label("http://uri.etsi.org/TrstSvc/Svctype/NationalRootCA-QC"),
        "national root signing CA"
    );
}

#[test]
fn unknown_type_uri_passes_through() {
    let uri = "http://example.com/not-a-type";
    assert_eq!(type_label(uri), uri);
}

#[test]
fn known_status_uris_translate() {
    let status =
        ServiceStatus::from_uri("http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/granted");
    assert_eq!(status, ServiceStatus::Granted);
    assert_eq!(status.label(), "granted");

    let status = ServiceStatus::from_uri(
        "http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/deprecatedatnationallevel",
    );
    assert_eq!(status.label(), "deprecated at national level");
}

#[test]
fn unknown_status_uri_is_representable() {
    let uri = "http://example.com/not-a-status";
    let status = ServiceStatus::from_uri(uri);
    assert_eq!(status, ServiceStatus::Unknown(uri.to_string()));
    assert_eq!(status.label(), uri);
}

#[test]
fn rsa_algorithms_render_with_key_size() {
    assert_eq!(algorithm_label("sha256WithRSAEncryption", 2048), "RSA-2048");
    assert_eq!(algorithm_label("sha1WithRSAEncryption", 4096), "RSA-4096");
    assert_eq!(algorithm_label("ed25519", 256), "ed25519");
    assert_eq!(algorithm_label("ecdsa-with-SHA256", 256), "ecdsa-with-SHA256");
}

#[test]
fn signature_digest_labels() {
    assert_eq!(signature_digest_label("RSA-SHA256"), "SHA-256");
    assert_eq!(signature_digest_label("  RSA-SHA1  "), "SHA-1");
    assert_eq!(signature_digest_label("rsa-sha256"), "rsa-sha256");
    assert_eq!(signature_digest_label("ecdsa-with-SHA256"), "ecdsa-with-SHA256");
}
