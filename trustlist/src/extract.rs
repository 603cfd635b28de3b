//! Converts embedded certificate material into PEM and parsed metadata
//!
//! Trust lists embed certificates as bare base64 DER inside `X509Certificate` elements. The
//! functions here wrap that material in PEM armor and pull out the metadata the summary report
//! needs: subject, validity window, serial number, algorithms and the CRL distribution point and
//! CA Issuers URLs. Parsing is deliberately forgiving; a certificate that does not parse yields a
//! record with `parse_failed` set so the rest of the run keeps going.

use base64ct::{Base64, Encoding};
use const_oid::db::rfc4519::{C, CN, L, O, OU, ST};
use const_oid::db::rfc5912::{
    ECDSA_WITH_SHA_224, ECDSA_WITH_SHA_256, ECDSA_WITH_SHA_384, ECDSA_WITH_SHA_512,
    ID_AD_CA_ISSUERS, ID_CE_CRL_DISTRIBUTION_POINTS, ID_EC_PUBLIC_KEY,
    ID_PE_AUTHORITY_INFO_ACCESS, RSA_ENCRYPTION, SECP_256_R_1, SECP_384_R_1, SECP_521_R_1,
    SHA_1_WITH_RSA_ENCRYPTION, SHA_256_WITH_RSA_ENCRYPTION, SHA_384_WITH_RSA_ENCRYPTION,
    SHA_512_WITH_RSA_ENCRYPTION,
};
use der::asn1::{
    Ia5StringRef, ObjectIdentifier, PrintableStringRef, TeletexStringRef, UintRef, Utf8StringRef,
};
use der::{Any, Decode, Sequence};
use log::debug;
use spki::SubjectPublicKeyInfoOwned;
use x509_cert::ext::pkix::name::{DistributionPointName, GeneralName};
use x509_cert::ext::pkix::{AuthorityInfoAccessSyntax, CrlDistributionPoints};
use x509_cert::name::Name;
use x509_cert::Certificate;

use crate::chain::ChainTermination;
use crate::model::CertificateRecord;
use crate::vocab::{algorithm_label, signature_digest_label};

/// `extract_pem` wraps a base64 DER payload in standard CERTIFICATE armor, hard-wrapping the
/// body at 64 characters per line. All whitespace inside the payload is stripped first, so the
/// function is idempotent under surrounding whitespace. The payload is not validated here;
/// malformed input surfaces later as a `parse_failed` record.
pub fn extract_pem(base64_der: &str) -> String {
    let body: String = base64_der.chars().filter(|c| !c.is_whitespace()).collect();
    let mut pem = String::with_capacity(body.len() + body.len() / 64 + 64);
    pem.push_str("-----BEGIN CERTIFICATE-----\n");
    for chunk in body.as_bytes().chunks(64) {
        pem.push_str(&String::from_utf8_lossy(chunk));
        pem.push('\n');
    }
    pem.push_str("-----END CERTIFICATE-----\n");
    pem
}

/// `parse_certificate` parses PEM certificate text into a [`CertificateRecord`]. `now` is the
/// harvest time in seconds since the Unix epoch and fixes the `expired` flag. Never fails: a
/// payload that does not decode or parse yields a record with `parse_failed` set.
pub fn parse_certificate(pem: &str, now: u64) -> CertificateRecord {
    let raw_base64: String = pem
        .lines()
        .filter(|l| !l.starts_with("-----"))
        .collect::<Vec<_>>()
        .join("");
    let mut record = empty_record(raw_base64, pem.to_string());
    match pem_rfc7468::decode_vec(pem.as_bytes()) {
        Ok((_, der)) => populate_record(&mut record, &der, now),
        Err(e) => {
            debug!("Failed to decode PEM: {}", e);
            record.parse_failed = true;
        }
    }
    record
}

/// `record_from_der` builds a [`CertificateRecord`] directly from DER bytes, deriving the base64
/// and PEM renditions. Used for issuer certificates fetched during chain resolution.
pub fn record_from_der(der: &[u8], now: u64) -> CertificateRecord {
    let raw_base64 = Base64::encode_string(der);
    let pem = extract_pem(&raw_base64);
    let mut record = empty_record(raw_base64, pem);
    populate_record(&mut record, der, now);
    record
}

fn empty_record(raw_base64: String, pem: String) -> CertificateRecord {
    CertificateRecord {
        raw_base64,
        pem,
        subject_cn: String::new(),
        serial_hex: None,
        public_key_algorithm: "unknown".to_string(),
        signature_algorithm: "unknown".to_string(),
        valid_from: None,
        valid_until: None,
        expired: false,
        crl_urls: vec![],
        ca_issuers_url: None,
        chain: vec![],
        chain_termination: ChainTermination::NoFurtherIssuer,
        parse_failed: false,
    }
}

fn populate_record(record: &mut CertificateRecord, der: &[u8], now: u64) {
    let cert = match Certificate::from_der(der) {
        Ok(cert) => cert,
        Err(e) => {
            debug!("Failed to parse certificate: {}", e);
            record.parse_failed = true;
            return;
        }
    };
    let tbs = &cert.tbs_certificate;

    record.subject_cn = subject_common_name(&tbs.subject);
    record.serial_hex = Some(buffer_to_hex(tbs.serial_number.as_bytes()));
    record.valid_from = Some(tbs.validity.not_before.to_unix_duration().as_secs());
    let not_after = tbs.validity.not_after.to_unix_duration().as_secs();
    record.valid_until = Some(not_after);
    record.expired = not_after <= now;

    let (long_name, short_name) = signature_alg_names(&cert.signature_algorithm.oid);
    match key_bits(&tbs.subject_public_key_info) {
        Some(bits) => {
            record.public_key_algorithm = algorithm_label(&long_name, bits);
            record.signature_algorithm = signature_digest_label(&short_name).to_string();
        }
        None => {
            // mirror the treatment of unparseable certificates: keep the record, mark the
            // algorithms unknown
            record.public_key_algorithm = "unknown".to_string();
            record.signature_algorithm = "unknown".to_string();
            record.parse_failed = true;
        }
    }

    if let Some(extensions) = &tbs.extensions {
        for ext in extensions {
            if ext.extn_id == ID_CE_CRL_DISTRIBUTION_POINTS {
                if let Ok(dps) = CrlDistributionPoints::from_der(ext.extn_value.as_bytes()) {
                    for dp in &dps.0 {
                        if let Some(DistributionPointName::FullName(names)) =
                            &dp.distribution_point
                        {
                            for name in names {
                                if let GeneralName::UniformResourceIdentifier(uri) = name {
                                    record.crl_urls.push(uri.to_string());
                                }
                            }
                        }
                    }
                }
            } else if ext.extn_id == ID_PE_AUTHORITY_INFO_ACCESS {
                if let Ok(aia) = AuthorityInfoAccessSyntax::from_der(ext.extn_value.as_bytes()) {
                    for ad in &aia.0 {
                        if ID_AD_CA_ISSUERS == ad.access_method {
                            if let GeneralName::UniformResourceIdentifier(uri) =
                                &ad.access_location
                            {
                                let s = uri.to_string();
                                if record.ca_issuers_url.is_none() && s.starts_with("http") {
                                    record.ca_issuers_url = Some(s);
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// RSA public keys wrap a PKCS#1 RSAPublicKey sequence inside the SPKI bit string.
#[derive(Sequence)]
struct RsaPublicKey<'a> {
    modulus: UintRef<'a>,
    public_exponent: UintRef<'a>,
}

/// Returns the public key size in bits: modulus width for RSA keys, named curve width for EC
/// keys, None for anything else (in which case the algorithm label falls back to the identifier).
fn key_bits(spki: &SubjectPublicKeyInfoOwned) -> Option<u32> {
    let oid = spki.algorithm.oid;
    if oid == RSA_ENCRYPTION {
        let key_bytes = spki.subject_public_key.raw_bytes();
        let rsa = RsaPublicKey::from_der(key_bytes).ok()?;
        return Some(rsa.modulus.as_bytes().len() as u32 * 8);
    }
    if oid == ID_EC_PUBLIC_KEY {
        let curve = spki
            .algorithm
            .parameters
            .as_ref()
            .and_then(|p| p.decode_as::<ObjectIdentifier>().ok())?;
        return match curve {
            SECP_256_R_1 => Some(256),
            SECP_384_R_1 => Some(384),
            SECP_521_R_1 => Some(521),
            _ => Some(0),
        };
    }
    Some(0)
}

/// Maps a signature algorithm OID to its (long name, short name) pair, in the naming convention
/// the vocabulary rules expect. Unknown OIDs render as their dotted form.
fn signature_alg_names(oid: &ObjectIdentifier) -> (String, String) {
    let pair = match *oid {
        SHA_1_WITH_RSA_ENCRYPTION => ("sha1WithRSAEncryption", "RSA-SHA1"),
        SHA_256_WITH_RSA_ENCRYPTION => ("sha256WithRSAEncryption", "RSA-SHA256"),
        SHA_384_WITH_RSA_ENCRYPTION => ("sha384WithRSAEncryption", "RSA-SHA384"),
        SHA_512_WITH_RSA_ENCRYPTION => ("sha512WithRSAEncryption", "RSA-SHA512"),
        ECDSA_WITH_SHA_224 => ("ecdsa-with-SHA224", "ecdsa-with-SHA224"),
        ECDSA_WITH_SHA_256 => ("ecdsa-with-SHA256", "ecdsa-with-SHA256"),
        ECDSA_WITH_SHA_384 => ("ecdsa-with-SHA384", "ecdsa-with-SHA384"),
        ECDSA_WITH_SHA_512 => ("ecdsa-with-SHA512", "ecdsa-with-SHA512"),
        _ => {
            let dotted = oid.to_string();
            return (dotted.clone(), dotted);
        }
    };
    (pair.0.to_string(), pair.1.to_string())
}

/// Returns the subject common name, falling back to a joined `attr=value` rendition of all RDNs
/// when the subject carries no CN.
fn subject_common_name(name: &Name) -> String {
    for rdn in name.0.iter() {
        for atav in rdn.0.iter() {
            if atav.oid == CN {
                return atav_to_string(&atav.value);
            }
        }
    }
    let mut joined = String::new();
    for rdn in name.0.iter() {
        for atav in rdn.0.iter() {
            joined.push_str(&format!(
                "{}={}",
                attr_short_name(&atav.oid),
                atav_to_string(&atav.value)
            ));
        }
    }
    joined
}

fn attr_short_name(oid: &ObjectIdentifier) -> String {
    match *oid {
        C => "C".to_string(),
        O => "O".to_string(),
        OU => "OU".to_string(),
        L => "L".to_string(),
        ST => "ST".to_string(),
        _ => oid.to_string(),
    }
}

fn atav_to_string(value: &Any) -> String {
    if let Ok(s) = value.decode_as::<Utf8StringRef<'_>>() {
        return s.to_string();
    }
    if let Ok(s) = value.decode_as::<PrintableStringRef<'_>>() {
        return s.to_string();
    }
    if let Ok(s) = value.decode_as::<Ia5StringRef<'_>>() {
        return s.to_string();
    }
    if let Ok(s) = value.decode_as::<TeletexStringRef<'_>>() {
        return s.to_string();
    }
    buffer_to_hex(value.value())
}

/// `buffer_to_hex` renders a byte slice as uppercase hex with no separators.
pub fn buffer_to_hex(buffer: &[u8]) -> String {
    buffer.iter().map(|b| format!("{:02X}", b)).collect()
}
