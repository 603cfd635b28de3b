//! Translates ETSI trust list vocabulary to human readable labels
//!
//! Service types and service statuses appear in trust lists as URIs. The tables here cover the
//! identifiers defined by ETSI TS 119 612 (and the pre-eIDAS supervision/accreditation statuses
//! that older lists still carry). Lookups degrade gracefully: an unrecognized URI is reported as
//! itself rather than failing, so a schema revision never aborts a harvest.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use log::warn;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref SERVICE_TYPES: BTreeMap<&'static str, &'static str> = BTreeMap::from([
        (
            "http://uri.etsi.org/TrstSvc/Svctype/CA/QC",
            "qualified certificate issuing trust service"
        ),
        (
            "http://uri.etsi.org/TrstSvc/Svctype/TSA/QTST",
            "qualified electronic time stamp generation service"
        ),
        (
            "http://uri.etsi.org/TrstSvc/Svctype/TSA",
            "time-stamping generation service, not qualified"
        ),
        (
            "http://uri.etsi.org/TrstSvc/Svctype/EDS/Q",
            "qualified electronic delivery service"
        ),
        (
            "https://uri.etsi.org/TrstSvc/Svctype/CA/PKC/",
            "certificate generation service, not qualified"
        ),
        (
            "http://uri.etsi.org/TrstSvc/Svctype/CA/PKC",
            "certificate generation service, not qualified"
        ),
        (
            "http://uri.etsi.org/TrstSvc/Svctype/Certstatus/OCSP/QC",
            "qualified OCSP responder"
        ),
        (
            "http://uri.etsi.org/TrstSvc/Svctype/QESValidation/Q",
            "qualified validation service for qualified electronic signatures and/or qualified electronic seals"
        ),
        (
            "http://uri.etsi.org/TrstSvc/Svctype/Certstatus/OCSP",
            "certificate validity status service, not qualified"
        ),
        (
            "http://uri.etsi.org/TrstSvc/Svctype/PSES/Q",
            "qualified preservation service for qualified electronic signatures and/or qualified electronic seals"
        ),
        (
            "http://uri.etsi.org/TrstSvc/Svctype/NationalRootCA-QC",
            "national root signing CA"
        ),
        (
            "http://uri.etsi.org/TrstSvd/Svctype/TLIssuer",
            "service issuing trusted lists"
        ),
        (
            "http://uri.etsi.org/TrstSvc/Svctype/EDS/REM/Q",
            "qualified electronic registered mail delivery service"
        ),
        (
            "http://uri.etsi.org/TrstSvc/Svctype/TSA/TSS-QC",
            "time-stamping service, not qualified"
        ),
        (
            "http://uri.etsi.org/TrstSvc/Svctype/IdV",
            "identity verification service"
        ),
        (
            "http://uri.etsi.org/TrstSvc/Svctype/TSA/TSS-AdESQCandQES",
            "time-stamping service, not qualified"
        ),
        (
            "https://uri.etsi.org/TrstSvc/Svctype/ACA/",
            "attribute certificate generation service"
        ),
        (
            "http://uri.etsi.org/TrstSvc/Svctype/ACA",
            "attribute certificate generation service"
        ),
        (
            "http://uri.etsi.org/TrstSvc/Svctype/unspecified",
            "trust service of an unspecified type"
        ),
        (
            "http://uri.etsi.org/TrstSvc/Svctype/RA",
            "registration service"
        ),
        (
            "http://uri.etsi.org/TrstSvc/Svctype/SignaturePolicyAuthority",
            "service responsible for issuing, publishing or maintenance of signature policies"
        ),
        (
            "https://uri.etsi.org/TrstSvc/Svctype/IdV/nothavingPKIid/",
            "Identity verification service that cannot be identified by a specific PKI-based public key."
        ),
    ]);
}

/// `type_label` translates an official ETSI service type URI to a human readable label. An
/// unrecognized URI is logged and returned as-is.
pub fn type_label(uri: &str) -> &str {
    match SERVICE_TYPES.get(uri) {
        Some(label) => label,
        None => {
            warn!("Unknown service type URI: {}", uri);
            uri
        }
    }
}

const STATUS_PREFIX: &str = "http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/";

/// Status of a trust service as asserted by its national trust list.
///
/// Unknown status URIs are representable via [`ServiceStatus::Unknown`] instead of failing the
/// lookup, so a status introduced by a future schema revision flows through the pipeline intact.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ServiceStatus {
    /// The service is granted qualified status
    Granted,
    /// The qualified status has been withdrawn
    Withdrawn,
    /// The service is deprecated at the national level
    DeprecatedAtNationalLevel,
    /// The service is recognized at the national level
    RecognisedAtNationalLevel,
    /// Pre-eIDAS: the service is under supervision
    UnderSupervision,
    /// Pre-eIDAS: supervision of the service is in cessation
    SupervisionInCessation,
    /// Pre-eIDAS: supervision of the service has ceased
    SupervisionCeased,
    /// Pre-eIDAS: supervision of the service has been revoked
    SupervisionRevoked,
    /// Pre-eIDAS: the service is accredited
    Accredited,
    /// Pre-eIDAS: accreditation of the service has ceased
    AccreditationCeased,
    /// Pre-eIDAS: accreditation of the service has been revoked
    AccreditationRevoked,
    /// The status is set by national law
    SetByNationalLaw,
    /// The service is deprecated by national law
    DeprecatedByNationalLaw,
    /// A status URI this crate does not recognize, preserved verbatim
    Unknown(String),
}

impl ServiceStatus {
    /// Maps an official ETSI service status URI to a [`ServiceStatus`].
    pub fn from_uri(uri: &str) -> Self {
        match uri.strip_prefix(STATUS_PREFIX).unwrap_or(uri) {
            "granted" => ServiceStatus::Granted,
            "withdrawn" => ServiceStatus::Withdrawn,
            "deprecatedatnationallevel" => ServiceStatus::DeprecatedAtNationalLevel,
            "recognisedatnationallevel" => ServiceStatus::RecognisedAtNationalLevel,
            "undersupervision" => ServiceStatus::UnderSupervision,
            "supervisionincessation" => ServiceStatus::SupervisionInCessation,
            "supervisionceased" => ServiceStatus::SupervisionCeased,
            "supervisionrevoked" => ServiceStatus::SupervisionRevoked,
            "accredited" => ServiceStatus::Accredited,
            "accreditationceased" => ServiceStatus::AccreditationCeased,
            "accreditationrevoked" => ServiceStatus::AccreditationRevoked,
            "setbynationallaw" => ServiceStatus::SetByNationalLaw,
            "deprecatedbynationallaw" => ServiceStatus::DeprecatedByNationalLaw,
            _ => {
                warn!("Unknown service status URI: {}", uri);
                ServiceStatus::Unknown(uri.to_string())
            }
        }
    }

    /// Returns a human readable label (or the preserved URI for [`ServiceStatus::Unknown`]).
    pub fn label(&self) -> &str {
        match self {
            ServiceStatus::Granted => "granted",
            ServiceStatus::Withdrawn => "withdrawn",
            ServiceStatus::DeprecatedAtNationalLevel => "deprecated at national level",
            ServiceStatus::RecognisedAtNationalLevel => "recognized at national level",
            ServiceStatus::UnderSupervision => "under supervision",
            ServiceStatus::SupervisionInCessation => "supervision in cessation",
            ServiceStatus::SupervisionCeased => "supervision ceased",
            ServiceStatus::SupervisionRevoked => "supervision revoked",
            ServiceStatus::Accredited => "accredited",
            ServiceStatus::AccreditationCeased => "accreditation ceased",
            ServiceStatus::AccreditationRevoked => "accreditation revoked",
            ServiceStatus::SetByNationalLaw => "set by national law",
            ServiceStatus::DeprecatedByNationalLaw => "deprecated by national law",
            ServiceStatus::Unknown(uri) => uri,
        }
    }
}

/// `algorithm_label` renders a readable public key algorithm string. Any identifier ending in
/// `WithRSAEncryption` is rendered as `RSA-<bits>`; anything else passes through unchanged.
pub fn algorithm_label(algo: &str, bits: u32) -> String {
    if algo.ends_with("WithRSAEncryption") {
        return format!("RSA-{}", bits);
    }
    algo.to_string()
}

/// `signature_digest_label` maps the two RSA signature short names to their digest names and
/// passes anything else through unchanged (case-sensitive, after trimming).
pub fn signature_digest_label(algo: &str) -> &str {
    match algo.trim() {
        "RSA-SHA256" => "SHA-256",
        "RSA-SHA1" => "SHA-1",
        _ => algo,
    }
}
