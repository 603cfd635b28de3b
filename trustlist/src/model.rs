//! Entities assembled during a harvest run
//!
//! Ownership is strictly hierarchical: a [`Country`] owns its providers, a [`Provider`] its
//! services, a [`Service`] its certificate records, and a [`CertificateRecord`] the freshly
//! fetched issuer records in its chain. Everything is built once per run, handed to the output
//! writers, and discarded; nothing is mutated after construction except the chain and its
//! termination reason, which the resolver fills in.

use serde::{Deserialize, Serialize};

use crate::chain::ChainTermination;
use crate::vocab::ServiceStatus;

/// A member state and the providers harvested from its trust list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Country {
    /// ISO territory code, e.g. `NL`
    pub code: String,
    /// Display name, e.g. `Netherlands`
    pub name: String,
    /// Providers that survived the filter cascade, in document order
    pub providers: Vec<Provider>,
}

/// A trust service provider and its surviving services.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Provider {
    /// Provider display name as listed in the trust list
    pub name: String,
    /// Services that survived the filter cascade, in document order
    pub services: Vec<Service>,
}

/// A trust service entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Service {
    /// Official ETSI service type URI
    pub type_uri: String,
    /// Service display name
    pub name: String,
    /// Service status asserted by the national list
    pub status: ServiceStatus,
    /// AdditionalServiceInformation URIs declared for the service
    pub abilities: Vec<String>,
    /// Certificates embedded in the service's DigitalId entries, in document order. A service
    /// without any X509Certificate entry is valid and carries an empty list.
    pub certificates: Vec<CertificateRecord>,
}

/// Metadata extracted from one embedded certificate, plus its resolved issuer chain.
///
/// Parsing is best-effort: when the certificate does not parse, `parse_failed` is set, both
/// algorithm fields read `unknown` and the validity/serial fields are absent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CertificateRecord {
    /// The base64 DER payload as found in the trust list, whitespace stripped
    pub raw_base64: String,
    /// PEM rendition of the payload
    pub pem: String,
    /// Subject common name, or the joined subject RDNs when no CN is present
    pub subject_cn: String,
    /// Uppercase hex serial number
    pub serial_hex: Option<String>,
    /// Readable public key algorithm, e.g. `RSA-2048`
    pub public_key_algorithm: String,
    /// Readable signature digest, e.g. `SHA-256`
    pub signature_algorithm: String,
    /// notBefore as seconds since the Unix epoch
    pub valid_from: Option<u64>,
    /// notAfter as seconds since the Unix epoch
    pub valid_until: Option<u64>,
    /// Whether notAfter was at or before the harvest time; fixed at parse time
    pub expired: bool,
    /// CRL distribution point URLs, recorded but never fetched
    pub crl_urls: Vec<String>,
    /// The CA Issuers entry of the Authority Information Access extension, if present
    pub ca_issuers_url: Option<String>,
    /// Issuer records fetched during chain resolution, nearest issuer first. The subject itself
    /// is not repeated here.
    pub chain: Vec<CertificateRecord>,
    /// Why chain resolution stopped
    pub chain_termination: ChainTermination,
    /// Set when the certificate or its public key could not be parsed
    pub parse_failed: bool,
}
