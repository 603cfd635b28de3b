//! Resolves issuer chains by following CA Issuers references
//!
//! Resolution is an explicit bounded loop rather than recursion: each hop fetches the URL named
//! by the current certificate's Authority Information Access extension, parses the result and
//! continues from there. A visited-URL set and a depth guard turn a malformed or adversarial
//! issuer loop into a recorded, non-fatal termination.

use std::collections::BTreeSet;
use std::fmt;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::extract::{parse_certificate, record_from_der};
use crate::fetch::Fetcher;
use crate::model::CertificateRecord;

/// Maximum number of issuer hops followed for a single certificate.
pub const MAX_CHAIN_DEPTH: usize = 10;

/// Why chain resolution stopped. Only [`ChainTermination::NoFurtherIssuer`] is a clean end; the
/// other variants record a partial chain. None of them aborts the run.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ChainTermination {
    /// The last certificate carries no CA Issuers reference
    NoFurtherIssuer,
    /// An issuer URL could not be fetched
    FetchFailed(String),
    /// Fetched content did not parse as a certificate
    ParseFailed(String),
    /// The depth guard tripped
    DepthLimitReached,
    /// An issuer URL was seen earlier in the same chain
    IssuerLoop,
}

impl fmt::Display for ChainTermination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainTermination::NoFurtherIssuer => write!(f, "no further issuer"),
            ChainTermination::FetchFailed(reason) => write!(f, "fetch failed: {}", reason),
            ChainTermination::ParseFailed(reason) => write!(f, "parse failed: {}", reason),
            ChainTermination::DepthLimitReached => write!(f, "depth limit reached"),
            ChainTermination::IssuerLoop => write!(f, "issuer loop"),
        }
    }
}

/// `resolve_chain` follows the subject's CA Issuers references, appending each fetched issuer to
/// `record.chain` (nearest issuer first) and recording why resolution stopped in
/// `record.chain_termination`.
pub fn resolve_chain(record: &mut CertificateRecord, fetcher: &dyn Fetcher, now: u64) {
    let mut visited: BTreeSet<String> = BTreeSet::new();
    let mut next = record.ca_issuers_url.clone();
    record.chain_termination = ChainTermination::NoFurtherIssuer;

    while let Some(url) = next {
        if visited.contains(&url) {
            warn!("Issuer loop detected at {}", url);
            record.chain_termination = ChainTermination::IssuerLoop;
            return;
        }
        if record.chain.len() >= MAX_CHAIN_DEPTH {
            warn!("Chain depth limit reached before {}", url);
            record.chain_termination = ChainTermination::DepthLimitReached;
            return;
        }
        visited.insert(url.clone());

        info!("Downloading issuer certificate from {}", url);
        let bytes = match fetcher.fetch_bytes(&url) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to fetch issuer from {}: {}", url, e);
                record.chain_termination = ChainTermination::FetchFailed(e.to_string());
                return;
            }
        };

        let issuer = issuer_from_bytes(&bytes, now);
        if issuer.parse_failed {
            warn!("Content fetched from {} did not parse as a certificate", url);
            record.chain.push(issuer);
            record.chain_termination =
                ChainTermination::ParseFailed(format!("content from {}", url));
            return;
        }
        next = issuer.ca_issuers_url.clone();
        record.chain.push(issuer);
    }
}

/// Issuer endpoints serve either binary DER or PEM text; try DER first, in line with how remote
/// certificate fetching treats ambiguous content types.
fn issuer_from_bytes(bytes: &[u8], now: u64) -> CertificateRecord {
    if bytes.starts_with(b"-----BEGIN") {
        if let Ok(text) = std::str::from_utf8(bytes) {
            return parse_certificate(text, now);
        }
    }
    record_from_der(bytes, now)
}
