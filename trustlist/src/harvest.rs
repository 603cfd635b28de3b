//! Orchestrates a harvest run: country list, per-country trust lists, filter cascade,
//! certificate extraction and chain resolution
//!
//! Processing is strictly sequential: one country's document is fully fetched and walked before
//! the next begins, and chain hops within a certificate are inherently ordered. A failure to
//! fetch the country list aborts the run; everything below that degrades per unit.

use base64ct::{Base64, Encoding};
use log::{debug, error, info, warn};
use serde::Deserialize;

use crate::chain::resolve_chain;
use crate::extract::{extract_pem, parse_certificate};
use crate::fetch::Fetcher;
use crate::model::{CertificateRecord, Country, Provider, Service};
use crate::settings::HarvestSettings;
use crate::vocab::{type_label, ServiceStatus};
use crate::xml::{self, TrustListNode};
use crate::Result;

/// Country list envelope returned by the home endpoint.
#[derive(Deserialize)]
struct HomeResponse {
    content: HomeContent,
}

#[derive(Deserialize)]
struct HomeContent {
    tls: Vec<CountryListing>,
}

#[derive(Deserialize)]
struct CountryListing {
    #[serde(rename = "territoryCode")]
    territory_code: String,
    #[serde(rename = "countryName")]
    country_name: String,
}

/// Per-country envelope: `content` is the base64 encoded trust list XML document.
#[derive(Deserialize)]
struct DownloadResponse {
    content: String,
}

/// Walks the registry and assembles the filtered Country/Provider/Service tree.
pub struct Harvester<'a> {
    fetcher: &'a dyn Fetcher,
    settings: &'a HarvestSettings,
    now: u64,
}

impl<'a> Harvester<'a> {
    /// Creates a harvester that evaluates certificate expiry against the given time (seconds
    /// since the Unix epoch).
    pub fn new(fetcher: &'a dyn Fetcher, settings: &'a HarvestSettings, now: u64) -> Self {
        Harvester {
            fetcher,
            settings,
            now,
        }
    }

    /// Runs the full harvest. Fails only when the country list itself cannot be fetched or
    /// decoded; a failure below that level logs, skips the affected country and continues.
    pub fn run(&self) -> Result<Vec<Country>> {
        if self.settings.filter_countries {
            info!(
                "Will only include these countries: {}",
                self.settings.include_countries.join(", ")
            );
        }
        let home = self.fetcher.fetch_json(&self.settings.home_url)?;
        let home: HomeResponse = serde_json::from_value(home)?;
        info!("Counted {} countries", home.content.tls.len());

        let mut countries = vec![];
        for listing in &home.content.tls {
            if !self.settings.country_allowed(&listing.territory_code) {
                debug!(
                    "Skip {} ({})",
                    listing.country_name, listing.territory_code
                );
                continue;
            }
            match self.harvest_country(listing) {
                Ok(country) => countries.push(country),
                Err(e) => {
                    error!(
                        "Skipping {} ({}): {}",
                        listing.country_name, listing.territory_code, e
                    );
                }
            }
        }
        Ok(countries)
    }

    fn harvest_country(&self, listing: &CountryListing) -> Result<Country> {
        let url = self.settings.download_url_for(&listing.territory_code);
        info!("Downloading for {} ({})", listing.country_name, url);
        let envelope = self.fetcher.fetch_json(&url)?;
        let envelope: DownloadResponse = serde_json::from_value(envelope)?;

        let compact: String = envelope
            .content
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let xml_bytes = Base64::decode_vec(&compact)
            .map_err(|e| crate::Error::Encoding(format!("trust list payload: {}", e)))?;
        let xml_text = String::from_utf8_lossy(&xml_bytes);
        let root = xml::decode(&xml_text)?;

        let providers = self.providers(&root, &listing.country_name);
        Ok(Country {
            code: listing.territory_code.clone(),
            name: listing.country_name.clone(),
            providers,
        })
    }

    fn providers(&self, root: &TrustListNode, country_name: &str) -> Vec<Provider> {
        let lists = root.children_named("TrustServiceProviderList");
        if lists.is_empty() {
            info!("No services listed for {}", country_name);
        }
        let mut providers = vec![];
        for list in lists {
            for provider in list.children_named("TrustServiceProvider") {
                let name = provider
                    .first_named("TSPInformation")
                    .and_then(|info| info.first_named("TSPName"))
                    .and_then(|tsp_name| tsp_name.first_named("Name"))
                    .and_then(|name| name.text_value().ok());
                let name = match name {
                    Some(name) => name,
                    None => {
                        warn!("Provider without a readable TSPName, skipping");
                        continue;
                    }
                };
                if !self.settings.provider_allowed(name) {
                    debug!("Skip QTSP {}", name);
                    continue;
                }
                providers.push(Provider {
                    name: name.to_string(),
                    services: self.services(provider),
                });
            }
        }
        providers
    }

    fn services(&self, provider: &TrustListNode) -> Vec<Service> {
        let service_nodes = provider
            .first_named("TSPServices")
            .map(|services| services.children_named("TSPService"))
            .unwrap_or(&[]);

        let mut services = vec![];
        for service in service_nodes {
            let info = match service.first_named("ServiceInformation") {
                Some(info) => info,
                None => {
                    warn!("TSPService without ServiceInformation, skipping");
                    continue;
                }
            };
            let type_uri = info
                .first_named("ServiceTypeIdentifier")
                .and_then(|n| n.text_value().ok());
            let name = info
                .first_named("ServiceName")
                .and_then(|n| n.first_named("Name"))
                .and_then(|n| n.text_value().ok());
            let status_uri = info
                .first_named("ServiceStatus")
                .and_then(|n| n.text_value().ok());
            let (type_uri, name, status_uri) = match (type_uri, name, status_uri) {
                (Some(t), Some(n), Some(s)) => (t, n, s),
                _ => {
                    warn!("TSPService with incomplete ServiceInformation, skipping");
                    continue;
                }
            };

            if !self.settings.service_allowed(type_uri, status_uri) {
                debug!(
                    "Type \"{}\" or state \"{}\" will be ignored",
                    type_label(type_uri),
                    status_uri
                );
                continue;
            }

            let abilities = service_abilities(info);
            if !self.settings.ability_allowed(&abilities) {
                debug!("{} does not declare a requested ability", name);
                continue;
            }

            services.push(Service {
                type_uri: type_uri.to_string(),
                name: name.to_string(),
                status: ServiceStatus::from_uri(status_uri),
                abilities,
                certificates: self.certificates(info),
            });
        }
        services
    }

    fn certificates(&self, info: &TrustListNode) -> Vec<CertificateRecord> {
        let mut records = vec![];
        for identity in info.children_named("ServiceDigitalIdentity") {
            for digital_id in identity.children_named("DigitalId") {
                let payload = digital_id
                    .first_named("X509Certificate")
                    .and_then(|n| n.text_value().ok());
                if let Some(base64_der) = payload {
                    let pem = extract_pem(base64_der);
                    let mut record = parse_certificate(&pem, self.now);
                    if self.settings.filter_expired && record.expired {
                        debug!("Dropping expired certificate {}", record.subject_cn);
                        continue;
                    }
                    resolve_chain(&mut record, self.fetcher, self.now);
                    records.push(record);
                }
            }
        }
        records
    }
}

/// Collects the AdditionalServiceInformation URIs declared in the service's extensions.
fn service_abilities(info: &TrustListNode) -> Vec<String> {
    let mut abilities = vec![];
    if let Some(extensions) = info.first_named("ServiceInformationExtensions") {
        for extension in extensions.children_named("Extension") {
            let uri = extension
                .first_named("AdditionalServiceInformation")
                .and_then(|asi| asi.first_named("URI"))
                .and_then(|uri| uri.text_value().ok());
            if let Some(uri) = uri {
                abilities.push(uri.to_string());
            }
        }
    }
    abilities
}
