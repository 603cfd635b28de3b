//! Harvest configuration and the filter cascade
//!
//! A [`HarvestSettings`] instance is constructed once (from defaults or a JSON file), treated as
//! read-only for the duration of a run, and passed by reference into the orchestrator. Each filter
//! dimension pairs a boolean toggle with an allow-list; a disabled toggle makes the corresponding
//! predicate pass everything.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Endpoint returning the list of member states and their trust list locations.
pub const HOME_URL: &str = "https://webgate.ec.europa.eu/tl-browser/api/home";

/// Endpoint prefix returning the base64 wrapped trust list document for a territory code.
pub const DOWNLOAD_URL: &str = "https://webgate.ec.europa.eu/tl-browser/api/download";

/// Settings that drive a harvest run. All fields have defaults, so a settings file only needs to
/// name the fields it overrides.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestSettings {
    /// URL of the country list endpoint
    pub home_url: String,
    /// URL prefix of the per-country document download endpoint
    pub download_url: String,
    /// When true, only countries listed in `include_countries` are harvested
    pub filter_countries: bool,
    /// ISO territory codes to include when `filter_countries` is set
    pub include_countries: Vec<String>,
    /// When true, only providers listed in `include_providers` are harvested. Matching is by
    /// display name and therefore fragile across provider renames; this mirrors the upstream
    /// registry, which offers no stable provider identifier.
    pub filter_providers: bool,
    /// Provider display names to include when `filter_providers` is set
    pub include_providers: Vec<String>,
    /// When true, only services whose type URI appears in `include_types` are harvested
    pub filter_types: bool,
    /// Service type URIs to include when `filter_types` is set
    pub include_types: Vec<String>,
    /// When true, only services whose status URI appears in `include_statuses` are harvested
    pub filter_statuses: bool,
    /// Service status URIs to include when `filter_statuses` is set
    pub include_statuses: Vec<String>,
    /// When true, only services declaring at least one ability in `include_abilities` are
    /// harvested
    pub filter_abilities: bool,
    /// AdditionalServiceInformation URIs to include when `filter_abilities` is set
    pub include_abilities: Vec<String>,
    /// When true, certificates that are already expired at harvest time are dropped instead of
    /// being recorded with the expired flag set
    pub filter_expired: bool,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        HarvestSettings {
            home_url: HOME_URL.to_string(),
            download_url: DOWNLOAD_URL.to_string(),
            filter_countries: false,
            include_countries: vec![],
            filter_providers: false,
            include_providers: vec![],
            filter_types: true,
            include_types: vec!["http://uri.etsi.org/TrstSvc/Svctype/CA/QC".to_string()],
            filter_statuses: true,
            include_statuses: vec![
                "http://uri.etsi.org/TrstSvc/TrustedList/Svcstatus/granted".to_string(),
            ],
            filter_abilities: true,
            include_abilities: vec![
                "http://uri.etsi.org/TrstSvc/TrustedList/SvcInfoExt/ForWebSiteAuthentication"
                    .to_string(),
            ],
            filter_expired: false,
        }
    }
}

impl HarvestSettings {
    /// Reads settings from a JSON file, with defaults supplying any absent field.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&data)
            .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Returns the document download URL for the given territory code.
    pub fn download_url_for(&self, territory_code: &str) -> String {
        format!(
            "{}/{}",
            self.download_url.trim_end_matches('/'),
            territory_code
        )
    }

    /// `country_allowed` passes every code when country filtering is disabled, else requires
    /// exact membership in the include list.
    pub fn country_allowed(&self, territory_code: &str) -> bool {
        !self.filter_countries || self.include_countries.iter().any(|c| c == territory_code)
    }

    /// `provider_allowed` passes every provider when provider filtering is disabled, else
    /// requires exact membership of the display name in the include list.
    pub fn provider_allowed(&self, name: &str) -> bool {
        !self.filter_providers || self.include_providers.iter().any(|p| p == name)
    }

    /// `service_allowed` is the conjunction of the type and status checks, each independently
    /// toggleable.
    pub fn service_allowed(&self, type_uri: &str, status_uri: &str) -> bool {
        let type_ok = !self.filter_types || self.include_types.iter().any(|t| t == type_uri);
        let status_ok =
            !self.filter_statuses || self.include_statuses.iter().any(|s| s == status_uri);
        type_ok && status_ok
    }

    /// `ability_allowed` passes every service when ability filtering is disabled, else requires a
    /// non-empty intersection between the declared abilities and the include list.
    pub fn ability_allowed(&self, abilities: &[String]) -> bool {
        !self.filter_abilities
            || abilities
                .iter()
                .any(|a| self.include_abilities.iter().any(|i| i == a))
    }
}
