//! PEM folder and CSV summary writers
//!
//! Both writers are best-effort at the per-file level: a certificate that cannot be written is
//! logged and skipped without aborting the rest of the run. Only failure to create the output
//! folder or the CSV file itself is fatal.

use std::fs;
use std::path::Path;

use chrono::DateTime;
use log::{error, info};

use trustlist::{type_label, CertificateRecord, Country, Error, Result};

/// Renders one component of a PEM filename, dropping characters that are unsafe or awkward in
/// filenames across platforms.
fn filename_component(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Formats a Unix epoch value as `YYYY-MM-DD`, or an empty string when absent.
fn format_date(epoch: Option<u64>) -> String {
    match epoch {
        Some(secs) => match DateTime::from_timestamp(secs as i64, 0) {
            Some(dt) => dt.format("%Y-%m-%d").to_string(),
            None => String::new(),
        },
        None => String::new(),
    }
}

/// `write_pem_files` saves one PEM file per harvested certificate to `folder`, named
/// `{country} - {provider} - {service} - {index}.pem`, plus one file per resolved chain hop with
/// a ` - chain{hop}` suffix. Returns the number of files written.
pub fn write_pem_files(folder: &str, countries: &[Country]) -> Result<usize> {
    if let Err(e) = fs::create_dir_all(folder) {
        error!("Failed to create output folder {}: {}", folder, e);
        return Err(Error::Config(format!(
            "could not create output folder {}: {}",
            folder, e
        )));
    }

    let mut written = 0;
    for country in countries {
        for provider in &country.providers {
            for service in &provider.services {
                for (index, record) in service.certificates.iter().enumerate() {
                    let stem = format!(
                        "{} - {} - {} - {}",
                        filename_component(&country.code),
                        filename_component(&provider.name),
                        filename_component(&service.name),
                        index
                    );
                    let path = Path::new(folder).join(format!("{}.pem", stem));
                    match fs::write(&path, &record.pem) {
                        Ok(_) => written += 1,
                        Err(e) => {
                            error!("Failed to write {}: {}", path.display(), e);
                            continue;
                        }
                    }
                    for (hop, issuer) in record.chain.iter().enumerate() {
                        let path = Path::new(folder).join(format!("{} - chain{}.pem", stem, hop));
                        match fs::write(&path, &issuer.pem) {
                            Ok(_) => written += 1,
                            Err(e) => error!("Failed to write {}: {}", path.display(), e),
                        }
                    }
                }
            }
        }
    }
    info!("Wrote {} PEM files to {}", written, folder);
    Ok(written)
}

fn csv_row(
    country: &Country,
    provider_name: &str,
    service_type: &str,
    service_name: &str,
    status_label: &str,
    record: &CertificateRecord,
) -> Vec<String> {
    vec![
        country.code.clone(),
        country.name.clone(),
        provider_name.to_string(),
        service_name.to_string(),
        service_type.to_string(),
        status_label.to_string(),
        record.subject_cn.clone(),
        record.serial_hex.clone().unwrap_or_default(),
        record.public_key_algorithm.clone(),
        record.signature_algorithm.clone(),
        format_date(record.valid_from),
        format_date(record.valid_until),
        record.expired.to_string(),
        record.crl_urls.join(" "),
        record.ca_issuers_url.clone().unwrap_or_default(),
        record.chain.len().to_string(),
        record.chain_termination.to_string(),
        record.parse_failed.to_string(),
    ]
}

/// `write_csv` saves a semicolon-delimited summary of the harvest to `csv_file`, one row per
/// harvested certificate. Returns the number of rows written (excluding the header).
pub fn write_csv(csv_file: &str, countries: &[Country]) -> Result<usize> {
    let mut writer = match csv::WriterBuilder::new().delimiter(b';').from_path(csv_file) {
        Ok(w) => w,
        Err(e) => {
            error!("Failed to create {}: {}", csv_file, e);
            return Err(Error::Config(format!(
                "could not create CSV file {}: {}",
                csv_file, e
            )));
        }
    };

    let header = [
        "country_code",
        "country_name",
        "provider",
        "service",
        "service_type",
        "service_status",
        "subject",
        "serial",
        "public_key_algorithm",
        "signature_algorithm",
        "valid_from",
        "valid_until",
        "expired",
        "crl_urls",
        "ca_issuers_url",
        "chain_length",
        "chain_termination",
        "parse_failed",
    ];
    if let Err(e) = writer.write_record(header) {
        error!("Failed to write CSV header: {}", e);
        return Err(Error::Config(format!("could not write CSV header: {}", e)));
    }

    let mut rows = 0;
    for country in countries {
        for provider in &country.providers {
            for service in &provider.services {
                let service_type = type_label(&service.type_uri);
                let status_label = service.status.label();
                for record in &service.certificates {
                    let row = csv_row(
                        country,
                        &provider.name,
                        service_type,
                        &service.name,
                        status_label,
                        record,
                    );
                    match writer.write_record(&row) {
                        Ok(_) => rows += 1,
                        Err(e) => error!("Failed to write CSV row: {}", e),
                    }
                }
            }
        }
    }
    if let Err(e) = writer.flush() {
        error!("Failed to flush {}: {}", csv_file, e);
    }
    info!("Wrote {} rows to {}", rows, csv_file);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use trustlist::{ChainTermination, Provider, Service, ServiceStatus};

    fn record(subject: &str) -> CertificateRecord {
        CertificateRecord {
            raw_base64: "AA==".to_string(),
            pem: "-----BEGIN CERTIFICATE-----\nAA==\n-----END CERTIFICATE-----\n".to_string(),
            subject_cn: subject.to_string(),
            serial_hex: Some("0304".to_string()),
            public_key_algorithm: "RSA-2048".to_string(),
            signature_algorithm: "SHA-256".to_string(),
            valid_from: Some(1_554_212_245),
            valid_until: Some(1_743_601_045),
            expired: false,
            crl_urls: vec!["http://crl.example/ca.crl".to_string()],
            ca_issuers_url: None,
            chain: vec![],
            chain_termination: ChainTermination::NoFurtherIssuer,
            parse_failed: false,
        }
    }

    fn country() -> Country {
        let mut leaf = record("Example Leaf");
        leaf.chain = vec![record("Example Root")];
        Country {
            code: "NL".to_string(),
            name: "Netherlands".to_string(),
            providers: vec![Provider {
                name: "Example (Test) B.V.".to_string(),
                services: vec![Service {
                    type_uri: "http://uri.etsi.org/TrstSvc/Svctype/CA/QC".to_string(),
                    name: "CA/QC Service".to_string(),
                    status: ServiceStatus::Granted,
                    abilities: vec![],
                    certificates: vec![leaf],
                }],
            }],
        }
    }

    fn fresh_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn filename_components_drop_unsafe_characters() {
        assert_eq!(filename_component("A (B) C/D"), "A B CD");
        assert_eq!(filename_component("a:b*c?d\"e<f>g|h\\i"), "abcdefghi");
        assert_eq!(filename_component("  padded  "), "padded");
    }

    #[test]
    fn pem_files_use_sanitized_names_and_chain_suffix() {
        let dir = fresh_dir("tlharvest-pem-test");
        let written = write_pem_files(dir.to_str().unwrap(), &[country()]).unwrap();
        assert_eq!(written, 2);

        let stem = "NL - Example Test B.V. - CAQC Service - 0";
        let leaf = dir.join(format!("{}.pem", stem));
        let hop = dir.join(format!("{} - chain0.pem", stem));
        assert!(leaf.exists());
        assert!(hop.exists());
        let body = fs::read_to_string(&leaf).unwrap();
        assert!(body.starts_with("-----BEGIN CERTIFICATE-----"));
    }

    #[test]
    fn csv_rows_align_with_header() {
        let dir = fresh_dir("tlharvest-csv-test");
        let path = dir.join("output.csv");
        let rows = write_csv(path.to_str().unwrap(), &[country()]).unwrap();
        assert_eq!(rows, 1);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .from_path(&path)
            .unwrap();
        let headers = reader.headers().unwrap().clone();
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(headers.len(), row.len());

        let field = |name: &str| {
            let i = headers.iter().position(|h| h == name).unwrap();
            row[i].to_string()
        };
        assert_eq!(field("country_code"), "NL");
        assert_eq!(field("provider"), "Example (Test) B.V.");
        assert_eq!(field("service_type"), "qualified certificate issuing trust service");
        assert_eq!(field("service_status"), "granted");
        assert_eq!(field("subject"), "Example Leaf");
        assert_eq!(field("serial"), "0304");
        assert_eq!(field("valid_from"), "2019-04-02");
        assert_eq!(field("valid_until"), "2025-04-02");
        assert_eq!(field("crl_urls"), "http://crl.example/ca.crl");
        assert_eq!(field("chain_length"), "1");
        assert_eq!(field("chain_termination"), "no further issuer");
        assert_eq!(field("parse_failed"), "false");
    }
}
