#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

mod args;
mod output;

use std::process::exit;

use clap::Parser;
use log::{debug, error, info, LevelFilter};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use trustlist::{Harvester, HarvestSettings, HttpFetcher};

use crate::args::TlharvestArgs;
use crate::output::{write_csv, write_pem_files};

/// Point of entry for the tlharvest application.
fn main() {
    let args = TlharvestArgs::parse();

    let mut logging_configured = false;
    if let Some(logging_config) = &args.logging_config {
        if let Err(e) = log4rs::init_file(logging_config, Default::default()) {
            println!(
                "ERROR: failed to configure logging using {} with {:?}. Continuing without logging.",
                logging_config, e
            );
        } else {
            logging_configured = true;
        }
    }

    if !logging_configured {
        // if there's no config, prepare one using stdout
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{m}{n}")))
            .build();
        match Config::builder()
            .appender(Appender::builder().build("stdout", Box::new(stdout)))
            .build(Root::builder().appender("stdout").build(LevelFilter::Info))
        {
            Ok(config) => {
                if let Err(e) = log4rs::init_config(config) {
                    println!(
                        "ERROR: failed to configure logging for stdout with {:?}. Continuing without logging.",
                        e
                    );
                }
            }
            Err(e) => {
                println!("ERROR: failed to prepare default logging configuration with {:?}. Continuing without logging", e);
            }
        }
    }
    debug!("tlharvest start");

    let mut settings = match &args.settings {
        Some(settings_file) => match HarvestSettings::from_file(settings_file.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                error!("Failed to read settings from {}: {}", settings_file, e);
                exit(1);
            }
        },
        None => HarvestSettings::default(),
    };

    if !args.countries.is_empty() {
        settings.filter_countries = true;
        settings.include_countries = args.countries.clone();
    }

    let fetcher = match HttpFetcher::new() {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!("Failed to prepare HTTP client: {}", e);
            exit(1);
        }
    };
    let harvester = Harvester::new(&fetcher, &settings, args.time_of_interest);
    let countries = match harvester.run() {
        Ok(countries) => countries,
        Err(e) => {
            error!("Harvest failed: {}", e);
            exit(1);
        }
    };

    let harvested: usize = countries
        .iter()
        .flat_map(|c| &c.providers)
        .flat_map(|p| &p.services)
        .map(|s| s.certificates.len())
        .sum();
    info!(
        "Harvested {} certificates from {} countries",
        harvested,
        countries.len()
    );

    let mut failed = false;
    if let Err(e) = write_pem_files(&args.certs_folder, &countries) {
        error!("Failed to save PEM files: {}", e);
        failed = true;
    }
    if let Err(e) = write_csv(&args.csv_file, &countries) {
        error!("Failed to save CSV summary: {}", e);
        failed = true;
    }
    if failed {
        exit(1);
    }
}
