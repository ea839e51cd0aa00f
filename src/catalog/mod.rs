//! Service catalog sources: the built-in price list and JSON catalog files.

use std::{fs, path::Path};

use once_cell::sync::OnceCell;
use reformas_config::Config;
use reformas_core::ServiceCatalog;
use reformas_domain::ServiceCatalogEntry;
use tracing::{debug, info};

use crate::errors::ReformasError;

const SEED_CATALOG_JSON: &str = include_str!("seed_catalog.json");

static SEED_CATALOG: OnceCell<ServiceCatalog> = OnceCell::new();

/// The company's standard price list, parsed once per process.
pub fn seed_catalog() -> Result<&'static ServiceCatalog, ReformasError> {
    SEED_CATALOG.get_or_try_init(|| parse_catalog(SEED_CATALOG_JSON))
}

/// Parses a JSON array of catalog entries and checks ids and prices.
pub fn parse_catalog(json: &str) -> Result<ServiceCatalog, ReformasError> {
    let entries: Vec<ServiceCatalogEntry> = serde_json::from_str(json)
        .map_err(|err| ReformasError::Catalog(format!("invalid catalog: {err}")))?;
    Ok(ServiceCatalog::new(entries)?)
}

pub fn load_catalog_from_path(path: &Path) -> Result<ServiceCatalog, ReformasError> {
    let data = fs::read_to_string(path)?;
    let catalog = parse_catalog(&data)?;
    info!(path = %path.display(), entries = catalog.len(), "loaded service catalog");
    Ok(catalog)
}

/// The catalog file named in `config`, or the seed list when none is set.
pub fn catalog_for(config: &Config) -> Result<ServiceCatalog, ReformasError> {
    match &config.catalog_path {
        Some(path) => load_catalog_from_path(path),
        None => {
            debug!("using built-in service catalog");
            Ok(seed_catalog()?.clone())
        }
    }
}
