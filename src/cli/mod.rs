//! `reformas_cli`: command-line front end over the quote store.
//!
//! State lives under `PG_REFORMAS_HOME` when set, otherwise in the user's config
//! directory plus the quote root named in the config.

pub mod commands;
pub mod output;

use std::{env, path::PathBuf};

use reformas_config::{Config, ConfigManager};
use reformas_core::ServiceCatalog;
use reformas_storage_json::{JsonQuoteStorage, StoragePaths};
use tracing::debug;

use crate::{catalog::catalog_for, currency::LocaleFormatter, errors::ReformasError};

pub use output::Formatter;

/// Overrides every storage location with one base directory.
pub const HOME_ENV: &str = "PG_REFORMAS_HOME";

/// Everything a command needs: settings, store, catalog and output.
pub struct CliContext {
    pub config: Config,
    pub config_manager: ConfigManager,
    pub store: JsonQuoteStorage,
    pub catalog: ServiceCatalog,
    pub out: Formatter,
}

impl CliContext {
    pub fn from_env() -> Result<Self, ReformasError> {
        match env::var_os(HOME_ENV) {
            Some(home) => Self::with_home(PathBuf::from(home)),
            None => Self::with_manager(ConfigManager::for_user()?, None),
        }
    }

    /// Context whose config, quotes and backups all live under `home`.
    pub fn with_home(home: PathBuf) -> Result<Self, ReformasError> {
        let manager = ConfigManager::with_base_dir(home.clone())?;
        Self::with_manager(manager, Some(home))
    }

    fn with_manager(config_manager: ConfigManager, home: Option<PathBuf>) -> Result<Self, ReformasError> {
        let config = config_manager.load()?;
        let paths = match &home {
            Some(home) if config.quote_root.is_none() => StoragePaths {
                quote_root: home.join("quotes"),
                backup_root: home.join("backups"),
            },
            _ => StoragePaths {
                quote_root: config.resolve_quote_root(),
                backup_root: config.resolve_backup_root(),
            },
        };
        debug!(quotes = %paths.quote_root.display(), "opening quote store");
        let store = JsonQuoteStorage::new(paths)?;
        let catalog = catalog_for(&config)?;
        let out = Formatter::new();
        if !config.ui_color_enabled {
            out.disable_color();
        }
        Ok(Self {
            config,
            config_manager,
            store,
            catalog,
            out,
        })
    }

    pub fn formatter(&self) -> LocaleFormatter {
        LocaleFormatter::from_settings(&self.config.locale, &self.config.currency)
    }

    /// Remembers `key` as the quote most recently worked on.
    pub fn remember_quote(&mut self, key: &str) -> Result<(), ReformasError> {
        if self.config.last_opened_quote.as_deref() != Some(key) {
            self.config.last_opened_quote = Some(key.to_string());
            self.config_manager.save(&self.config)?;
        }
        Ok(())
    }

    /// `key` when given, else the last opened quote.
    pub fn quote_key(&self, key: Option<&String>) -> Result<String, ReformasError> {
        key.cloned()
            .or_else(|| self.config.last_opened_quote.clone())
            .ok_or_else(|| ReformasError::Usage("no quote given and none opened before".into()))
    }
}

/// Runs the CLI against the process arguments.
pub fn run_cli() -> Result<(), ReformasError> {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut context = CliContext::from_env()?;
    commands::dispatch(&mut context, &args)
}
