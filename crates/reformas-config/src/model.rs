use std::path::PathBuf;

use reformas_domain::{CompanyProfile, QuoteDefaults};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LOCALE: &str = "pt-BR";
pub const DEFAULT_CURRENCY: &str = "BRL";

/// Company profile, quote defaults and local preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default)]
    pub company: CompanyProfile,
    #[serde(default)]
    pub quote_defaults: QuoteDefaults,
    #[serde(default)]
    pub print: PrintSettings,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_opened_quote: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// JSON file replacing the built-in service catalog.
    pub catalog_path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for quotes. Defaults to `~/Documents/Orcamentos`.
    pub quote_root: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for backups. Defaults to `~/Documents/Orcamentos/backups`.
    pub backup_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.into(),
            currency: DEFAULT_CURRENCY.into(),
            company: CompanyProfile::default(),
            quote_defaults: QuoteDefaults::default(),
            print: PrintSettings::default(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            last_opened_quote: None,
            catalog_path: None,
            quote_root: None,
            backup_root: None,
        }
    }
}

impl Config {
    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn resolve_quote_root(&self) -> PathBuf {
        if let Some(path) = &self.quote_root {
            return path.clone();
        }

        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("Orcamentos")
    }

    pub fn resolve_backup_root(&self) -> PathBuf {
        if let Some(path) = &self.backup_root {
            return path.clone();
        }
        self.resolve_quote_root().join("backups")
    }
}

/// Page setup for printed quotes. The page size is always A4.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrintSettings {
    #[serde(default = "PrintSettings::default_margin_mm")]
    pub margin_mm: u32,
}

impl PrintSettings {
    pub fn default_margin_mm() -> u32 {
        10
    }
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            margin_mm: Self::default_margin_mm(),
        }
    }
}
