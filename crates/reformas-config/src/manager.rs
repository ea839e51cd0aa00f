use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing::{debug, info};

use crate::{Config, ConfigError};

const SNAPSHOT_PREFIX: &str = "config-";
const SNAPSHOT_STAMP: &str = "%Y%m%d-%H%M%S";
const STAMP_LEN: usize = 15;
const PRE_RESTORE_NOTE: &str = "before-restore";
const TMP_SUFFIX: &str = "tmp";

/// Loads and saves [`Config`] and keeps restorable snapshots of it.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf, backups_dir: PathBuf) -> Self {
        Self {
            config_path,
            backups_dir,
        }
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let config_dir = base.join("config");
        let backups_dir = config_dir.join("backups");
        fs::create_dir_all(&backups_dir)?;
        Ok(Self::new(config_dir.join("config.json"), backups_dir))
    }

    /// Manager rooted in the platform config directory (`~/.config/pg-reformas`).
    pub fn for_user() -> Result<Self, ConfigError> {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pg-reformas");
        Self::with_base_dir(base)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Reads the saved config, or defaults when nothing was saved yet.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.config_path.exists() {
            let data = fs::read_to_string(&self.config_path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.config_path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.config_path)?;
        Ok(())
    }

    /// Writes `config` to a timestamped snapshot under the backups directory.
    pub fn snapshot(&self, config: &Config, note: Option<&str>) -> Result<ConfigSnapshot, ConfigError> {
        let note = note.and_then(slugify);
        let stamp = Utc::now().format(SNAPSHOT_STAMP).to_string();
        let name = match &note {
            Some(label) => format!("{SNAPSHOT_PREFIX}{stamp}-{label}.json"),
            None => format!("{SNAPSHOT_PREFIX}{stamp}.json"),
        };
        write_file(&self.backups_dir.join(&name), &serde_json::to_string_pretty(config)?)?;
        info!(snapshot = %name, "configuration snapshot written");
        Ok(ConfigSnapshot {
            name,
            created_at: parse_stamp(&stamp),
            note,
        })
    }

    /// Replaces the saved config with the named snapshot.
    ///
    /// The config being replaced is snapshotted first (note `before-restore`)
    /// so a restore can itself be undone.
    pub fn restore(&self, name: &str) -> Result<Config, ConfigError> {
        let path = self.backups_dir.join(name);
        if !is_snapshot_name(name) || !path.is_file() {
            return Err(ConfigError::BackupNotFound(name.to_string()));
        }
        let restored: Config = serde_json::from_str(&fs::read_to_string(&path)?)?;
        if self.config_path.exists() {
            let current = self.load()?;
            self.snapshot(&current, Some(PRE_RESTORE_NOTE))?;
        }
        self.save(&restored)?;
        info!(snapshot = %name, "configuration restored");
        Ok(restored)
    }

    /// Snapshots on disk, newest first. Unrecognised files are ignored.
    pub fn snapshots(&self) -> Result<Vec<ConfigSnapshot>, ConfigError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut found = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let Some(name) = entry?.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            match ConfigSnapshot::from_name(&name) {
                Some(snapshot) => found.push(snapshot),
                None => debug!(file = %name, "skipping non-snapshot file"),
            }
        }
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.name.cmp(&a.name)));
        Ok(found)
    }
}

/// A configuration snapshot file in the backups directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSnapshot {
    /// File name, used as the identifier for [`ConfigManager::restore`].
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

impl ConfigSnapshot {
    fn from_name(name: &str) -> Option<Self> {
        if !is_snapshot_name(name) {
            return None;
        }
        let body = name.strip_prefix(SNAPSHOT_PREFIX)?.strip_suffix(".json")?;
        let (stamp, note) = match body.get(STAMP_LEN..) {
            Some("") => (body, None),
            Some(rest) => (body.get(..STAMP_LEN)?, Some(rest.strip_prefix('-')?.to_owned())),
            None => return None,
        };
        Some(Self {
            name: name.to_string(),
            created_at: parse_stamp(stamp),
            note,
        })
    }
}

fn is_snapshot_name(name: &str) -> bool {
    name.starts_with(SNAPSHOT_PREFIX)
        && name.ends_with(".json")
        && !name.contains(['/', '\\'])
}

fn slugify(note: &str) -> Option<String> {
    let slug = note
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    (!slug.is_empty()).then_some(slug)
}

fn parse_stamp(stamp: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(stamp, SNAPSHOT_STAMP)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
