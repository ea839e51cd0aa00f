use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use reformas_core::{CoreError, QuoteStore};
use reformas_domain::Quote;
use tracing::{debug, info, warn};

const QUOTE_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;
/// Backup label for a previous snapshot that no longer parses.
const UNREADABLE_NOTE: &str = "unreadable";

/// Directory roots used by [`JsonQuoteStorage`].
#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub quote_root: PathBuf,
    pub backup_root: PathBuf,
}

/// A backup snapshot written next to the live quote files.
#[derive(Debug, Clone)]
pub struct QuoteBackupInfo {
    pub quote: String,
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub path: PathBuf,
}

/// Filesystem-backed JSON persistence for quotes and their backups.
#[derive(Debug, Clone)]
pub struct JsonQuoteStorage {
    quotes_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonQuoteStorage {
    pub fn new(paths: StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, CoreError> {
        fs::create_dir_all(&paths.quote_root)?;
        fs::create_dir_all(&paths.backup_root)?;
        Ok(Self {
            quotes_dir: paths.quote_root,
            backups_dir: paths.backup_root,
            retention: retention.max(1),
        })
    }

    pub fn quote_path(&self, key: &str) -> PathBuf {
        self.quotes_dir
            .join(format!("{}.{}", canonical_key(key), QUOTE_EXTENSION))
    }

    pub fn backup_quote(
        &self,
        key: &str,
        quote: &Quote,
        note: Option<&str>,
    ) -> Result<QuoteBackupInfo, CoreError> {
        let (file_name, path) = self.next_backup_path(key, note)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &serialize_quote(quote)?)?;
        fs::rename(&tmp, &path)?;
        self.finish_backup(key, file_name, path)
    }

    /// Copies the bytes at `source` into the backups of `key` without parsing them.
    pub fn backup_raw_file(
        &self,
        key: &str,
        source: &Path,
        note: Option<&str>,
    ) -> Result<QuoteBackupInfo, CoreError> {
        let (file_name, path) = self.next_backup_path(key, note)?;
        let tmp = tmp_path(&path);
        fs::copy(source, &tmp)?;
        fs::rename(&tmp, &path)?;
        self.finish_backup(key, file_name, path)
    }

    /// Backups for `key`, newest first.
    pub fn list_backups(&self, key: &str) -> Result<Vec<QuoteBackupInfo>, CoreError> {
        let dir = self.backup_dir(key);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let slug = canonical_key(key);
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(QUOTE_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(QuoteBackupInfo {
                    quote: slug.clone(),
                    id: file_name.to_string(),
                    created_at: parse_backup_timestamp(file_name),
                    path: path.clone(),
                });
            }
        }
        entries.sort_by(|a, b| (Reverse(a.created_at), &a.id).cmp(&(Reverse(b.created_at), &b.id)));
        Ok(entries)
    }

    /// Copies a backup over the live quote file and returns the restored quote.
    pub fn restore_backup(&self, backup: &QuoteBackupInfo) -> Result<Quote, CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!(
                "backup `{}` not found",
                backup.id
            )));
        }
        let quote = load_quote_from_path(&backup.path)?;
        self.save(&backup.quote, &quote)?;
        info!(key = %backup.quote, backup = %backup.id, "restored quote backup");
        Ok(quote)
    }

    /// The listed backup of `key` named `backup_id`.
    pub fn find_backup(&self, key: &str, backup_id: &str) -> Result<QuoteBackupInfo, CoreError> {
        self.list_backups(key)?
            .into_iter()
            .find(|backup| backup.id == backup_id)
            .ok_or_else(|| {
                CoreError::Storage(format!("backup `{backup_id}` not found for {key}"))
            })
    }

    pub fn delete_backup(&self, key: &str, backup_id: &str) -> Result<(), CoreError> {
        let backup = self.find_backup(key, backup_id)?;
        fs::remove_file(&backup.path)?;
        info!(key = %backup.quote, backup = %backup.id, "deleted quote backup");
        Ok(())
    }

    fn backup_dir(&self, key: &str) -> PathBuf {
        self.backups_dir.join(canonical_key(key))
    }

    fn next_backup_path(&self, key: &str, note: Option<&str>) -> Result<(String, PathBuf), CoreError> {
        let dir = self.backup_dir(key);
        fs::create_dir_all(&dir)?;
        let mut stem = format!(
            "{}_{}",
            canonical_key(key),
            Utc::now().format(BACKUP_TIMESTAMP_FORMAT)
        );
        if let Some(label) = sanitize_backup_note(note) {
            stem = format!("{label}_{stem}");
        }
        let file_name = format!("{stem}.{QUOTE_EXTENSION}");
        let path = dir.join(&file_name);
        Ok((file_name, path))
    }

    fn finish_backup(
        &self,
        key: &str,
        file_name: String,
        path: PathBuf,
    ) -> Result<QuoteBackupInfo, CoreError> {
        self.prune_backups(key)?;
        info!(key, backup = %file_name, "wrote quote backup");
        Ok(QuoteBackupInfo {
            quote: canonical_key(key),
            created_at: parse_backup_timestamp(&file_name),
            id: file_name,
            path,
        })
    }

    /// Backs up the snapshot about to be replaced. One that no longer parses is
    /// kept byte for byte so the new save still goes through.
    fn backup_existing_file(&self, key: &str, path: &Path) -> Result<(), CoreError> {
        if !path.exists() {
            return Ok(());
        }
        match load_quote_from_path(path) {
            Ok(quote) => {
                self.backup_quote(key, &quote, None)?;
            }
            Err(err) => {
                warn!(key, error = %err, "previous quote snapshot is unreadable; keeping a raw copy");
                self.backup_raw_file(key, path, Some(UNREADABLE_NOTE))?;
            }
        }
        Ok(())
    }

    fn prune_backups(&self, key: &str) -> Result<(), CoreError> {
        for entry in self.list_backups(key)?.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&entry.path) {
                warn!(key, backup = %entry.id, error = %err, "failed to prune quote backup");
            }
        }
        Ok(())
    }
}

impl QuoteStore for JsonQuoteStorage {
    fn load(&self, key: &str) -> Result<Option<Quote>, CoreError> {
        let path = self.quote_path(key);
        if !path.exists() {
            return Ok(None);
        }
        load_quote_from_path(&path).map(Some)
    }

    /// Keeps the previous snapshot as a backup before replacing it.
    fn save(&self, key: &str, quote: &Quote) -> Result<(), CoreError> {
        let path = self.quote_path(key);
        self.backup_existing_file(key, &path)?;
        save_quote_to_path(quote, &path)?;
        debug!(key, path = %path.display(), "saved quote snapshot");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CoreError> {
        let path = self.quote_path(key);
        if !path.exists() {
            return Err(CoreError::QuoteNotFound(key.to_string()));
        }
        fs::remove_file(path)?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>, CoreError> {
        if !self.quotes_dir.exists() {
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.quotes_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(QUOTE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Saves a quote to an arbitrary path on disk.
pub fn save_quote_to_path(quote: &Quote, path: &Path) -> Result<(), CoreError> {
    let tmp = tmp_path(path);
    write_atomic(&tmp, &serialize_quote(quote)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads a quote from the provided filesystem path.
pub fn load_quote_from_path(path: &Path) -> Result<Quote, CoreError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// File-safe form of a quote key. Quote numbers such as `ORC-2024-001` pass through unchanged.
pub fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' => c,
            _ => '-',
        })
        .collect();
    if sanitized.trim_matches('-').is_empty() {
        "quote".into()
    } else {
        sanitized
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Reads the trailing `YYYYmmdd_HHMMSS` of a backup file name.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(&format!(".{QUOTE_EXTENSION}"))?;
    let mut segments = stem.rsplit('_');
    let time = segments.next()?;
    let date = segments.next()?;
    if !is_digits(date, 8) || !is_digits(time, 6) {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{date}{time}"), "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
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

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

fn serialize_quote(quote: &Quote) -> Result<String, CoreError> {
    Ok(serde_json::to_string_pretty(quote)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_key_keeps_quote_numbers() {
        assert_eq!(canonical_key("ORC-2024-001"), "ORC-2024-001");
        assert_eq!(canonical_key(" a/b c "), "a-b-c");
        assert_eq!(canonical_key("///"), "quote");
    }

    #[test]
    fn backup_note_is_slugged() {
        assert_eq!(
            sanitize_backup_note(Some("Antes da revisão")),
            Some("antes-da-reviso".into())
        );
        assert_eq!(sanitize_backup_note(Some("  ")), None);
        assert_eq!(sanitize_backup_note(None), None);
    }

    #[test]
    fn backup_timestamp_parses_from_suffix() {
        let parsed = parse_backup_timestamp("pre-send_ORC-2024-001_20240315_142530.json")
            .expect("timestamp");
        assert_eq!(parsed.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-03-15 14:25:30");
        assert!(parse_backup_timestamp("ORC-2024-001.json").is_none());
    }
}
