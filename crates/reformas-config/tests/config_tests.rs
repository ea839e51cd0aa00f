use reformas_config::{Config, ConfigError, ConfigManager, PrintSettings};
use tempfile::tempdir;

#[test]
fn default_config_targets_brazilian_reais() {
    let cfg = Config::default();

    assert_eq!(cfg.locale, "pt-BR");
    assert_eq!(cfg.currency, "BRL");
    assert_eq!(cfg.print.margin_mm, 10);
    assert_eq!(cfg.quote_defaults.validity_days, 15);
    assert!(!cfg.company.name.is_empty());
    assert!(cfg.resolve_quote_root().ends_with("Orcamentos"));
    assert!(cfg.resolve_backup_root().ends_with("Orcamentos/backups"));
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"), dir.path().join("backups"));
    assert_eq!(manager.load().expect("load"), Config::default());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut cfg = Config::default();
    cfg.currency = "USD".to_string();
    cfg.locale = "en-US".to_string();
    cfg.company.phone = "(11) 4000-0000".to_string();
    cfg.quote_defaults.execution_time = "45 dias".to_string();
    cfg.print = PrintSettings { margin_mm: 15 };
    cfg.quote_root = Some(dir.path().join("quotes"));

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert_eq!(loaded.resolve_quote_root(), dir.path().join("quotes"));
    assert_eq!(loaded.resolve_backup_root(), dir.path().join("quotes").join("backups"));
}

#[test]
fn partial_config_file_fills_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"), dir.path().join("backups"));
    std::fs::write(
        manager.config_path(),
        r#"{ "locale": "pt-BR", "currency": "BRL" }"#,
    )
    .expect("write");

    let loaded = manager.load().expect("load");
    assert_eq!(loaded.print, PrintSettings::default());
    assert_eq!(loaded.quote_defaults.payment_schedule.len(), 3);
    assert!(loaded.ui_color_enabled);
}

#[test]
fn snapshots_are_listed_newest_first_and_restorable() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    std::fs::write(manager.backups_dir().join("notes.txt"), "not a snapshot").expect("write");

    let mut cfg = Config::default();
    cfg.company.website = String::new();
    let snapshot = manager.snapshot(&cfg, Some("Sem site!")).expect("snapshot");
    assert!(snapshot.name.starts_with("config-"));
    assert!(snapshot.name.ends_with("-sem-site.json"));
    assert_eq!(snapshot.note.as_deref(), Some("sem-site"));
    assert!(snapshot.created_at.is_some());
    assert_eq!(manager.snapshots().expect("list"), vec![snapshot.clone()]);

    let restored = manager.restore(&snapshot.name).expect("restore");
    assert!(restored.company.website.is_empty());
    assert_eq!(manager.load().expect("load"), restored);
}

#[test]
fn restore_snapshots_the_config_it_replaces() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let original = Config::default();
    let snapshot = manager.snapshot(&original, None).expect("snapshot");
    assert_eq!(snapshot.note, None);

    let mut edited = Config::default();
    edited.currency = "USD".to_string();
    manager.save(&edited).expect("save");

    manager.restore(&snapshot.name).expect("restore");
    assert_eq!(manager.load().expect("load"), original);

    let safety = manager
        .snapshots()
        .expect("list")
        .into_iter()
        .find(|s| s.note.as_deref() == Some("before-restore"))
        .expect("pre-restore snapshot");
    let undone = manager.restore(&safety.name).expect("undo restore");
    assert_eq!(undone.currency, "USD");
}

#[test]
fn restore_rejects_unknown_or_escaping_names() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    manager.save(&Config::default()).expect("save");

    for name in ["config-missing.json", "../config.json", "config.json"] {
        assert!(matches!(
            manager.restore(name),
            Err(ConfigError::BackupNotFound(_))
        ));
    }
    assert!(manager.snapshots().expect("list").is_empty());
}
