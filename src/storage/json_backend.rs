use chrono::{NaiveDate, NaiveDateTime, Utc};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{ensure_dir, write_atomic, PathResolver},
    errors::LedgerError,
    ledger::{Ledger, CURRENT_SCHEMA_VERSION},
};

use super::{Result, StorageBackend};

const LEDGER_EXTENSION: &str = "json";
const STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";
const STAMP_LEN: usize = 18;
const DEFAULT_RETENTION: usize = 5;

/// Stores each ledger as `<root>/ledgers/<stem>.json` with backups under `<root>/backups/<stem>/`.
///
/// Every save first copies the current file into an automatic backup; only the newest
/// `retention` automatic backups are kept. Snapshots taken through
/// [`StorageBackend::backup`] are never pruned.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    ledgers_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let app_root = PathResolver::resolve_base(root);
        ensure_dir(&app_root)?;
        let ledgers_dir = PathResolver::ledger_dir_in(&app_root);
        let backups_dir = PathResolver::backup_dir_in(&app_root);
        ensure_dir(&ledgers_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            root: app_root,
            ledgers_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn ledger_path(&self, name: &str) -> PathBuf {
        self.ledgers_dir
            .join(format!("{}.{}", file_stem(name), LEDGER_EXTENSION))
    }

    pub fn backup_path(&self, name: &str, backup_name: &str) -> PathBuf {
        self.backup_dir(name).join(backup_name)
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(file_stem(name))
    }

    fn write_backup(&self, name: &str, kind: BackupKind, note: Option<&str>, json: &str) -> Result<String> {
        let file_name = BackupName::fresh(kind, note);
        write_atomic(&self.backup_dir(name).join(&file_name), json)?;
        Ok(file_name)
    }

    fn backup_current_file(&self, name: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let current = fs::read_to_string(path)?;
        self.write_backup(name, BackupKind::Automatic, None, &current)?;
        self.prune_automatic_backups(name)
    }

    fn prune_automatic_backups(&self, name: &str) -> Result<()> {
        let stale = self
            .list_backups(name)?
            .into_iter()
            .filter(|file| BackupName::parse(file).map(|backup| backup.kind) == Some(BackupKind::Automatic))
            .skip(self.retention);
        for file in stale {
            if let Err(err) = fs::remove_file(self.backup_path(name, &file)) {
                tracing::warn!(backup = %file, %err, "failed to prune automatic backup");
            }
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, ledger: &Ledger, name: &str) -> Result<PathBuf> {
        let path = self.ledger_path(name);
        self.backup_current_file(name, &path)?;
        save_ledger_to_path(ledger, &path)?;
        tracing::info!(path = %path.display(), records = ledger.record_count(), "ledger saved");
        Ok(path)
    }

    fn load(&self, name: &str) -> Result<Ledger> {
        let path = self.ledger_path(name);
        if !path.exists() {
            return Err(LedgerError::NotFound(format!("ledger `{}`", name)));
        }
        load_ledger_from_path(&path)
    }

    fn exists(&self, name: &str) -> bool {
        self.ledger_path(name).exists()
    }

    fn backup(&self, ledger: &Ledger, name: &str, note: Option<&str>) -> Result<String> {
        let json = serde_json::to_string_pretty(ledger)?;
        let file_name = self.write_backup(name, BackupKind::Snapshot, note, &json)?;
        tracing::info!(ledger = %name, backup = %file_name, "snapshot written");
        Ok(file_name)
    }

    /// Lists recognised backup files, newest first. Anything else in the folder is ignored.
    fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut found = Vec::new();
        for entry in fs::read_dir(dir)? {
            let Ok(file_name) = entry?.file_name().into_string() else {
                continue;
            };
            if let Some(backup) = BackupName::parse(&file_name) {
                found.push((backup.taken_at, file_name));
            }
        }
        found.sort_by(|a, b| b.cmp(a));
        Ok(found.into_iter().map(|(_, file_name)| file_name).collect())
    }

    /// Only names returned by [`list_backups`](StorageBackend::list_backups) for the same
    /// ledger are accepted. The current file is kept as an automatic backup before it is replaced.
    fn restore(&self, name: &str, backup_name: &str) -> Result<Ledger> {
        if !self.list_backups(name)?.iter().any(|file| file == backup_name) {
            return Err(LedgerError::StorageError(format!(
                "backup `{}` not found for ledger `{}`",
                backup_name, name
            )));
        }
        let ledger = load_ledger_from_path(&self.backup_path(name, backup_name))?;
        self.save(&ledger, name)?;
        tracing::info!(ledger = %name, backup = %backup_name, "ledger restored from backup");
        Ok(ledger)
    }
}

pub fn save_ledger_to_path(ledger: &Ledger, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(ledger)?;
    write_atomic(path, &json)
}

pub fn load_ledger_from_path(path: &Path) -> Result<Ledger> {
    let data = fs::read_to_string(path)?;
    let ledger: Ledger = serde_json::from_str(&data)?;
    if ledger.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(LedgerError::StorageError(format!(
            "ledger schema v{} is newer than supported v{}",
            ledger.schema_version, CURRENT_SCHEMA_VERSION
        )));
    }
    Ok(ledger)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackupKind {
    Automatic,
    Snapshot,
}

impl BackupKind {
    fn prefix(self) -> &'static str {
        match self {
            Self::Automatic => "auto",
            Self::Snapshot => "snap",
        }
    }
}

/// Backup files are named `<auto|snap>-<YYYYMMDD>-<HHMMSSmmm>[-<note>].json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BackupName {
    kind: BackupKind,
    taken_at: NaiveDateTime,
}

impl BackupName {
    fn fresh(kind: BackupKind, note: Option<&str>) -> String {
        let now = Utc::now();
        let mut name = format!(
            "{}-{}{:03}",
            kind.prefix(),
            now.format(STAMP_FORMAT),
            now.timestamp_subsec_millis().min(999)
        );
        if let Some(slug) = note.and_then(note_slug) {
            name.push('-');
            name.push_str(&slug);
        }
        name.push('.');
        name.push_str(LEDGER_EXTENSION);
        name
    }

    fn parse(file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(LEDGER_EXTENSION)?.strip_suffix('.')?;
        let (prefix, rest) = stem.split_once('-')?;
        let kind = match prefix {
            "auto" => BackupKind::Automatic,
            "snap" => BackupKind::Snapshot,
            _ => return None,
        };
        let stamp = rest.get(..STAMP_LEN)?;
        let note = &rest[STAMP_LEN..];
        let note_ok = match kind {
            BackupKind::Automatic => note.is_empty(),
            BackupKind::Snapshot => note.is_empty() || (note.len() > 1 && note.starts_with('-')),
        };
        if !note_ok || stamp.as_bytes().get(8) != Some(&b'-') {
            return None;
        }
        let field = |from: usize, to: usize| -> Option<u32> {
            let digits = stamp.get(from..to)?;
            if digits.bytes().all(|b| b.is_ascii_digit()) {
                digits.parse().ok()
            } else {
                None
            }
        };
        let taken_at = NaiveDate::from_ymd_opt(i32::try_from(field(0, 4)?).ok()?, field(4, 6)?, field(6, 8)?)?
            .and_hms_milli_opt(field(9, 11)?, field(11, 13)?, field(13, 15)?, field(15, 18)?)?;
        Some(Self { kind, taken_at })
    }
}

/// Lowercase ASCII words of the note joined by `-`; `None` when nothing is left.
fn note_slug(note: &str) -> Option<String> {
    let words: Vec<String> = note
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();
    (!words.is_empty()).then(|| words.join("-"))
}

/// Escapes every byte outside `[a-z0-9-]` as `%xx`, so distinct ledger names never share a
/// file, even on case-insensitive filesystems. The empty name maps to `%`.
fn file_stem(name: &str) -> String {
    if name.is_empty() {
        return "%".into();
    }
    let mut stem = String::with_capacity(name.len());
    for byte in name.bytes() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' | b'-' => stem.push(char::from(byte)),
            _ => stem.push_str(&format!("%{:02x}", byte)),
        }
    }
    stem
}
