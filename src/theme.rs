//! Theme preference storage
//!
//! The light/dark preference lives in a small SQLite key-value table in the
//! user data directory. When nothing is stored the terminal's reported color
//! scheme decides, and light is the last resort. Writing a preference stores
//! it and switches the active palette at once.

use crate::error::{ExpertError, Result};
use anyhow::Context;
use colored::Color;
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Storage key holding the theme
pub const THEME_KEY: &str = "theme";

/// Light or dark color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    /// Stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a theme name
    ///
    /// # Examples
    ///
    /// ```
    /// use iexpert::theme::ThemePreference;
    ///
    /// assert_eq!(ThemePreference::parse_str("Dark").unwrap(), ThemePreference::Dark);
    /// assert!(ThemePreference::parse_str("sepia").is_err());
    /// ```
    pub fn parse_str(s: &str) -> std::result::Result<Self, ExpertError> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ExpertError::Theme(format!("Unknown theme: {}", other))),
        }
    }

    /// The other theme
    pub fn toggled(&self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Colors used to render with this theme
    pub fn palette(&self) -> Palette {
        match self {
            Self::Light => Palette {
                user: Color::Blue,
                assistant: Color::Black,
                muted: Color::BrightBlack,
                accent: Color::Magenta,
                error: Color::Red,
            },
            Self::Dark => Palette {
                user: Color::BrightCyan,
                assistant: Color::BrightWhite,
                muted: Color::White,
                accent: Color::BrightYellow,
                error: Color::BrightRed,
            },
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal colors for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub user: Color,
    pub assistant: Color,
    pub muted: Color,
    pub accent: Color,
    pub error: Color,
}

/// Durable string key-value storage
pub trait PreferenceStore {
    /// Read a value
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Preference storage backed by a SQLite file
pub struct SqlitePreferences {
    db_path: PathBuf,
}

impl SqlitePreferences {
    /// Open the database in the user data directory
    ///
    /// # Errors
    ///
    /// Returns error if the data directory cannot be determined or created
    pub fn new() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "iexpert", "iexpert")
            .ok_or_else(|| ExpertError::Storage("Could not determine data directory".into()))?;
        Self::new_with_path(proj_dirs.data_dir().join("preferences.db"))
    }

    /// Open the database at an explicit path
    ///
    /// # Examples
    ///
    /// ```
    /// use iexpert::theme::{PreferenceStore, SqlitePreferences};
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let prefs = SqlitePreferences::new_with_path(dir.path().join("prefs.db")).unwrap();
    /// prefs.set("theme", "dark").unwrap();
    /// assert_eq!(prefs.get("theme").unwrap().as_deref(), Some("dark"));
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for database")
                .map_err(|e| ExpertError::Storage(e.to_string()))?;
        }

        let storage = Self { db_path };
        storage.init()?;
        Ok(storage)
    }

    /// Open the configured database, or the default one
    pub fn open(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::new_with_path(p),
            None => Self::new(),
        }
    }

    /// Location of the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.db_path)
            .context("Failed to open database")
            .map_err(|e| ExpertError::Storage(e.to_string()).into())
    }

    fn init(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )
        .map_err(|e| ExpertError::Storage(format!("Failed to create table: {}", e)))?;
        Ok(())
    }
}

impl PreferenceStore for SqlitePreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.connect()?;
        let value = conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(ExpertError::Database)?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO preferences (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )
        .map_err(ExpertError::Database)?;
        Ok(())
    }
}

/// In-memory preference storage, for tests and one-shot commands
#[derive(Default)]
pub struct MemoryPreferences {
    values: Mutex<HashMap<String, String>>,
    writes: Mutex<usize>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls that reached the store
    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        *self.writes.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        Ok(())
    }
}

/// Source of the ambient light/dark preference
pub trait ColorSchemeProbe {
    fn detect(&self) -> Option<ThemePreference>;
}

/// Reads `IEXPERT_COLOR_SCHEME`, falling back to the terminal's `COLORFGBG`
pub struct EnvColorScheme;

impl ColorSchemeProbe for EnvColorScheme {
    fn detect(&self) -> Option<ThemePreference> {
        if let Ok(value) = std::env::var("IEXPERT_COLOR_SCHEME") {
            match ThemePreference::parse_str(&value) {
                Ok(theme) => return Some(theme),
                Err(e) => tracing::warn!("Ignoring IEXPERT_COLOR_SCHEME: {}", e),
            }
        }
        std::env::var("COLORFGBG")
            .ok()
            .and_then(|v| scheme_from_colorfgbg(&v))
    }
}

/// Fixed probe answer
pub struct FixedColorScheme(pub Option<ThemePreference>);

impl ColorSchemeProbe for FixedColorScheme {
    fn detect(&self) -> Option<ThemePreference> {
        self.0
    }
}

/// Interpret a `COLORFGBG` value such as `15;0` or `0;default;15`
///
/// The last field is the background color index; the first eight ANSI colors
/// except white (7), plus bright black (8), are dark backgrounds.
pub fn scheme_from_colorfgbg(value: &str) -> Option<ThemePreference> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    match bg {
        0..=6 | 8 => Some(ThemePreference::Dark),
        _ => Some(ThemePreference::Light),
    }
}

/// Reads, writes and applies the theme preference
pub struct ThemeStore<S: PreferenceStore> {
    storage: S,
    os_preference: Option<ThemePreference>,
    applied: ThemePreference,
}

impl<S: PreferenceStore> ThemeStore<S> {
    /// Create the store, consulting the probe once and applying the result of `read`
    pub fn new(storage: S, probe: &dyn ColorSchemeProbe) -> Self {
        let mut store = Self {
            storage,
            os_preference: probe.detect(),
            applied: ThemePreference::Light,
        };
        store.applied = store.read();
        tracing::debug!(theme = %store.applied, "Theme initialized");
        store
    }

    /// Stored preference, else OS preference, else light
    ///
    /// Any stored value decides: exactly `"dark"` is dark, anything else is
    /// light. Only an empty store or a storage failure consults the OS.
    pub fn read(&self) -> ThemePreference {
        match self.storage.get(THEME_KEY) {
            Ok(Some(value)) if value == ThemePreference::Dark.as_str() => {
                return ThemePreference::Dark;
            }
            Ok(Some(value)) => {
                tracing::debug!(stored = %value, "Stored theme is not dark, using light");
                return ThemePreference::Light;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Failed to read theme preference: {:#}", e),
        }
        self.os_preference.unwrap_or_default()
    }

    /// Persist `value` and apply it
    ///
    /// Writing the value that is already stored and applied does nothing.
    pub fn write(&mut self, value: ThemePreference) -> Result<()> {
        let stored = self.storage.get(THEME_KEY).ok().flatten();
        if self.applied == value && stored.as_deref() == Some(value.as_str()) {
            tracing::debug!(theme = %value, "Theme unchanged");
            return Ok(());
        }
        self.storage.set(THEME_KEY, value.as_str())?;
        self.applied = value;
        tracing::debug!(theme = %value, "Theme applied");
        Ok(())
    }

    /// Switch to the other theme and return it
    pub fn toggle(&mut self) -> Result<ThemePreference> {
        let next = self.applied.toggled();
        self.write(next)?;
        Ok(next)
    }

    /// Theme currently applied
    pub fn current(&self) -> ThemePreference {
        self.applied
    }

    /// Palette of the applied theme
    pub fn palette(&self) -> Palette {
        self.applied.palette()
    }

    /// Underlying storage
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::temp_dir;

    #[test]
    fn test_parse_and_display() {
        assert_eq!(ThemePreference::parse_str(" light ").unwrap(), ThemePreference::Light);
        assert_eq!(ThemePreference::Dark.to_string(), "dark");
        assert!(ThemePreference::parse_str("").is_err());
    }

    #[test]
    fn test_read_defaults_to_light() {
        let store = ThemeStore::new(MemoryPreferences::new(), &FixedColorScheme(None));
        assert_eq!(store.read(), ThemePreference::Light);
        assert_eq!(store.current(), ThemePreference::Light);
    }

    #[test]
    fn test_read_uses_os_preference_when_nothing_stored() {
        let store = ThemeStore::new(
            MemoryPreferences::new(),
            &FixedColorScheme(Some(ThemePreference::Dark)),
        );
        assert_eq!(store.current(), ThemePreference::Dark);
    }

    #[test]
    fn test_stored_value_beats_os_preference() {
        let prefs = MemoryPreferences::new();
        prefs.set(THEME_KEY, "light").unwrap();
        let store = ThemeStore::new(prefs, &FixedColorScheme(Some(ThemePreference::Dark)));
        assert_eq!(store.current(), ThemePreference::Light);
    }

    #[test]
    fn test_unrecognized_stored_value_is_light() {
        for stored in ["sepia", "Dark", ""] {
            let prefs = MemoryPreferences::new();
            prefs.set(THEME_KEY, stored).unwrap();
            let store = ThemeStore::new(prefs, &FixedColorScheme(Some(ThemePreference::Dark)));
            assert_eq!(store.current(), ThemePreference::Light, "stored {:?}", stored);
        }
    }

    #[test]
    fn test_write_applies_immediately() {
        let mut store = ThemeStore::new(MemoryPreferences::new(), &FixedColorScheme(None));
        store.write(ThemePreference::Dark).unwrap();
        assert_eq!(store.current(), ThemePreference::Dark);
        assert_eq!(store.palette(), ThemePreference::Dark.palette());
        assert_eq!(
            store.storage().get(THEME_KEY).unwrap().as_deref(),
            Some("dark")
        );
    }

    #[test]
    fn test_repeated_write_is_idempotent() {
        let mut store = ThemeStore::new(MemoryPreferences::new(), &FixedColorScheme(None));
        store.write(ThemePreference::Dark).unwrap();
        store.write(ThemePreference::Dark).unwrap();
        store.write(ThemePreference::Dark).unwrap();
        assert_eq!(store.storage().writes(), 1);
    }

    #[test]
    fn test_write_persists_os_derived_value() {
        let mut store = ThemeStore::new(
            MemoryPreferences::new(),
            &FixedColorScheme(Some(ThemePreference::Dark)),
        );
        store.write(ThemePreference::Dark).unwrap();
        assert_eq!(store.storage().writes(), 1);
    }

    #[test]
    fn test_toggle_flips() {
        let mut store = ThemeStore::new(MemoryPreferences::new(), &FixedColorScheme(None));
        assert_eq!(store.toggle().unwrap(), ThemePreference::Dark);
        assert_eq!(store.toggle().unwrap(), ThemePreference::Light);
    }

    #[test]
    fn test_sqlite_round_trip_ignores_os_preference() {
        let dir = temp_dir();
        let path = dir.path().join("nested").join("prefs.db");

        {
            let prefs = SqlitePreferences::new_with_path(&path).unwrap();
            let mut store = ThemeStore::new(prefs, &FixedColorScheme(None));
            store.toggle().unwrap();
            assert_eq!(store.current(), ThemePreference::Dark);
        }

        let prefs = SqlitePreferences::new_with_path(&path).unwrap();
        let store = ThemeStore::new(prefs, &FixedColorScheme(Some(ThemePreference::Light)));
        assert_eq!(store.current(), ThemePreference::Dark);
    }

    #[test]
    fn test_sqlite_overwrites_value() {
        let dir = temp_dir();
        let prefs = SqlitePreferences::new_with_path(dir.path().join("p.db")).unwrap();
        assert!(prefs.get(THEME_KEY).unwrap().is_none());
        prefs.set(THEME_KEY, "dark").unwrap();
        prefs.set(THEME_KEY, "light").unwrap();
        assert_eq!(prefs.get(THEME_KEY).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_scheme_from_colorfgbg() {
        assert_eq!(scheme_from_colorfgbg("15;0"), Some(ThemePreference::Dark));
        assert_eq!(scheme_from_colorfgbg("0;15"), Some(ThemePreference::Light));
        assert_eq!(scheme_from_colorfgbg("0;default;15"), Some(ThemePreference::Light));
        assert_eq!(scheme_from_colorfgbg("7;8"), Some(ThemePreference::Dark));
        assert_eq!(scheme_from_colorfgbg("garbage"), None);
    }
}
