// ==========================================
// PTM upload validator - configuration manager
// ==========================================
// Storage: config_kv table (scope_id = 'global')
// Absent or malformed keys fall back to defaults
// ==========================================

use crate::config::validation_config::{
    DEFAULT_LOCALE, DEFAULT_MAX_FILE_SIZE_BYTES, DEFAULT_PREVIEW_ROW_LIMIT,
};
use crate::config::validation_config_trait::ValidationConfigReader;
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// # Arguments
    /// - db_path: SQLite database file
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("lock poisoned: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// Global-scope value, None when unset
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// Insert or overwrite a global-scope value
    ///
    /// # Arguments
    /// - key: config key (see `config_keys`)
    /// - value: raw string value
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let key = key.trim();
        if key.is_empty() {
            return Err("config key must not be empty".into());
        }

        let conn = self.conn.lock().map_err(|e| format!("lock poisoned: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;

        debug!(config_key = key, "config value saved");
        Ok(())
    }

    /// Every global-scope entry, ordered by key
    pub fn list_configs(&self) -> Result<Vec<(String, String)>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("lock poisoned: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}

// ==========================================
// ValidationConfigReader impl
// ==========================================
#[async_trait]
impl ValidationConfigReader for ConfigManager {
    async fn get_max_file_size_bytes(&self) -> Result<u64, Box<dyn Error>> {
        let default = (DEFAULT_MAX_FILE_SIZE_BYTES / (1024 * 1024)).to_string();
        let value = self.get_config_or_default(config_keys::MAX_FILE_SIZE_MB, &default)?;
        match value.trim().parse::<u64>() {
            Ok(mb) if mb > 0 => Ok(mb * 1024 * 1024),
            _ => {
                warn!(config_key = config_keys::MAX_FILE_SIZE_MB, raw_value = %value, "invalid value, using default");
                Ok(DEFAULT_MAX_FILE_SIZE_BYTES)
            }
        }
    }

    async fn get_preview_row_limit(&self) -> Result<usize, Box<dyn Error>> {
        let value = self.get_config_or_default(
            config_keys::PREVIEW_ROW_LIMIT,
            &DEFAULT_PREVIEW_ROW_LIMIT.to_string(),
        )?;
        Ok(value.trim().parse::<usize>().unwrap_or(DEFAULT_PREVIEW_ROW_LIMIT))
    }

    async fn get_locale(&self) -> Result<String, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::LOCALE, DEFAULT_LOCALE)?;
        let value = value.trim();
        Ok(if value.is_empty() {
            DEFAULT_LOCALE.to_string()
        } else {
            value.to_string()
        })
    }

    async fn get_extra_aliases(&self) -> Result<BTreeMap<String, Vec<String>>, Box<dyn Error>> {
        let mut aliases = BTreeMap::new();
        for (key, raw) in self.list_configs()? {
            let field_key = match key.strip_prefix(config_keys::HEADER_ALIAS_PREFIX) {
                Some(k) if !k.is_empty() => k.to_string(),
                _ => continue,
            };
            match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(spellings) => {
                    aliases.insert(field_key, spellings);
                }
                Err(e) => {
                    warn!(config_key = %key, error = %e, "header alias value is not a JSON string array, skipped");
                }
            }
        }
        Ok(aliases)
    }
}

// ==========================================
// Config keys
// ==========================================
pub mod config_keys {
    pub const MAX_FILE_SIZE_MB: &str = "max_file_size_mb";
    pub const PREVIEW_ROW_LIMIT: &str = "preview_row_limit";
    pub const LOCALE: &str = "locale";

    /// `header_alias/<canonical key>` -> JSON array of spellings
    pub const HEADER_ALIAS_PREFIX: &str = "header_alias/";
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn manager() -> (tempfile::TempDir, ConfigManager) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.db");
        let manager = ConfigManager::new(path.to_str().unwrap()).unwrap();
        (dir, manager)
    }

    #[tokio::test]
    async fn test_defaults_when_empty() {
        let (_dir, manager) = manager();
        let config = manager.load_validation_config().await.unwrap();
        assert_eq!(config.max_file_size_bytes, DEFAULT_MAX_FILE_SIZE_BYTES);
        assert_eq!(config.preview_row_limit, 100);
        assert_eq!(config.locale, "en");
        assert!(config.extra_aliases.is_empty());
    }

    #[tokio::test]
    async fn test_overrides_and_aliases() {
        let (_dir, manager) = manager();
        manager.set_config_value(config_keys::MAX_FILE_SIZE_MB, "5").unwrap();
        manager.set_config_value(config_keys::PREVIEW_ROW_LIMIT, "20").unwrap();
        manager
            .set_config_value("header_alias/rollno", r#"["Admission No"]"#)
            .unwrap();
        manager.set_config_value("header_alias/batch", "not json").unwrap();

        let config = manager.load_validation_config().await.unwrap();
        assert_eq!(config.max_file_size_bytes, 5 * 1024 * 1024);
        assert_eq!(config.preview_row_limit, 20);
        assert_eq!(
            config.extra_aliases.get("rollno"),
            Some(&vec!["Admission No".to_string()])
        );
        assert!(!config.extra_aliases.contains_key("batch"));
    }

    #[tokio::test]
    async fn test_invalid_size_falls_back() {
        let (_dir, manager) = manager();
        manager.set_config_value(config_keys::MAX_FILE_SIZE_MB, "lots").unwrap();
        assert_eq!(
            manager.get_max_file_size_bytes().await.unwrap(),
            DEFAULT_MAX_FILE_SIZE_BYTES
        );
    }

    #[test]
    fn test_set_overwrites_and_lists_sorted() {
        let (_dir, manager) = manager();
        manager.set_config_value("locale", "en").unwrap();
        manager.set_config_value("locale", "zh-CN").unwrap();
        manager.set_config_value("preview_row_limit", "10").unwrap();

        let entries = manager.list_configs().unwrap();
        assert_eq!(
            entries,
            vec![
                ("locale".to_string(), "zh-CN".to_string()),
                ("preview_row_limit".to_string(), "10".to_string()),
            ]
        );
        assert!(manager.set_config_value("  ", "x").is_err());
    }
}
