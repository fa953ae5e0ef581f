// ==========================================
// PTM upload validator - validation configuration
// ==========================================
// Plain value handed to the pipeline; loaded from config_kv
// through ValidationConfigReader or built in code
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 50 * 1024 * 1024;
pub const DEFAULT_PREVIEW_ROW_LIMIT: usize = 100;
pub const DEFAULT_LOCALE: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    pub max_file_size_bytes: u64,
    pub preview_row_limit: usize,
    pub locale: String,
    /// canonical key -> extra accepted spellings
    #[serde(default)]
    pub extra_aliases: BTreeMap<String, Vec<String>>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            preview_row_limit: DEFAULT_PREVIEW_ROW_LIMIT,
            locale: DEFAULT_LOCALE.to_string(),
            extra_aliases: BTreeMap::new(),
        }
    }
}
