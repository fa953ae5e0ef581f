// ==========================================
// PTM upload validator - configuration reader trait
// ==========================================
// Read-only seam between the pipeline host and the config store
// Implementor: ConfigManager (config_kv table)
// ==========================================

use crate::config::validation_config::ValidationConfig;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::error::Error;

// ==========================================
// ValidationConfigReader Trait
// ==========================================
#[async_trait]
pub trait ValidationConfigReader: Send + Sync {
    /// Upload size limit in bytes
    ///
    /// # Default
    /// - 50 MB
    async fn get_max_file_size_bytes(&self) -> Result<u64, Box<dyn Error>>;

    /// Rows kept in the report preview
    ///
    /// # Default
    /// - 100
    async fn get_preview_row_limit(&self) -> Result<usize, Box<dyn Error>>;

    /// Locale of the rendered report ("en", "zh-CN")
    async fn get_locale(&self) -> Result<String, Box<dyn Error>>;

    /// Extra header spellings per canonical key
    ///
    /// # Returns
    /// - key -> spellings, empty when nothing is configured
    async fn get_extra_aliases(&self) -> Result<BTreeMap<String, Vec<String>>, Box<dyn Error>>;

    /// Assemble a full ValidationConfig
    async fn load_validation_config(&self) -> Result<ValidationConfig, Box<dyn Error>> {
        let max_file_size_bytes = self.get_max_file_size_bytes().await?;
        let preview_row_limit = self.get_preview_row_limit().await?;
        let locale = self.get_locale().await?;
        let extra_aliases = self.get_extra_aliases().await?;

        Ok(ValidationConfig {
            max_file_size_bytes,
            preview_row_limit,
            locale,
            extra_aliases,
        })
    }
}
