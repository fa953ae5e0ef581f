// ==========================================
// PTM upload validator - configuration layer
// ==========================================
// Storage: config_kv table, defaults for absent keys
// ==========================================

pub mod config_manager;
pub mod validation_config;
pub mod validation_config_trait;

pub use config_manager::{config_keys, ConfigManager};
pub use validation_config::ValidationConfig;
pub use validation_config_trait::ValidationConfigReader;
