//! User-facing settings.

use crate::config::CoreConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting {
    /// Maximum number of recent searches kept.
    pub recent_limit: usize,
    /// Maximum number of search candidates requested.
    pub search_limit: usize,
    /// Whether likes also write the legacy `"<name>.isLiked"` key.
    pub write_legacy_flags: bool,
}

crate::registered_entity!(Setting, "setting");

impl Default for Setting {
    fn default() -> Self {
        Self::from_config(&CoreConfig::default())
    }
}

impl Setting {
    pub fn from_config(config: &CoreConfig) -> Self {
        Self {
            recent_limit: config.recent_limit,
            search_limit: config.search_limit,
            write_legacy_flags: config.write_legacy_flags,
        }
    }
}
