//! Engine configuration.
//!
//! All values have defaults matching the hosted site's conventions; hosts
//! override them through embedded JSON parsed with
//! [`EngineConfig::from_json`].

use std::time::Duration;

use serde::Deserialize;

/// Engine configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Per-page resource name appended to the canonical path.
    pub resource_name: String,
    /// Id of the element carrying a page's main content.
    pub content_region_id: String,
    /// Scroll-spy threshold: a heading whose top edge is at or above this
    /// offset (in pixels from the viewport top) counts as scrolled past.
    pub scroll_offset: f64,
    /// Quiet period for the trailing-edge scroll debounce, in milliseconds.
    pub scroll_debounce_ms: u64,
    /// Validity window of the manual-selection lock, in milliseconds.
    pub manual_lock_ms: u64,
    /// Delay before re-running the scroll spy after content install, in
    /// milliseconds (headings may not have final layout until paint
    /// settles).
    pub settle_delay_ms: u64,
    /// Delay before scrolling to a clicked heading, in milliseconds.
    pub nav_scroll_delay_ms: u64,
    /// Minimum heading level treated as nested for outline auto-expansion.
    pub auto_expand_min_level: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            resource_name: "index.html".to_owned(),
            content_region_id: "content".to_owned(),
            scroll_offset: 50.0,
            scroll_debounce_ms: 10,
            manual_lock_ms: 2000,
            settle_delay_ms: 200,
            nav_scroll_delay_ms: 100,
            auto_expand_min_level: 3,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from host-embedded JSON.
    ///
    /// Absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub(crate) fn scroll_debounce(&self) -> Duration {
        Duration::from_millis(self.scroll_debounce_ms)
    }

    pub(crate) fn manual_lock(&self) -> Duration {
        Duration::from_millis(self.manual_lock_ms)
    }

    pub(crate) fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub(crate) fn nav_scroll_delay(&self) -> Duration {
        Duration::from_millis(self.nav_scroll_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_defaults_match_site_conventions() {
        let config = EngineConfig::default();
        assert_eq!(config.resource_name, "index.html");
        assert_eq!(config.content_region_id, "content");
        assert_eq!(config.scroll_offset, 50.0);
        assert_eq!(config.scroll_debounce_ms, 10);
        assert_eq!(config.manual_lock_ms, 2000);
        assert_eq!(config.auto_expand_min_level, 3);
    }

    #[test]
    fn test_from_json_overrides_only_given_fields() {
        let config =
            EngineConfig::from_json(r#"{"scroll_offset": 80.0, "manual_lock_ms": 500}"#).unwrap();
        assert_eq!(config.scroll_offset, 80.0);
        assert_eq!(config.manual_lock_ms, 500);
        assert_eq!(config.resource_name, "index.html");
    }

    #[test]
    fn test_from_json_rejects_malformed_input() {
        assert!(EngineConfig::from_json("not json").is_err());
    }
}
