use crate::config::ProxyConfig;
use serde::Deserialize;

/// A settings document received over the settings channel.
///
/// Only `disable-scaffolding-substitution` is interpreted here; unknown keys
/// are carried by the document model and ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsDocument {
    pub success: bool,
    #[serde(default)]
    pub settings: Option<SettingsPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsPayload {
    #[serde(rename = "disable-scaffolding-substitution")]
    pub disable_scaffolding_substitution: Option<bool>,
}

impl SettingsDocument {
    pub fn from_bytes(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }
}

/// Session-scoped cache of world-affecting settings the remote server can
/// adjust at runtime.
#[derive(Debug, Clone)]
pub struct WorldCache {
    disable_scaffolding_substitution: bool,
}

impl WorldCache {
    pub fn new(config: &ProxyConfig) -> Self {
        Self {
            disable_scaffolding_substitution: config.disable_scaffolding_substitution,
        }
    }

    pub fn disable_scaffolding_substitution(&self) -> bool {
        self.disable_scaffolding_substitution
    }

    /// Merges a settings document into the cache.
    ///
    /// Unsuccessful documents and absent keys leave the cache untouched. A
    /// present key overwrites the cached value with `incoming OR local`:
    /// the local configuration can pin the feature off, the remote cannot
    /// override that, and within one application either side saying `true`
    /// wins. The cached value itself is not part of the OR; a later document
    /// may clear a remote-set flag when the local configuration allows it.
    pub fn apply_settings(&mut self, document: &SettingsDocument, config: &ProxyConfig) {
        if !document.success {
            return;
        }
        let Some(settings) = &document.settings else {
            return;
        };
        if let Some(incoming) = settings.disable_scaffolding_substitution {
            self.disable_scaffolding_substitution =
                incoming || config.disable_scaffolding_substitution;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(local: bool) -> ProxyConfig {
        ProxyConfig {
            disable_scaffolding_substitution: local,
            ..ProxyConfig::default()
        }
    }

    fn document(json: &str) -> SettingsDocument {
        SettingsDocument::from_bytes(json.as_bytes()).expect("document")
    }

    #[test]
    fn remote_enable_merges_over_local_false() {
        let config = config(false);
        let mut cache = WorldCache::new(&config);
        cache.apply_settings(
            &document(r#"{"success":true,"settings":{"disable-scaffolding-substitution":true}}"#),
            &config,
        );
        assert!(cache.disable_scaffolding_substitution());
    }

    #[test]
    fn local_true_survives_remote_false() {
        let config = config(true);
        let mut cache = WorldCache::new(&config);
        cache.apply_settings(
            &document(r#"{"success":true,"settings":{"disable-scaffolding-substitution":false}}"#),
            &config,
        );
        assert!(cache.disable_scaffolding_substitution());
    }

    #[test]
    fn unsuccessful_document_is_a_no_op() {
        let config = config(false);
        let mut cache = WorldCache::new(&config);
        cache.apply_settings(
            &document(r#"{"success":false,"settings":{"disable-scaffolding-substitution":true}}"#),
            &config,
        );
        assert!(!cache.disable_scaffolding_substitution());
    }

    #[test]
    fn absent_key_leaves_cache_untouched() {
        let config = config(false);
        let mut cache = WorldCache::new(&config);
        cache.apply_settings(
            &document(r#"{"success":true,"settings":{"some-other-setting":true}}"#),
            &config,
        );
        assert!(!cache.disable_scaffolding_substitution());

        cache.apply_settings(&document(r#"{"success":true}"#), &config);
        assert!(!cache.disable_scaffolding_substitution());
    }

    // Documented behavior, inherited deliberately: the merge recomputes from
    // the incoming value and the local configuration only, so with the local
    // preference off, a later explicit `false` clears an earlier remote
    // `true` instead of latching it.
    #[test]
    fn later_document_can_clear_remote_enable() {
        let config = config(false);
        let mut cache = WorldCache::new(&config);
        cache.apply_settings(
            &document(r#"{"success":true,"settings":{"disable-scaffolding-substitution":true}}"#),
            &config,
        );
        assert!(cache.disable_scaffolding_substitution());

        cache.apply_settings(
            &document(r#"{"success":true,"settings":{"disable-scaffolding-substitution":false}}"#),
            &config,
        );
        assert!(!cache.disable_scaffolding_substitution());
    }

    #[test]
    fn malformed_document_fails_to_parse() {
        assert!(SettingsDocument::from_bytes(b"{\"success\":").is_err());
        assert!(SettingsDocument::from_bytes(b"not json at all").is_err());
    }
}
