use crate::config::Config;
use crate::services::sales_source::SalesSource;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub manifest: JsManifest,
    pub source: SalesSource,
}

/// Maps asset names to their fingerprinted file names.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct JsManifest(HashMap<String, String>);

impl JsManifest {
    pub fn load(static_path: &Path) -> Self {
        let path = static_path.join("manifest.json");
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("manifest.json at {} is invalid: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => {
                tracing::warn!(
                    "manifest.json not found at {}, using empty manifest",
                    path.display()
                );
                Self::default()
            }
        }
    }

    pub fn get(&self, name: &str) -> String {
        self.0
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_falls_back_to_name() {
        let manifest = JsManifest::default();
        assert_eq!(manifest.get("dashboard.js"), "dashboard.js");
    }

    #[test]
    fn test_manifest_resolves_entries() {
        let manifest: JsManifest =
            serde_json::from_str(r#"{"dashboard.js": "dashboard-3f2a1c.js"}"#).unwrap();
        assert_eq!(manifest.get("dashboard.js"), "dashboard-3f2a1c.js");
    }

    #[test]
    fn test_missing_manifest_is_empty() {
        let manifest = JsManifest::load(Path::new("does/not/exist"));
        assert_eq!(manifest.get("app.css"), "app.css");
    }
}
