use crate::domain::resource::ResourcePath;
use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_LABEL: &str = "dynamicUser";
pub const STATIC_USER_ID: &str = "staticUserId";

/// Settings for a fixture run.
///
/// Loaded from JSON; every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    /// Resource API root. `None` runs against the in-memory client.
    pub base_url: Option<String>,
    pub resource_path: ResourcePath,
    pub label: String,
    pub static_id: String,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            resource_path: ResourcePath::default(),
            label: DEFAULT_LABEL.to_string(),
            static_id: STATIC_USER_ID.to_string(),
        }
    }
}

impl FixtureConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply command-line overrides on top of file values.
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        resource_path: Option<String>,
        label: Option<String>,
    ) -> Self {
        if base_url.is_some() {
            self.base_url = base_url;
        }
        if let Some(path) = resource_path {
            self.resource_path = ResourcePath::new(&path);
        }
        if let Some(label) = label {
            self.label = label;
        }
        self
    }
}
