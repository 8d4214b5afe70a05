use crate::domain::resource::ResourceId;
use anyhow::Result;

/// External resource API port (implemented by Infrastructure)
pub trait ApiClient: Send + Sync {
    /// Create a resource under `path`, described by `label`.
    fn create(&self, path: &str, label: &str) -> Result<ResourceId>;

    /// Delete the resource living at `path`.
    fn delete(&self, path: &str) -> Result<()>;
}
