use crate::domain::ports::ApiClient;
use crate::domain::resource::{ResourceId, ResourcePath};
use anyhow::{Result, anyhow};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// One call received by [`InMemoryApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Create { path: String, label: String },
    Delete { path: String },
}

/// Returned by [`InMemoryApiClient::delete`] when nothing lives at the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNotFound {
    pub path: String,
}

impl fmt::Display for ResourceNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Resource not found: {}", self.path)
    }
}

impl std::error::Error for ResourceNotFound {}

/// In-process resource API.
///
/// Identifiers are `{label}-{n}` with `n` taken from a counter. Calls are
/// journaled only when built with [`InMemoryApiClient::journaled`].
pub struct InMemoryApiClient {
    next: AtomicU64,
    live: Mutex<BTreeMap<String, String>>,
    journal: Option<Mutex<Vec<ApiCall>>>,
    create_error: Option<String>,
    delete_error: Option<String>,
}

impl InMemoryApiClient {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
            live: Mutex::new(BTreeMap::new()),
            journal: None,
            create_error: None,
            delete_error: None,
        }
    }

    /// Record every call for later inspection with [`InMemoryApiClient::calls`].
    pub fn journaled(mut self) -> Self {
        self.journal = Some(Mutex::new(Vec::new()));
        self
    }

    pub fn failing_create(mut self, msg: impl Into<String>) -> Self {
        self.create_error = Some(msg.into());
        self
    }

    pub fn failing_delete(mut self, msg: impl Into<String>) -> Self {
        self.delete_error = Some(msg.into());
        self
    }

    /// Calls received so far, in order. Empty unless journaled.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.journal
            .as_ref()
            .and_then(|j| j.lock().ok().map(|j| j.clone()))
            .unwrap_or_default()
    }

    /// Member paths of resources that exist right now.
    pub fn live_paths(&self) -> Vec<String> {
        self.live
            .lock()
            .map(|l| l.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn live_count(&self) -> usize {
        self.live.lock().map(|l| l.len()).unwrap_or_default()
    }

    /// Label a live resource was created with.
    pub fn label_of(&self, path: &str) -> Option<String> {
        self.live.lock().ok()?.get(path).cloned()
    }

    fn record(&self, call: ApiCall) -> Result<()> {
        let Some(journal) = &self.journal else {
            return Ok(());
        };
        journal
            .lock()
            .map_err(|_| anyhow!("journal lock poisoned"))?
            .push(call);
        Ok(())
    }
}

impl Default for InMemoryApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient for InMemoryApiClient {
    fn create(&self, path: &str, label: &str) -> Result<ResourceId> {
        self.record(ApiCall::Create {
            path: path.to_string(),
            label: label.to_string(),
        })?;
        if let Some(msg) = &self.create_error {
            return Err(anyhow!("{msg}"));
        }

        let n = self.next.fetch_add(1, Ordering::SeqCst);
        let id = ResourceId::new(format!("{label}-{n}"))?;
        let member = ResourcePath::new(path).member(&id);
        self.live
            .lock()
            .map_err(|_| anyhow!("store lock poisoned"))?
            .insert(member, label.to_string());
        Ok(id)
    }

    fn delete(&self, path: &str) -> Result<()> {
        self.record(ApiCall::Delete {
            path: path.to_string(),
        })?;
        if let Some(msg) = &self.delete_error {
            return Err(anyhow!("{msg}"));
        }

        self.live
            .lock()
            .map_err(|_| anyhow!("store lock poisoned"))?
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| {
                ResourceNotFound {
                    path: path.to_string(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_label_and_counter() {
        let client = InMemoryApiClient::starting_at(123);
        let a = client.create("/users", "dynamicUser").unwrap();
        let b = client.create("/users", "dynamicUser").unwrap();
        assert_eq!(a.as_str(), "dynamicUser-123");
        assert_eq!(b.as_str(), "dynamicUser-124");
        assert_eq!(
            client.live_paths(),
            vec!["/users/dynamicUser-123", "/users/dynamicUser-124"]
        );
    }

    #[test]
    fn test_delete_unknown_path_errors() {
        let client = InMemoryApiClient::new();
        let err = client.delete("/users/ghost").unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert_eq!(
            err.downcast_ref::<ResourceNotFound>(),
            Some(&ResourceNotFound {
                path: "/users/ghost".into()
            })
        );
    }

    #[test]
    fn test_delete_removes_live_resource() {
        let client = InMemoryApiClient::new().journaled();
        let id = client.create("users/", "u").unwrap();
        assert_eq!(client.label_of("/users/u-1").as_deref(), Some("u"));
        client.delete(&format!("/users/{id}")).unwrap();
        assert_eq!(client.live_count(), 0);
        assert_eq!(
            client.calls(),
            vec![
                ApiCall::Create {
                    path: "users/".into(),
                    label: "u".into()
                },
                ApiCall::Delete {
                    path: "/users/u-1".into()
                },
            ]
        );
    }

    #[test]
    fn test_injected_failures_are_journaled() {
        let client = InMemoryApiClient::new()
            .journaled()
            .failing_create("quota exceeded")
            .failing_delete("forbidden");
        assert!(client.create("/users", "u").is_err());
        assert!(client.delete("/users/u-1").is_err());
        assert_eq!(client.calls().len(), 2);
        assert_eq!(client.live_count(), 0);
    }

    #[test]
    fn test_unjournaled_store_keeps_no_history() {
        let client = InMemoryApiClient::new();
        for _ in 0..1000 {
            let id = client.create("/users", "u").unwrap();
            client.delete(&format!("/users/{id}")).unwrap();
        }
        assert!(client.calls().is_empty());
        assert!(client.journal.is_none());
        assert_eq!(client.live_count(), 0);
    }
}
