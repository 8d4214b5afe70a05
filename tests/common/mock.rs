//! Mock `ApiClient` implementations for integration tests.
#![allow(dead_code)]

use std::sync::Mutex;

use anyhow::{Result, anyhow};
use fixture_lifecycle::domain::ports::ApiClient;
use fixture_lifecycle::domain::resource::ResourceId;

/// Returns a fixed identifier and records every delete path.
pub struct FixedIdClient {
    pub id: String,
    pub creates: Mutex<Vec<(String, String)>>,
    pub deletes: Mutex<Vec<String>>,
    pub delete_error: Option<String>,
}

impl FixedIdClient {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            creates: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
            delete_error: None,
        }
    }

    pub fn with_delete_error(mut self, msg: impl Into<String>) -> Self {
        self.delete_error = Some(msg.into());
        self
    }

    pub fn create_count(&self) -> usize {
        self.creates.lock().unwrap().len()
    }

    pub fn delete_paths(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }
}

impl ApiClient for FixedIdClient {
    fn create(&self, path: &str, label: &str) -> Result<ResourceId> {
        self.creates
            .lock()
            .unwrap()
            .push((path.to_string(), label.to_string()));
        ResourceId::new(self.id.clone())
    }

    fn delete(&self, path: &str) -> Result<()> {
        self.deletes.lock().unwrap().push(path.to_string());
        match &self.delete_error {
            Some(msg) => Err(anyhow!("{msg}")),
            None => Ok(()),
        }
    }
}

/// Answers creation with an empty identifier, as a misbehaving API might.
pub struct BlankIdClient;

impl ApiClient for BlankIdClient {
    fn create(&self, _path: &str, _label: &str) -> Result<ResourceId> {
        ResourceId::new("")
    }

    fn delete(&self, path: &str) -> Result<()> {
        Err(anyhow!("unexpected delete of {path}"))
    }
}
