//! Test fixtures and the scoped guard that provisions them.
//!
//! A static fixture is a literal identifier and touches no API. A dynamic
//! fixture is created through an [`ApiClient`] when acquired and deleted when
//! its [`Provisioned`] guard is released or dropped, whichever comes first.

use crate::domain::ports::ApiClient;
use crate::domain::resource::{ResourceId, ResourcePath};
use anyhow::{Context as _, Result};

/// How a test case obtains its resource identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureSpec {
    /// Hard-coded identifier. Never created, never deleted.
    Static(ResourceId),
    /// Created under `path` with `label` before the test, deleted after it.
    Dynamic { path: ResourcePath, label: String },
}

impl FixtureSpec {
    pub fn dynamic(path: impl Into<ResourcePath>, label: impl Into<String>) -> Self {
        Self::Dynamic {
            path: path.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureOrigin {
    Static,
    Provisioned { member_path: String },
}

/// What the test body sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    id: ResourceId,
    origin: FixtureOrigin,
}

impl Fixture {
    pub fn fixed(id: ResourceId) -> Self {
        Self {
            id,
            origin: FixtureOrigin::Static,
        }
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn origin(&self) -> &FixtureOrigin {
        &self.origin
    }

    pub fn is_provisioned(&self) -> bool {
        matches!(self.origin, FixtureOrigin::Provisioned { .. })
    }
}

/// Guard owning a resource created through an [`ApiClient`].
///
/// The resource is deleted exactly once: by [`Provisioned::release`], or by
/// `Drop` on any other exit path (early return, panic unwinding). Deletion
/// errors from `Drop` are logged and swallowed.
pub struct Provisioned<'c> {
    client: &'c dyn ApiClient,
    fixture: Fixture,
    armed: bool,
}

impl<'c> Provisioned<'c> {
    /// Create the resource. Nothing needs cleaning up if this fails.
    pub fn acquire(client: &'c dyn ApiClient, path: &ResourcePath, label: &str) -> Result<Self> {
        let id = client
            .create(path.as_str(), label)
            .with_context(|| format!("Failed to create fixture under {path}"))?;
        let member_path = path.member(&id);
        tracing::info!(id = %id, path = %member_path, "fixture provisioned");
        Ok(Self {
            client,
            fixture: Fixture {
                id,
                origin: FixtureOrigin::Provisioned { member_path },
            },
            armed: true,
        })
    }

    pub fn fixture(&self) -> &Fixture {
        &self.fixture
    }

    pub fn id(&self) -> &ResourceId {
        self.fixture.id()
    }

    /// Delete the resource now and report the outcome to the caller.
    pub fn release(mut self) -> Result<()> {
        self.armed = false;
        self.teardown()
    }

    fn teardown(&self) -> Result<()> {
        let FixtureOrigin::Provisioned { member_path } = &self.fixture.origin else {
            return Ok(());
        };
        self.client
            .delete(member_path)
            .with_context(|| format!("Failed to delete fixture at {member_path}"))?;
        tracing::info!(id = %self.fixture.id, path = %member_path, "fixture deleted");
        Ok(())
    }
}

impl Drop for Provisioned<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;
        if let Err(e) = self.teardown() {
            tracing::warn!(id = %self.fixture.id, "teardown failed: {e:#}");
        }
    }
}
