//! Shared test utilities for integration tests.
//! This module is not compiled as a test binary; it is included by test files.
#![allow(dead_code)]

pub mod mock;

use fixture_lifecycle::domain::fixture::FixtureSpec;
use fixture_lifecycle::domain::resource::ResourceId;

pub fn users_spec() -> FixtureSpec {
    FixtureSpec::dynamic("/users", "dynamicUser")
}

pub fn static_spec(id: &str) -> FixtureSpec {
    FixtureSpec::Static(ResourceId::new(id).unwrap())
}
