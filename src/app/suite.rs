//! The demonstration suite: one case on hard-coded data, one on data
//! provisioned through the resource API for the duration of the case.

use crate::app::config::FixtureConfig;
use crate::domain::fixture::FixtureSpec;
use crate::domain::resource::ResourceId;
use crate::domain::runner::TestCase;
use anyhow::{Result, ensure};

pub const STATIC_CASE: &str = "static_data";
pub const DYNAMIC_CASE: &str = "dynamic_data";

/// Static identifiers are shared by every run, so concurrent runs can
/// pollute each other's data.
pub fn static_data_case(config: &FixtureConfig) -> Result<TestCase> {
    let id = ResourceId::new(config.static_id.clone())?;
    let expected = config.static_id.clone();
    Ok(TestCase::new(STATIC_CASE, FixtureSpec::Static(id), move |f| {
        ensure!(
            f.id().as_str() == expected,
            "expected static id {expected}, got {}",
            f.id()
        );
        Ok(())
    }))
}

pub fn dynamic_data_case(config: &FixtureConfig) -> TestCase {
    let label = config.label.clone();
    let spec = FixtureSpec::Dynamic {
        path: config.resource_path.clone(),
        label: label.clone(),
    };
    TestCase::new(DYNAMIC_CASE, spec, move |f| {
        tracing::info!("Testing with user: {}", f.id());
        ensure!(f.is_provisioned(), "fixture was not provisioned");
        ensure!(
            f.id().as_str().starts_with(&label),
            "id {} does not carry label {label}",
            f.id()
        );
        Ok(())
    })
}

pub fn demo_suite(config: &FixtureConfig) -> Result<Vec<TestCase>> {
    Ok(vec![static_data_case(config)?, dynamic_data_case(config)])
}
