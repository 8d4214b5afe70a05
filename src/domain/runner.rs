use crate::domain::fixture::{Fixture, FixtureSpec, Provisioned};
use crate::domain::ports::ApiClient;
use crate::domain::resource::ResourceId;
use anyhow::Result;
use serde::Serialize;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

pub type CaseBody = Box<dyn FnOnce(&Fixture) -> Result<()> + Send>;

/// A named unit of verification.
pub struct TestCase {
    pub name: String,
    pub fixture: FixtureSpec,
    body: CaseBody,
}

impl TestCase {
    pub fn new(
        name: impl Into<String>,
        fixture: FixtureSpec,
        body: impl FnOnce(&Fixture) -> Result<()> + Send + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            fixture,
            body: Box::new(body),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum CaseOutcome {
    Passed,
    Failed(String),
    Panicked(String),
    SetupFailed(String),
}

impl CaseOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, CaseOutcome::Passed)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub name: String,
    pub resource_id: Option<ResourceId>,
    pub outcome: CaseOutcome,
    /// Whether a delete call was issued for a provisioned resource.
    pub torn_down: bool,
    /// Swallowed deletion error. Never affects `outcome`.
    pub teardown_error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SuiteReport {
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.outcome.is_pass()).count()
    }

    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    pub fn case(&self, name: &str) -> Option<&CaseReport> {
        self.cases.iter().find(|c| c.name == name)
    }
}

/// Runs test cases through CREATE -> USE -> DESTROY.
#[derive(Clone)]
pub struct FixtureRunner {
    client: Arc<dyn ApiClient>,
}

impl FixtureRunner {
    pub fn new(client: Arc<dyn ApiClient>) -> Self {
        Self { client }
    }

    pub fn run(&self, case: TestCase) -> CaseReport {
        let TestCase {
            name,
            fixture,
            body,
        } = case;
        let span = tracing::info_span!("case", name = %name);
        let _entered = span.enter();

        match fixture {
            FixtureSpec::Static(id) => {
                tracing::debug!("using static fixture");
                let fixture = Fixture::fixed(id.clone());
                let outcome = run_body(body, &fixture);
                CaseReport {
                    name,
                    resource_id: Some(id),
                    outcome,
                    torn_down: false,
                    teardown_error: None,
                }
            }
            FixtureSpec::Dynamic { path, label } => {
                tracing::debug!(path = %path, "setting up");
                let guard = match Provisioned::acquire(self.client.as_ref(), &path, &label) {
                    Ok(guard) => guard,
                    Err(e) => {
                        tracing::error!("setup failed: {e:#}");
                        return CaseReport {
                            name,
                            resource_id: None,
                            outcome: CaseOutcome::SetupFailed(format!("{e:#}")),
                            torn_down: false,
                            teardown_error: None,
                        };
                    }
                };

                let resource_id = guard.id().clone();
                let outcome = run_body(body, guard.fixture());

                tracing::debug!("tearing down");
                let teardown_error = match guard.release() {
                    Ok(()) => None,
                    Err(e) => {
                        tracing::warn!("teardown failed, keeping test result: {e:#}");
                        Some(format!("{e:#}"))
                    }
                };

                CaseReport {
                    name,
                    resource_id: Some(resource_id),
                    outcome,
                    torn_down: true,
                    teardown_error,
                }
            }
        }
    }

    pub fn run_all(&self, cases: Vec<TestCase>) -> SuiteReport {
        SuiteReport {
            cases: cases.into_iter().map(|c| self.run(c)).collect(),
        }
    }

    /// One thread per case. Each case provisions its own resource.
    pub fn run_parallel(&self, cases: Vec<TestCase>) -> SuiteReport {
        let reports = std::thread::scope(|scope| {
            let handles: Vec<_> = cases
                .into_iter()
                .map(|case| {
                    let name = case.name.clone();
                    (name, scope.spawn(move || self.run(case)))
                })
                .collect();

            handles
                .into_iter()
                .map(|(name, handle)| {
                    handle.join().unwrap_or_else(|payload| CaseReport {
                        name,
                        resource_id: None,
                        outcome: CaseOutcome::Panicked(panic_message(payload.as_ref())),
                        torn_down: false,
                        teardown_error: None,
                    })
                })
                .collect()
        });
        SuiteReport { cases: reports }
    }
}

fn run_body(body: CaseBody, fixture: &Fixture) -> CaseOutcome {
    match catch_unwind(AssertUnwindSafe(|| body(fixture))) {
        Ok(Ok(())) => {
            tracing::info!("passed");
            CaseOutcome::Passed
        }
        Ok(Err(e)) => {
            tracing::info!("failed: {e:#}");
            CaseOutcome::Failed(format!("{e:#}"))
        }
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            tracing::info!("panicked: {msg}");
            CaseOutcome::Panicked(msg)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, bail};

    struct Unreachable;

    impl ApiClient for Unreachable {
        fn create(&self, _path: &str, _label: &str) -> Result<ResourceId> {
            Err(anyhow!("connection refused"))
        }

        fn delete(&self, _path: &str) -> Result<()> {
            panic!("delete must not be called");
        }
    }

    #[test]
    fn test_static_case_passes_without_client() {
        let runner = FixtureRunner::new(Arc::new(Unreachable));
        let report = runner.run(TestCase::new(
            "static",
            FixtureSpec::Static(ResourceId::new("staticUserId").unwrap()),
            |f| {
                assert_eq!(f.id().as_str(), "staticUserId");
                assert!(!f.is_provisioned());
                Ok(())
            },
        ));
        assert_eq!(report.outcome, CaseOutcome::Passed);
        assert!(!report.torn_down);
    }

    #[test]
    fn test_setup_failure_skips_body_and_teardown() {
        let runner = FixtureRunner::new(Arc::new(Unreachable));
        let report = runner.run(TestCase::new(
            "dynamic",
            FixtureSpec::dynamic("/users", "dynamicUser"),
            |_| panic!("body must not run"),
        ));
        match &report.outcome {
            CaseOutcome::SetupFailed(msg) => assert!(msg.contains("connection refused")),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(report.resource_id.is_none());
        assert!(!report.torn_down);
    }

    #[test]
    fn test_body_error_and_panic_messages() {
        let runner = FixtureRunner::new(Arc::new(Unreachable));
        let fixed = || FixtureSpec::Static(ResourceId::new("s").unwrap());

        let failed = runner.run(TestCase::new("err", fixed(), |_| bail!("mismatch")));
        assert_eq!(failed.outcome, CaseOutcome::Failed("mismatch".into()));

        let panicked = runner.run(TestCase::new("panic", fixed(), |_| panic!("kaboom")));
        assert_eq!(panicked.outcome, CaseOutcome::Panicked("kaboom".into()));
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let json = serde_json::to_value(CaseOutcome::Failed("x".into())).unwrap();
        assert_eq!(json, serde_json::json!({"status": "failed", "message": "x"}));
        let json = serde_json::to_value(CaseOutcome::Passed).unwrap();
        assert_eq!(json, serde_json::json!({"status": "passed"}));
    }
}
