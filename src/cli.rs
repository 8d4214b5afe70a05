use crate::adapters::http::HttpApiClient;
use crate::adapters::memory::InMemoryApiClient;
use crate::app::config::FixtureConfig;
use crate::app::suite::demo_suite;
use crate::domain::ports::ApiClient;
use crate::domain::runner::{CaseOutcome, FixtureRunner, SuiteReport};
use anyhow::Result;
use std::sync::Arc;

/// HTTP client when a base URL is configured, in-memory otherwise.
pub fn build_client(config: &FixtureConfig) -> Result<Arc<dyn ApiClient>> {
    match &config.base_url {
        Some(url) => {
            tracing::info!(%url, "using HTTP resource API");
            Ok(Arc::new(HttpApiClient::new(url)?))
        }
        None => {
            tracing::info!("no base URL configured, using in-memory resource API");
            Ok(Arc::new(InMemoryApiClient::new()))
        }
    }
}

/// Run the demonstration suite and print the report. Returns whether every case passed.
pub fn run_demo_suite(config: &FixtureConfig, parallel: bool, json: bool) -> Result<bool> {
    let client = build_client(config)?;
    let runner = FixtureRunner::new(client);
    let cases = demo_suite(config)?;

    let report = if parallel {
        runner.run_parallel(cases)
    } else {
        runner.run_all(cases)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report)?;
    }
    Ok(report.all_passed())
}

pub fn print_report(report: &SuiteReport) -> Result<()> {
    println!("Fixture run:");
    println!("{}", "=".repeat(60));

    for (i, case) in report.cases.iter().enumerate() {
        let status = match &case.outcome {
            CaseOutcome::Passed => "PASS".to_string(),
            CaseOutcome::Failed(msg) => format!("FAIL: {msg}"),
            CaseOutcome::Panicked(msg) => format!("PANIC: {msg}"),
            CaseOutcome::SetupFailed(msg) => format!("SETUP FAILED: {msg}"),
        };
        println!("{}. {} [{}]", i + 1, case.name, status);
        if let Some(id) = &case.resource_id {
            println!("   resource: {}", id);
        }
        if case.torn_down {
            match &case.teardown_error {
                Some(e) => println!("   teardown: failed (ignored): {}", e),
                None => println!("   teardown: ok"),
            }
        }
    }

    println!("{}", "=".repeat(60));
    println!("{} passed, {} failed", report.passed(), report.failed());

    Ok(())
}
