//! fixture-lifecycle library: scoped test fixtures provisioned through a resource API.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
pub mod server;
