//! Shared fixtures for the integration suites.

pub mod pipeline_helpers;
pub mod schema_fixtures;
