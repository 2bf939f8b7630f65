//! Reconciliation module - keeps the listing mirror in step with the marketplace.

mod reconciliation_model;
mod reconciliation_service;
mod reconciliation_traits;

#[cfg(test)]
mod reconciliation_service_tests;

pub use reconciliation_model::{ImportSummary, LinkOutcome};
pub use reconciliation_service::ReconciliationService;
pub use reconciliation_traits::ReconciliationServiceTrait;
