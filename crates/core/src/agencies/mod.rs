//! Agencies module - credential store models and traits.

mod agencies_model;
mod agencies_traits;

pub use agencies_model::{AccessGrant, Agency};
pub use agencies_traits::AgencyRepositoryTrait;
