//! SQLite storage implementation for the agency credential store.

mod model;
mod repository;

pub use model::AgencyDB;
pub use repository::AgencyRepository;
