//! SQLite storage implementation for the listing mirror.

mod model;
mod repository;

pub use model::ListingDB;
pub use repository::ListingRepository;
