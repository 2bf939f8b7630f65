//! Listings module - mirrored listing models and the mirror store trait.

mod listings_model;
mod listings_traits;


pub use listings_model::{sanitize_fields, Listing, ListingFields, RESERVED_FIELDS};
pub use listings_traits::ListingRepositoryTrait;
