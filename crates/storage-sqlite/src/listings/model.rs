//! Database models for mirrored listings.

use diesel::prelude::*;

use propsync_core::listings::{Listing, ListingFields};

use crate::errors::StorageError;

/// Database model for listings.
///
/// The marketplace field bag is kept as a JSON object in `fields`, with the
/// key order of the last write.
#[derive(Queryable, Selectable, Insertable, AsChangeset, Identifiable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::listings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct ListingDB {
    pub id: String,
    pub agency_id: String,
    pub user_id: Option<String>,
    pub fields: String,
    pub updated_at: String,
}

impl ListingDB {
    pub fn from_listing(listing: Listing, updated_at: String) -> Result<Self, StorageError> {
        Ok(Self {
            fields: serde_json::to_string(&listing.fields)?,
            id: listing.id,
            agency_id: listing.agency_id,
            user_id: listing.user_id,
            updated_at,
        })
    }
}

impl TryFrom<ListingDB> for Listing {
    type Error = StorageError;

    fn try_from(db: ListingDB) -> Result<Self, Self::Error> {
        let fields: ListingFields = serde_json::from_str(&db.fields)?;
        Ok(Listing::new(db.id, db.agency_id, db.user_id, fields))
    }
}
